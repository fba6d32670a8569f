//! The settings registry.
//!
//! Entries are kept in registration order behind a single mutex. Lookup is an
//! exact, case-sensitive scan, so the first registration of a name wins.
//! Every read renders under the lock and every write parses and assigns under
//! the lock; a concurrent reader never observes a partially updated value.

use std::sync::LazyLock;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::SettingsError;
use super::value::{Setting, SettingValue, TypedSetting};
use crate::bounded;

static GLOBAL: LazyLock<SettingsRegistry> = LazyLock::new(SettingsRegistry::new);

/// Point-in-time description of one setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingInfo {
    pub name: String,
    pub description: String,
    pub value: String,
    pub default_value: String,
    pub overridden: bool,
}

/// Name → typed value store.
pub struct SettingsRegistry {
    entries: Mutex<Vec<Box<dyn Setting>>>,
}

impl Default for SettingsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SettingsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock();
        f.debug_list()
            .entries(entries.iter().map(|s| s.name()))
            .finish()
    }
}

fn find<'a>(entries: &'a [Box<dyn Setting>], name: &str) -> Option<&'a dyn Setting> {
    entries
        .iter()
        .find(|s| s.name() == name)
        .map(|s| &**s)
}

fn find_mut<'a>(
    entries: &'a mut [Box<dyn Setting>],
    name: &str,
) -> Option<&'a mut Box<dyn Setting>> {
    entries.iter_mut().find(|s| s.name() == name)
}

impl SettingsRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// The process-wide registry used by the C boundary.
    pub fn global() -> &'static SettingsRegistry {
        &GLOBAL
    }

    /// Register a setting.
    ///
    /// Duplicate names are logged but still appended; lookups keep resolving
    /// to the first registration.
    pub fn register(&self, setting: impl Setting + 'static) {
        self.register_boxed(Box::new(setting));
    }

    pub fn register_boxed(&self, setting: Box<dyn Setting>) {
        let mut entries = self.entries.lock();
        if find(&entries, setting.name()).is_some() {
            warn!(
                setting = setting.name(),
                "duplicate setting registered; first registration wins"
            );
        } else {
            debug!(setting = setting.name(), "setting registered");
        }
        entries.push(setting);
    }

    /// Register a batch of settings, in order.
    pub fn register_all(&self, settings: impl IntoIterator<Item = Box<dyn Setting>>) {
        for setting in settings {
            self.register_boxed(setting);
        }
    }

    /// Register a [`TypedSetting`] built from its parts.
    pub fn register_typed<T: SettingValue>(
        &self,
        name: impl Into<String>,
        default: T,
        description: impl Into<String>,
    ) {
        self.register(TypedSetting::new(name, default, description));
    }

    pub fn contains(&self, name: &str) -> bool {
        find(&self.entries.lock(), name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Current value of `name`, rendered as a string.
    pub fn get(&self, name: &str) -> Result<String, SettingsError> {
        let entries = self.entries.lock();
        find(&entries, name)
            .map(|s| s.render())
            .ok_or_else(|| SettingsError::key_not_found(name))
    }

    /// Render `name` into `dest` following the bounded-buffer rules.
    ///
    /// Returns the rendered length, excluding the terminator.
    pub fn get_into(&self, name: &str, dest: Option<&mut [u8]>) -> Result<usize, SettingsError> {
        let value = self.get(name)?;
        Ok(bounded::write_bounded(Some(&value), "setting value", dest)?)
    }

    /// Parse `raw` into the setting's type and store it.
    pub fn set(&self, name: &str, raw: &str) -> Result<(), SettingsError> {
        self.set_bytes(name, raw.as_bytes())
    }

    /// [`set`](Self::set) for bytes handed over by a foreign caller.
    ///
    /// Bytes that are not UTF-8 are an invalid value for every setting type;
    /// an unknown name is still reported first.
    pub fn set_bytes(&self, name: &str, raw: &[u8]) -> Result<(), SettingsError> {
        let mut entries = self.entries.lock();
        let setting =
            find_mut(&mut entries, name).ok_or_else(|| SettingsError::key_not_found(name))?;
        let raw = std::str::from_utf8(raw).map_err(|e| {
            SettingsError::invalid_value(name, String::from_utf8_lossy(raw), e.to_string())
        })?;
        setting.assign(raw)?;
        info!(setting = name, "setting updated");
        Ok(())
    }

    /// Read the typed value of `name`.
    pub fn value_of<T: SettingValue>(&self, name: &str) -> Result<T, SettingsError> {
        let entries = self.entries.lock();
        let setting = find(&entries, name).ok_or_else(|| SettingsError::key_not_found(name))?;
        setting
            .as_any()
            .downcast_ref::<TypedSetting<T>>()
            .map(|typed| typed.value().clone())
            .ok_or_else(|| SettingsError::WrongType {
                name: name.to_string(),
                expected: T::TYPE_NAME,
            })
    }

    pub fn describe(&self, name: &str) -> Result<String, SettingsError> {
        let entries = self.entries.lock();
        find(&entries, name)
            .map(|s| s.description().to_string())
            .ok_or_else(|| SettingsError::key_not_found(name))
    }

    /// Restore the default value of `name`.
    pub fn reset(&self, name: &str) -> Result<(), SettingsError> {
        let mut entries = self.entries.lock();
        let setting =
            find_mut(&mut entries, name).ok_or_else(|| SettingsError::key_not_found(name))?;
        setting.reset();
        Ok(())
    }

    /// Restore every overridden setting. Returns how many were reset.
    pub fn reset_overridden(&self) -> usize {
        let mut entries = self.entries.lock();
        let mut count = 0;
        for setting in entries.iter_mut().filter(|s| s.is_overridden()) {
            setting.reset();
            count += 1;
        }
        count
    }

    /// Apply a batch of overrides.
    ///
    /// Unknown names are logged and skipped. The first invalid value stops the
    /// batch and is returned; overrides before it stay applied. Returns the
    /// number of settings changed.
    pub fn apply<I, K, V>(&self, overrides: I) -> Result<usize, SettingsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut applied = 0;
        for (name, value) in overrides {
            match self.set(name.as_ref(), value.as_ref()) {
                Ok(()) => applied += 1,
                Err(SettingsError::KeyNotFound { name }) => {
                    warn!(setting = %name, "unknown setting in configuration; ignoring");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(applied)
    }

    /// Describe every setting, in registration order.
    ///
    /// Later duplicates of a name are omitted, matching lookup behaviour.
    pub fn snapshot(&self) -> Vec<SettingInfo> {
        let entries = self.entries.lock();
        let mut seen = std::collections::HashSet::new();
        entries
            .iter()
            .filter(|s| seen.insert(s.name().to_string()))
            .map(|s| SettingInfo {
                name: s.name().to_string(),
                description: s.description().to_string(),
                value: s.render(),
                default_value: s.render_default(),
                overridden: s.is_overridden(),
            })
            .collect()
    }

    /// [`snapshot`](Self::snapshot) as a JSON object keyed by setting name, in
    /// registration order.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let map: serde_json::Map<String, serde_json::Value> = self
            .snapshot()
            .into_iter()
            .map(|info| {
                let name = info.name.clone();
                serde_json::to_value(info).map(|v| (name, v))
            })
            .collect::<serde_json::Result<_>>()?;
        serde_json::to_string(&map)
    }
}
