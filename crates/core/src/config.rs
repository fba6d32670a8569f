//! Configuration loaded from environment variables and an optional TOML file.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `ERRGATE_LOG` | tracing filter directive (default: file `log` key, then `warn`) |
//! | `ERRGATE_CONFIG_FILE` | path to a TOML file with a `[settings]` table |
//! | `ERRGATE_SETTINGS` | inline overrides, one `name = value` per line |
//!
//! Inline overrides are applied after the file, so they win.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::settings::{SettingsError, SettingsRegistry};

pub const ENV_LOG: &str = "ERRGATE_LOG";
pub const ENV_CONFIG_FILE: &str = "ERRGATE_CONFIG_FILE";
pub const ENV_SETTINGS: &str = "ERRGATE_SETTINGS";

/// Filter used when nothing else is configured.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryConfig {
    /// tracing `EnvFilter` directive.
    pub log_filter: String,

    /// TOML file the overrides were read from, if any.
    pub settings_file: Option<PathBuf>,

    /// Setting overrides in application order.
    pub overrides: Vec<(String, String)>,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            settings_file: None,
            overrides: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    log: Option<String>,

    #[serde(default)]
    settings: BTreeMap<String, toml::Value>,
}

impl BoundaryConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let settings_file = lookup(ENV_CONFIG_FILE)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let file = match &settings_file {
            Some(path) => load_file(path)?,
            None => ConfigFile::default(),
        };

        let log_filter = lookup(ENV_LOG)
            .or(file.log)
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let mut overrides = Vec::with_capacity(file.settings.len());
        for (name, value) in file.settings {
            let rendered = render_toml_value(&value)
                .with_context(|| format!("setting '{name}' in configuration file"))?;
            overrides.push((name, rendered));
        }

        if let Some(inline) = lookup(ENV_SETTINGS) {
            overrides.extend(parse_inline(&inline).context("ERRGATE_SETTINGS is malformed")?);
        }

        Ok(Self {
            log_filter,
            settings_file,
            overrides,
        })
    }

    /// Apply the overrides to `registry`. Returns how many settings changed.
    pub fn apply_to(&self, registry: &SettingsRegistry) -> Result<usize, SettingsError> {
        registry.apply(
            self.overrides
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )
    }
}

fn load_file(path: &Path) -> Result<ConfigFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("failed to parse configuration file {}", path.display()))
}

/// Render a TOML value into the string form settings parse from.
fn render_toml_value(value: &toml::Value) -> Result<String> {
    Ok(match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(d) => d.to_string(),
        toml::Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                if matches!(item, toml::Value::Array(_) | toml::Value::Table(_)) {
                    bail!("nested arrays and tables are not supported in lists");
                }
                parts.push(render_toml_value(item)?);
            }
            parts.join(" ")
        }
        toml::Value::Table(_) => bail!("tables are not valid setting values"),
    })
}

/// Parse `name = value` lines. Blank lines and `#` comments are skipped.
fn parse_inline(text: &str) -> Result<Vec<(String, String)>> {
    let mut overrides = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((name, value)) = line.split_once('=') else {
            bail!("line {}: expected 'name = value', got '{line}'", index + 1);
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("line {}: missing setting name", index + 1);
        }
        overrides.push((name.to_string(), value.trim().to_string()));
    }
    Ok(overrides)
}
