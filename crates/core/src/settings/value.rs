//! Typed setting values and their string forms.

use std::any::Any;

use super::SettingsError;

/// A type that can live in the settings registry.
///
/// Every value renders to a string and parses back from one; this is the only
/// representation that crosses the boundary.
pub trait SettingValue: Clone + Send + Sync + 'static {
    /// Human-readable type label used in error messages.
    const TYPE_NAME: &'static str;

    fn parse_setting(raw: &str) -> Result<Self, String>;

    fn render_setting(&self) -> String;
}

impl SettingValue for String {
    const TYPE_NAME: &'static str = "string";

    fn parse_setting(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn render_setting(&self) -> String {
        self.clone()
    }
}

impl SettingValue for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn parse_setting(raw: &str) -> Result<Self, String> {
        match raw.trim() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(format!("'{other}' is not a Boolean (expected 'true' or 'false')")),
        }
    }

    fn render_setting(&self) -> String {
        self.to_string()
    }
}

macro_rules! integer_setting {
    ($($ty:ty),*) => {
        $(
            impl SettingValue for $ty {
                const TYPE_NAME: &'static str = "integer";

                fn parse_setting(raw: &str) -> Result<Self, String> {
                    raw.trim()
                        .parse::<$ty>()
                        .map_err(|e| format!("'{raw}' is not a valid integer: {e}"))
                }

                fn render_setting(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_setting!(u32, u64, i64, usize);

/// Whitespace-separated list.
impl SettingValue for Vec<String> {
    const TYPE_NAME: &'static str = "string list";

    fn parse_setting(raw: &str) -> Result<Self, String> {
        Ok(raw.split_whitespace().map(str::to_string).collect())
    }

    fn render_setting(&self) -> String {
        self.join(" ")
    }
}

/// Optional string; the empty string means unset.
impl SettingValue for Option<String> {
    const TYPE_NAME: &'static str = "optional string";

    fn parse_setting(raw: &str) -> Result<Self, String> {
        Ok((!raw.is_empty()).then(|| raw.to_string()))
    }

    fn render_setting(&self) -> String {
        self.clone().unwrap_or_default()
    }
}

/// A registered entry, as seen by the registry.
///
/// Implemented by [`TypedSetting`]; hosts with unusual storage can implement
/// it directly.
pub trait Setting: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Current value as a string.
    fn render(&self) -> String;

    /// Default value as a string.
    fn render_default(&self) -> String;

    /// Parse `raw` and replace the current value. On error the value is unchanged.
    fn assign(&mut self, raw: &str) -> Result<(), SettingsError>;

    /// Restore the default.
    fn reset(&mut self);

    /// True once the value has been assigned since registration or the last reset.
    fn is_overridden(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// A named setting holding a `T`.
#[derive(Debug, Clone)]
pub struct TypedSetting<T> {
    name: String,
    description: String,
    value: T,
    default: T,
    overridden: bool,
}

impl<T: SettingValue> TypedSetting<T> {
    pub fn new(name: impl Into<String>, default: T, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value: default.clone(),
            default,
            overridden: false,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T: SettingValue> Setting for TypedSetting<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn render(&self) -> String {
        self.value.render_setting()
    }

    fn render_default(&self) -> String {
        self.default.render_setting()
    }

    fn assign(&mut self, raw: &str) -> Result<(), SettingsError> {
        let parsed = T::parse_setting(raw)
            .map_err(|reason| SettingsError::invalid_value(&self.name, raw, reason))?;
        self.value = parsed;
        self.overridden = true;
        Ok(())
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
        self.overridden = false;
    }

    fn is_overridden(&self) -> bool {
        self.overridden
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
