//! Runtime configuration

use serde::{Deserialize, Serialize};

use crate::error::JsError;
use crate::schema::DEFAULT_PROPERTY_LIMIT;

/// Host-tunable runtime settings.
///
/// Every field has a default, so a host may supply partial JSON:
///
/// ```
/// # use barista::RuntimeConfig;
/// let config = RuntimeConfig::from_json_str(r#"{ "inline_caching": false }"#).unwrap();
/// assert_eq!(config.max_properties, 16384);
/// assert!(!config.inline_caching);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum number of named properties on a single object
    pub max_properties: usize,
    /// When false, `PropertyCache` always performs a full lookup
    pub inline_caching: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_properties: DEFAULT_PROPERTY_LIMIT,
            inline_caching: true,
        }
    }
}

impl RuntimeConfig {
    pub fn from_json_str(text: &str) -> Result<Self, JsError> {
        let config: RuntimeConfig =
            serde_json::from_str(text).map_err(|e| JsError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, JsError> {
        serde_json::to_string_pretty(self).map_err(|e| JsError::config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), JsError> {
        if self.max_properties == 0 {
            return Err(JsError::config("max_properties must be at least 1"));
        }
        Ok(())
    }
}
