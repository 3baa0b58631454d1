//! Emitter configuration and the fixed names used by the hijack layer.
//!
//! # Environment Variables
//!
//! - `EVENT_HIJACK_MAX_LISTENERS`: Override the per-event listener limit
//!   (`0` disables the leak warning)

use serde::{Deserialize, Serialize};

use crate::error::{EmitterError, Result};

/// Environment variable for the per-event listener limit.
pub const MAX_LISTENERS_ENV: &str = "EVENT_HIJACK_MAX_LISTENERS";

/// Default number of listeners per event before a leak warning is logged.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Prefix of the internal event name hijacked listeners are stored under.
pub const ALIAS_PREFIX: &str = "_hijack_";

/// Prefix of the shorthand handler property, e.g. `ondata`.
pub const PROPERTY_PREFIX: &str = "on";

/// Internal event name for the hijacked partition of `name`.
pub fn alias_name(name: &str) -> String {
    format!("{}{}", ALIAS_PREFIX, name)
}

/// Shorthand handler property for `name`.
pub fn property_name(name: &str) -> String {
    format!("{}{}", PROPERTY_PREFIX, name)
}

/// Storage key of the shorthand handler slot for `name`.
pub fn slot_key(name: &str) -> String {
    format!("{}{}", ALIAS_PREFIX, property_name(name))
}

/// Host emitter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Listener count per event above which a warning is logged. `0` means unlimited.
    pub max_listeners: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}

impl EmitterConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds a config from the environment, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `EmitterError::InvalidConfig` if `EVENT_HIJACK_MAX_LISTENERS`
    /// is set but is not a non-negative integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(MAX_LISTENERS_ENV) {
            config.max_listeners = raw.trim().parse().map_err(|_| {
                EmitterError::InvalidConfig(format!("{}={:?} is not a count", MAX_LISTENERS_ENV, raw))
            })?;
        }
        Ok(config)
    }
}
