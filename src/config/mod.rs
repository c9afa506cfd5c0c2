//! Runtime configuration
//!
//! Preferences are read from environment variables once at construction.
//! Unset or unparseable values fall back to defaults, never error.

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Diagnostics logging preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Minimum level emitted ("error", "warn", "info", "debug", "trace")
    pub level: String,
    /// Emit JSON lines instead of human-readable lines
    pub structured: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            level: env::var("ERRKIT_LOG_LEVEL").unwrap_or_else(|_| "error".to_string()),
            structured: env_parse("ERRKIT_STRUCTURED_LOGGING", false),
        }
    }
}

impl LoggingPreferences {
    pub fn min_level(&self) -> LogLevel {
        LogLevel::from_str(&self.level).unwrap_or(LogLevel::Error)
    }
}

/// Response serializer preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializerPreferences {
    /// Include error traces in debug diagnostics
    pub log_error_stacks: bool,
    /// Include serialized response bodies in debug diagnostics
    pub log_response_bodies: bool,
}

impl Default for SerializerPreferences {
    fn default() -> Self {
        Self {
            log_error_stacks: env_parse("ERRKIT_LOG_ERROR_STACKS", true),
            log_response_bodies: env_parse("ERRKIT_LOG_RESPONSE_BODIES", true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_preferences_level_parsing() {
        let prefs = LoggingPreferences {
            level: "debug".to_string(),
            structured: false,
        };
        assert_eq!(prefs.min_level(), LogLevel::Debug);

        let prefs = LoggingPreferences {
            level: "nonsense".to_string(),
            structured: false,
        };
        assert_eq!(prefs.min_level(), LogLevel::Error);
    }

    #[test]
    fn test_serializer_preferences_default_to_full_diagnostics() {
        env::remove_var("ERRKIT_LOG_ERROR_STACKS");
        env::remove_var("ERRKIT_LOG_RESPONSE_BODIES");

        let prefs = SerializerPreferences::default();
        assert!(prefs.log_error_stacks);
        assert!(prefs.log_response_bodies);
    }

    #[test]
    fn test_serializer_preferences_roundtrip() {
        let prefs = SerializerPreferences {
            log_error_stacks: true,
            log_response_bodies: false,
        };
        let json = serde_json::to_string(&prefs).unwrap();
        let parsed: SerializerPreferences = serde_json::from_str(&json).unwrap();
        assert!(parsed.log_error_stacks);
        assert!(!parsed.log_response_bodies);
    }
}
