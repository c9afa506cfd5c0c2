//! Diagnostics logging
//!
//! Thread-safe global logging for serializer diagnostics. The error
//! taxonomy itself never requires logging to be initialized; every
//! access path here degrades to a no-op when it is not.

pub mod events;
pub mod service;

pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

use crate::config::LoggingPreferences;
use std::sync::{Arc, OnceLock};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Initialize global logging from environment-derived preferences.
pub fn init_global_logging() -> Result<(), String> {
    let prefs = LoggingPreferences::default();
    let logging_service = Arc::new(LoggingService::with_preferences(&prefs));

    GLOBAL_LOGGER
        .set(logging_service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Safe error logging (won't panic if uninitialized)
pub fn safe_log_error(message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_error(message);
    } else {
        eprintln!("[ERROR] FALLBACK: {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Initialization is once-per-process, so both outcomes are valid here.
    #[test]
    fn test_global_logging_initialization() {
        if is_initialized() {
            return;
        }

        let memory = Arc::new(MemoryLogger::new());
        let service = Arc::new(LoggingService::new(memory, LogLevel::Debug));
        let result = init_global_logging_with_service(service);
        assert!(result.is_ok());
        assert!(is_initialized());
    }

    #[test]
    fn test_safe_logging_never_panics() {
        safe_log_error("Test error");
    }
}
