//! Structured logging for streamdash
//!
//! Provides a compact logging API with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Dual output: colored console + file persistence
//!
//! ## Usage
//!
//! ```rust,ignore
//! use streamdash::logger::{self, LogTag};
//!
//! logger::error(LogTag::Api, "Connection failed");
//! logger::info(LogTag::Dashboard, "Quick stats loaded");
//! logger::debug(LogTag::Cache, "Session tier hit (age 42s)"); // Only with --debug-cache
//! ```
//!
//! ## Initialization
//!
//! Call once at startup, after `paths::ensure_all_directories()`:
//! ```rust,ignore
//! logger::init();
//! ```

mod config;
mod file;
mod format;
mod levels;
mod tags;

// Re-export public types
pub use config::{ get_logger_config, init_from_args, set_logger_config, LoggerConfig };
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// Parses command-line arguments for debug flags and opens the log file.
/// Call once at application startup before any logging occurs.
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
}

/// Log at ERROR level (always shown, critical issues)
pub fn error(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (important issues)
pub fn warning(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (detailed diagnostics)
///
/// Only shown when the matching --debug-<module> flag is provided.
pub fn debug(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (very detailed tracing)
///
/// Only shown with --verbose or --verbose-<module>.
pub fn verbose(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush all pending log writes
///
/// Call this during shutdown to ensure all logs are written to disk.
pub fn flush() {
    file::flush_file_logging();
}

/// Check if a log message should be displayed
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Check against minimum log level threshold
/// 3. Debug level requires --debug-<module> flag for that tag
/// 4. Verbose level requires --verbose flag OR --verbose-<module> flag
fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    let cfg = config::get_logger_config();

    // Rule 1: Errors always log (critical)
    if level == LogLevel::Error {
        return true;
    }

    // Rule 3: Debug level requires debug mode for that specific tag
    if level == LogLevel::Debug {
        return cfg.min_level >= LogLevel::Debug || config::is_debug_enabled_for_tag(tag);
    }

    // Rule 4: Verbose requires explicit --verbose flag OR --verbose-<module> flag
    if level == LogLevel::Verbose {
        return cfg.min_level == LogLevel::Verbose || config::is_verbose_enabled_for_tag(tag);
    }

    // Rule 2: Check minimum level threshold
    level <= cfg.min_level
}

fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    format::format_and_log(tag, level, message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // Single test because the logger config is process-global and the test
    // harness runs tests on multiple threads.
    #[test]
    fn test_filtering_rules() {
        set_logger_config(LoggerConfig {
            min_level: LogLevel::Warning,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            log_to_file: false,
        });
        assert!(should_log(&LogTag::Api, LogLevel::Error));
        assert!(should_log(&LogTag::Api, LogLevel::Warning));
        assert!(!should_log(&LogTag::Api, LogLevel::Info));

        let mut debug_tags = HashSet::new();
        debug_tags.insert("cache".to_string());
        set_logger_config(LoggerConfig {
            min_level: LogLevel::Info,
            debug_tags,
            verbose_tags: HashSet::new(),
            log_to_file: false,
        });
        assert!(should_log(&LogTag::Cache, LogLevel::Debug));
        assert!(!should_log(&LogTag::Prefs, LogLevel::Debug));

        set_logger_config(LoggerConfig::default());
    }
}
