/// Logger configuration and flag parsing
///
/// Scans CMD_ARGS once at init for:
/// - `--debug-<module>`: enable Debug level for one tag
/// - `--verbose` / `--verbose-<module>`: enable Verbose level globally / per tag
/// - `--quiet`: raise the threshold to Warning

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped (errors always pass)
    pub min_level: LogLevel,

    /// Tags with Debug level force-enabled via --debug-<module>
    pub debug_tags: HashSet<String>,

    /// Tags with Verbose level force-enabled via --verbose-<module>
    pub verbose_tags: HashSet<String>,

    /// Mirror log output to a file under the logs directory
    pub log_to_file: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            log_to_file: true,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> = Lazy::new(|| {
    RwLock::new(LoggerConfig::default())
});

/// Snapshot of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read()
        .map(|c| c.clone())
        .unwrap_or_default()
}

/// Replace the logger configuration (tests and embedding applications)
pub fn set_logger_config(config: LoggerConfig) {
    if let Ok(mut current) = LOGGER_CONFIG.write() {
        *current = config;
    }
}

/// Build configuration from command-line arguments
pub fn init_from_args() {
    let mut config = LoggerConfig::default();

    if arguments::is_quiet_enabled() {
        config.min_level = LogLevel::Warning;
    }
    if arguments::is_verbose_enabled() {
        config.min_level = LogLevel::Verbose;
    }

    for tag in LogTag::all() {
        let key = tag.to_debug_key();
        if arguments::has_arg(&format!("--debug-{}", key)) {
            config.debug_tags.insert(key.to_string());
        }
        if arguments::has_arg(&format!("--verbose-{}", key)) {
            config.verbose_tags.insert(key.to_string());
        }
    }

    set_logger_config(config);
}

/// Debug level enabled for this tag?
pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config().debug_tags.contains(tag.to_debug_key())
}

/// Verbose level enabled for this tag?
pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config().verbose_tags.contains(tag.to_debug_key())
}
