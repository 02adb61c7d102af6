//! Centralized path resolution for streamdash
//!
//! All file and directory paths are resolved through this module so the cache
//! tiers, preference store and logger agree on one layout:
//!
//! ```text
//! <platform data dir>/streamdash/
//! ├── data/        (persistent tier + preference blobs, one JSON file per key)
//! └── logs/        (streamdash_YYYY-MM-DD.log)
//! ```
//!
//! Base directory follows platform standards via `dirs`:
//! - **macOS**: `~/Library/Application Support/streamdash/`
//! - **Windows**: `%LOCALAPPDATA%\streamdash\`
//! - **Linux**: `$XDG_DATA_HOME/streamdash/` (fallback `~/.local/share/streamdash/`)

use chrono::Local;
use once_cell::sync::Lazy;
use std::path::PathBuf;

/// Lazy-initialized base directory (thread-safe)
static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

fn resolve_base_directory() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join("streamdash"),
        // Headless containers without a home directory fall back to cwd
        None => PathBuf::from(".streamdash"),
    }
}

/// Base directory for all streamdash state
pub fn get_base_directory() -> PathBuf {
    BASE_DIRECTORY.clone()
}

/// Directory holding persistent-tier and preference JSON blobs
pub fn get_data_directory() -> PathBuf {
    get_base_directory().join("data")
}

/// Directory holding log files
pub fn get_logs_directory() -> PathBuf {
    get_base_directory().join("logs")
}

/// Per-day log file path
pub fn get_log_file_path() -> PathBuf {
    let date = Local::now().format("%Y-%m-%d").to_string();
    get_logs_directory().join(format!("streamdash_{}.log", date))
}

/// Create all required directories
///
/// Must run before logger initialization (the logger needs the logs
/// directory to exist).
pub fn ensure_all_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_data_directory())?;
    std::fs::create_dir_all(get_logs_directory())?;
    Ok(())
}
