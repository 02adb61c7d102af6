//! File persistence for log output
//!
//! Appends plain-text log lines to a per-day file under the logs directory.
//! File logging failures never interrupt the application; the file handle is
//! simply dropped and console logging continues.

use crate::paths;
use once_cell::sync::Lazy;
use std::fs::{ File, OpenOptions };
use std::io::Write;
use std::sync::Mutex;

static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

/// Open the log file for appending. Called once from logger::init().
pub fn init_file_logging() {
    if !super::config::get_logger_config().log_to_file {
        return;
    }

    let path = paths::get_log_file_path();
    let file = OpenOptions::new().create(true).append(true).open(&path);

    match file {
        Ok(f) => {
            if let Ok(mut guard) = LOG_FILE.lock() {
                *guard = Some(f);
            }
        }
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
        }
    }
}

/// Append one line to the log file, if file logging is active
pub fn write_to_file(line: &str) {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(file) = guard.as_mut() {
            // A full disk should not take down the dashboard
            let _ = writeln!(file, "{}", line);
        }
    }
}

/// Flush pending writes. Called during shutdown.
pub fn flush_file_logging() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(file) = guard.as_mut() {
            let _ = file.flush();
        }
    }
}
