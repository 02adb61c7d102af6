//! Log formatting and output with ANSI colors
//!
//! Handles:
//! - Colorized console output with aligned tag and level columns
//! - Dual output (console + file)

use super::file::write_to_file;
use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;

/// Log format widths for alignment
const TAG_WIDTH: usize = 10;
const LEVEL_WIDTH: usize = 7;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let time = Local::now().format("%H:%M:%S").to_string();

    let tag_str = format!("{:<width$}", tag.as_str(), width = TAG_WIDTH);
    let level_str = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);

    let colored_line = format!(
        "{} [{}] [{}] {}",
        time.dimmed(),
        tag_str.color(tag.color()),
        color_level(&level_str, level),
        message
    );

    // Plain text for the log file, colored for the console
    let plain_line = format!("{} [{}] [{}] {}", time, tag_str, level_str, message);

    println!("{}", colored_line);
    write_to_file(&plain_line);
}

fn color_level(text: &str, level: LogLevel) -> ColoredString {
    match level {
        LogLevel::Error => text.red().bold(),
        LogLevel::Warning => text.yellow(),
        LogLevel::Info => text.green(),
        LogLevel::Debug => text.cyan(),
        LogLevel::Verbose => text.dimmed(),
    }
}
