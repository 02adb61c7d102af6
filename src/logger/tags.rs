/// Log tags identify which subsystem produced a message.
///
/// Each tag maps to a `--debug-<tag>` command-line flag for per-module debug
/// output and to a fixed color in console output.

use colored::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Dashboard,
    Cache,
    Prefs,
    Api,
    Display,
}

impl LogTag {
    /// Display name, padded by the formatter
    pub fn as_str(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Dashboard => "DASHBOARD",
            LogTag::Cache => "CACHE",
            LogTag::Prefs => "PREFS",
            LogTag::Api => "API",
            LogTag::Display => "DISPLAY",
        }
    }

    /// Key used in --debug-<key> / --verbose-<key> flags
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Dashboard => "dashboard",
            LogTag::Cache => "cache",
            LogTag::Prefs => "prefs",
            LogTag::Api => "api",
            LogTag::Display => "display",
        }
    }

    /// Console color for the tag column
    pub fn color(&self) -> Color {
        match self {
            LogTag::System => Color::White,
            LogTag::Dashboard => Color::Cyan,
            LogTag::Cache => Color::Yellow,
            LogTag::Prefs => Color::Magenta,
            LogTag::Api => Color::Blue,
            LogTag::Display => Color::Green,
        }
    }

    /// All tags, for flag scanning at init
    pub fn all() -> &'static [LogTag] {
        &[
            LogTag::System,
            LogTag::Dashboard,
            LogTag::Cache,
            LogTag::Prefs,
            LogTag::Api,
            LogTag::Display,
        ]
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
