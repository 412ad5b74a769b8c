//! Console logger for CLI use

use super::traits::Logger;

/// Writes log lines to stderr, prefixed with `[sreq]`
///
/// Debug lines (per-key lookups, routing decisions) are dropped unless
/// enabled, which is what `--verbose` maps to. Secret values are never
/// passed to the logger, only keys and addresses.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    debug: bool,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            prefix: "[sreq]".to_string(),
            debug: false,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Also print debug lines
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    fn line(&self, level: &str, message: &str) -> String {
        format!("{} {}: {}", self.prefix, level, message)
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        if self.debug {
            eprintln!("{}", self.line("DEBUG", message));
        }
    }

    fn info(&self, message: &str) {
        eprintln!("{}", self.line("INFO", message));
    }

    fn warn(&self, message: &str) {
        eprintln!("{}", self.line("WARN", message));
    }

    fn error(&self, message: &str) {
        eprintln!("{}", self.line("ERROR", message));
    }
}
