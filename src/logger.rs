//! The log panel.
//!
//! Messages written here are shown to the user and mirrored into the `log`
//! facade.

use std::collections::VecDeque;

const MAX_ENTRIES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Where the message comes from, such as `"save"` or a file name
    pub category: String,
    pub message: String,
}

/// Bounded buffer of log panel entries.
#[derive(Debug, Default)]
pub struct Logger {
    entries: VecDeque<LogEntry>,
    changed: bool,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, category: &str, message: impl Into<String>) {
        self.write(LogLevel::Info, category, message.into());
    }

    pub fn warn(&mut self, category: &str, message: impl Into<String>) {
        self.write(LogLevel::Warn, category, message.into());
    }

    pub fn error(&mut self, category: &str, message: impl Into<String>) {
        self.write(LogLevel::Error, category, message.into());
    }

    fn write(&mut self, level: LogLevel, category: &str, message: String) {
        match level {
            LogLevel::Info => log::info!("[{}] {}", category, message),
            LogLevel::Warn => log::warn!("[{}] {}", category, message),
            LogLevel::Error => log::error!("[{}] {}", category, message),
        }

        self.entries.push_back(LogEntry {
            level,
            category: category.to_string(),
            message,
        });
        if self.entries.len() > MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.changed = true;
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.changed = true;
    }

    /// Whether anything was written since the last call.
    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }
}
