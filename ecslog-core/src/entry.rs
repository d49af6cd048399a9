use std::time::SystemTime;

use crate::Severity;

/// A single log call, created by the facade and handed to every sink.
///
/// Entries are immutable once built; sinks receive a shared reference and
/// must not rely on any state beyond the entry and the fields passed along
/// with it.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Severity of the call.
    pub severity: Severity,
    /// The log message.
    pub message: String,
    /// When the call was made.
    pub timestamp: SystemTime,
    /// Name of the logger that made the call, empty when unnamed.
    pub logger_name: String,
}

impl Entry {
    /// Creates an entry timestamped now, with an empty logger name.
    pub fn new(severity: Severity, message: impl Into<String>) -> Entry {
        Entry {
            severity,
            message: message.into(),
            timestamp: SystemTime::now(),
            logger_name: String::new(),
        }
    }

    /// Sets the logger name.
    pub fn with_logger(mut self, name: impl Into<String>) -> Entry {
        self.logger_name = name.into();
        self
    }
}
