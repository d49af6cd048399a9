use std::fmt;
use std::str;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// An error used when parsing `Severity`.
#[derive(Debug, Error)]
#[error("invalid severity")]
pub struct ParseSeverityError;

/// Represents the severity of a log entry.
///
/// Severities are ordered from most verbose to most severe, so a level gate
/// is a plain comparison: an entry passes a threshold `t` when its severity
/// is `>= t`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Very fine-grained tracing information.
    Trace,
    /// Indicates very spammy debug information.
    Debug,
    /// Informational messages.
    Info,
    /// A warning.
    Warn,
    /// An error.
    Error,
    /// A critical event that usually requires immediate attention.
    Critical,
    /// An error severe enough to take the service down.
    Fatal,
}

impl Default for Severity {
    fn default() -> Severity {
        Severity::Info
    }
}

impl str::FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(string: &str) -> Result<Severity, Self::Err> {
        Ok(match string {
            "trace" => Severity::Trace,
            "debug" => Severity::Debug,
            "info" => Severity::Info,
            "warn" | "warning" => Severity::Warn,
            "error" => Severity::Error,
            "critical" => Severity::Critical,
            "fatal" => Severity::Fatal,
            _ => return Err(ParseSeverityError),
        })
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Severity {
    /// Returns the lowercase name of the severity.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Critical => "critical",
            Severity::Fatal => "fatal",
        }
    }

    fn to_u8(self) -> u8 {
        self as u8
    }

    fn from_u8(value: u8) -> Severity {
        match value {
            0 => Severity::Trace,
            1 => Severity::Debug,
            2 => Severity::Info,
            3 => Severity::Warn,
            4 => Severity::Error,
            5 => Severity::Critical,
            _ => Severity::Fatal,
        }
    }
}

/// Decides whether entries of a given severity should be processed.
///
/// A fixed [`Severity`] is itself an enabler (a constant threshold), while
/// [`AtomicLevel`] is the adjustable variant shared between sinks.
pub trait LevelEnabler: Send + Sync {
    /// Returns `true` if entries at `severity` should be processed.
    fn enabled(&self, severity: Severity) -> bool;
}

impl LevelEnabler for Severity {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= *self
    }
}

/// A thread-safe, dynamically adjustable severity threshold.
///
/// Handles are cheap to clone and every clone refers to the same cell, so a
/// [`set`](AtomicLevel::set) through any handle is observed by all sinks
/// holding one. This is how the log level of a running service is changed
/// without rebuilding its loggers.
#[derive(Debug, Clone)]
pub struct AtomicLevel {
    level: Arc<AtomicU8>,
}

impl AtomicLevel {
    /// Creates a threshold cell starting at `level`.
    pub fn new(level: Severity) -> AtomicLevel {
        AtomicLevel {
            level: Arc::new(AtomicU8::new(level.to_u8())),
        }
    }

    /// Returns the current threshold.
    pub fn get(&self) -> Severity {
        Severity::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Replaces the threshold, affecting all clones of this handle.
    pub fn set(&self, level: Severity) {
        self.level.store(level.to_u8(), Ordering::Relaxed);
    }
}

impl Default for AtomicLevel {
    fn default() -> AtomicLevel {
        AtomicLevel::new(Severity::Info)
    }
}

impl LevelEnabler for AtomicLevel {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round_trip() {
        for severity in [
            Severity::Trace,
            Severity::Debug,
            Severity::Info,
            Severity::Warn,
            Severity::Error,
            Severity::Critical,
            Severity::Fatal,
        ] {
            assert_eq!(severity.as_str().parse::<Severity>().unwrap(), severity);
        }
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warn);
        assert!("nonsense".parse::<Severity>().is_err());
        assert!("Info".parse::<Severity>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(Severity::Trace < Severity::Debug);
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
        assert!(Severity::Critical < Severity::Fatal);
    }

    #[test]
    fn test_threshold_boundary() {
        let threshold = Severity::Warn;
        assert!(threshold.enabled(Severity::Warn));
        assert!(threshold.enabled(Severity::Error));
        assert!(!threshold.enabled(Severity::Info));
    }

    #[test]
    fn test_atomic_level_shared_across_clones() {
        let level = AtomicLevel::new(Severity::Info);
        let handle = level.clone();

        assert!(level.enabled(Severity::Info));
        handle.set(Severity::Error);
        assert_eq!(level.get(), Severity::Error);
        assert!(!level.enabled(Severity::Warn));
        assert!(level.enabled(Severity::Error));
    }
}
