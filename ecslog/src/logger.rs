use std::env;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use ecslog_core::{tee, AtomicLevel, Core, Entry, Field, Severity, SyncError};
use ecslog_sentry::{SentryCore, DEFAULT_FLUSH_TIMEOUT};
use sentry_core::Client;

use crate::ecs::EcsCore;

/// The environment variable [`Builder::from_env`] reads the initial level
/// from.
pub const LEVEL_ENV_VAR: &str = "LOG_LEVEL";

/// The user-facing logger.
///
/// A logger is a cheap handle over a shared sink [`Core`]; clones,
/// [`with`](Logger::with) children and [`named`](Logger::named) children
/// all write to the same sinks. Logging never returns an error: a sink
/// failure must not fail the code that merely tried to log.
#[derive(Clone)]
pub struct Logger {
    core: Arc<dyn Core>,
    level: AtomicLevel,
    name: String,
}

impl Logger {
    /// Starts building a logger.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Logs a message at the given severity.
    pub fn log(&self, severity: Severity, message: &str, fields: &[Field]) {
        if !self.core.enabled(severity) {
            return;
        }
        let entry = Entry::new(severity, message).with_logger(self.name.clone());
        // A failing sink must not fail the caller.
        let _ = self.core.write(&entry, fields);
    }

    /// Logs at `Trace` severity.
    pub fn trace(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Trace, message, fields);
    }

    /// Logs at `Debug` severity.
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Debug, message, fields);
    }

    /// Logs at `Info` severity.
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Info, message, fields);
    }

    /// Logs at `Warn` severity.
    pub fn warn(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Warn, message, fields);
    }

    /// Logs at `Error` severity.
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Error, message, fields);
    }

    /// Logs at `Critical` severity.
    pub fn critical(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Critical, message, fields);
    }

    /// Logs at `Fatal` severity, flushes the sinks, then panics.
    ///
    /// Panicking instead of exiting leaves recovery to the host
    /// application.
    pub fn fatal(&self, message: &str, fields: &[Field]) -> ! {
        self.log(Severity::Fatal, message, fields);
        let _ = self.core.sync();
        panic!("{message}");
    }

    /// Creates a child logger carrying additional context fields.
    ///
    /// The parent keeps logging without them.
    pub fn with(&self, fields: Vec<Field>) -> Logger {
        Logger {
            core: self.core.with(fields),
            level: self.level.clone(),
            name: self.name.clone(),
        }
    }

    /// Creates a child logger with a name segment appended, `.`-separated.
    pub fn named(&self, name: &str) -> Logger {
        let mut child = self.clone();
        child.name = if child.name.is_empty() {
            name.to_owned()
        } else {
            format!("{}.{name}", child.name)
        };
        child
    }

    /// Changes the level threshold of the primary sink, for this logger
    /// and everything sharing its level handle.
    pub fn set_level(&self, level: Severity) {
        self.level.set(level);
    }

    /// Returns the current level threshold of the primary sink.
    pub fn level(&self) -> Severity {
        self.level.get()
    }

    /// Flushes every sink, blocking up to the sinks' own timeouts.
    pub fn sync(&self) -> Result<(), SyncError> {
        self.core.sync()
    }
}

/// Configures and builds a [`Logger`].
///
/// The defaults match an unconfigured service: `info` level, ECS JSON on
/// stdout, no Sentry. Wiring a Sentry client adds the bridge sink, gated
/// at `Error` unless overridden, combined with the primary sink through
/// [`tee`].
pub struct Builder {
    level: Severity,
    writer: Option<Box<dyn Write + Send>>,
    sentry_client: Option<Arc<Client>>,
    sentry_level: Severity,
    sentry_flush_timeout: Duration,
    name: String,
}

impl Builder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Builder {
        Builder {
            level: Severity::Info,
            writer: None,
            sentry_client: None,
            sentry_level: Severity::Error,
            sentry_flush_timeout: DEFAULT_FLUSH_TIMEOUT,
            name: String::new(),
        }
    }

    /// Creates a builder with the level taken from the `LOG_LEVEL`
    /// environment variable, when set.
    pub fn from_env() -> Builder {
        match env::var(LEVEL_ENV_VAR) {
            Ok(level) => Builder::new().level_str(&level),
            Err(_) => Builder::new(),
        }
    }

    /// Sets the initial level threshold of the primary sink.
    #[must_use]
    pub fn level(mut self, level: Severity) -> Builder {
        self.level = level;
        self
    }

    /// Sets the level from its lowercase name, falling back to `info` for
    /// anything unrecognized.
    #[must_use]
    pub fn level_str(mut self, level: &str) -> Builder {
        self.level = level.parse().unwrap_or(Severity::Info);
        self
    }

    /// Replaces the primary sink's writer, stdout by default.
    #[must_use]
    pub fn writer(mut self, writer: impl Write + Send + 'static) -> Builder {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Adds a Sentry sink submitting through `client`.
    #[must_use]
    pub fn sentry_client(mut self, client: Arc<Client>) -> Builder {
        self.sentry_client = Some(client);
        self
    }

    /// Sets the fixed threshold of the Sentry sink, `Error` by default.
    #[must_use]
    pub fn sentry_level(mut self, level: Severity) -> Builder {
        self.sentry_level = level;
        self
    }

    /// Sets how long [`Logger::sync`] may wait for Sentry delivery.
    #[must_use]
    pub fn sentry_flush_timeout(mut self, timeout: Duration) -> Builder {
        self.sentry_flush_timeout = timeout;
        self
    }

    /// Names the logger; the name is recorded under `log.logger` and as
    /// the Sentry event's logger.
    #[must_use]
    pub fn name(mut self, name: &str) -> Builder {
        self.name = name.to_owned();
        self
    }

    /// Builds the logger.
    pub fn build(self) -> Logger {
        let level = AtomicLevel::new(self.level);
        let writer = self
            .writer
            .unwrap_or_else(|| Box::new(io::stdout()));
        let ecs: Arc<dyn Core> = Arc::new(EcsCore::new(writer, level.clone()));

        let core = match self.sentry_client {
            Some(client) => {
                let sentry: Arc<dyn Core> = Arc::new(
                    SentryCore::new(client, self.sentry_level)
                        .flush_timeout(self.sentry_flush_timeout),
                );
                tee(vec![ecs, sentry])
            }
            None => ecs,
        };

        Logger {
            core,
            level,
            name: self.name,
        }
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Mutex;

    use serde_json::Value;

    use crate::fields;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn lines(&self) -> Vec<Value> {
            let buf = self.0.lock().unwrap();
            String::from_utf8(buf.clone())
                .unwrap()
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_level_gate_and_set_level() {
        let buf = SharedBuf::default();
        let logger = Logger::builder().writer(buf.clone()).build();

        logger.debug("dropped", &[]);
        assert!(buf.lines().is_empty());

        logger.set_level(Severity::Debug);
        logger.debug("kept", &[]);
        assert_eq!(buf.lines().len(), 1);
        assert_eq!(logger.level(), Severity::Debug);
    }

    #[test]
    fn test_with_context_fields() {
        let buf = SharedBuf::default();
        let logger = Logger::builder().writer(buf.clone()).build();
        let child = logger.with(vec![fields::service("users", "1.2.3")]);

        child.info("child", &[]);
        logger.info("parent", &[]);

        let lines = buf.lines();
        assert_eq!(
            lines[0]["service"],
            serde_json::json!({ "name": "users", "version": "1.2.3" })
        );
        assert!(lines[1].get("service").is_none());
    }

    #[test]
    fn test_named_segments_join_with_dots() {
        let buf = SharedBuf::default();
        let logger = Logger::builder()
            .writer(buf.clone())
            .build()
            .named("api")
            .named("users");

        logger.info("m", &[]);

        assert_eq!(buf.lines()[0]["log.logger"], serde_json::json!("api.users"));
    }

    #[test]
    fn test_builder_name() {
        let buf = SharedBuf::default();
        let logger = Logger::builder().writer(buf.clone()).name("worker").build();

        logger.info("m", &[]);

        assert_eq!(buf.lines()[0]["log.logger"], serde_json::json!("worker"));
    }

    #[test]
    fn test_level_str_is_lenient() {
        let logger = Logger::builder().level_str("warn").build();
        assert_eq!(logger.level(), Severity::Warn);

        let logger = Logger::builder().level_str("verbose").build();
        assert_eq!(logger.level(), Severity::Info);
    }

    #[test]
    fn test_fatal_logs_then_panics() {
        let buf = SharedBuf::default();
        let logger = Logger::builder().writer(buf.clone()).build();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            logger.fatal("going down", &[]);
        }));

        assert!(result.is_err());
        let lines = buf.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["log.level"], serde_json::json!("fatal"));
        assert_eq!(lines[0]["message"], serde_json::json!("going down"));
    }
}
