use std::sync::Arc;
use std::time::Duration;

use ecslog_core::{Core, Entry, Field, LevelEnabler, Severity, SyncError, WriteError};
use sentry_core::Client;

use crate::converters::event_from_entry;

/// How long [`sync`](Core::sync) waits for the client to deliver pending
/// events before giving up.
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// A log sink that forwards accepted entries to Sentry.
///
/// Every accepted entry becomes exactly one Sentry event, assembled by
/// [`event_from_entry`]: ordinary fields turn into tags, the reserved
/// `"service"` field into the service tags, and the reserved `"error"`
/// field into the event's exception. Submission is fire-and-forget; the
/// client queues the event internally and a rejected or dropped event is
/// never reported back to the logging path.
///
/// The core shares its [`Client`] handle, so one client can serve several
/// derived cores and the rest of the application at the same time.
pub struct SentryCore {
    enabler: Arc<dyn LevelEnabler>,
    fields: Vec<Field>,
    client: Arc<Client>,
    flush_timeout: Duration,
}

impl SentryCore {
    /// Creates a core submitting to `client`, accepting the severities
    /// allowed by `enabler`.
    ///
    /// Pass a [`Severity`] for a fixed threshold, or a clone of a shared
    /// [`ecslog_core::AtomicLevel`] to gate this sink together with
    /// others.
    pub fn new(client: Arc<Client>, enabler: impl LevelEnabler + 'static) -> SentryCore {
        SentryCore {
            enabler: Arc::new(enabler),
            fields: Vec::new(),
            client,
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
        }
    }

    /// Sets how long [`sync`](Core::sync) may block waiting for delivery.
    #[must_use]
    pub fn flush_timeout(mut self, timeout: Duration) -> SentryCore {
        self.flush_timeout = timeout;
        self
    }
}

impl Core for SentryCore {
    fn enabled(&self, severity: Severity) -> bool {
        self.enabler.enabled(severity)
    }

    fn with(&self, fields: Vec<Field>) -> Arc<dyn Core> {
        let mut merged = self.fields.clone();
        merged.extend(fields);
        Arc::new(SentryCore {
            enabler: self.enabler.clone(),
            fields: merged,
            client: self.client.clone(),
            flush_timeout: self.flush_timeout,
        })
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), WriteError> {
        let event = event_from_entry(entry, self.fields.iter().chain(fields));
        self.client.capture_event(event, None);
        Ok(())
    }

    fn sync(&self) -> Result<(), SyncError> {
        self.client.flush(Some(self.flush_timeout));
        Ok(())
    }
}
