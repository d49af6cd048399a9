use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::{Entry, Field, Severity};

/// An error returned when a sink fails to write an entry.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The entry could not be encoded.
    #[error("failed to encode log entry: {0}")]
    Encode(#[from] serde_json::Error),
    /// The encoded entry could not be written out.
    #[error("failed to write log entry: {0}")]
    Io(#[from] io::Error),
}

/// An error returned when a sink fails to flush.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The underlying writer failed to flush.
    #[error("failed to flush log sink: {0}")]
    Io(#[from] io::Error),
}

/// The contract every log sink implements.
///
/// A core decides which severities it accepts, carries its own context
/// fields, writes entries, and flushes buffered output. Implementations
/// must be usable from multiple threads through a shared handle; all
/// methods take `&self`.
pub trait Core: Send + Sync {
    /// Returns `true` if the core wants entries at `severity`.
    ///
    /// Pure: callers may invoke it any number of times without side
    /// effects. Composition layers are expected to consult it before
    /// calling [`write`](Core::write); `write` itself does not re-check.
    fn enabled(&self, severity: Severity) -> bool;

    /// Derives a child core carrying `fields` in addition to this core's
    /// own context fields.
    ///
    /// The child is fully independent: appending to it never mutates the
    /// parent, and both remain usable concurrently.
    fn with(&self, fields: Vec<Field>) -> Arc<dyn Core>;

    /// Writes one entry together with its per-call fields.
    ///
    /// Context fields carried via [`with`](Core::with) are the core's own
    /// business; `fields` holds only the fields of this call.
    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), WriteError>;

    /// Flushes buffered output, blocking until done or until the sink's
    /// own timeout expires.
    fn sync(&self) -> Result<(), SyncError>;
}

/// Combines multiple cores into one.
///
/// `enabled` is the union of the members; `write` forwards the entry to
/// every member that accepts its severity, keeps going past failures, and
/// reports the first error.
pub fn tee(cores: Vec<Arc<dyn Core>>) -> Arc<dyn Core> {
    if cores.is_empty() {
        return nop();
    }
    // A single member still gets the gating wrapper: cores rely on the
    // composition layer to check `enabled` before `write`.
    Arc::new(Tee { cores })
}

/// Returns a core that accepts nothing and writes nowhere.
pub fn nop() -> Arc<dyn Core> {
    Arc::new(NopCore)
}

struct Tee {
    cores: Vec<Arc<dyn Core>>,
}

impl Core for Tee {
    fn enabled(&self, severity: Severity) -> bool {
        self.cores.iter().any(|core| core.enabled(severity))
    }

    fn with(&self, fields: Vec<Field>) -> Arc<dyn Core> {
        let cores = self
            .cores
            .iter()
            .map(|core| core.with(fields.clone()))
            .collect();
        Arc::new(Tee { cores })
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), WriteError> {
        let mut first_err = None;
        for core in &self.cores {
            if core.enabled(entry.severity) {
                if let Err(err) = core.write(entry, fields) {
                    first_err.get_or_insert(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn sync(&self) -> Result<(), SyncError> {
        let mut first_err = None;
        for core in &self.cores {
            if let Err(err) = core.sync() {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct NopCore;

impl Core for NopCore {
    fn enabled(&self, _severity: Severity) -> bool {
        false
    }

    fn with(&self, _fields: Vec<Field>) -> Arc<dyn Core> {
        Arc::new(NopCore)
    }

    fn write(&self, _entry: &Entry, _fields: &[Field]) -> Result<(), WriteError> {
        Ok(())
    }

    fn sync(&self) -> Result<(), SyncError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Clone)]
    struct RecordingCore {
        threshold: Severity,
        fields: Vec<Field>,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl RecordingCore {
        fn new(threshold: Severity) -> (Arc<dyn Core>, Arc<Mutex<Vec<String>>>) {
            let log = Arc::new(Mutex::new(Vec::new()));
            let core = RecordingCore {
                threshold,
                fields: Vec::new(),
                log: log.clone(),
                fail: false,
            };
            (Arc::new(core), log)
        }

        fn failing() -> Arc<dyn Core> {
            Arc::new(RecordingCore {
                threshold: Severity::Trace,
                fields: Vec::new(),
                log: Arc::new(Mutex::new(Vec::new())),
                fail: true,
            })
        }
    }

    impl Core for RecordingCore {
        fn enabled(&self, severity: Severity) -> bool {
            severity >= self.threshold
        }

        fn with(&self, mut fields: Vec<Field>) -> Arc<dyn Core> {
            let mut merged = self.fields.clone();
            merged.append(&mut fields);
            Arc::new(RecordingCore {
                fields: merged,
                ..self.clone()
            })
        }

        fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), WriteError> {
            if self.fail {
                return Err(WriteError::Io(io::Error::other("sink down")));
            }
            let keys: Vec<&str> = self
                .fields
                .iter()
                .chain(fields)
                .map(|field| field.key.as_ref())
                .collect();
            self.log
                .lock()
                .unwrap()
                .push(format!("{}|{}", entry.message, keys.join(",")));
            Ok(())
        }

        fn sync(&self) -> Result<(), SyncError> {
            self.log.lock().unwrap().push("sync".into());
            Ok(())
        }
    }

    #[test]
    fn test_tee_gates_each_member() {
        let (verbose, verbose_log) = RecordingCore::new(Severity::Info);
        let (errors_only, errors_log) = RecordingCore::new(Severity::Error);
        let teed = tee(vec![verbose, errors_only]);

        teed.write(&Entry::new(Severity::Warn, "spilled"), &[]).unwrap();
        teed.write(&Entry::new(Severity::Error, "burned"), &[]).unwrap();

        assert_eq!(
            *verbose_log.lock().unwrap(),
            vec!["spilled|".to_string(), "burned|".to_string()]
        );
        assert_eq!(*errors_log.lock().unwrap(), vec!["burned|".to_string()]);
    }

    #[test]
    fn test_tee_gates_a_single_member() {
        // Cores do not re-check their level in `write`, so even a lone
        // member must stay behind the gating wrapper.
        let (errors_only, log) = RecordingCore::new(Severity::Error);
        let teed = tee(vec![errors_only]);

        teed.write(&Entry::new(Severity::Warn, "just noise"), &[])
            .unwrap();
        teed.write(&Entry::new(Severity::Error, "burned"), &[])
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["burned|".to_string()]);
    }

    #[test]
    fn test_tee_enabled_is_union() {
        let (verbose, _) = RecordingCore::new(Severity::Info);
        let (errors_only, _) = RecordingCore::new(Severity::Error);
        let teed = tee(vec![verbose, errors_only]);

        assert!(teed.enabled(Severity::Info));
        assert!(teed.enabled(Severity::Error));
        assert!(!teed.enabled(Severity::Debug));
    }

    #[test]
    fn test_tee_keeps_writing_past_failures() {
        let (healthy, healthy_log) = RecordingCore::new(Severity::Trace);
        let teed = tee(vec![RecordingCore::failing(), healthy]);

        let result = teed.write(&Entry::new(Severity::Info, "kept"), &[]);

        assert!(matches!(result, Err(WriteError::Io(_))));
        assert_eq!(*healthy_log.lock().unwrap(), vec!["kept|".to_string()]);
    }

    #[test]
    fn test_with_leaves_parent_untouched() {
        let (parent, log) = RecordingCore::new(Severity::Trace);
        let child = parent.with(vec![Field::str("request_id", "abc")]);
        let grandchild = child.with(vec![Field::str("attempt", "2")]);

        parent.write(&Entry::new(Severity::Info, "p"), &[]).unwrap();
        child.write(&Entry::new(Severity::Info, "c"), &[]).unwrap();
        grandchild
            .write(&Entry::new(Severity::Info, "g"), &[])
            .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "p|".to_string(),
                "c|request_id".to_string(),
                "g|request_id,attempt".to_string()
            ]
        );
    }

    #[test]
    fn test_tee_with_fans_out() {
        let (left, left_log) = RecordingCore::new(Severity::Trace);
        let (right, right_log) = RecordingCore::new(Severity::Trace);
        let teed = tee(vec![left, right]).with(vec![Field::str("env", "prod")]);

        teed.write(&Entry::new(Severity::Info, "m"), &[]).unwrap();

        assert_eq!(*left_log.lock().unwrap(), vec!["m|env".to_string()]);
        assert_eq!(*right_log.lock().unwrap(), vec!["m|env".to_string()]);
    }

    #[test]
    fn test_nop_accepts_nothing() {
        let core = nop();
        assert!(!core.enabled(Severity::Fatal));
        core.write(&Entry::new(Severity::Fatal, "dropped"), &[])
            .unwrap();
        core.sync().unwrap();
    }
}
