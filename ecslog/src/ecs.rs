use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use ecslog_core::{Core, Entry, Field, LevelEnabler, Severity, SyncError, WriteError};

/// The ECS schema version the emitted documents follow.
const ECS_VERSION: &str = "1.6.0";

/// The primary sink: one ECS-flavored JSON document per entry, terminated
/// by a newline.
///
/// Every document carries `log.level`, `@timestamp`, `message` and
/// `ecs.version`, plus `log.logger` for named loggers, and then the
/// entry's fields under their own keys. The writer is shared behind a
/// mutex so derived cores and concurrent callers interleave whole lines,
/// never partial ones.
pub struct EcsCore {
    enabler: Arc<dyn LevelEnabler>,
    fields: Vec<Field>,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl EcsCore {
    /// Creates a core writing to `writer`, accepting the severities
    /// allowed by `enabler`.
    pub fn new(writer: Box<dyn Write + Send>, enabler: impl LevelEnabler + 'static) -> EcsCore {
        EcsCore {
            enabler: Arc::new(enabler),
            fields: Vec::new(),
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    fn encode(&self, entry: &Entry, fields: &[Field]) -> Result<Vec<u8>, WriteError> {
        let mut map = serde_json::Map::new();
        map.insert(
            "log.level".into(),
            Value::String(entry.severity.to_string()),
        );
        map.insert(
            "@timestamp".into(),
            Value::String(format_rfc3339(entry.timestamp)),
        );
        map.insert("message".into(), Value::String(entry.message.clone()));
        map.insert("ecs.version".into(), Value::String(ECS_VERSION.into()));
        if !entry.logger_name.is_empty() {
            map.insert(
                "log.logger".into(),
                Value::String(entry.logger_name.clone()),
            );
        }
        for field in self.fields.iter().chain(fields) {
            map.insert(field.key.as_ref().to_owned(), field.value.as_json());
        }

        let mut line = serde_json::to_vec(&Value::Object(map))?;
        line.push(b'\n');
        Ok(line)
    }
}

impl Core for EcsCore {
    fn enabled(&self, severity: Severity) -> bool {
        self.enabler.enabled(severity)
    }

    fn with(&self, fields: Vec<Field>) -> Arc<dyn Core> {
        let mut merged = self.fields.clone();
        merged.extend(fields);
        Arc::new(EcsCore {
            enabler: self.enabler.clone(),
            fields: merged,
            writer: self.writer.clone(),
        })
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), WriteError> {
        let line = self.encode(entry, fields)?;
        self.writer.lock().unwrap().write_all(&line)?;
        Ok(())
    }

    fn sync(&self) -> Result<(), SyncError> {
        self.writer.lock().unwrap().flush()?;
        Ok(())
    }
}

fn format_rfc3339(timestamp: SystemTime) -> String {
    let dt = OffsetDateTime::from(timestamp);
    dt.format(&Rfc3339).unwrap_or_else(|_| dt.to_string())
}
