use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::Serialize;
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// The service identity attached to log entries, recognized by sinks under
/// the reserved `"service"` field key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    /// Logical name of the service.
    pub name: String,
    /// Version of the running service.
    pub version: String,
}

impl Service {
    /// Creates a new service identity.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Service {
        Service {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// An error carried as a structured field, recognized by sinks under the
/// reserved `"error"` field key.
///
/// The payload owns the error behind an [`Arc`] so fields stay cheap to
/// clone, and optionally a backtrace captured where the error was wrapped
/// into the field rather than where it was eventually logged.
#[derive(Clone)]
pub struct ErrorPayload {
    error: Arc<dyn Error + Send + Sync + 'static>,
    backtrace: Option<Arc<backtrace::Backtrace>>,
}

impl ErrorPayload {
    /// Wraps an error without capturing a backtrace.
    pub fn new<E>(error: E) -> ErrorPayload
    where
        E: Error + Send + Sync + 'static,
    {
        ErrorPayload {
            error: Arc::new(error),
            backtrace: None,
        }
    }

    /// Captures a backtrace at the call site and attaches it to the payload.
    ///
    /// Sinks that report stacktraces use this capture as-is, since it
    /// records where the error was wrapped instead of the logging path.
    pub fn attach_backtrace(mut self) -> ErrorPayload {
        self.backtrace = Some(Arc::new(backtrace::Backtrace::new()));
        self
    }

    /// Returns the wrapped error.
    pub fn error(&self) -> &(dyn Error + 'static) {
        self.error.as_ref()
    }

    /// Returns the display message of the wrapped error.
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    /// Returns the backtrace captured by
    /// [`attach_backtrace`](ErrorPayload::attach_backtrace), if any.
    pub fn backtrace(&self) -> Option<&backtrace::Backtrace> {
        self.backtrace.as_deref()
    }

    /// Follows the chain of [`Error::source`] references down to the
    /// innermost error.
    pub fn root_cause(&self) -> &(dyn Error + 'static) {
        let mut cause: &(dyn Error + 'static) = self.error.as_ref();
        while let Some(source) = cause.source() {
            cause = source;
        }
        cause
    }
}

impl fmt::Debug for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorPayload")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// The value half of a structured field.
///
/// Every carried type is listed as its own variant so sinks can match on
/// the payload kind without reflection; [`Any`](FieldValue::Any) is the
/// catch-all for values that only need to be serialized.
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    I64(i64),
    /// An unsigned integer.
    U64(u64),
    /// A floating point number.
    F64(f64),
    /// A string.
    Str(String),
    /// Raw bytes, rendered as lossy UTF-8 wherever a string is needed.
    Bytes(Vec<u8>),
    /// A duration.
    Duration(Duration),
    /// A point in time, rendered as RFC 3339.
    Timestamp(SystemTime),
    /// A service identity (see [`Service`]).
    Service(Service),
    /// An error (see [`ErrorPayload`]).
    Error(ErrorPayload),
    /// An arbitrary serialized value.
    Any(Value),
}

impl FieldValue {
    /// Returns the JSON rendition of the value, used by encoding sinks.
    pub fn as_json(&self) -> Value {
        match self {
            FieldValue::Bool(v) => Value::Bool(*v),
            FieldValue::I64(v) => Value::from(*v),
            FieldValue::U64(v) => Value::from(*v),
            FieldValue::F64(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Str(v) => Value::String(v.clone()),
            FieldValue::Bytes(v) => Value::String(String::from_utf8_lossy(v).into_owned()),
            FieldValue::Duration(v) => Value::from(v.as_secs_f64()),
            FieldValue::Timestamp(v) => Value::String(format_rfc3339(*v)),
            FieldValue::Service(v) => serde_json::to_value(v).unwrap_or(Value::Null),
            FieldValue::Error(payload) => match payload.backtrace() {
                Some(bt) => json!({
                    "message": payload.message(),
                    "stack_trace": format!("{bt:?}"),
                }),
                None => json!({ "message": payload.message() }),
            },
            FieldValue::Any(v) => v.clone(),
        }
    }
}

/// The flat string rendition of the value, used for tag-like destinations.
///
/// Strings pass through verbatim, scalars use their display form, durations
/// their debug form (`"1.5s"`), and structured payloads compact JSON.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::I64(v) => write!(f, "{v}"),
            FieldValue::U64(v) => write!(f, "{v}"),
            FieldValue::F64(v) => write!(f, "{v}"),
            FieldValue::Str(v) => f.write_str(v),
            FieldValue::Bytes(v) => f.write_str(&String::from_utf8_lossy(v)),
            FieldValue::Duration(v) => write!(f, "{v:?}"),
            FieldValue::Timestamp(v) => f.write_str(&format_rfc3339(*v)),
            FieldValue::Service(_) => write!(f, "{}", self.as_json()),
            FieldValue::Error(payload) => write!(f, "{}", payload.error()),
            FieldValue::Any(v) => write!(f, "{v}"),
        }
    }
}

fn format_rfc3339(timestamp: SystemTime) -> String {
    let dt = OffsetDateTime::from(timestamp);
    dt.format(&Rfc3339).unwrap_or_else(|_| dt.to_string())
}

/// A single structured logging field: a key and a typed value.
#[derive(Debug, Clone)]
pub struct Field {
    /// The field key.
    pub key: Cow<'static, str>,
    /// The field value.
    pub value: FieldValue,
}

impl Field {
    /// Creates a field from a key and an already-built value.
    pub fn new(key: impl Into<Cow<'static, str>>, value: FieldValue) -> Field {
        Field {
            key: key.into(),
            value,
        }
    }

    /// Creates a boolean field.
    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Field {
        Field::new(key, FieldValue::Bool(value))
    }

    /// Creates a string field.
    pub fn str(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Field {
        Field::new(key, FieldValue::Str(value.into()))
    }

    /// Creates a signed integer field.
    pub fn i64(key: impl Into<Cow<'static, str>>, value: i64) -> Field {
        Field::new(key, FieldValue::I64(value))
    }

    /// Creates an unsigned integer field.
    pub fn u64(key: impl Into<Cow<'static, str>>, value: u64) -> Field {
        Field::new(key, FieldValue::U64(value))
    }

    /// Creates a floating point field.
    pub fn f64(key: impl Into<Cow<'static, str>>, value: f64) -> Field {
        Field::new(key, FieldValue::F64(value))
    }

    /// Creates a raw bytes field.
    pub fn bytes(key: impl Into<Cow<'static, str>>, value: Vec<u8>) -> Field {
        Field::new(key, FieldValue::Bytes(value))
    }

    /// Creates a duration field.
    pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Field {
        Field::new(key, FieldValue::Duration(value))
    }

    /// Creates a timestamp field.
    pub fn timestamp(key: impl Into<Cow<'static, str>>, value: SystemTime) -> Field {
        Field::new(key, FieldValue::Timestamp(value))
    }

    /// Creates a field from any serializable value.
    ///
    /// If serialization fails the field degrades to a string carrying the
    /// serializer error, so a log call never fails over one bad value.
    pub fn any<T>(key: impl Into<Cow<'static, str>>, value: &T) -> Field
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(value) => Field::new(key, FieldValue::Any(value)),
            Err(err) => Field::new(key, FieldValue::Str(err.to_string())),
        }
    }

    /// Creates the reserved `"service"` field from a service identity.
    pub fn service(service: Service) -> Field {
        Field::new("service", FieldValue::Service(service))
    }

    /// Creates the reserved `"error"` field from an error payload.
    pub fn error(payload: ErrorPayload) -> Field {
        Field::new("error", FieldValue::Error(payload))
    }
}
