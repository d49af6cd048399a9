use ecslog_core::{Entry, ErrorPayload, Field, FieldValue, Severity};
use sentry_core::parse_type_from_debug;
use sentry_core::protocol::{Event, Exception, Map, Stacktrace};
use sentry_core::Level;

use crate::frames::filter_frames;

const SERVICE_KEY: &str = "service";
const ERROR_KEY: &str = "error";

/// Converts an `ecslog` [`Severity`] to a Sentry [`Level`].
pub fn convert_severity(severity: Severity) -> Level {
    match severity {
        Severity::Trace | Severity::Debug => Level::Debug,
        Severity::Info => Level::Info,
        Severity::Warn => Level::Warning,
        Severity::Error => Level::Error,
        Severity::Critical | Severity::Fatal => Level::Fatal,
    }
}

/// Creates an [`Event`] from a log entry and its fields.
///
/// `fields` carries the sink's context fields followed by the per-call
/// fields, in that order; when a key repeats, the later value wins. The
/// reserved `"service"` and `"error"` fields are pulled out of the tag
/// stream: the service identity lands as the `service.name` /
/// `service.version` tags (overriding any same-named plain field), and the
/// error payload becomes the event's exception. A reserved key holding an
/// unexpected payload kind stays an ordinary tag.
pub fn event_from_entry<'a>(
    entry: &Entry,
    fields: impl Iterator<Item = &'a Field>,
) -> Event<'static> {
    let mut tags = Map::new();
    let mut service = None;
    let mut error = None;

    for field in fields {
        match (field.key.as_ref(), &field.value) {
            (SERVICE_KEY, FieldValue::Service(value)) => service = Some(value),
            (ERROR_KEY, FieldValue::Error(payload)) => error = Some(payload),
            (key, value) => {
                tags.insert(key.to_owned(), value.to_string());
            }
        }
    }

    let exception = match error {
        Some(payload) => exception_from_payload(payload),
        None => exception_from_message(entry),
    };

    if let Some(service) = service {
        tags.insert("service.name".into(), service.name.clone());
        tags.insert("service.version".into(), service.version.clone());
    }

    Event {
        message: Some(entry.message.clone()),
        level: convert_severity(entry.severity),
        timestamp: entry.timestamp,
        logger: (!entry.logger_name.is_empty()).then(|| entry.logger_name.clone()),
        tags,
        exception: vec![exception].into(),
        ..Default::default()
    }
}

/// Builds the event's exception from an error field payload.
///
/// The innermost cause wins: its message becomes the exception value and
/// its `Debug` form supplies the type label. A backtrace captured when the
/// error was wrapped is converted as-is, since it already points at the
/// wrap site; only a capture made here is stripped of logging-machinery
/// frames.
fn exception_from_payload(payload: &ErrorPayload) -> Exception {
    let stacktrace = match payload.backtrace() {
        Some(backtrace) => sentry_backtrace::backtrace_to_stacktrace(backtrace),
        None => filtered_stacktrace(),
    };
    let root_cause = payload.root_cause();
    let dbg = format!("{root_cause:?}");
    Exception {
        ty: parse_type_from_debug(&dbg).to_owned(),
        value: Some(root_cause.to_string()),
        stacktrace,
        ..Default::default()
    }
}

/// Builds the fallback exception for entries logged without an error field.
fn exception_from_message(entry: &Entry) -> Exception {
    Exception {
        value: Some(entry.message.clone()),
        stacktrace: filtered_stacktrace(),
        ..Default::default()
    }
}

fn filtered_stacktrace() -> Option<Stacktrace> {
    let mut stacktrace = sentry_backtrace::current_stacktrace()?;
    stacktrace.frames = filter_frames(std::mem::take(&mut stacktrace.frames));
    Some(stacktrace)
}
