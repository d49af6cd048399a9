use std::borrow::Cow;
use std::error::Error;

use ecslog_core::{ErrorPayload, Field, FieldValue};

/// Creates the reserved `error` field from an error.
///
/// The Sentry sink reports this as the event's exception, walking to the
/// innermost cause; the primary sink records the error's message.
pub fn error<E>(err: E) -> Field
where
    E: Error + Send + Sync + 'static,
{
    Field::error(ErrorPayload::new(err))
}

/// Creates the reserved `error` field, capturing a backtrace at the call
/// site.
///
/// Use this when the error is logged far from where it happened: the
/// captured backtrace travels with the field and takes precedence over a
/// capture made at logging time.
pub fn error_with_backtrace<E>(err: E) -> Field
where
    E: Error + Send + Sync + 'static,
{
    Field::error(ErrorPayload::new(err).attach_backtrace())
}

/// Creates an error field under a custom key.
///
/// Only the reserved `error` key feeds the Sentry exception; under any
/// other key the error is recorded as an ordinary field.
pub fn named_error<E>(key: impl Into<Cow<'static, str>>, err: E) -> Field
where
    E: Error + Send + Sync + 'static,
{
    Field::new(key, FieldValue::Error(ErrorPayload::new(err)))
}
