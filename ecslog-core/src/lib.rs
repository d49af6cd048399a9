//! Core types and the sink contract for the `ecslog` structured logging
//! facade.
//!
//! This crate defines the pieces every sink shares: [`Severity`] and the
//! [`LevelEnabler`] gate, typed [`Field`]s, the immutable [`Entry`] record,
//! the [`Core`] trait, and [`tee`] for fanning one log call out to several
//! sinks. Sinks with real I/O live elsewhere: the ECS JSON writer in
//! `ecslog` and the Sentry bridge in `ecslog-sentry`.
//!
//! # Examples
//!
//! ```
//! use ecslog_core::{AtomicLevel, Field, LevelEnabler, Severity};
//!
//! let level = AtomicLevel::new(Severity::Info);
//! assert!(level.enabled(Severity::Warn));
//!
//! level.set(Severity::Error);
//! assert!(!level.enabled(Severity::Warn));
//!
//! let field = Field::str("request_id", "0b57e762");
//! assert_eq!(field.value.to_string(), "0b57e762");
//! ```

#![warn(missing_docs)]

mod core;
mod entry;
mod field;
mod severity;

pub use crate::core::{nop, tee, Core, SyncError, WriteError};
pub use crate::entry::Entry;
pub use crate::field::{ErrorPayload, Field, FieldValue, Service};
pub use crate::severity::{AtomicLevel, LevelEnabler, ParseSeverityError, Severity};
