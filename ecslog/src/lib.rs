//! Structured logging facade with ECS JSON output and an optional Sentry
//! sink.
//!
//! A [`Logger`] fans every call out to its sinks: the primary sink prints
//! one ECS-flavored JSON document per entry, and an optional Sentry sink
//! turns accepted entries into Sentry events, with ordinary fields as tags,
//! the reserved `service` field as the service tags, and the reserved
//! `error` field as the event's exception.
//!
//! # Examples
//!
//! ```
//! use ecslog::{fields, Logger};
//!
//! let logger = Logger::builder().level_str("debug").build();
//! logger.info("server started", &[fields::service("users", "1.2.3")]);
//!
//! // Child loggers carry context fields; the parent stays unchanged.
//! let logger = logger.with(vec![fields::source("203.0.113.7", 58123)]);
//! logger.debug("accepted connection", &[]);
//! ```
//!
//! With a Sentry client, entries at `Error` and above are bridged to the
//! error tracker as well:
//!
//! ```
//! use std::sync::Arc;
//!
//! use ecslog::{fields, Logger};
//! use sentry_core::{Client, ClientOptions};
//!
//! let client = Arc::new(Client::from(ClientOptions::default()));
//! let logger = Logger::builder().sentry_client(client).build();
//!
//! logger.error(
//!     "failed to persist user",
//!     &[fields::error(std::io::Error::other("disk full"))],
//! );
//! let _ = logger.sync();
//! ```
//!
//! Delivery is fire-and-forget; [`Logger::sync`] bounds the wait for
//! pending Sentry events at shutdown.

#![warn(missing_docs)]

mod ecs;
pub mod fields;
mod logger;

pub use ecslog_core::{
    nop, tee, AtomicLevel, Core, Entry, ErrorPayload, Field, FieldValue, LevelEnabler,
    ParseSeverityError, Service, Severity, SyncError, WriteError,
};
pub use ecslog_sentry::SentryCore;

pub use crate::ecs::EcsCore;
pub use crate::logger::{Builder, Logger, LEVEL_ENV_VAR};
