//! Sentry sink for the `ecslog` structured logging facade.
//!
//! [`SentryCore`] implements [`ecslog_core::Core`] on top of an explicit
//! [`sentry_core::Client`] handle. Entries that pass its level gate are
//! converted into Sentry events: ordinary fields become tags, the reserved
//! `"service"` field becomes the `service.name` / `service.version` tags,
//! and the reserved `"error"` field becomes the event's exception, reported
//! with the innermost cause and a stacktrace stripped of the logging
//! machinery's own frames.
//!
//! The sink is usually combined with the primary ECS JSON sink through
//! [`ecslog_core::tee`], gated at `Error` so only actionable entries reach
//! the error tracker:
//!
//! ```
//! use std::sync::Arc;
//!
//! use ecslog_core::{tee, Severity};
//! use ecslog_sentry::SentryCore;
//! use sentry_core::{Client, ClientOptions};
//!
//! let client = Arc::new(Client::from(ClientOptions::default()));
//! let sentry = Arc::new(SentryCore::new(client, Severity::Error));
//! let core = tee(vec![sentry]);
//! ```
//!
//! Capture is fire-and-forget. Call [`ecslog_core::Core::sync`] before
//! shutdown to give the client a bounded amount of time to drain its queue.

#![warn(missing_docs)]

mod converters;
mod core;
mod frames;

pub use crate::converters::{convert_severity, event_from_entry};
pub use crate::core::{SentryCore, DEFAULT_FLUSH_TIMEOUT};
pub use crate::frames::filter_frames;
