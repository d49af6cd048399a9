//! ECS-compliant field helpers.
//!
//! One helper per [ECS](https://www.elastic.co/guide/en/ecs/current/index.html)
//! object: the returned [`Field`]s nest their members under the object's
//! canonical key, so the primary sink emits schema-shaped documents without
//! callers spelling out dotted keys.
//!
//! The [`service`] and [`error`] helpers build the two reserved fields the
//! Sentry sink recognizes; everything else is plain structured data.
//!
//! [`Field`]: ecslog_core::Field

mod error;
mod http;
mod service;
mod source;
mod url;
mod user_agent;

pub use self::error::{error, error_with_backtrace, named_error};
pub use self::http::{http_request, http_response, HttpRequest, HttpResponse};
pub use self::service::service;
pub use self::source::source;
pub use self::url::url;
pub use self::user_agent::user_agent;
