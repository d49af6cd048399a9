//! Logs ECS JSON to stdout and bridges errors to Sentry when `SENTRY_DSN`
//! is set:
//!
//! ```console
//! $ SENTRY_DSN=https://public@o0.ingest.sentry.io/0 cargo run --example basic
//! ```

use std::collections::BTreeMap;
use std::env;
use std::io;
use std::sync::Arc;

use ecslog::{fields, Logger};
use sentry_core::{Client, ClientOptions};
use url::Url;

fn main() {
    // Basic usage, info level by default.
    let logger = Logger::builder().build();
    logger.debug("debug message", &[]);
    logger.info("info message", &[]);
    logger.warn("warn message", &[]);
    logger.error(
        "error message",
        &[fields::error(io::Error::other("an error happened"))],
    );

    let client = env::var("SENTRY_DSN")
        .ok()
        .and_then(|dsn| dsn.parse().ok())
        .map(|dsn| {
            Arc::new(Client::from(ClientOptions {
                dsn: Some(dsn),
                ..ClientOptions::default()
            }))
        });
    if client.is_none() {
        logger.warn("SENTRY_DSN is not set, skipping the Sentry sink", &[]);
    }

    // Rebuild at debug level with the Sentry sink, then attach the service
    // identity as context.
    let mut builder = Logger::builder().level_str("debug").name("example");
    if let Some(client) = client {
        builder = builder.sentry_client(client);
    }
    let logger = builder
        .build()
        .with(vec![fields::service("myapp", "1.0.0")]);

    let endpoint: Url = "https://httpbin.org/delay/2".parse().unwrap();
    logger.debug("sending request", &[fields::url(&endpoint)]);

    let request = fields::HttpRequest {
        method: "GET".into(),
        version: "HTTP/1.1".into(),
        headers: BTreeMap::from([("content-type".into(), "application/json".into())]),
        ..Default::default()
    };
    logger.info("sent http request", &[fields::http_request(&request)]);

    let response = fields::HttpResponse {
        status_code: 200,
        bytes: Some(512),
    };
    logger.info("got http response", &[fields::http_response(&response)]);

    logger.error(
        "request failed",
        &[
            fields::source("203.0.113.7", 58123),
            fields::user_agent("curl/8.5.0"),
            fields::error_with_backtrace(io::Error::other("connection reset")),
        ],
    );

    // Bound the wait for pending Sentry deliveries before exit.
    let _ = logger.sync();
}
