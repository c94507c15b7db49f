//! Outgoing request logging

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

#[derive(PartialEq, Eq, PartialOrd, Clone, Copy, Debug, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    Path,
    Headers,
    Body,
}

impl Default for RequestsLoggingLevel {
    fn default() -> Self {
        Self::Path
    }
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

pub(crate) fn log_request(
    level: &RequestsLoggingLevel,
    method: &Method,
    url: &str,
    body: Option<&str>,
) {
    if *level > RequestsLoggingLevel::None {
        info!(">>> {} {}", method, url);
    }
    if *level >= RequestsLoggingLevel::Body {
        if let Some(body) = body {
            debug!(">>> body: {}", truncate_body(body));
        }
    }
}

pub(crate) fn log_response(
    level: &RequestsLoggingLevel,
    method: &Method,
    url: &str,
    status: StatusCode,
    headers: &HeaderMap,
    elapsed: Duration,
) {
    if *level > RequestsLoggingLevel::None {
        info!(
            "<<< {} {} {} ({}ms)",
            status.as_u16(),
            method,
            url,
            elapsed.as_millis()
        );
    }
    if *level >= RequestsLoggingLevel::Headers {
        for (name, value) in headers.iter() {
            debug!("<<< {}: {}", name, value.to_str().unwrap_or("<binary>"));
        }
    }
}

pub(crate) fn log_response_body(level: &RequestsLoggingLevel, body: &str) {
    if *level >= RequestsLoggingLevel::Body && !body.is_empty() {
        debug!("<<< body: {}", truncate_body(body));
    }
}

fn truncate_body(body: &str) -> &str {
    if body.len() <= MAX_LOGGABLE_BODY_LENGTH {
        return body;
    }
    let mut end = MAX_LOGGABLE_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
