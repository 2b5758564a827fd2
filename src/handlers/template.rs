use super::{requested_locale, AppState};
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::faker::{fill_many, parse_nested_query};
use serde_json::{json, Value};
use std::fmt;
use tracing::debug;

/// Why a `count` path parameter was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountError {
    /// Not a plain non-negative decimal integer
    Malformed(String),
    TooLarge { count: usize, max: usize },
}

impl fmt::Display for CountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountError::Malformed(raw) => {
                write!(f, "count must be a non-negative integer, got \"{raw}\"")
            }
            CountError::TooLarge { count, max } => {
                write!(f, "count {count} exceeds the maximum of {max}")
            }
        }
    }
}

impl std::error::Error for CountError {}

/// Parse `raw` as a repeat count no larger than `max`
pub fn parse_count(raw: &str, max: usize) -> Result<usize, CountError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CountError::Malformed(raw.to_string()));
    }
    // All digits, so the only parse failure left is overflow.
    let count = raw.parse::<usize>().map_err(|_| CountError::TooLarge {
        count: usize::MAX,
        max,
    })?;
    if count > max {
        return Err(CountError::TooLarge { count, max });
    }
    Ok(count)
}

/// `GET /template/{locale}/{count}?<nested query>`: `count` filled copies of
/// the template described by the query string
pub fn handler(req: HandlerRequest, state: &AppState) {
    let raw_count = req.get_path_param("count").unwrap_or_default();
    let count = match parse_count(raw_count, state.max_count) {
        Ok(count) => count,
        Err(e) => {
            debug!(error = %e, "Rejected template count");
            let body = json!({ "error": e.to_string(), "count": raw_count });
            req.respond(HandlerResponse::json(400, body));
            return;
        }
    };

    let provider = state.locales.resolve(requested_locale(&req));
    let template = parse_nested_query(&req.raw_query, &state.query);
    let filled = fill_many(&provider, &template, count, state.template_depth);
    req.respond(HandlerResponse::json(200, Value::Array(filled)));
}
