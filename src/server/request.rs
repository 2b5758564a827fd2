use crate::dispatcher::HeaderVec;
use crate::router::ParamVec;
use may_minihttp::Request;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info};

/// Request data extracted from `may_minihttp` before routing.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    pub method: String,
    /// Path without the query string, still percent-encoded
    pub path: String,
    /// Query string without the leading `?`
    pub raw_query: String,
    /// Lowercase names, request order
    pub headers: HeaderVec,
    /// Decoded query pairs in request order, duplicates kept
    pub query_params: ParamVec,
    /// JSON body, when there is one and it parses
    pub body: Option<serde_json::Value>,
}

impl ParsedRequest {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Split `/p?x=1` into `("/p", "x=1")`
#[must_use]
pub fn split_path_query(raw_path: &str) -> (&str, &str) {
    match raw_path.split_once('?') {
        Some((path, query)) => (path, query),
        None => (raw_path, ""),
    }
}

/// Decode `a=1&b=x+y` into ordered pairs; `+` decodes to a space
#[must_use]
pub fn parse_query_params(query: &str) -> ParamVec {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
        .collect()
}

/// Extract method, path, headers, query pairs and JSON body.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let (path, raw_query) = split_path_query(&raw_path);
    let (path, raw_query) = (path.to_string(), raw_query.to_string());

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase().as_str()),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();
    debug!(header_count = headers.len(), "Headers extracted");

    let query_params = parse_query_params(&raw_query);
    debug!(
        param_count = query_params.len(),
        query_params = ?query_params,
        "Query params parsed"
    );

    let body = {
        let mut body_str = String::new();
        match req.body().read_to_string(&mut body_str) {
            Ok(size) if size > 0 => {
                let parsed = serde_json::from_str::<serde_json::Value>(&body_str);
                debug!(
                    body_size_bytes = size,
                    json = parsed.is_ok(),
                    "Request body read"
                );
                parsed.ok()
            }
            _ => None,
        }
    };

    info!(
        method = %method,
        path = %path,
        headers_count = headers.len(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        raw_query,
        headers,
        query_params,
        body,
    }
}
