use crate::dispatcher::HandlerResponse;
use may_minihttp::Response;
use serde_json::Value;
use tracing::{debug, error};

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// `Content-Type` header line for the types the service emits.
///
/// `may_minihttp` takes header lines as `&'static str`, so only this fixed
/// set can be written.
fn content_type_header(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    match essence.to_ascii_lowercase().as_str() {
        "application/json" => Some("Content-Type: application/json"),
        "text/plain" => Some("Content-Type: text/plain; charset=utf-8"),
        "text/yaml" | "application/yaml" => Some("Content-Type: text/yaml"),
        "text/html" => Some("Content-Type: text/html; charset=utf-8"),
        "text/css" => Some("Content-Type: text/css"),
        "application/javascript" | "text/javascript" => {
            Some("Content-Type: application/javascript")
        }
        _ => None,
    }
}

/// Write `body` as JSON with the given status
pub fn write_json(res: &mut Response, status: u16, body: &Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    match serde_json::to_vec(body) {
        Ok(bytes) => res.body_vec(bytes),
        Err(e) => {
            error!(error = %e, "Response serialization failed");
            res.status_code(500, status_reason(500));
            res.body_vec(br#"{"error":"Response serialization failed"}"#.to_vec());
        }
    }
}

/// Write raw bytes with an explicit content type
pub fn write_bytes(res: &mut Response, status: u16, content_type: &str, bytes: Vec<u8>) {
    res.status_code(status as usize, status_reason(status));
    if let Some(header) = content_type_header(content_type) {
        res.header(header);
    }
    res.body_vec(bytes);
}

/// Write a handler's answer. Bodies are JSON unless the handler set a text
/// content type and returned a string.
pub fn write_handler_response(res: &mut Response, response: HandlerResponse) {
    let content_type = response
        .get_header("content-type")
        .unwrap_or("application/json")
        .to_string();
    for (name, _) in &response.headers {
        if !name.eq_ignore_ascii_case("content-type") {
            debug!(header = %name, "Dropping handler header");
        }
    }
    match (content_type_header(&content_type), response.body) {
        (Some(header), Value::String(text)) if !header.contains("application/json") => {
            res.status_code(response.status as usize, status_reason(response.status));
            res.header(header);
            res.body_vec(text.into_bytes());
        }
        (_, body) => write_json(res, response.status, &body),
    }
}
