use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::faker::supported_locales;
use serde_json::Value;

/// `GET /locales`: every supported locale, the default first
pub fn handler(req: HandlerRequest) {
    let body = Value::from(supported_locales());
    req.respond(HandlerResponse::json(200, body));
}
