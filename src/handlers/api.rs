use super::{requested_locale, AppState};
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::faker::resolve_path;

/// `GET /api/{locale}/{path}`: one resolved value
pub fn handler(req: HandlerRequest, state: &AppState) {
    let provider = state.locales.resolve(requested_locale(&req));
    let path = req.get_path_param("path").unwrap_or_default();
    let value = resolve_path(&provider, path);
    req.respond(HandlerResponse::json(200, value));
}
