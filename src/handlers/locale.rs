use super::{requested_locale, AppState};
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::faker::dump_provider;
use tracing::debug;

/// `GET /locale/{locale}`: every capability of the locale's provider, invoked once
pub fn handler(req: HandlerRequest, state: &AppState) {
    let provider = state.locales.resolve(requested_locale(&req));
    debug!(locale = provider.locale(), "Dumping provider");
    req.respond(HandlerResponse::json(200, dump_provider(&provider)));
}
