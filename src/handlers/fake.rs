use super::{requested_locale, AppState};
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::faker::fake_pattern;
use serde_json::Value;

/// `GET /fake/{locale}/{pattern}`: the pattern with every `{{path}}` filled,
/// as a JSON string
pub fn handler(req: HandlerRequest, state: &AppState) {
    let provider = state.locales.resolve(requested_locale(&req));
    let pattern = req.get_path_param("pattern").unwrap_or_default();
    let text = fake_pattern(&provider, pattern);
    req.respond(HandlerResponse::json(200, Value::String(text)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{alice_state, request};

    #[test]
    fn test_substitutes_placeholders() {
        let state = alice_state();
        let (req, rx) = request(
            "fake_pattern",
            &[("locale", "en"), ("pattern", "Hi {{ person.firstName }}, {{nope.nothing}}!")],
            &[],
        );
        handler(req, &state);
        assert_eq!(rx.recv().unwrap().body, "Hi Alice, nope.nothing!");
    }
}
