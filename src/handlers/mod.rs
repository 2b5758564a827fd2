//! # Handlers
//!
//! One module per OpenAPI operation. Each handler runs inside its
//! dispatcher coroutine, reads its parameters from the
//! [`HandlerRequest`](crate::dispatcher::HandlerRequest) and answers with a
//! JSON [`HandlerResponse`](crate::dispatcher::HandlerResponse).
//!
//! | Operation | Route |
//! |---|---|
//! | `list_locales` | `GET /locales` |
//! | `get_locale` | `GET /locale/{locale}` |
//! | `get_api` | `GET /api/{locale}/{path}` |
//! | `fake_pattern` | `GET /fake/{locale}/{pattern}` |
//! | `generate_template` | `GET /template/{locale}/{count}` |

pub mod api;
pub mod fake;
pub mod locale;
pub mod locales;
pub mod registry;
pub mod template;

use crate::dispatcher::HandlerRequest;
use crate::faker::{LocaleRegistry, QueryOptions, DEFAULT_LOCALE};
use crate::runtime_config::RuntimeConfig;

/// State shared by every handler coroutine
#[derive(Debug)]
pub struct AppState {
    pub locales: LocaleRegistry,
    /// Largest `count` accepted by `/template`
    pub max_count: usize,
    pub template_depth: usize,
    pub query: QueryOptions,
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&RuntimeConfig::default())
    }
}

impl AppState {
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            locales: LocaleRegistry::new(),
            max_count: config.max_count,
            template_depth: config.template_depth,
            query: QueryOptions {
                depth: config.query_depth,
                ..QueryOptions::default()
            },
        }
    }
}

/// The `locale` path parameter, or the default locale when absent
pub(crate) fn requested_locale(req: &HandlerRequest) -> &str {
    req.get_path_param("locale").unwrap_or(DEFAULT_LOCALE)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::dispatcher::{HandlerRequest, HandlerResponse, HeaderVec};
    use crate::faker::{Capability, Generated, Namespace, Provider};
    use crate::ids::RequestId;
    use crate::router::ParamVec;
    use crate::runtime_config::RuntimeConfig;
    use http::Method;
    use may::sync::mpsc;
    use std::sync::Arc;

    use super::AppState;

    /// Build a request and the receiver its reply lands on.
    ///
    /// `query_params` are also joined unencoded into `raw_query`.
    pub fn request(
        handler: &str,
        path_params: &[(&str, &str)],
        query_params: &[(&str, &str)],
    ) -> (HandlerRequest, mpsc::Receiver<HandlerResponse>) {
        let (reply_tx, reply_rx) = mpsc::channel();
        let to_params = |pairs: &[(&str, &str)]| -> ParamVec {
            pairs
                .iter()
                .map(|(k, v)| (Arc::from(*k), (*v).to_string()))
                .collect()
        };
        let req = HandlerRequest {
            request_id: RequestId::new(),
            method: Method::GET,
            path: "/test".to_string(),
            handler_name: Arc::from(handler),
            path_params: to_params(path_params),
            query_params: to_params(query_params),
            raw_query: query_params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&"),
            headers: HeaderVec::new(),
            body: None,
            reply_tx,
        };
        (req, reply_rx)
    }

    /// State whose `en` provider only knows `person.firstName = "Alice"`
    pub fn alice_state() -> AppState {
        let state = AppState::from_config(&RuntimeConfig::default());
        let root = Namespace::new().namespace("person", |ns| {
            ns.with("firstName", Capability::generator(|_| Ok(Generated::text("Alice"))))
        });
        state.locales.install("en", Provider::new("en", root));
        state
    }
}
