//! Handler registration.
//!
//! Binds the handler names used in `doc/openapi.yaml` (`x-handler-*`
//! extensions or `operationId`) to their functions.

use super::{api, fake, locale, locales, template, AppState};
use crate::dispatcher::{Dispatcher, HandlerRequest};
use crate::spec::RouteMeta;
use anyhow::bail;
use std::sync::Arc;
use tracing::info;

pub const LIST_LOCALES: &str = "list_locales";
pub const GET_LOCALE: &str = "get_locale";
pub const GET_API: &str = "get_api";
pub const FAKE_PATTERN: &str = "fake_pattern";
pub const GENERATE_TEMPLATE: &str = "generate_template";

/// Every handler name this crate implements
pub const HANDLER_NAMES: &[&str] = &[
    LIST_LOCALES,
    GET_LOCALE,
    GET_API,
    FAKE_PATTERN,
    GENERATE_TEMPLATE,
];

type HandlerFn = Box<dyn Fn(HandlerRequest) + Send + 'static>;

fn handler_for(name: &str, state: &Arc<AppState>) -> Option<HandlerFn> {
    let state = Arc::clone(state);
    let f: HandlerFn = match name {
        LIST_LOCALES => Box::new(locales::handler),
        GET_LOCALE => Box::new(move |req| locale::handler(req, &state)),
        GET_API => Box::new(move |req| api::handler(req, &state)),
        FAKE_PATTERN => Box::new(move |req| fake::handler(req, &state)),
        GENERATE_TEMPLATE => Box::new(move |req| template::handler(req, &state)),
        _ => return None,
    };
    Some(f)
}

/// Register the handlers named by `routes`.
///
/// # Errors
///
/// Fails, before spawning anything, when a route names a handler this
/// crate does not implement.
///
/// # Safety
///
/// Spawns handler coroutines; see [`Dispatcher::register_handler`].
pub unsafe fn register_from_spec(
    dispatcher: &mut Dispatcher,
    routes: &[RouteMeta],
    state: Arc<AppState>,
) -> anyhow::Result<()> {
    let mut names: Vec<&str> = routes.iter().map(|r| r.handler_name.as_ref()).collect();
    names.sort_unstable();
    names.dedup();

    let unknown: Vec<&str> = names
        .iter()
        .copied()
        .filter(|n| !HANDLER_NAMES.contains(n))
        .collect();
    if !unknown.is_empty() {
        bail!("OpenAPI document names unimplemented handlers: {}", unknown.join(", "));
    }

    for name in names {
        if let Some(f) = handler_for(name, &state) {
            // SAFETY: forwarded to the caller.
            unsafe { dispatcher.register_handler(name, f) };
        }
    }
    info!(handlers = dispatcher.handlers.len(), "Handlers registered from spec");
    Ok(())
}
