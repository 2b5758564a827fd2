//! Service assembly: OpenAPI document → router, dispatcher, handlers.

use crate::dispatcher::Dispatcher;
use crate::handlers::registry::register_from_spec;
use crate::handlers::AppState;
use crate::middleware::{MetricsMiddleware, Middleware, TracingMiddleware};
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use crate::server::AppService;
use crate::spec::load_spec;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::info;

/// Load `spec_path` and wire up a ready-to-serve [`AppService`].
///
/// Handler coroutines get `config.stack_size` bytes of stack; `state` is
/// shared by every handler.
///
/// # Errors
///
/// Fails when the document cannot be read or parsed, or names a handler
/// this crate does not implement.
pub fn build_service(
    spec_path: &Path,
    doc_dir: Option<PathBuf>,
    config: &RuntimeConfig,
    state: Arc<AppState>,
) -> anyhow::Result<AppService> {
    let spec_str = spec_path
        .to_str()
        .context("OpenAPI document path is not valid UTF-8")?;
    let (routes, slug) = load_spec(spec_str)?;
    info!(spec = %spec_str, slug = %slug, routes = routes.len(), "OpenAPI document loaded");

    let router = Router::new(routes.clone());

    let metrics = Arc::new(MetricsMiddleware::new());
    let mut dispatcher = Dispatcher::with_stack_size(config.stack_size);
    dispatcher.add_middleware(Arc::new(TracingMiddleware));
    dispatcher.add_middleware(Arc::clone(&metrics) as Arc<dyn Middleware>);
    // SAFETY: the may runtime is configured by the caller before serving and
    // handlers keep no thread-local state across yields.
    unsafe { register_from_spec(&mut dispatcher, &routes, state)? };

    let mut service = AppService::new(
        Arc::new(RwLock::new(router)),
        Arc::new(RwLock::new(dispatcher)),
        spec_path.to_path_buf(),
        doc_dir,
    );
    service.set_metrics_middleware(metrics);
    Ok(service)
}
