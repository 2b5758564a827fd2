//! # faker-api
//!
//! Locale-aware fake data over HTTP. An OpenAPI 3.1 document
//! (`doc/openapi.yaml`) defines the routes; each operation is served by a
//! handler running in its own `may` coroutine.
//!
//! ## Endpoints
//!
//! | Route | Answer |
//! |---|---|
//! | `GET /locales` | supported locales, default first |
//! | `GET /locale/{locale}` | every capability of the locale, invoked once |
//! | `GET /api/{locale}/{path}` | one resolved dotted path |
//! | `GET /fake/{locale}/{pattern}` | pattern with `{{path}}` placeholders filled |
//! | `GET /template/{locale}/{count}?..` | `count` filled copies of a query-string template |
//! | `GET /health`, `/metrics`, `/openapi.yaml`, `/docs` | built-ins |
//!
//! Unknown locales fall back to `en`; unknown paths come back unchanged.
//! 64-bit integers are sent as devalue strings (`[["BigInt","42"]]`).
//!
//! ## Layers
//!
//! - [`faker`]: providers, path resolution, templates, dumps
//! - [`spec`]: OpenAPI loading into [`RouteMeta`]
//! - [`router`]: radix-tree route matching
//! - [`dispatcher`]: coroutine-per-handler dispatch with [`middleware`]
//! - [`server`]: the `may_minihttp` service and server handle
//! - [`handlers`]: one module per operation
//!
//! ```no_run
//! use faker_api::app::build_service;
//! use faker_api::handlers::AppState;
//! use faker_api::runtime_config::RuntimeConfig;
//! use faker_api::server::HttpServer;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let config = RuntimeConfig::from_env();
//! let state = Arc::new(AppState::from_config(&config));
//! let service = build_service(Path::new("doc/openapi.yaml"), None, &config, state)?;
//! let handle = HttpServer(service).start(&config.addr)?;
//! handle.wait_ready()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod app;
pub mod cli;
pub mod dispatcher;
pub mod faker;
pub mod handlers;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod spec;
pub mod static_files;
pub mod validator;

pub use spec::{load_spec, ParameterLocation, ParameterMeta, ParameterStyle, RouteMeta};
