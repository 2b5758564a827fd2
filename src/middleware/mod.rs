//! Middleware run by the [`Dispatcher`](crate::dispatcher::Dispatcher)
//! around every handler call.
//!
//! - [`MetricsMiddleware`] counts requests and latency for `/metrics`
//! - [`TracingMiddleware`] logs each dispatched request inside a span

mod core;
mod metrics;
mod tracing;

pub use core::Middleware;
pub use metrics::MetricsMiddleware;
pub use tracing::TracingMiddleware;
