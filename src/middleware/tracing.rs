use std::time::Duration;

use tracing::{debug, info, info_span, warn};

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Logs each dispatched request inside an `http_request` span
#[derive(Debug, Default)]
pub struct TracingMiddleware;

impl TracingMiddleware {
    fn span(req: &HandlerRequest) -> tracing::Span {
        info_span!(
            "http_request",
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            handler = %req.handler_name
        )
    }
}

impl Middleware for TracingMiddleware {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        Self::span(req).in_scope(|| debug!("Request started"));
        None
    }

    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        let latency_ms = latency.as_millis() as u64;
        Self::span(req).in_scope(|| {
            if res.status >= 500 {
                warn!(status = res.status, latency_ms, "Request failed");
            } else {
                info!(status = res.status, latency_ms, "Request completed");
            }
        });
    }
}
