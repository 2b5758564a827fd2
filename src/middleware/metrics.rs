use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use dashmap::DashMap;

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Request counters rendered in Prometheus text format at `/metrics`.
///
/// Counters use relaxed atomics; the figures are eventually consistent.
#[derive(Debug, Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    /// Requests answered by built-in endpoints (`/health`, `/metrics`, ...)
    top_level_requests: AtomicUsize,
    client_errors: AtomicUsize,
    server_errors: AtomicUsize,
    per_handler: DashMap<String, usize>,
}

impl MetricsMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that reached the dispatcher
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Mean handler latency; zero before the first request
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    pub fn inc_top_level_request(&self) {
        self.top_level_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn top_level_request_count(&self) -> usize {
        self.top_level_requests.load(Ordering::Relaxed)
    }

    /// Requests dispatched to `handler`
    pub fn handler_count(&self, handler: &str) -> usize {
        self.per_handler.get(handler).map(|c| *c).unwrap_or(0)
    }

    /// Render every counter in the Prometheus text exposition format
    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# HELP faker_api_requests_total Requests dispatched to handlers");
        let _ = writeln!(out, "# TYPE faker_api_requests_total counter");
        let _ = writeln!(out, "faker_api_requests_total {}", self.request_count());

        let _ = writeln!(out, "# HELP faker_api_top_level_requests_total Requests served by built-in endpoints");
        let _ = writeln!(out, "# TYPE faker_api_top_level_requests_total counter");
        let _ = writeln!(
            out,
            "faker_api_top_level_requests_total {}",
            self.top_level_request_count()
        );

        let _ = writeln!(out, "# HELP faker_api_request_latency_seconds Average handler latency");
        let _ = writeln!(out, "# TYPE faker_api_request_latency_seconds gauge");
        let _ = writeln!(
            out,
            "faker_api_request_latency_seconds {:.6}",
            self.average_latency().as_secs_f64()
        );

        let _ = writeln!(out, "# HELP faker_api_responses_total Handler responses by status class");
        let _ = writeln!(out, "# TYPE faker_api_responses_total counter");
        let _ = writeln!(
            out,
            "faker_api_responses_total{{class=\"4xx\"}} {}",
            self.client_errors.load(Ordering::Relaxed)
        );
        let _ = writeln!(
            out,
            "faker_api_responses_total{{class=\"5xx\"}} {}",
            self.server_errors.load(Ordering::Relaxed)
        );

        let mut handlers: Vec<(String, usize)> = self
            .per_handler
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        handlers.sort();
        if !handlers.is_empty() {
            let _ = writeln!(out, "# HELP faker_api_handler_requests_total Requests per handler");
            let _ = writeln!(out, "# TYPE faker_api_handler_requests_total counter");
            for (handler, count) in handlers {
                let _ = writeln!(
                    out,
                    "faker_api_handler_requests_total{{handler=\"{handler}\"}} {count}"
                );
            }
        }
        out
    }
}

impl Middleware for MetricsMiddleware {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        *self
            .per_handler
            .entry(req.handler_name.to_string())
            .or_insert(0) += 1;
        None
    }

    fn after(&self, _req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        self.total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
        match res.status {
            400..=499 => {
                self.client_errors.fetch_add(1, Ordering::Relaxed);
            }
            500..=599 => {
                self.server_errors.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }
}
