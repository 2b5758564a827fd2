//! Dispatcher core, on the request hot path.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use crate::ids::RequestId;
use crate::middleware::Middleware;
use crate::router::{ParamVec, RouteMatch};
use crate::runtime_config::DEFAULT_STACK_SIZE;
use http::Method;
use may::coroutine;
use may::sync::mpsc;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Headers held inline before spilling to the heap
pub const MAX_INLINE_HEADERS: usize = 16;

/// Ordered `(name, value)` header pairs
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request handed to a handler coroutine, with the channel to answer on
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    pub request_id: RequestId,
    pub method: Method,
    /// Concrete request path
    pub path: String,
    pub handler_name: Arc<str>,
    pub path_params: ParamVec,
    /// Decoded query pairs in request order, duplicates kept
    pub query_params: ParamVec,
    /// Undecoded query string; nested templates are parsed from this
    pub raw_query: String,
    pub headers: HeaderVec,
    pub body: Option<Value>,
    pub reply_tx: mpsc::Sender<HandlerResponse>,
}

impl HandlerRequest {
    /// Last path parameter named `name`
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Last query parameter named `name`
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Header lookup, case-insensitive
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Answer the request; a dropped receiver is only logged
    pub fn respond(&self, response: HandlerResponse) {
        if let Err(e) = self.reply_tx.send(response) {
            warn!(
                request_id = %self.request_id,
                handler_name = %self.handler_name,
                error = %e,
                "Reply channel closed before response was sent"
            );
        }
    }
}

/// Response sent back from a handler coroutine
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    pub status: u16,
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    pub body: Value,
}

impl HandlerResponse {
    /// JSON response with a `content-type` header
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// `{"error": message}` with the given status
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

pub type HandlerSender = mpsc::Sender<HandlerRequest>;

/// Routes matched requests to handler coroutines by handler name
#[derive(Clone)]
pub struct Dispatcher {
    pub handlers: HashMap<String, HandlerSender>,
    pub middlewares: Vec<Arc<dyn Middleware>>,
    stack_size: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_stack_size(DEFAULT_STACK_SIZE)
    }

    /// Dispatcher whose handler coroutines get `stack_size` bytes of stack
    #[must_use]
    pub fn with_stack_size(stack_size: usize) -> Self {
        Dispatcher {
            handlers: HashMap::new(),
            middlewares: Vec::new(),
            stack_size,
        }
    }

    /// Middleware run in insertion order around every dispatch
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    #[must_use]
    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Spawn a coroutine serving `name` with `handler_fn`.
    ///
    /// A handler that panics is answered with a 500 and the coroutine keeps
    /// serving. Registering a name twice replaces the old coroutine, which
    /// exits once its channel closes.
    ///
    /// # Safety
    ///
    /// Spawns through `may::coroutine::Builder::spawn`. The `may` runtime must
    /// be configured before the first call and `handler_fn` must not rely on
    /// thread-local storage surviving across yields.
    pub unsafe fn register_handler<F>(&mut self, name: &str, handler_fn: F)
    where
        F: Fn(HandlerRequest) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<HandlerRequest>();
        let name = name.to_string();
        let handler_name_for_logging = name.clone();
        let stack_size = self.stack_size;

        // SAFETY: upheld by the caller, see the function contract.
        let spawn_result = unsafe {
            coroutine::Builder::new()
                .name(name.clone())
                .stack_size(stack_size)
                .spawn(move || {
                    debug!(
                        handler_name = %handler_name_for_logging,
                        stack_size = stack_size,
                        "Handler coroutine start"
                    );

                    for req in rx.iter() {
                        let reply_tx = req.reply_tx.clone();
                        let handler_name = Arc::clone(&req.handler_name);
                        let request_id = req.request_id;

                        info!(
                            request_id = %request_id,
                            handler_name = %handler_name,
                            path_params = ?req.path_params,
                            query_params = ?req.query_params,
                            "Handler execution start"
                        );

                        let execution_start = Instant::now();

                        if let Err(panic) =
                            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                                handler_fn(req);
                            }))
                        {
                            let panic_message = panic
                                .downcast_ref::<&str>()
                                .map(|s| (*s).to_string())
                                .or_else(|| panic.downcast_ref::<String>().cloned())
                                .unwrap_or_else(|| "unknown panic".to_string());

                            error!(
                                request_id = %request_id,
                                handler_name = %handler_name,
                                panic_message = %panic_message,
                                "Handler panicked"
                            );

                            let error_response = HandlerResponse::error(
                                500,
                                &format!("Handler panicked: {panic_message}"),
                            );
                            if reply_tx.send(error_response).is_err() {
                                warn!(request_id = %request_id, "Reply channel closed after panic");
                            }
                        } else {
                            info!(
                                request_id = %request_id,
                                handler_name = %handler_name,
                                execution_time_ms = execution_start.elapsed().as_millis() as u64,
                                "Handler execution complete"
                            );
                        }
                    }
                })
        };

        if let Err(e) = spawn_result {
            error!(
                handler_name = %name,
                error = %e,
                stack_size = stack_size,
                "Failed to spawn handler coroutine"
            );
            return;
        }

        if self.handlers.insert(name.clone(), tx).is_some() {
            warn!(handler_name = %name, "Replaced existing handler - old coroutine will exit");
        }
        info!(
            handler_name = %name,
            total_handlers = self.handlers.len(),
            "Handler registered successfully"
        );
    }

    /// Dispatch with a fresh request id
    #[must_use]
    pub fn dispatch(
        &self,
        route_match: RouteMatch,
        path: &str,
        body: Option<Value>,
        headers: HeaderVec,
    ) -> Option<HandlerResponse> {
        self.dispatch_with_request_id(route_match, path, body, headers, RequestId::new())
    }

    /// Send the request to its handler and wait for the answer.
    ///
    /// Returns `None` when no handler is registered under the route's
    /// handler name or the handler channel is gone. A handler that drops the
    /// reply channel without answering yields a 503.
    #[must_use]
    pub fn dispatch_with_request_id(
        &self,
        route_match: RouteMatch,
        path: &str,
        body: Option<Value>,
        headers: HeaderVec,
        request_id: RequestId,
    ) -> Option<HandlerResponse> {
        let (reply_tx, reply_rx) = mpsc::channel();

        let Some(tx) = self.handlers.get(route_match.handler_name.as_ref()) else {
            let available_handlers: Vec<&String> = self.handlers.keys().collect();
            error!(
                handler_name = %route_match.handler_name,
                available_handlers = ?available_handlers,
                "Handler not found"
            );
            return None;
        };

        let mut request = HandlerRequest {
            request_id,
            method: route_match.route.method.clone(),
            path: path.to_string(),
            handler_name: route_match.handler_name,
            path_params: route_match.path_params,
            query_params: route_match.query_params,
            raw_query: route_match.raw_query,
            headers,
            body,
            reply_tx,
        };

        let mut early_resp: Option<HandlerResponse> = None;
        for (idx, mw) in self.middlewares.iter().enumerate() {
            let resp = mw.before(&request);
            if early_resp.is_none() && resp.is_some() {
                debug!(
                    request_id = %request_id,
                    middleware_idx = idx,
                    "Middleware returned early response"
                );
                early_resp = resp;
            }
        }

        let (mut resp, latency) = if let Some(r) = early_resp {
            (r, Duration::from_millis(0))
        } else {
            info!(
                request_id = %request_id,
                handler_name = %request.handler_name,
                method = %request.method,
                path = %request.path,
                "Request dispatched to handler"
            );

            let start = Instant::now();
            if let Err(e) = tx.send(request.clone()) {
                error!(
                    request_id = %request_id,
                    handler_name = %request.handler_name,
                    error = %e,
                    "Failed to send request to handler"
                );
                return None;
            }

            // Only the handler's copy may keep the reply channel open.
            request.reply_tx = mpsc::channel().0;

            match reply_rx.recv() {
                Ok(response) => {
                    debug!(
                        request_id = %request_id,
                        handler_name = %request.handler_name,
                        status = response.status,
                        "Handler response received"
                    );
                    (response, start.elapsed())
                }
                Err(e) => {
                    error!(
                        request_id = %request_id,
                        handler_name = %request.handler_name,
                        error = %e,
                        "Handler channel closed - handler may have crashed"
                    );
                    return Some(HandlerResponse::error(
                        503,
                        &format!("Handler '{}' is not responding", request.handler_name),
                    ));
                }
            }
        };

        for mw in &self.middlewares {
            mw.after(&request, &mut resp, latency);
        }

        Some(resp)
    }
}
