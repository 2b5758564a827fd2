//! Router core, on the request hot path.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use crate::spec::RouteMeta;
use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::radix::RadixRouter;

/// Parameters held inline before spilling to the heap
pub const MAX_INLINE_PARAMS: usize = 8;

/// Ordered `(name, value)` pairs. Names are shared with the route tree;
/// values are per request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A request path matched to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Arc<RouteMeta>,
    /// Percent-decoded path parameters, in path order
    pub path_params: ParamVec,
    pub handler_name: Arc<str>,
    /// Decoded query pairs in request order, duplicates kept
    pub query_params: ParamVec,
    /// Query string as received, without the leading `?`
    pub raw_query: String,
}

impl RouteMatch {
    /// Last path parameter named `name`
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Last query parameter named `name` (`?a=1&a=2` gives `2`)
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Matches requests against the routes of one OpenAPI document
#[derive(Clone)]
pub struct Router {
    radix_router: RadixRouter,
    base_path: String,
}

impl Router {
    #[must_use]
    pub fn new(routes: Vec<RouteMeta>) -> Self {
        let supported_methods = [
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
            Method::HEAD,
            Method::TRACE,
        ];

        let routes: Vec<RouteMeta> = routes
            .into_iter()
            .filter(|r| supported_methods.contains(&r.method))
            .collect();

        let base_path = routes
            .first()
            .map(|r| r.base_path.clone())
            .unwrap_or_default();

        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|r| format!("{} {}{}", r.method, base_path, r.path_pattern))
            .collect();

        info!(
            routes_count = routes.len(),
            base_path = %base_path,
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Self {
            radix_router: RadixRouter::new(routes, &base_path),
            base_path,
        }
    }

    /// `(method, full path, handler)` for every route, sorted by path
    #[must_use]
    pub fn describe_routes(&self) -> Vec<(Method, String, Arc<str>)> {
        let mut out: Vec<_> = self
            .radix_router
            .routes()
            .into_iter()
            .map(|r| {
                (
                    r.method.clone(),
                    format!("{}{}", self.base_path, r.path_pattern),
                    Arc::clone(&r.handler_name),
                )
            })
            .collect();
        out.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        out
    }

    #[must_use]
    pub fn route(&self, method: Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        let match_start = std::time::Instant::now();
        let result = self.radix_router.route(&method, path);
        let match_duration = match_start.elapsed();

        let Some((route, params)) = result else {
            warn!(
                method = %method,
                path = %path,
                duration_us = match_duration.as_micros(),
                "No route matched"
            );
            return None;
        };

        if match_duration > std::time::Duration::from_millis(1) {
            warn!(
                method = %method,
                path = %path,
                handler_name = %route.handler_name,
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        } else {
            info!(
                method = %method,
                path = %path,
                handler_name = %route.handler_name,
                route_pattern = %route.path_pattern,
                path_params = ?params,
                duration_us = match_duration.as_micros(),
                "Route matched"
            );
        }

        Some(RouteMatch {
            handler_name: Arc::clone(&route.handler_name),
            route,
            path_params: params,
            query_params: ParamVec::new(),
            raw_query: String::new(),
        })
    }
}
