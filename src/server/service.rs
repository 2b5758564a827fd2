use super::request::{parse_request, ParsedRequest};
use super::response::{write_bytes, write_handler_response, write_json};
use crate::dispatcher::Dispatcher;
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::middleware::MetricsMiddleware;
use crate::router::Router;
use crate::static_files::StaticFiles;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{error, warn};

/// `may_minihttp` service: built-in endpoints first, then routing and
/// dispatch to handler coroutines.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<RwLock<Router>>,
    pub dispatcher: Arc<RwLock<Dispatcher>>,
    pub metrics: Option<Arc<MetricsMiddleware>>,
    /// OpenAPI document served at `/openapi.yaml`
    pub spec_path: PathBuf,
    /// Directory holding the Swagger UI `index.html`
    pub doc_files: Option<StaticFiles>,
}

impl AppService {
    pub fn new(
        router: Arc<RwLock<Router>>,
        dispatcher: Arc<RwLock<Dispatcher>>,
        spec_path: PathBuf,
        doc_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            router,
            dispatcher,
            metrics: None,
            spec_path,
            doc_files: doc_dir.map(StaticFiles::new),
        }
    }

    pub fn set_metrics_middleware(&mut self, metrics: Arc<MetricsMiddleware>) {
        self.metrics = Some(metrics);
    }

    /// Serve `/health`, `/metrics`, `/openapi.yaml` and `/docs`.
    ///
    /// Returns `false` when `path` is not a built-in endpoint.
    fn serve_builtin(&self, path: &str, res: &mut Response) -> bool {
        match path {
            "/health" => health_endpoint(res),
            "/metrics" => match &self.metrics {
                Some(metrics) => metrics_endpoint(res, metrics),
                None => not_found(res, "GET", path),
            },
            "/openapi.yaml" => openapi_endpoint(res, &self.spec_path),
            "/docs" => match &self.doc_files {
                Some(docs) => swagger_ui_endpoint(res, docs),
                None => write_json(res, 404, &json!({ "error": "Docs not configured" })),
            },
            _ => return false,
        }
        if let Some(metrics) = &self.metrics {
            metrics.inc_top_level_request();
        }
        true
    }
}

fn not_found(res: &mut Response, method: &str, path: &str) {
    write_json(
        res,
        404,
        &json!({ "error": "Not Found", "method": method, "path": path }),
    );
}

/// `{"status":"ok"}`
pub fn health_endpoint(res: &mut Response) {
    write_json(res, 200, &json!({ "status": "ok" }));
}

/// Prometheus text rendered from the metrics middleware
pub fn metrics_endpoint(res: &mut Response, metrics: &MetricsMiddleware) {
    write_bytes(
        res,
        200,
        "text/plain",
        metrics.render_prometheus().into_bytes(),
    );
}

/// The OpenAPI document as `text/yaml`
pub fn openapi_endpoint(res: &mut Response, spec_path: &std::path::Path) {
    match std::fs::read(spec_path) {
        Ok(bytes) => write_bytes(res, 200, "text/yaml", bytes),
        Err(e) => {
            warn!(path = %spec_path.display(), error = %e, "OpenAPI document unreadable");
            write_json(res, 404, &json!({ "error": "Spec not found" }));
        }
    }
}

/// Swagger UI `index.html` pointed at `/openapi.yaml`
pub fn swagger_ui_endpoint(res: &mut Response, docs: &StaticFiles) {
    match docs.load("index.html", Some(&json!({ "spec_url": "/openapi.yaml" }))) {
        Ok((bytes, content_type)) => write_bytes(res, 200, content_type, bytes),
        Err(e) => {
            warn!(dir = %docs.base_dir().display(), error = %e, "Docs page unavailable");
            write_json(res, 404, &json!({ "error": "Docs not found" }));
        }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);
        let request_id = RequestId::from_header_or_new(parsed.header(REQUEST_ID_HEADER));
        let ParsedRequest {
            method,
            path,
            headers,
            query_params,
            raw_query,
            body,
            ..
        } = parsed;

        if method == "GET" && self.serve_builtin(&path, res) {
            return Ok(());
        }

        let Ok(http_method) = method.parse::<Method>() else {
            not_found(res, &method, &path);
            return Ok(());
        };

        let route_opt = match self.router.read() {
            Ok(router) => router.route(http_method, &path),
            Err(_) => {
                error!(request_id = %request_id, "Router lock poisoned");
                write_json(res, 500, &json!({ "error": "Router unavailable" }));
                return Ok(());
            }
        };

        let Some(mut route_match) = route_opt else {
            not_found(res, &method, &path);
            return Ok(());
        };
        route_match.query_params = query_params;
        route_match.raw_query = raw_query;

        let handler_response = match self.dispatcher.read() {
            Ok(dispatcher) => {
                dispatcher.dispatch_with_request_id(route_match, &path, body, headers, request_id)
            }
            Err(_) => {
                error!(request_id = %request_id, "Dispatcher lock poisoned");
                write_json(res, 500, &json!({ "error": "Dispatcher unavailable" }));
                return Ok(());
            }
        };

        match handler_response {
            Some(response) => write_handler_response(res, response),
            None => write_json(
                res,
                500,
                &json!({
                    "error": "Handler failed or not registered",
                    "method": method,
                    "path": path
                }),
            ),
        }
        Ok(())
    }
}
