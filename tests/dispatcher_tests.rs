//! Dispatcher behaviour with real handler coroutines.

use faker_api::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse, HeaderVec};
use faker_api::middleware::Middleware;
use faker_api::router::Router;
use faker_api::spec::RouteMeta;
use http::Method;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::test_server::setup_may_runtime;

fn router() -> Router {
    let route = |path: &str, handler: &str| RouteMeta {
        method: Method::GET,
        path_pattern: Arc::from(path),
        handler_name: Arc::from(handler),
        parameters: Vec::new(),
        summary: None,
        base_path: String::new(),
    };
    Router::new(vec![
        route("/echo/{word}", "echo"),
        route("/boom", "boom"),
        route("/silent", "silent"),
        route("/ghost", "ghost"),
    ])
}

fn dispatcher() -> Dispatcher {
    setup_may_runtime();
    let mut dispatcher = Dispatcher::new();
    unsafe {
        dispatcher.register_handler("echo", |req: HandlerRequest| {
            let word = req.get_path_param("word").unwrap_or_default().to_string();
            let q = req.get_query_param("q").map(str::to_string);
            req.respond(HandlerResponse::json(200, json!({ "word": word, "q": q })));
        });
        dispatcher.register_handler("boom", |_req: HandlerRequest| {
            panic!("generator exploded");
        });
        dispatcher.register_handler("silent", |_req: HandlerRequest| {});
    }
    dispatcher
}

fn dispatch(d: &Dispatcher, path: &str) -> Option<HandlerResponse> {
    let route_match = router().route(Method::GET, path).unwrap();
    d.dispatch(route_match, path, None, HeaderVec::new())
}

#[test]
fn test_dispatch_reaches_handler() {
    let d = dispatcher();
    let mut route_match = router().route(Method::GET, "/echo/hi%20there").unwrap();
    route_match
        .query_params
        .push((Arc::from("q"), "x".to_string()));
    let resp = d
        .dispatch(route_match, "/echo/hi%20there", None, HeaderVec::new())
        .unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, json!({ "word": "hi there", "q": "x" }));
}

#[test]
fn test_panicking_handler_is_500_and_keeps_serving() {
    let d = dispatcher();
    let resp = dispatch(&d, "/boom").unwrap();
    assert_eq!(resp.status, 500);
    assert!(resp.body["error"]
        .as_str()
        .unwrap()
        .contains("generator exploded"));
    assert_eq!(dispatch(&d, "/boom").unwrap().status, 500);
}

#[test]
fn test_handler_without_answer_is_503() {
    let d = dispatcher();
    assert_eq!(dispatch(&d, "/silent").unwrap().status, 503);
}

#[test]
fn test_unregistered_handler_is_none() {
    let d = dispatcher();
    assert!(!d.has_handler("ghost"));
    assert!(dispatch(&d, "/ghost").is_none());
}

struct Gate {
    after_calls: AtomicUsize,
}

impl Middleware for Gate {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        (req.path == "/echo/blocked").then(|| HandlerResponse::error(400, "blocked"))
    }

    fn after(&self, _req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
        self.after_calls.fetch_add(1, Ordering::SeqCst);
        res.set_header("x-seen", "1".to_string());
    }
}

#[test]
fn test_middleware_short_circuit_and_after() {
    let mut d = dispatcher();
    let gate = Arc::new(Gate {
        after_calls: AtomicUsize::new(0),
    });
    d.add_middleware(Arc::clone(&gate) as Arc<dyn Middleware>);

    let blocked = dispatch(&d, "/echo/blocked").unwrap();
    assert_eq!(blocked.status, 400);
    assert_eq!(blocked.get_header("X-Seen"), Some("1"));

    let ok = dispatch(&d, "/echo/fine").unwrap();
    assert_eq!(ok.status, 200);
    assert_eq!(gate.after_calls.load(Ordering::SeqCst), 2);
}
