//! End-to-end tests: raw HTTP/1.1 against the service built from
//! `doc/openapi.yaml`, bound to an ephemeral port.

use faker_api::faker::{devalue, Capability, Generated, Namespace, Provider};
use faker_api::handlers::AppState;
use serde_json::{json, Value};

mod common;
use common::http::get;
use common::test_server::TestServer;

/// `en` knows `person.firstName = "Alice"`, `person.fullName`,
/// `color.human = "red"` and a 64-bit `number.bigInt`
fn scripted_state() -> AppState {
    let state = AppState::default();
    let root = Namespace::new()
        .namespace("person", |ns| {
            ns.with("firstName", Capability::generator(|_| Ok(Generated::text("Alice"))))
                .with(
                    "fullName",
                    Capability::generator(|_| Ok(Generated::text("Alice Liddell"))),
                )
        })
        .namespace("color", |ns| {
            ns.with("human", Capability::generator(|_| Ok(Generated::text("red"))))
        })
        .namespace("number", |ns| {
            ns.with(
                "bigInt",
                Capability::generator(|_| Ok(Generated::BigInt(9_007_199_254_740_993))),
            )
        });
    assert!(state.locales.install("en", Provider::new("en", root)));
    state
}

#[test]
fn test_health() {
    let server = TestServer::start();
    let resp = get(server.addr(), "/health");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json(), json!({ "status": "ok" }));
}

#[test]
fn test_locales() {
    let server = TestServer::start();
    let resp = get(server.addr(), "/locales");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("content-type"), Some("application/json"));
    let body = resp.json();
    let locales: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(locales[0], "en");
    assert!(locales.contains(&"zh_CN"));
}

#[test]
fn test_locale_dump_of_installed_provider() {
    let server = TestServer::start_with(scripted_state());
    let resp = get(server.addr(), "/locale/en");
    assert_eq!(resp.status, 200);
    let body = resp.json();
    assert_eq!(body["person"]["firstName"], "Alice");
    assert!(body.get("faker").is_none());
}

#[test]
fn test_locale_dump_real_provider() {
    let server = TestServer::start();
    let body = get(server.addr(), "/locale/fr").json();
    assert_eq!(body["meta"]["locale"], "fr");
    assert!(body["person"]["firstName"].is_string());
    assert!(body["internet"]["ipv4"].is_string());
    assert!(body.get("rawDefinitions").is_none());
}

#[test]
fn test_api_resolves_scripted_provider_and_falls_back() {
    let server = TestServer::start_with(scripted_state());
    assert_eq!(get(server.addr(), "/api/en/person.firstName").json(), "Alice");
    assert_eq!(get(server.addr(), "/api/en/color.human").json(), "red");
    // vi is not a supported locale, so the default provider answers
    assert_eq!(get(server.addr(), "/api/vi/person.firstName").json(), "Alice");
}

#[test]
fn test_api_passthrough() {
    let server = TestServer::start_with(scripted_state());
    let resp = get(server.addr(), "/api/en/person.shoeSize");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json(), "person.shoeSize");
    assert_eq!(get(server.addr(), "/api/en/person").json(), "person");
}

#[test]
fn test_api_bigint_is_lossless() {
    let server = TestServer::start_with(scripted_state());
    let body = get(server.addr(), "/api/en/number.bigInt").json();
    let encoded = body.as_str().unwrap();
    assert_eq!(encoded, r#"[["BigInt","9007199254740993"]]"#);
    assert_eq!(devalue::parse_bigint(encoded), Some(9_007_199_254_740_993));
}

#[test]
fn test_api_requires_arguments_placeholder() {
    let server = TestServer::start();
    let body = get(server.addr(), "/api/en/date.between").json();
    assert_eq!(body, r#"Function "between" requires arguments"#);
}

#[test]
fn test_fake_pattern() {
    let server = TestServer::start_with(scripted_state());
    let resp = get(
        server.addr(),
        "/fake/en/Hello%20%7B%7B%20person.firstName%20%7D%7D%2C%20you%20like%20%7B%7Bcolor.human%7D%7D",
    );
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json(), "Hello Alice, you like red");
}

#[test]
fn test_template_scenario() {
    let server = TestServer::start_with(scripted_state());
    let resp = get(server.addr(), "/template/en/2?fullName=person.fullName");
    assert_eq!(resp.status, 200);
    assert_eq!(
        resp.json(),
        json!([{ "fullName": "Alice Liddell" }, { "fullName": "Alice Liddell" }])
    );
}

#[test]
fn test_template_nested_query() {
    let server = TestServer::start();
    let resp = get(
        server.addr(),
        "/template/ja/3?user%5Bname%5D=person.fullName&user%5Bip%5D=internet.ipv4&tags%5B%5D=lorem.word&tags%5B%5D=lorem.word&label=fixed",
    );
    assert_eq!(resp.status, 200);
    let items = resp.json();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 3);
    for item in items {
        let keys: Vec<&String> = item.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["user", "tags", "label"]);
        assert!(item["user"]["name"].is_string());
        assert_ne!(item["user"]["ip"], "internet.ipv4");
        assert_eq!(item["tags"].as_array().unwrap().len(), 2);
        assert_eq!(item["label"], "fixed");
    }
}

#[test]
fn test_template_bracket_key_containing_equals() {
    let server = TestServer::start_with(scripted_state());
    let resp = get(
        server.addr(),
        "/template/en/2?a[b=c]=person.firstName&color=color.human",
    );
    assert_eq!(resp.status, 200);
    let item = json!({ "a": { "b=c": "Alice" }, "color": "red" });
    assert_eq!(resp.json(), json!([item.clone(), item]));
}

#[test]
fn test_template_copies_are_independent() {
    let server = TestServer::start();
    let body = get(server.addr(), "/template/en/20?id=string.uuid").json();
    let mut ids: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[test]
fn test_template_bad_count() {
    let server = TestServer::start();
    for path in ["/template/en/abc", "/template/en/-1", "/template/en/1001"] {
        let resp = get(server.addr(), path);
        assert_eq!(resp.status, 400, "{path}");
        assert!(resp.json()["error"].is_string(), "{path}");
    }
}

#[test]
fn test_not_found() {
    let server = TestServer::start();
    let resp = get(server.addr(), "/nope");
    assert_eq!(resp.status, 404);
    assert_eq!(
        resp.json(),
        json!({ "error": "Not Found", "method": "GET", "path": "/nope" })
    );
}

#[test]
fn test_metrics_after_requests() {
    let server = TestServer::start();
    get(server.addr(), "/locales");
    get(server.addr(), "/health");
    let resp = get(server.addr(), "/metrics");
    assert_eq!(resp.status, 200);
    let text = resp.text();
    assert!(text.contains("faker_api_requests_total 1"), "{text}");
    assert!(text.contains("faker_api_handler_requests_total{handler=\"list_locales\"} 1"));
}

#[test]
fn test_openapi_and_docs() {
    let server = TestServer::start();
    let spec = get(server.addr(), "/openapi.yaml");
    assert_eq!(spec.status, 200);
    assert_eq!(spec.header("content-type"), Some("text/yaml"));
    let doc: Value = serde_yaml::from_slice(&spec.body).unwrap();
    assert_eq!(doc["info"]["title"], "Faker API");

    let docs = get(server.addr(), "/docs");
    assert_eq!(docs.status, 200);
    assert!(docs.text().contains("url: \"/openapi.yaml\""));
}
