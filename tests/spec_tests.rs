//! OpenAPI loading against the shipped document and hand-written fixtures.

use faker_api::handlers::registry::HANDLER_NAMES;
use faker_api::spec::{load_spec, load_spec_from_str, ParameterLocation};
use std::io::Write;

#[test]
fn test_shipped_document_routes() {
    let (routes, slug) = load_spec("doc/openapi.yaml").unwrap();
    assert_eq!(slug, "faker_api");
    assert_eq!(routes.len(), 5);
    for route in &routes {
        assert!(
            HANDLER_NAMES.contains(&route.handler_name.as_ref()),
            "{}",
            route.handler_name
        );
    }

    let template = routes
        .iter()
        .find(|r| r.path_pattern.as_ref() == "/template/{locale}/{count}")
        .unwrap();
    let path_params: Vec<&str> = template
        .parameters_in(ParameterLocation::Path)
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(path_params, ["locale", "count"]);

    let query_params: Vec<&str> = template
        .parameters_in(ParameterLocation::Query)
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(query_params.len(), 22);
    for name in ["ip[v6]", "account[jwt]", "favorite[book]", "bio", "id"] {
        assert!(query_params.contains(&name), "{name}");
    }
}

#[test]
fn test_undeclared_path_parameter_fails() {
    let yaml = r#"openapi: 3.1.0
info:
  title: Broken
  version: "1"
paths:
  /api/{locale}/{path}:
    get:
      operationId: get_api
      parameters:
        - name: locale
          in: path
          required: true
          schema:
            type: string
      responses:
        "200":
          description: ok
"#;
    let err = load_spec_from_str(yaml, true).unwrap_err();
    assert!(format!("{err:#}").contains("path"));
}

#[test]
fn test_missing_handler_fails() {
    let yaml = r#"openapi: 3.1.0
info:
  title: No Handler
  version: "1"
paths:
  /locales:
    get:
      responses:
        "200":
          description: ok
"#;
    assert!(load_spec_from_str(yaml, true).is_err());
}

#[test]
fn test_json_document_from_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{
  "openapi": "3.1.0",
  "info": {{ "title": "Json Doc", "version": "1" }},
  "servers": [{{ "url": "http://localhost:3000/v1" }}],
  "paths": {{
    "/locales": {{ "get": {{ "operationId": "list_locales", "responses": {{ "200": {{ "description": "ok" }} }} }} }}
  }}
}}"#
    )
    .unwrap();
    let (routes, slug) = load_spec(file.path().to_str().unwrap()).unwrap();
    assert_eq!(slug, "json_doc");
    assert_eq!(routes[0].base_path, "/v1");
    assert_eq!(routes[0].handler_name.as_ref(), "list_locales");
}
