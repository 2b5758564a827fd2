use super::types::{ParameterLocation, ParameterMeta, ParameterStyle, RouteMeta};
use crate::validator::{fail_if_issues, ValidationIssue};
use oas3::spec::{ObjectOrReference, Parameter};
use oas3::OpenApiV3Spec;
use serde_json::Value;
use std::sync::Arc;

/// Resolve a `#/components/schemas/..` reference
pub fn resolve_schema_ref<'a>(
    spec: &'a OpenApiV3Spec,
    ref_path: &str,
) -> Option<&'a oas3::spec::ObjectSchema> {
    let name = ref_path.strip_prefix("#/components/schemas/")?;
    spec.components
        .as_ref()?
        .schemas
        .get(name)
        .and_then(|schema_ref| match schema_ref {
            ObjectOrReference::Object(schema) => Some(schema),
            _ => None,
        })
}

fn resolve_parameter_ref<'a>(
    spec: &'a OpenApiV3Spec,
    ref_path: &str,
) -> Option<&'a oas3::spec::Parameter> {
    let name = ref_path.strip_prefix("#/components/parameters/")?;
    spec.components
        .as_ref()?
        .parameters
        .get(name)
        .and_then(|param_ref| match param_ref {
            ObjectOrReference::Object(param) => Some(param),
            _ => None,
        })
}

/// Handler name from an `x-handler*` extension, else the `operationId`.
///
/// Extension keys are matched with or without their `x-` prefix.
fn resolve_handler_name(
    operation: &oas3::spec::Operation,
    location: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<String> {
    operation
        .extensions
        .iter()
        .find_map(|(key, val)| {
            let bare = key.strip_prefix("x-").unwrap_or(key);
            match val {
                Value::String(s) if bare.starts_with("handler") => Some(s.clone()),
                _ => None,
            }
        })
        .or_else(|| operation.operation_id.clone())
        .or_else(|| {
            issues.push(ValidationIssue::new(
                location,
                "MissingHandler",
                "Missing operationId or x-handler-* extension",
            ));
            None
        })
}

/// Resolve parameters (following `$ref`s) into [`ParameterMeta`]
pub fn extract_parameters(
    spec: &OpenApiV3Spec,
    params: &[ObjectOrReference<Parameter>],
) -> Vec<ParameterMeta> {
    let mut out = Vec::new();
    for p in params {
        let param = match p {
            ObjectOrReference::Object(obj) => Some(obj),
            ObjectOrReference::Ref { ref_path, .. } => resolve_parameter_ref(spec, ref_path),
        };

        if let Some(param) = param {
            let schema = param.schema.as_ref().and_then(|s| match s {
                ObjectOrReference::Object(obj) => serde_json::to_value(obj).ok(),
                ObjectOrReference::Ref { ref_path, .. } => resolve_schema_ref(spec, ref_path)
                    .and_then(|sch| serde_json::to_value(sch).ok()),
            });

            out.push(ParameterMeta {
                name: param.name.clone(),
                location: ParameterLocation::from(param.location),
                required: param.required.unwrap_or(false),
                schema,
                style: param.style.map(ParameterStyle::from),
                explode: param.explode,
            });
        }
    }
    out
}

fn base_path_of(spec: &OpenApiV3Spec) -> String {
    let Some(server) = spec.servers.first() else {
        return String::new();
    };
    let url_str = &server.url;
    url::Url::parse(url_str)
        .or_else(|_| url::Url::parse(&format!("http://dummy{url_str}")))
        .map(|u| {
            let p = u.path().trim_end_matches('/');
            if p == "/" || p.is_empty() {
                String::new()
            } else {
                p.to_string()
            }
        })
        .unwrap_or_default()
}

/// Build route metadata for every operation in the document.
///
/// # Errors
///
/// Fails when an operation names no handler, or when a templated path
/// segment has no matching path parameter.
pub fn build_routes(spec: &OpenApiV3Spec) -> anyhow::Result<Vec<RouteMeta>> {
    let mut routes = Vec::new();
    let mut issues = Vec::new();
    let base_path = base_path_of(spec);

    if let Some(paths_map) = spec.paths.as_ref() {
        for (path, item) in paths_map {
            for (method, operation) in item.methods() {
                let location = format!("{path} {method}");

                let Some(handler_name) = resolve_handler_name(operation, &location, &mut issues)
                else {
                    continue;
                };

                let mut parameters = extract_parameters(spec, &item.parameters);
                parameters.extend(extract_parameters(spec, &operation.parameters));

                for segment in path.split('/') {
                    let Some(name) = segment
                        .strip_prefix('{')
                        .and_then(|s| s.strip_suffix('}'))
                    else {
                        continue;
                    };
                    let declared = parameters
                        .iter()
                        .any(|p| p.location == ParameterLocation::Path && p.name == name);
                    if !declared {
                        issues.push(ValidationIssue::new(
                            &location,
                            "MissingPathParameter",
                            format!("Path parameter '{name}' is not declared"),
                        ));
                    }
                }

                routes.push(RouteMeta {
                    method,
                    path_pattern: Arc::from(path.as_str()),
                    handler_name: Arc::from(handler_name.as_str()),
                    parameters,
                    summary: operation.summary.clone(),
                    base_path: base_path.clone(),
                });
            }
        }
    }

    fail_if_issues(issues)?;
    Ok(routes)
}
