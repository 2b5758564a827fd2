use super::build::build_routes;
use super::types::RouteMeta;
use anyhow::Context;
use oas3::OpenApiV3Spec;

fn strip_unknown_verbs(val: &mut serde_json::Value) {
    const METHODS: [&str; 8] = ["get", "post", "put", "delete", "patch", "options", "head", "trace"];

    let Some(serde_json::Value::Object(paths_map)) = val.get_mut("paths") else {
        return;
    };
    for item in paths_map.values_mut() {
        if let serde_json::Value::Object(obj) = item {
            obj.retain(|k, _| {
                let lk = k.to_ascii_lowercase();
                match lk.as_str() {
                    "summary" | "description" | "servers" | "parameters" | "$ref" => true,
                    m if METHODS.contains(&m) => true,
                    _ => k.starts_with("x-"),
                }
            });
        }
    }
}

fn slug_of(spec: &OpenApiV3Spec) -> String {
    spec.info
        .title
        .to_lowercase()
        .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
        .trim_matches('_')
        .to_string()
}

/// Parse an OpenAPI document held in memory.
///
/// `yaml` selects the YAML parser; JSON is parsed otherwise.
pub fn load_spec_from_str(
    content: &str,
    yaml: bool,
) -> anyhow::Result<(Vec<RouteMeta>, String)> {
    let mut value: serde_json::Value = if yaml {
        serde_yaml::from_str(content).context("parsing OpenAPI YAML")?
    } else {
        serde_json::from_str(content).context("parsing OpenAPI JSON")?
    };

    strip_unknown_verbs(&mut value);
    let spec: OpenApiV3Spec =
        serde_json::from_value(value).context("OpenAPI document does not match 3.x schema")?;

    let slug = slug_of(&spec);
    let routes = build_routes(&spec)?;
    Ok((routes, slug))
}

/// Load route metadata and the title slug from a `.yaml`, `.yml` or `.json` file
pub fn load_spec(file_path: &str) -> anyhow::Result<(Vec<RouteMeta>, String)> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("reading OpenAPI document {file_path}"))?;
    let yaml = file_path.ends_with(".yaml") || file_path.ends_with(".yml");
    load_spec_from_str(&content, yaml)
}
