//! Template filling.
//!
//! A template is a JSON tree whose string leaves are dotted paths. Filling
//! walks it depth-first, pre-order, resolving every string through the path
//! resolver and preserving the shape of objects and arrays.

use rand::RngCore;
use serde_json::{Map, Value};

use super::provider::Provider;
use super::resolve::resolve_path_with_rng;

/// Default nesting limit for templates
pub const DEFAULT_TEMPLATE_DEPTH: usize = 32;

/// Placeholder for a container that sits at or beyond `max_depth`
#[must_use]
pub fn depth_placeholder(max_depth: usize) -> String {
    format!("Template nesting exceeds {max_depth} levels")
}

/// Fill one template using the thread-local random source
pub fn fill_template(provider: &Provider, template: &Value, max_depth: usize) -> Value {
    fill_template_with_rng(provider, template, max_depth, &mut rand::thread_rng())
}

/// Fill one template. Never fails.
///
/// Objects keep their keys in insertion order, arrays are mapped
/// element-wise, strings are resolved, other scalars are copied. Containers
/// nested `max_depth` levels below the root are replaced by
/// [`depth_placeholder`].
pub fn fill_template_with_rng(
    provider: &Provider,
    template: &Value,
    max_depth: usize,
    rng: &mut dyn RngCore,
) -> Value {
    fill_node(provider, template, 0, max_depth, rng)
}

fn fill_node(
    provider: &Provider,
    node: &Value,
    depth: usize,
    max_depth: usize,
    rng: &mut dyn RngCore,
) -> Value {
    match node {
        Value::String(path) => resolve_path_with_rng(provider, path, rng),
        Value::Object(_) | Value::Array(_) if depth >= max_depth => {
            Value::String(depth_placeholder(max_depth))
        }
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, child) in map {
                out.insert(key.clone(), fill_node(provider, child, depth + 1, max_depth, rng));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|child| fill_node(provider, child, depth + 1, max_depth, rng))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// Fill `count` independent copies; every copy re-runs every generator
pub fn fill_many(provider: &Provider, template: &Value, count: usize, max_depth: usize) -> Vec<Value> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| fill_template_with_rng(provider, template, max_depth, &mut rng))
        .collect()
}
