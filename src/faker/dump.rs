//! Whole-provider dump.

use rand::RngCore;
use serde_json::{Map, Value};

use super::provider::{Capability, Namespace, Provider};

/// Capability names never included in a dump
pub const EXCLUDED_KEYS: &[&str] = &[
    "faker",
    "rawDefinitions",
    "definitions",
    "_randomizer",
    "_defaultRefDate",
];

/// Dump every capability of `provider` with fresh values
pub fn dump_provider(provider: &Provider) -> Value {
    dump_provider_with_rng(provider, &mut rand::thread_rng())
}

/// Walk the whole tree, invoking each generator once.
///
/// Failures become the same placeholder the path resolver uses, 64-bit
/// integers are devalue-encoded, and names in [`EXCLUDED_KEYS`] are skipped
/// at every level.
pub fn dump_provider_with_rng(provider: &Provider, rng: &mut dyn RngCore) -> Value {
    dump_namespace(provider.root(), rng)
}

fn dump_namespace(ns: &Namespace, rng: &mut dyn RngCore) -> Value {
    let mut out = Map::with_capacity(ns.len());
    for (name, capability) in ns.iter() {
        if EXCLUDED_KEYS.contains(&name) {
            continue;
        }
        let value = match capability {
            Capability::Namespace(child) => dump_namespace(child, rng),
            Capability::Leaf(leaf) => match leaf.invoke(rng) {
                Ok(generated) => generated.into_json(),
                Err(failure) => Value::String(failure.placeholder(name)),
            },
        };
        out.insert(name.to_string(), value);
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faker::provider::{Generated, GenerationFailure};
    use serde_json::json;

    fn contains_key(value: &Value, key: &str) -> bool {
        match value {
            Value::Object(map) => map.contains_key(key) || map.values().any(|v| contains_key(v, key)),
            Value::Array(items) => items.iter().any(|v| contains_key(v, key)),
            _ => false,
        }
    }

    #[test]
    fn test_dump_invokes_generators_and_skips_excluded() {
        let root = Namespace::new()
            .namespace("person", |ns| {
                ns.with("firstName", Capability::generator(|_| Ok(Generated::text("Alice"))))
                    .with("faker", Capability::constant(json!("self")))
            })
            .namespace("definitions", |ns| ns.with("x", Capability::constant(json!(1))))
            .namespace("date", |ns| {
                ns.with(
                    "between",
                    Capability::generator(|_| Err(GenerationFailure::RequiresArguments)),
                )
            })
            .with("big", Capability::generator(|_| Ok(Generated::BigInt(1 << 60))))
            .with("pi", Capability::constant(json!(2.5)));
        let provider = Provider::new("en", root);

        let dump = dump_provider(&provider);
        assert_eq!(dump["person"]["firstName"], json!("Alice"));
        assert!(!contains_key(&dump, "faker"));
        assert!(!contains_key(&dump, "definitions"));
        assert_eq!(dump["date"]["between"], json!("Function \"between\" requires arguments"));
        assert_eq!(dump["big"], json!("[[\"BigInt\",\"1152921504606846976\"]]"));
        assert_eq!(dump["pi"], json!(2.5));
    }
}
