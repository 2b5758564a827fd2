//! Dotted-path resolution against a [`Provider`].

use rand::RngCore;
use serde_json::Value;
use tracing::trace;

use super::provider::{Generated, Lookup, Provider};

/// Resolve `path` using the thread-local random source.
///
/// See [`resolve_path_with_rng`].
pub fn resolve_path(provider: &Provider, path: &str) -> Value {
    resolve_path_with_rng(provider, path, &mut rand::thread_rng())
}

/// Resolve `path` to its wire value.
///
/// Unknown paths, paths naming a namespace, and paths running past a leaf
/// come back unchanged as strings. A generator failure becomes a
/// placeholder naming the last path segment. Never fails.
pub fn resolve_path_with_rng(provider: &Provider, path: &str, rng: &mut dyn RngCore) -> Value {
    resolve_generated(provider, path, rng).into_json()
}

/// Like [`resolve_path_with_rng`] but keeps 64-bit integers tagged.
pub fn resolve_generated(provider: &Provider, path: &str, rng: &mut dyn RngCore) -> Generated {
    match provider.lookup(path) {
        Lookup::Missing | Lookup::Namespace(_) => {
            trace!(path, "Path passthrough");
            Generated::text(path)
        }
        Lookup::Leaf { name, leaf } => match leaf.invoke(rng) {
            Ok(value) => value,
            Err(failure) => {
                trace!(path, error = %failure, "Generator failed");
                Generated::text(failure.placeholder(name))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faker::provider::{Capability, GenerationFailure, Namespace};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn provider() -> Provider {
        let root = Namespace::new()
            .namespace("person", |ns| {
                ns.with("firstName", Capability::generator(|_| Ok(Generated::text("Alice"))))
            })
            .namespace("date", |ns| {
                ns.with(
                    "between",
                    Capability::generator(|_| Err(GenerationFailure::RequiresArguments)),
                )
            })
            .namespace("number", |ns| {
                ns.with(
                    "bigInt",
                    Capability::generator(|_| Ok(Generated::BigInt(9_007_199_254_740_993))),
                )
            })
            .with("version", Capability::constant(json!("1.0")));
        Provider::new("en", root)
    }

    #[test]
    fn test_passthrough() {
        let p = provider();
        let mut rng = StdRng::seed_from_u64(0);
        for path in ["nope", "person.nope", "person", "version.major", "", "a..b"] {
            assert_eq!(resolve_path_with_rng(&p, path, &mut rng), json!(path));
        }
    }

    #[test]
    fn test_generator_and_constant() {
        let p = provider();
        assert_eq!(resolve_path(&p, "person.firstName"), json!("Alice"));
        assert_eq!(resolve_path(&p, "version"), json!("1.0"));
    }

    #[test]
    fn test_placeholder_names_capability() {
        let p = provider();
        let value = resolve_path(&p, "date.between");
        assert_eq!(value, json!("Function \"between\" requires arguments"));
    }

    #[test]
    fn test_bigint_is_devalue_encoded() {
        let p = provider();
        assert_eq!(
            resolve_path(&p, "number.bigInt"),
            json!("[[\"BigInt\",\"9007199254740993\"]]")
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            resolve_generated(&p, "number.bigInt", &mut rng),
            Generated::BigInt(9_007_199_254_740_993)
        );
    }
}
