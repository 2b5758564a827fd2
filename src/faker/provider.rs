//! Typed capability registry backing a locale [`Provider`].
//!
//! A provider is a tree of named [`Capability`] entries. Interior nodes are
//! [`Namespace`]s, leaves are either constant values or zero-argument
//! generators. Generators receive the random source explicitly so a provider
//! carries no mutable state and can be shared across coroutines.

use indexmap::IndexMap;
use rand::RngCore;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::devalue;

/// Value produced by a capability.
///
/// 64-bit integers are kept apart from JSON numbers because JSON consumers
/// lose precision past 2^53.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    /// Any JSON-native value
    Json(Value),
    /// A 64-bit integer (signed or unsigned), encoded losslessly on output
    BigInt(i128),
}

impl Generated {
    /// Convenience constructor for string results
    pub fn text(s: impl Into<String>) -> Self {
        Generated::Json(Value::String(s.into()))
    }

    /// Convert to the wire representation.
    ///
    /// `BigInt` becomes its devalue string (`[["BigInt","<digits>"]]`).
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Generated::Json(v) => v,
            Generated::BigInt(i) => Value::String(devalue::stringify_bigint(i)),
        }
    }

    /// Render as plain text for inline pattern substitution.
    #[must_use]
    pub fn render_text(&self) -> String {
        match self {
            Generated::Json(Value::String(s)) => s.clone(),
            Generated::Json(other) => other.to_string(),
            Generated::BigInt(i) => i.to_string(),
        }
    }
}

impl From<Value> for Generated {
    fn from(v: Value) -> Self {
        Generated::Json(v)
    }
}

/// Failure raised by a generator invoked without the inputs it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    /// The generator cannot run without caller-supplied arguments
    RequiresArguments,
}

impl GenerationFailure {
    /// Human-readable stand-in substituted for the failed capability `name`
    #[must_use]
    pub fn placeholder(&self, name: &str) -> String {
        match self {
            GenerationFailure::RequiresArguments => {
                format!("Function \"{name}\" requires arguments")
            }
        }
    }
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationFailure::RequiresArguments => {
                write!(f, "generator requires arguments that were not supplied")
            }
        }
    }
}

impl std::error::Error for GenerationFailure {}

type GeneratorFn = dyn Fn(&mut dyn RngCore) -> Result<Generated, GenerationFailure> + Send + Sync;

/// Zero-argument value producer
#[derive(Clone)]
pub struct Generator(Arc<GeneratorFn>);

impl Generator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> Result<Generated, GenerationFailure> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// A generator that always fails because it needs arguments
    #[must_use]
    pub fn requiring_arguments() -> Self {
        Self::new(|_| Err(GenerationFailure::RequiresArguments))
    }

    /// Run the generator against the given random source
    pub fn invoke(&self, rng: &mut dyn RngCore) -> Result<Generated, GenerationFailure> {
        (self.0)(rng)
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Generator(..)")
    }
}

/// Terminal capability
#[derive(Debug, Clone)]
pub enum Leaf {
    Value(Generated),
    Generator(Generator),
}

impl Leaf {
    /// Produce the leaf's value; constants never fail
    pub fn invoke(&self, rng: &mut dyn RngCore) -> Result<Generated, GenerationFailure> {
        match self {
            Leaf::Value(v) => Ok(v.clone()),
            Leaf::Generator(g) => g.invoke(rng),
        }
    }
}

/// A named entry in a namespace
#[derive(Debug, Clone)]
pub enum Capability {
    Namespace(Namespace),
    Leaf(Leaf),
}

impl Capability {
    pub fn generator<F>(f: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> Result<Generated, GenerationFailure> + Send + Sync + 'static,
    {
        Capability::Leaf(Leaf::Generator(Generator::new(f)))
    }

    pub fn constant(v: impl Into<Generated>) -> Self {
        Capability::Leaf(Leaf::Value(v.into()))
    }
}

/// Ordered mapping from capability names to capabilities
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    entries: IndexMap<String, Capability>,
}

impl Namespace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning `self` for chaining
    pub fn with(mut self, name: &str, capability: Capability) -> Self {
        self.insert(name, capability);
        self
    }

    pub fn insert(&mut self, name: &str, capability: Capability) {
        self.entries.insert(name.to_string(), capability);
    }

    /// Add a nested namespace built by `build`
    pub fn namespace(mut self, name: &str, build: impl FnOnce(Namespace) -> Namespace) -> Self {
        let child = build(Namespace::new());
        self.entries
            .insert(name.to_string(), Capability::Namespace(child));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Capability)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of walking a dotted path through a provider
#[derive(Debug)]
pub enum Lookup<'a> {
    /// Some segment did not exist, or the path continued past a leaf
    Missing,
    /// The path named a namespace rather than a value
    Namespace(&'a Namespace),
    /// The path named a leaf; `name` is the final segment
    Leaf { name: &'a str, leaf: &'a Leaf },
}

/// Immutable per-locale capability registry
#[derive(Debug, Clone)]
pub struct Provider {
    locale: String,
    root: Namespace,
}

impl Provider {
    pub fn new(locale: impl Into<String>, root: Namespace) -> Self {
        Self {
            locale: locale.into(),
            root,
        }
    }

    /// Locale label this provider was built for
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn root(&self) -> &Namespace {
        &self.root
    }

    /// Walk `path` segment by segment, case-sensitively.
    #[must_use]
    pub fn lookup<'a>(&'a self, path: &'a str) -> Lookup<'a> {
        let mut current = &self.root;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            match current.get(segment) {
                None => return Lookup::Missing,
                Some(Capability::Namespace(ns)) => {
                    if segments.peek().is_none() {
                        return Lookup::Namespace(ns);
                    }
                    current = ns;
                }
                Some(Capability::Leaf(leaf)) => {
                    if segments.peek().is_some() {
                        return Lookup::Missing;
                    }
                    return Lookup::Leaf {
                        name: segment,
                        leaf,
                    };
                }
            }
        }
        Lookup::Missing
    }
}
