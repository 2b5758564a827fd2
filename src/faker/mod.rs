//! # Faker Module
//!
//! Locale-aware fake data: the capability registry, the per-locale provider
//! cache and every operation the HTTP handlers run against a provider.
//!
//! ## Flow
//!
//! 1. [`LocaleRegistry::resolve`] maps a locale label to a shared [`Provider`]
//! 2. [`resolve_path`] walks one dotted path and invokes the leaf it names
//! 3. [`fill_template`] / [`fill_many`] apply the resolver to every string
//!    leaf of a JSON template
//! 4. [`dump_provider`] invokes the whole tree once
//!
//! 64-bit integers stay tagged as [`Generated::BigInt`] until they reach the
//! wire, where [`devalue`] encodes them as strings.

pub mod catalog;
pub mod devalue;
pub mod dump;
pub mod locale;
pub mod pattern;
pub mod provider;
pub mod query;
pub mod resolve;
pub mod template;

pub use dump::{dump_provider, dump_provider_with_rng, EXCLUDED_KEYS};
pub use locale::{is_supported, supported_locales, LocaleRegistry, DEFAULT_LOCALE};
pub use pattern::{fake_pattern, fake_pattern_with_rng};
pub use provider::{
    Capability, Generated, GenerationFailure, Generator, Leaf, Lookup, Namespace, Provider,
};
pub use query::{parse_nested_query, QueryOptions};
pub use resolve::{resolve_generated, resolve_path, resolve_path_with_rng};
pub use template::{
    depth_placeholder, fill_many, fill_template, fill_template_with_rng, DEFAULT_TEMPLATE_DEPTH,
};
