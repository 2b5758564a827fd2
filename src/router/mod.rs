//! # Router Module
//!
//! Matches `(method, path)` to the [`RouteMeta`](crate::spec::RouteMeta)
//! loaded from the OpenAPI document and extracts path parameters.
//!
//! Routes are compiled once into a radix tree at startup; each lookup walks
//! the request path segment by segment, trying static segments before
//! `{param}` segments. Parameter values are percent-decoded, so
//! `/fake/en/%7B%7Bperson.firstName%7D%7D` yields
//! `pattern = "{{person.firstName}}"`.

mod core;
mod radix;

pub use core::{ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
