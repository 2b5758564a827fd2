//! OpenAPI loading: turns the document into [`RouteMeta`] for the router
//! and dispatcher.

mod build;
mod load;
mod types;

pub use build::*;
pub use load::*;
pub use types::*;
