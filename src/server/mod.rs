//! HTTP layer on top of `may_minihttp`.
//!
//! [`AppService`] parses each request, answers the built-in endpoints and
//! hands everything else to the router and dispatcher. [`HttpServer`] binds
//! it to an address and returns a [`ServerHandle`].

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_query_params, parse_request, split_path_query, ParsedRequest};
pub use service::{health_endpoint, AppService};
