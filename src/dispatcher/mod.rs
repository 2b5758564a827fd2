//! # Dispatcher Module
//!
//! Coroutine-based handler dispatch. Every handler named in the OpenAPI
//! document runs in its own `may` coroutine and receives matched requests
//! over an MPSC channel; answers come back on a per-request reply channel.
//!
//! ## Registration
//!
//! ```rust,ignore
//! use faker_api::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
//!
//! let mut dispatcher = Dispatcher::new();
//! unsafe {
//!     dispatcher.register_handler("list_locales", |req: HandlerRequest| {
//!         req.respond(HandlerResponse::json(200, serde_json::json!(["en"])));
//!     });
//! }
//! ```
//!
//! ## Failure handling
//!
//! - A handler panic is caught and answered with a 500
//! - A handler that never answers yields a 503
//! - An unknown handler name makes [`Dispatcher::dispatch`] return `None`
//!
//! Stack size for handler coroutines comes from `FAKER_API_STACK_SIZE`
//! (see [`crate::runtime_config`]).

mod core;

pub use core::{
    Dispatcher, HandlerRequest, HandlerResponse, HandlerSender, HeaderVec, MAX_INLINE_HEADERS,
};
