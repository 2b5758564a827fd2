//! # CLI
//!
//! `faker-api` subcommands:
//!
//! - `serve [--spec doc/openapi.yaml] [--doc-dir doc] [--addr 0.0.0.0:3000]`
//!   runs the HTTP service until SIGINT/SIGTERM
//! - `routes [--spec ..]` prints the routing table
//! - `locales` prints the supported locales
//! - `resolve <locale> <path>` prints one resolved value
//! - `template <locale> <count> [query]` prints filled templates
//!
//! ```bash
//! faker-api template fr 2 'name=person.fullName&address[city]=location.city'
//! ```

mod commands;


pub use commands::{run_cli, run_command, Cli, Commands};
