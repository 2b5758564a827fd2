//! # Runtime Configuration
//!
//! Environment-driven settings for the service runtime.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `FAKER_API_STACK_SIZE` | `0x8000` | Handler coroutine stack, decimal or `0x` hex |
//! | `FAKER_API_ADDR` | `0.0.0.0:3000` | Listen address |
//! | `FAKER_API_MAX_COUNT` | `1000` | Largest `count` accepted by `/template` |
//! | `FAKER_API_TEMPLATE_DEPTH` | `32` | Template nesting cap |
//! | `FAKER_API_QUERY_DEPTH` | `5` | Bracket depth parsed from template queries |
//!
//! Unparseable values fall back to the default.
//!
//! ```rust
//! use faker_api::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! assert!(config.stack_size > 0);
//! ```

use std::env;

use crate::faker::DEFAULT_TEMPLATE_DEPTH;

/// Default handler coroutine stack size (32 KB)
pub const DEFAULT_STACK_SIZE: usize = 0x8000;
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_COUNT: usize = 1000;
pub const DEFAULT_QUERY_DEPTH: usize = 5;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for handler coroutines in bytes
    pub stack_size: usize,
    pub addr: String,
    pub max_count: usize,
    pub template_depth: usize,
    pub query_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            addr: DEFAULT_ADDR.to_string(),
            max_count: DEFAULT_MAX_COUNT,
            template_depth: DEFAULT_TEMPLATE_DEPTH,
            query_depth: DEFAULT_QUERY_DEPTH,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            stack_size: lookup("FAKER_API_STACK_SIZE")
                .and_then(|v| parse_size(&v))
                .unwrap_or(defaults.stack_size),
            addr: lookup("FAKER_API_ADDR")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.addr),
            max_count: lookup("FAKER_API_MAX_COUNT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_count),
            template_depth: lookup("FAKER_API_TEMPLATE_DEPTH")
                .and_then(|v| v.trim().parse().ok())
                .filter(|d| *d > 0)
                .unwrap_or(defaults.template_depth),
            query_depth: lookup("FAKER_API_QUERY_DEPTH")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.query_depth),
        }
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
    .filter(|size| *size > 0)
}
