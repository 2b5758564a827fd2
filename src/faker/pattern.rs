//! `{{ path }}` substitution for the `/fake` endpoint.

use once_cell::sync::Lazy;
use rand::RngCore;
use regex::{Captures, Regex};

use super::provider::Provider;
use super::resolve::resolve_generated;

/// Mustache-style placeholder, whitespace allowed around the path
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("placeholder regex should be valid")
});

/// Substitute every `{{ path }}` in `pattern` using the thread-local random source
pub fn fake_pattern(provider: &Provider, pattern: &str) -> String {
    fake_pattern_with_rng(provider, pattern, &mut rand::thread_rng())
}

/// Substitute every `{{ path }}` in `pattern`.
///
/// Strings are inserted verbatim, other JSON values as compact JSON and
/// 64-bit integers as plain digits. Unknown paths render as the path text;
/// an unterminated `{{` is left alone.
pub fn fake_pattern_with_rng(provider: &Provider, pattern: &str, rng: &mut dyn RngCore) -> String {
    PLACEHOLDER
        .replace_all(pattern, |caps: &Captures<'_>| {
            resolve_generated(provider, &caps[1], rng).render_text()
        })
        .into_owned()
}
