//! Locale resolution with a lazily populated provider cache.

use dashmap::DashMap;
use fake::locales::{AR_SA, EN, FR_FR, JA_JP, PT_BR, ZH_CN, ZH_TW};
use std::sync::Arc;
use tracing::{debug, info};

use super::catalog::build_catalog;
use super::provider::Provider;

/// Locale used when a request names an unsupported one
pub const DEFAULT_LOCALE: &str = "en";

/// Supported locale labels, default first.
///
/// One label per locale module of `fake` 2.9 (`EN`, `FR_FR`, `ZH_CN`,
/// `ZH_TW`, `JA_JP`, `AR_SA`, `PT_BR`); `Cargo.toml` pins that minor version.
const LOCALES: &[&str] = &[DEFAULT_LOCALE, "fr", "zh_CN", "zh_TW", "ja", "ar", "pt_BR"];

/// Every supported locale, the default first, without duplicates
#[must_use]
pub fn supported_locales() -> Vec<String> {
    LOCALES.iter().map(|s| (*s).to_string()).collect()
}

#[must_use]
pub fn is_supported(locale: &str) -> bool {
    LOCALES.contains(&locale)
}

fn build_provider(label: &'static str) -> Provider {
    let root = match label {
        "fr" => build_catalog(FR_FR, label),
        "zh_CN" => build_catalog(ZH_CN, label),
        "zh_TW" => build_catalog(ZH_TW, label),
        "ja" => build_catalog(JA_JP, label),
        "ar" => build_catalog(AR_SA, label),
        "pt_BR" => build_catalog(PT_BR, label),
        _ => build_catalog(EN, label),
    };
    Provider::new(label, root)
}

/// Maps locale identifiers to shared [`Provider`] instances.
///
/// Providers are built on first use and kept for the lifetime of the
/// registry, so repeated lookups of one label return the same `Arc`.
#[derive(Debug, Default)]
pub struct LocaleRegistry {
    providers: DashMap<&'static str, Arc<Provider>>,
}

impl LocaleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the provider served for `locale`.
    ///
    /// Unsupported labels are ignored and `false` is returned.
    pub fn install(&self, locale: &str, provider: Provider) -> bool {
        match LOCALES.iter().copied().find(|l| *l == locale) {
            Some(label) => {
                self.providers.insert(label, Arc::new(provider));
                true
            }
            None => false,
        }
    }

    /// Provider for `locale`, falling back to [`DEFAULT_LOCALE`]
    pub fn resolve(&self, locale: &str) -> Arc<Provider> {
        let label = LOCALES
            .iter()
            .copied()
            .find(|l| *l == locale)
            .unwrap_or(DEFAULT_LOCALE);
        if label != locale {
            debug!(requested = %locale, fallback = DEFAULT_LOCALE, "Unsupported locale, using default");
        }
        let entry = self.providers.entry(label).or_insert_with(|| {
            info!(locale = label, "Building provider");
            Arc::new(build_provider(label))
        });
        Arc::clone(entry.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faker::provider::{Capability, Namespace};
    use serde_json::json;

    #[test]
    fn test_supported_locales_default_first_unique() {
        let locales = supported_locales();
        assert_eq!(locales[0], DEFAULT_LOCALE);
        let mut deduped = locales.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), locales.len());
    }

    #[test]
    fn test_every_supported_locale_resolves_to_itself() {
        let registry = LocaleRegistry::new();
        for locale in supported_locales() {
            assert_eq!(registry.resolve(&locale).locale(), locale);
            assert!(is_supported(&locale));
        }
    }

    #[test]
    fn test_unknown_locale_falls_back_to_default() {
        let registry = LocaleRegistry::new();
        let default = registry.resolve(DEFAULT_LOCALE);
        for locale in ["xx", "", "EN", "vi", "../etc"] {
            assert!(!is_supported(locale));
            assert!(Arc::ptr_eq(&registry.resolve(locale), &default));
        }
    }

    #[test]
    fn test_provider_is_cached() {
        let registry = LocaleRegistry::new();
        assert!(Arc::ptr_eq(&registry.resolve("fr"), &registry.resolve("fr")));
    }

    #[test]
    fn test_install_overrides_supported_only() {
        let registry = LocaleRegistry::new();
        let root = Namespace::new().with("answer", Capability::constant(json!(1)));
        assert!(registry.install("en", Provider::new("en", root.clone())));
        assert!(!registry.install("tlh", Provider::new("tlh", root)));
        let provider = registry.resolve("en");
        assert_eq!(provider.root().len(), 1);
    }
}
