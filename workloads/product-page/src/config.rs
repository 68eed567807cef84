//! Storefront configuration.

use std::time::Duration;

use edge_sdk::edge_core::WorkloadError;
use edge_sdk::edge_observability::LogFormat;
use turbo_commerce::{Currency, Locale};

/// Default revalidation window for generated product pages.
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(60 * 60);

/// Configuration for the product page workload.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Storefront name, used as the title suffix.
    pub store_name: String,
    /// Secret key for the payment provider API.
    pub stripe_secret_key: String,
    /// Payment provider API origin.
    pub stripe_api_base: String,
    /// How long a generated page stays fresh.
    pub revalidate: Duration,
    /// Display currency.
    pub currency: Currency,
    /// Display locale.
    pub locale: Locale,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            store_name: "Ignite Shop".to_string(),
            stripe_secret_key: String::new(),
            stripe_api_base: "https://api.stripe.com".to_string(),
            revalidate: DEFAULT_REVALIDATE,
            currency: Currency::BRL,
            locale: Locale::PtBr,
            log_format: LogFormat::Json,
        }
    }
}

impl StorefrontConfig {
    /// Create a configuration with the given provider secret key.
    pub fn new(stripe_secret_key: impl Into<String>) -> Self {
        Self {
            stripe_secret_key: stripe_secret_key.into(),
            ..Default::default()
        }
    }

    /// Set the storefront name.
    pub fn with_store_name(mut self, name: impl Into<String>) -> Self {
        self.store_name = name.into();
        self
    }

    /// Set the provider API origin.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.stripe_api_base = base.into();
        self
    }

    /// Set the revalidation window.
    pub fn with_revalidate(mut self, revalidate: Duration) -> Self {
        self.revalidate = revalidate;
        self
    }

    /// Set display currency and locale.
    pub fn with_money_format(mut self, currency: Currency, locale: Locale) -> Self {
        self.currency = currency;
        self.locale = locale;
        self
    }

    /// Set the log output format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Load from named variables. `lookup` returns `None` for unset ones.
    ///
    /// Only `stripe_secret_key` is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WorkloadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let secret = get("stripe_secret_key")
            .ok_or_else(|| WorkloadError::ConfigError("stripe_secret_key is not set".to_string()))?;
        let mut config = Self::new(secret);

        if let Some(name) = get("store_name") {
            config.store_name = name;
        }
        if let Some(base) = get("stripe_api_base") {
            config.stripe_api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(secs) = get("revalidate_secs") {
            let secs: u64 = secs.parse().map_err(|_| {
                WorkloadError::ConfigError(format!("revalidate_secs is not a number: {}", secs))
            })?;
            config.revalidate = Duration::from_secs(secs);
        }
        if let Some(code) = get("currency") {
            config.currency =
                Currency::from_code(&code).map_err(|e| WorkloadError::ConfigError(e.to_string()))?;
        }
        if let Some(tag) = get("locale") {
            config.locale =
                Locale::parse(&tag).map_err(|e| WorkloadError::ConfigError(e.to_string()))?;
        }
        if let Some(format) = get("log_format") {
            config.log_format = LogFormat::parse(&format).ok_or_else(|| {
                WorkloadError::ConfigError(format!("unknown log_format: {}", format))
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[("stripe_secret_key", "sk_test")])).unwrap();
        assert_eq!(config.store_name, "Ignite Shop");
        assert_eq!(config.stripe_api_base, "https://api.stripe.com");
        assert_eq!(config.revalidate, Duration::from_secs(3600));
        assert_eq!(config.currency, Currency::BRL);
        assert_eq!(config.locale, Locale::PtBr);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_secret_key_required() {
        let err = StorefrontConfig::from_lookup(lookup(&[("stripe_secret_key", "  ")])).unwrap_err();
        assert!(matches!(err, WorkloadError::ConfigError(_)));
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("stripe_secret_key", "sk_test"),
            ("store_name", "Loja"),
            ("stripe_api_base", "http://localhost:12111/"),
            ("revalidate_secs", "60"),
            ("currency", "usd"),
            ("locale", "en-US"),
            ("log_format", "human"),
        ]))
        .unwrap();

        assert_eq!(config.store_name, "Loja");
        assert_eq!(config.stripe_api_base, "http://localhost:12111");
        assert_eq!(config.revalidate, Duration::from_secs(60));
        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.locale, Locale::EnUs);
        assert_eq!(config.log_format, LogFormat::Human);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for (name, value) in [
            ("revalidate_secs", "soon"),
            ("currency", "XYZ"),
            ("locale", "fr-FR"),
            ("log_format", "xml"),
        ] {
            let result = StorefrontConfig::from_lookup(lookup(&[
                ("stripe_secret_key", "sk_test"),
                (name, value),
            ]));
            assert!(result.is_err(), "{} = {} should be rejected", name, value);
        }
    }
}
