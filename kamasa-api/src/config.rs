use serde::Deserialize;
use std::collections::HashMap;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    /// Lifetime of a cached tier-adjusted price.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: i64,
    /// Tier name (case-insensitive) to percentage; replaces the standard
    /// retail/wholesale/distributor table when non-empty.
    #[serde(default)]
    pub tier_discounts: HashMap<String, f64>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: default_cache_ttl(),
            tier_discounts: HashMap::new(),
        }
    }
}

fn default_cache_ttl() -> i64 {
    kamasa_pricing::DEFAULT_PRICE_TTL_SECS
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific overrides, optional.
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in.
            .add_source(config::File::with_name("config/local").required(false))
            // APP_SERVER__PORT=9000 style environment overrides.
            .add_source(config::Environment::with_prefix("app").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
