// Layered settings: built-in defaults, then an optional TOML file, then
// LOBAGG_* environment variables (a .env file is loaded by main beforehand).

use std::time::Duration;

use anyhow::{ensure, Context};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "lobagg";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Quantity priced when --qty is not given
    pub default_qty: f64,
    pub base_asset: String,
    /// Minimum spacing between upstream calls per venue
    pub min_interval_ms: u64,
    pub http_timeout_ms: u64,
    pub single_flight: bool,
    pub user_agent: String,
    pub coinbase_url: String,
    pub gemini_url: String,
    pub log_filter: String,
    pub metrics_port: u16,
}

impl Settings {
    /// `path` must exist when given; otherwise `lobagg.toml` is used if present.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let file = match path {
            Some(p) => File::with_name(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Self::build(defaults()?.add_source(file))
    }

    pub fn from_toml(toml: &str) -> anyhow::Result<Self> {
        Self::build(defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> anyhow::Result<Self> {
        let settings: Settings = builder
            .add_source(Environment::with_prefix("LOBAGG").try_parsing(true))
            .build()
            .context("reading configuration")?
            .try_deserialize()
            .context("decoding configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.default_qty.is_finite() && self.default_qty > 0.0,
            "default_qty must be positive, got {}",
            self.default_qty
        );
        ensure!(self.http_timeout_ms > 0, "http_timeout_ms must be positive");
        Ok(())
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

fn defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(Config::builder()
        .set_default("default_qty", 10.0)?
        .set_default("base_asset", "BTC")?
        .set_default("min_interval_ms", 2_000_i64)?
        .set_default("http_timeout_ms", 5_000_i64)?
        .set_default("single_flight", false)?
        .set_default("user_agent", concat!("lobagg-rs/", env!("CARGO_PKG_VERSION")))?
        .set_default("coinbase_url", "https://api.exchange.coinbase.com/products/BTC-USD/book?level=2")?
        .set_default("gemini_url", "https://api.gemini.com/v1/book/BTCUSD")?
        .set_default("log_filter", "info")?
        .set_default("metrics_port", 9_000_i64)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.default_qty, 10.0);
        assert_eq!(settings.min_interval(), Duration::from_secs(2));
        assert_eq!(settings.http_timeout(), Duration::from_secs(5));
        assert!(!settings.single_flight);
        assert_eq!(settings.base_asset, "BTC");
        assert!(settings.gemini_url.ends_with("/v1/book/BTCUSD"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let settings = Settings::from_toml(
            r#"
            default_qty = 0.5
            min_interval_ms = 250
            single_flight = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.default_qty, 0.5);
        assert_eq!(settings.min_interval(), Duration::from_millis(250));
        assert!(settings.single_flight);
    }

    #[test]
    fn test_rejects_non_positive_qty() {
        assert!(Settings::from_toml("default_qty = 0").is_err());
        assert!(Settings::from_toml("default_qty = -1.5").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Settings::load(Some("/definitely/not/here/lobagg.toml")).is_err());
    }
}
