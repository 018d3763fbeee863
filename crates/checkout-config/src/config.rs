//! # Pricing Configuration
//!
//! Loads the price list, offer table and engine settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CHECKOUT_STRATEGY=optimal                                          │
//! │     CHECKOUT_GROUPING=per_line                                         │
//! │                                                                         │
//! │  2. Config File (.toml or .json)                                       │
//! │     explicit path, else $CHECKOUT_CONFIG, else                         │
//! │     ~/.config/checkout/pricing.toml (Linux)                            │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     greedy, aggregate_by_sku, no prices, no offers                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [engine]
//! strategy = "greedy"
//! grouping = "aggregate_by_sku"
//!
//! [prices]
//! A = 5000
//!
//! [[offers]]
//! sku = "A"
//! threshold_quantity = 3
//! bundle_price = 13000
//! ```
//!
//! Amounts are integer cents.

use std::path::{Path, PathBuf};

use checkout_core::{
    LineGrouping, Money, OfferTable, OfferTier, PriceList, PricingEngine, StrategyKind,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// Env var naming the config file when no path is passed explicitly.
pub const CONFIG_PATH_ENV: &str = "CHECKOUT_CONFIG";
pub const STRATEGY_ENV: &str = "CHECKOUT_STRATEGY";
pub const GROUPING_ENV: &str = "CHECKOUT_GROUPING";

// =============================================================================
// Sections
// =============================================================================

/// `[engine]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub strategy: StrategyKind,

    #[serde(default)]
    pub grouping: LineGrouping,
}

/// One `[[offers]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferEntry {
    pub sku: String,
    pub threshold_quantity: i64,
    pub bundle_price: Money,
}

// =============================================================================
// Pricing Config
// =============================================================================

/// Complete pricing configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub engine: EngineSettings,

    /// Unit prices, validated while parsing.
    #[serde(default)]
    pub prices: PriceList,

    /// Offer tiers. Validated by [`validate`](Self::validate) and when
    /// building the offer table.
    #[serde(default)]
    pub offers: Vec<OfferEntry>,
}

impl PricingConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file, if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading pricing config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        info!(
            prices = config.prices.len(),
            offers = config.offers.len(),
            strategy = %config.engine.strategy,
            grouping = %config.engine.grouping,
            "Pricing config loaded"
        );

        Ok(config)
    }

    /// Parses a `.toml` or `.json` file, chosen by extension.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(io_err)?;

        info!(?path, "Pricing config saved");
        Ok(())
    }

    /// Checks that every offer entry forms a valid offer table.
    ///
    /// Offers for SKUs without a price are allowed (the cart line may carry
    /// its own price) but logged.
    pub fn validate(&self) -> ConfigResult<()> {
        self.offer_table()?;

        for entry in &self.offers {
            if !self.prices.contains(&entry.sku) {
                warn!(sku = %entry.sku, "Offer configured for SKU with no price");
            }
        }

        Ok(())
    }

    /// Applies `CHECKOUT_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are
    /// logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(STRATEGY_ENV) {
            match value.parse::<StrategyKind>() {
                Ok(strategy) => {
                    debug!(strategy = %value, "Overriding strategy from environment");
                    self.engine.strategy = strategy;
                }
                Err(e) => warn!(value = %value, error = %e, "Ignoring strategy override"),
            }
        }

        if let Some(value) = lookup(GROUPING_ENV) {
            match value.parse::<LineGrouping>() {
                Ok(grouping) => {
                    debug!(grouping = %value, "Overriding grouping from environment");
                    self.engine.grouping = grouping;
                }
                Err(e) => warn!(value = %value, error = %e, "Ignoring grouping override"),
            }
        }
    }

    /// Builds the validated offer table from the `[[offers]]` entries.
    pub fn offer_table(&self) -> ConfigResult<OfferTable> {
        let mut table = OfferTable::new();
        for entry in &self.offers {
            table.insert(
                entry.sku.clone(),
                OfferTier::new(entry.threshold_quantity, entry.bundle_price),
            )?;
        }
        Ok(table)
    }

    /// Builds an engine with the configured strategy and grouping.
    pub fn build_engine(&self) -> ConfigResult<PricingEngine> {
        Ok(PricingEngine::new(self.offer_table()?)
            .with_strategy_kind(self.engine.strategy)
            .with_grouping(self.engine.grouping))
    }

    pub fn price_list(&self) -> &PriceList {
        &self.prices
    }

    /// Platform config path, e.g. `~/.config/checkout/pricing.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "checkout", "checkout")
            .map(|dirs| dirs.config_dir().join("pricing.toml"))
    }
}
