//! # checkout-config: Pricing Configuration
//!
//! Loads prices, offers and engine settings from TOML or JSON files with
//! environment overrides, and hands back ready-to-use
//! [`PricingEngine`](checkout_core::PricingEngine) and
//! [`PriceList`](checkout_core::PriceList) values.
//!
//! ```rust
//! use checkout_config::PricingConfig;
//! use checkout_core::Money;
//!
//! let config = PricingConfig::from_toml_str(r#"
//!     [prices]
//!     A = 5000
//!
//!     [[offers]]
//!     sku = "A"
//!     threshold_quantity = 3
//!     bundle_price = 13000
//! "#)?;
//!
//! let cart = config.price_list().cart_from_skus(["A", "A", "A"])?;
//! let total = config.build_engine()?.total(Some(&cart))?;
//! assert_eq!(total, Money::from_major(130));
//! # Ok::<(), checkout_config::ConfigError>(())
//! ```

pub mod config;
pub mod error;

pub use config::{EngineSettings, OfferEntry, PricingConfig};
pub use error::{ConfigError, ConfigResult};
