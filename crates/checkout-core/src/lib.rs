//! # checkout-core: Pure Pricing Logic
//!
//! Computes the monetary total of a shopping cart, applying per-SKU bulk
//! offers ("3 for 130", "5 for 200") where buying a threshold quantity
//! unlocks a fixed bundle price.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            checkout-config (files, env, price-cart CLI)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ PriceList, OfferTable, settings       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ checkout-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌──────────┐  ┌─────────────────┐  │   │
//! │  │   │  types  │  │ offers  │  │ strategy │  │     engine      │  │   │
//! │  │   │LineItem │  │OfferTbl │  │  Greedy  │  │ PricingEngine   │  │   │
//! │  │   │  Cart   │  │OfferTier│  │ Optimal  │  │    Receipt      │  │   │
//! │  │   └─────────┘  └─────────┘  └──────────┘  └─────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Line items, carts and offer tiers
//! - [`offers`] - Validated per-SKU offer table
//! - [`strategy`] - How tiers are applied to a quantity
//! - [`engine`] - Cart normalization and total computation
//! - [`catalog`] - Price list and scan-to-cart helpers
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use checkout_core::{compute_total, Cart, LineItem, Money, OfferTable};
//!
//! let offers = OfferTable::new()
//!     .with_tier("A", 3, Money::from_major(130))
//!     .unwrap()
//!     .with_tier("A", 5, Money::from_major(200))
//!     .unwrap();
//!
//! let cart = Cart::from(vec![LineItem::new("A", Money::from_major(50), 8)]);
//!
//! // One 5-unit bundle, then one 3-unit bundle
//! let total = compute_total(Some(&cart), Some(&offers)).unwrap();
//! assert_eq!(total, Money::from_major(330));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod engine;
pub mod error;
pub mod money;
pub mod offers;
pub mod strategy;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::PriceList;
pub use engine::{compute_total, LineGrouping, PricedLine, PricingEngine, Receipt};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use offers::OfferTable;
pub use strategy::{
    GreedyLargestFirst, LinePricing, OfferApplication, OfferStrategy, OptimalBundles,
    StrategyKind,
};
pub use types::*;
