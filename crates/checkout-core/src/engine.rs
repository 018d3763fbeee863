//! # Pricing Engine
//!
//! Turns a cart and an offer table into a total.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Option<&Cart> ──► normalize ──► Vec<PriceGroup> ──► strategy.apply ──┐ │
//! │   (None = empty)   │  validate lines                  per group       │ │
//! │                    │  merge same SKU + price                          │ │
//! │                    │  (LineGrouping)                                  │ │
//! │                    ▼                                                  ▼ │
//! │               CoreError                                    Receipt {    │
//! │               (fails before                                  lines,     │
//! │                any pricing)                                  subtotal,  │
//! │                                                              total }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine holds no mutable state. Each call builds its receipt from
//! scratch, so pricing the same cart twice always gives the same receipt.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::offers::OfferTable;
use crate::strategy::{GreedyLargestFirst, OfferApplication, OfferStrategy, StrategyKind};
use crate::types::Cart;
use crate::validation::{validate_line_quantity, validate_line_sku, validate_price};

// =============================================================================
// Line Grouping
// =============================================================================

/// How cart lines that share a SKU are priced.
///
/// ```text
/// Cart: [A × 2, A × 1], offer 3 for 130, unit 50
///
/// AggregateBySku: A × 3        ──► 130
/// PerLine:        A × 2, A × 1 ──► 100 + 50 = 150
/// ```
///
/// Aggregation merges lines that agree on both SKU and unit price. Lines
/// for the same SKU at different prices stay separate groups, each
/// checked against the SKU's offers on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineGrouping {
    /// Merge quantities per (SKU, unit price) before applying offers.
    #[default]
    AggregateBySku,
    /// Price every line on its own.
    PerLine,
}

impl fmt::Display for LineGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineGrouping::AggregateBySku => write!(f, "aggregate_by_sku"),
            LineGrouping::PerLine => write!(f, "per_line"),
        }
    }
}

impl FromStr for LineGrouping {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aggregate_by_sku" | "aggregate" | "by_sku" => Ok(LineGrouping::AggregateBySku),
            "per_line" | "line" => Ok(LineGrouping::PerLine),
            other => Err(ValidationError::InvalidFormat {
                field: "grouping".to_string(),
                reason: format!(
                    "unknown grouping '{}', expected aggregate_by_sku or per_line",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// One priced group after offers: a SKU at one unit price (or a single
/// line, with `PerLine`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricedLine {
    pub sku: String,
    pub quantity: i64,
    pub unit_price: Money,

    /// Unit price × quantity.
    pub linear_total: Money,

    /// Tiers applied, largest threshold first.
    pub applications: Vec<OfferApplication>,

    /// Units charged at the unit price after offers.
    pub remainder: i64,

    /// What the customer pays for this group.
    pub line_total: Money,
}

impl PricedLine {
    /// Linear total minus line total. Negative if a non-discounting tier
    /// was applied.
    pub fn savings(&self) -> Money {
        self.linear_total - self.line_total
    }
}

/// The immutable result of pricing one cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    /// Priced groups in order of first appearance in the cart.
    pub lines: Vec<PricedLine>,

    /// Sum of linear totals, before offers.
    pub subtotal: Money,

    /// Sum of line totals.
    pub total: Money,

    /// Name of the strategy that produced this receipt.
    pub strategy: String,
}

impl Receipt {
    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    /// Total saved by offers across the cart.
    pub fn savings(&self) -> Money {
        self.subtotal - self.total
    }

    /// First priced group for `sku`, if present. A SKU has several groups
    /// with `PerLine`, or when its lines carry different unit prices.
    pub fn line(&self, sku: &str) -> Option<&PricedLine> {
        self.lines.iter().find(|l| l.sku == sku)
    }
}

// =============================================================================
// Pricing Engine
// =============================================================================

/// Prices carts against one offer table.
///
/// ## Example
/// ```rust
/// use checkout_core::{Cart, LineGrouping, Money, OfferTable, OptimalBundles, PricingEngine};
///
/// let offers = OfferTable::new().with_tier("A", 3, Money::from_major(130))?;
/// let engine = PricingEngine::new(offers)
///     .with_strategy(OptimalBundles)
///     .with_grouping(LineGrouping::AggregateBySku);
///
/// let cart = Cart::new()
///     .with_item("A", Money::from_major(50), 2)
///     .with_item("A", Money::from_major(50), 1);
///
/// let receipt = engine.price(Some(&cart))?;
/// assert_eq!(receipt.total, Money::from_major(130));
/// assert_eq!(receipt.savings(), Money::from_major(20));
/// # Ok::<(), checkout_core::CoreError>(())
/// ```
#[derive(Debug)]
pub struct PricingEngine {
    offers: OfferTable,
    strategy: Box<dyn OfferStrategy>,
    grouping: LineGrouping,
}

impl PricingEngine {
    /// Engine with the greedy strategy and per-SKU aggregation.
    pub fn new(offers: OfferTable) -> Self {
        PricingEngine {
            offers,
            strategy: Box::new(GreedyLargestFirst),
            grouping: LineGrouping::default(),
        }
    }

    /// Engine for an optional offer table; `None` means no offers at all.
    pub fn from_optional(offers: Option<OfferTable>) -> Self {
        PricingEngine::new(offers.unwrap_or_default())
    }

    pub fn with_strategy(mut self, strategy: impl OfferStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Selects the strategy from its serializable kind.
    pub fn with_strategy_kind(mut self, kind: StrategyKind) -> Self {
        self.strategy = kind.build();
        self
    }

    pub fn with_grouping(mut self, grouping: LineGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn offers(&self) -> &OfferTable {
        &self.offers
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn grouping(&self) -> LineGrouping {
        self.grouping
    }

    /// Prices `cart`. `None` is an empty cart.
    ///
    /// ## Errors
    /// - `CoreError::Validation` before pricing anything, if a line has an
    ///   empty SKU, a negative unit price or a negative quantity
    /// - `CoreError::Overflow` if a quantity or amount does not fit in 64 bits
    pub fn price(&self, cart: Option<&Cart>) -> CoreResult<Receipt> {
        price_with(cart, &self.offers, self.strategy.as_ref(), self.grouping)
    }

    /// Just the total of [`price`](Self::price).
    pub fn total(&self, cart: Option<&Cart>) -> CoreResult<Money> {
        self.price(cart).map(|r| r.total)
    }
}

/// Computes a cart total with the default greedy strategy and per-SKU
/// aggregation.
///
/// Absent inputs are empty: no cart totals zero, no offer table prices
/// every line linearly.
///
/// ```rust
/// use checkout_core::{compute_total, Cart, Money};
///
/// assert_eq!(compute_total(None, None).unwrap(), Money::zero());
///
/// let cart = Cart::new().with_item("C", Money::from_major(20), 2);
/// assert_eq!(compute_total(Some(&cart), None).unwrap(), Money::from_major(40));
/// ```
pub fn compute_total(cart: Option<&Cart>, offers: Option<&OfferTable>) -> CoreResult<Money> {
    let empty = OfferTable::new();
    let offers = offers.unwrap_or(&empty);
    price_with(cart, offers, &GreedyLargestFirst, LineGrouping::default()).map(|r| r.total)
}

// =============================================================================
// Internals
// =============================================================================

/// A normalized unit of pricing: one SKU (or one line) with its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PriceGroup<'a> {
    sku: &'a str,
    unit_price: Money,
    quantity: i64,
}

fn price_with(
    cart: Option<&Cart>,
    offers: &OfferTable,
    strategy: &dyn OfferStrategy,
    grouping: LineGrouping,
) -> CoreResult<Receipt> {
    let groups = match cart {
        Some(cart) => normalize(cart, grouping)?,
        None => Vec::new(),
    };

    let mut lines = Vec::with_capacity(groups.len());
    let mut subtotal = Money::zero();
    let mut total = Money::zero();

    for group in groups {
        let overflow = || CoreError::Overflow {
            sku: group.sku.to_string(),
        };
        let tiers = offers.tiers_for(group.sku);
        let pricing = strategy
            .apply(tiers, group.unit_price, group.quantity)
            .ok_or_else(overflow)?;
        let linear_total = group
            .unit_price
            .checked_multiply_quantity(group.quantity)
            .ok_or_else(overflow)?;

        debug!(
            sku = %group.sku,
            quantity = group.quantity,
            tiers = tiers.len(),
            applications = pricing.applications.len(),
            remainder = pricing.remainder,
            line_total = %pricing.total,
            "Priced line"
        );

        subtotal = subtotal.checked_add(linear_total).ok_or_else(overflow)?;
        total = total.checked_add(pricing.total).ok_or_else(overflow)?;
        lines.push(PricedLine {
            sku: group.sku.to_string(),
            quantity: group.quantity,
            unit_price: group.unit_price,
            linear_total,
            applications: pricing.applications,
            remainder: pricing.remainder,
            line_total: pricing.total,
        });
    }

    debug!(
        lines = lines.len(),
        subtotal = %subtotal,
        total = %total,
        strategy = strategy.name(),
        "Priced cart"
    );

    Ok(Receipt {
        lines,
        subtotal,
        total,
        strategy: strategy.name().to_string(),
    })
}

/// Validates every line and applies the grouping policy.
fn normalize(cart: &Cart, grouping: LineGrouping) -> CoreResult<Vec<PriceGroup<'_>>> {
    for item in cart {
        validate_line_sku(&item.sku)?;
        validate_price("unit_price", item.unit_price)?;
        validate_line_quantity(item.quantity)?;
    }

    let groups = match grouping {
        LineGrouping::PerLine => cart
            .iter()
            .map(|item| PriceGroup {
                sku: &item.sku,
                unit_price: item.unit_price,
                quantity: item.quantity,
            })
            .collect(),
        LineGrouping::AggregateBySku => {
            let mut groups: Vec<PriceGroup<'_>> = Vec::new();
            let mut index: HashMap<(&str, Money), usize> = HashMap::new();

            for item in cart {
                match index.get(&(item.sku.as_str(), item.unit_price)).copied() {
                    Some(i) => {
                        let group = &mut groups[i];
                        group.quantity = group
                            .quantity
                            .checked_add(item.quantity)
                            .ok_or_else(|| CoreError::Overflow {
                                sku: item.sku.clone(),
                            })?;
                    }
                    None => {
                        index.insert((item.sku.as_str(), item.unit_price), groups.len());
                        groups.push(PriceGroup {
                            sku: &item.sku,
                            unit_price: item.unit_price,
                            quantity: item.quantity,
                        });
                    }
                }
            }

            groups
        }
    };

    Ok(groups)
}

// =============================================================================
// Unit Tests
// =============================================================================
