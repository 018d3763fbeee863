//! # Domain Types
//!
//! The plain value data the engine consumes.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │      Cart       │   │    LineItem     │   │     OfferTier       │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  items ─────────┼──►│  sku            │   │  threshold_quantity │   │
//! │  │                 │   │  unit_price     │   │  bundle_price       │   │
//! │  │                 │   │  quantity       │   │                     │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All of these are immutable values with no identity beyond their fields.
//! Validation happens when the engine normalizes a cart, or when a tier is
//! added to an [`OfferTable`](crate::offers::OfferTable).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Line Item
// =============================================================================

/// One cart entry: a SKU, its resolved unit price and the quantity bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Stock Keeping Unit.
    pub sku: String,

    /// Price for a single unit.
    pub unit_price: Money,

    /// Units purchased. Zero is allowed and prices to nothing.
    pub quantity: i64,
}

impl LineItem {
    /// Creates a line item.
    pub fn new(sku: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        LineItem {
            sku: sku.into(),
            unit_price,
            quantity,
        }
    }

    /// Undiscounted total (unit price × quantity).
    #[inline]
    pub fn linear_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An ordered sequence of line items.
///
/// SKUs may repeat across entries; see
/// [`LineGrouping`](crate::engine::LineGrouping) for how repeats are priced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    pub items: Vec<LineItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Returns the cart with one more line appended.
    pub fn with_item(mut self, sku: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        self.items.push(LineItem::new(sku, unit_price, quantity));
        self
    }

    /// Number of line items (not units).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines, saturating at `i64::MAX`.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Sum of linear totals, ignoring offers.
    pub fn linear_total(&self) -> Money {
        self.items.iter().map(LineItem::linear_total).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        Cart { items }
    }
}

impl FromIterator<LineItem> for Cart {
    fn from_iter<T: IntoIterator<Item = LineItem>>(iter: T) -> Self {
        Cart {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Offer Tier
// =============================================================================

/// One bulk discount rule: `threshold_quantity` units together cost
/// `bundle_price`.
///
/// The bundle price is expected to undercut linear pricing but this is not
/// enforced; a tier that costs more is still applied when selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OfferTier {
    /// Units that must be taken together to qualify. Always > 0 once the
    /// tier sits in an offer table.
    pub threshold_quantity: i64,

    /// Price charged for exactly `threshold_quantity` units.
    pub bundle_price: Money,
}

impl OfferTier {
    /// Creates a tier. Validation happens when it joins an offer table.
    pub const fn new(threshold_quantity: i64, bundle_price: Money) -> Self {
        OfferTier {
            threshold_quantity,
            bundle_price,
        }
    }

    /// Saving from one application compared to linear pricing at
    /// `unit_price`. Negative when the "offer" costs more.
    ///
    /// ```rust
    /// use checkout_core::{Money, OfferTier};
    ///
    /// let tier = OfferTier::new(3, Money::from_major(130));
    /// assert_eq!(tier.savings_against(Money::from_major(50)), Money::from_major(20));
    /// ```
    pub fn savings_against(&self, unit_price: Money) -> Money {
        unit_price.multiply_quantity(self.threshold_quantity) - self.bundle_price
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
