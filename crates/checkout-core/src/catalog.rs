//! # Price List
//!
//! SKU → unit price lookup, used to turn scanned SKUs into a priced cart.
//!
//! ## Scan Workflow
//! ```text
//! Scanner: A, B, A, A, C
//!      │
//!      ▼
//! PriceList::cart_from_skus  ── unknown SKU? ──► CoreError::SkuNotPriced
//!      │
//!      ▼
//! Cart [A $50.00 × 3, B $30.00 × 1, C $20.00 × 1]
//!      │
//!      ▼
//! PricingEngine::price
//! ```
//!
//! The engine itself never looks prices up; every line item already carries
//! its unit price.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Cart, LineItem};
use crate::validation::{validate_line_quantity, validate_price, validate_sku};

type RawPriceList = BTreeMap<String, Money>;

/// Unit prices keyed by SKU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceList", into = "RawPriceList")]
pub struct PriceList {
    prices: RawPriceList,
}

impl PriceList {
    pub fn new() -> Self {
        PriceList::default()
    }

    /// Sets the unit price for `sku`, replacing any previous price.
    pub fn insert(&mut self, sku: impl Into<String>, price: Money) -> CoreResult<()> {
        let sku = sku.into();
        validate_sku(&sku)?;
        validate_price("unit_price", price)?;
        self.prices.insert(sku, price);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_price(mut self, sku: impl Into<String>, price: Money) -> CoreResult<Self> {
        self.insert(sku, price)?;
        Ok(self)
    }

    /// Unit price for `sku`.
    ///
    /// ## Errors
    /// `CoreError::SkuNotPriced` when the SKU has no price.
    pub fn price_of(&self, sku: &str) -> CoreResult<Money> {
        self.prices
            .get(sku)
            .copied()
            .ok_or_else(|| CoreError::SkuNotPriced(sku.to_string()))
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.prices.contains_key(sku)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Builds a cart from individual scans, one unit per scan.
    ///
    /// Lines appear in order of first scan, one per distinct SKU.
    ///
    /// ```rust
    /// use checkout_core::{Money, PriceList};
    ///
    /// let prices = PriceList::new()
    ///     .with_price("A", Money::from_major(50))?
    ///     .with_price("B", Money::from_major(30))?;
    ///
    /// let cart = prices.cart_from_skus(["A", "B", "A"])?;
    /// assert_eq!(cart.items[0].quantity, 2);
    /// assert!(prices.cart_from_skus(["Z"]).is_err());
    /// # Ok::<(), checkout_core::CoreError>(())
    /// ```
    pub fn cart_from_skus<'a, I>(&self, skus: I) -> CoreResult<Cart>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.cart_from_quantities(skus.into_iter().map(|sku| (sku, 1)))
    }

    /// Builds a cart from `(sku, quantity)` pairs, merging repeated SKUs.
    pub fn cart_from_quantities<'a, I>(&self, entries: I) -> CoreResult<Cart>
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut items: Vec<LineItem> = Vec::new();

        for (sku, quantity) in entries {
            validate_line_quantity(quantity)?;
            let unit_price = self.price_of(sku)?;

            match items.iter_mut().find(|i| i.sku == sku) {
                Some(item) => {
                    item.quantity = item
                        .quantity
                        .checked_add(quantity)
                        .ok_or_else(|| CoreError::Overflow {
                            sku: sku.to_string(),
                        })?;
                }
                None => items.push(LineItem::new(sku, unit_price, quantity)),
            }
        }

        Ok(Cart::from(items))
    }
}

impl TryFrom<RawPriceList> for PriceList {
    type Error = CoreError;

    fn try_from(raw: RawPriceList) -> Result<Self, Self::Error> {
        let mut list = PriceList::new();
        for (sku, price) in raw {
            list.insert(sku, price)?;
        }
        Ok(list)
    }
}

impl From<PriceList> for RawPriceList {
    fn from(list: PriceList) -> Self {
        list.prices
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn prices() -> PriceList {
        PriceList::new()
            .with_price("A", Money::from_major(50))
            .unwrap()
            .with_price("B", Money::from_major(30))
            .unwrap()
            .with_price("C", Money::from_major(20))
            .unwrap()
    }

    #[test]
    fn test_price_lookup() {
        let list = prices();
        assert_eq!(list.price_of("B").unwrap(), Money::from_major(30));
        assert!(list.contains("C"));
        assert_eq!(list.len(), 3);

        let err = list.price_of("Z").unwrap_err();
        assert!(matches!(err, CoreError::SkuNotPriced(ref sku) if sku == "Z"));
    }

    #[test]
    fn test_cart_from_scans_counts_units() {
        let cart = prices()
            .cart_from_skus(["A", "B", "A", "A", "C"])
            .unwrap();

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.items[0], LineItem::new("A", Money::from_major(50), 3));
        assert_eq!(cart.items[1].sku, "B");
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_unknown_sku_is_hard_error() {
        let err = prices().cart_from_skus(["A", "Z"]).unwrap_err();
        assert!(matches!(err, CoreError::SkuNotPriced(_)));
    }

    #[test]
    fn test_cart_from_quantities() {
        let cart = prices()
            .cart_from_quantities([("A", 5), ("B", 3), ("A", 2)])
            .unwrap();
        assert_eq!(cart.items[0].quantity, 7);

        assert!(prices().cart_from_quantities([("A", -1)]).is_err());
    }

    #[test]
    fn test_merged_scan_quantity_overflow() {
        let err = prices()
            .cart_from_quantities([("A", i64::MAX), ("A", 1)])
            .unwrap_err();
        assert!(matches!(err, CoreError::Overflow { ref sku } if sku == "A"));
    }

    #[test]
    fn test_rejects_invalid_prices() {
        assert!(PriceList::new()
            .with_price("A", Money::from_cents(-1))
            .is_err());
        assert!(PriceList::new().with_price(" A", Money::zero()).is_err());
        assert!(PriceList::new().with_price("Coke 330ml", Money::zero()).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let list: PriceList = serde_json::from_str(r#"{"A":5000,"B":3000}"#).unwrap();
        assert_eq!(list.price_of("A").unwrap(), Money::from_cents(5000));

        assert!(serde_json::from_str::<PriceList>(r#"{"A":-1}"#).is_err());
    }
}
