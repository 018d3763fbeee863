//! # Offer Table
//!
//! Per-SKU bulk discount tiers, validated on the way in.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OfferTable                                                             │
//! │                                                                         │
//! │   "A" ──► [ 3 for $130.00 , 5 for $200.00 ]   (sorted by threshold)     │
//! │   "B" ──► [ 2 for $45.00  , 4 for $65.00  ]                             │
//! │   "C" ──► (absent: linear pricing)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invariants held by every table, however it was built:
//! - every threshold is positive
//! - every bundle price is non-negative
//! - thresholds are unique per SKU and stored ascending
//!
//! The JSON/TOML shape is a plain map, `{"A": [{"threshold_quantity": 3,
//! "bundle_price": 13000}]}`; deserializing goes through the same checks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::OfferTier;
use crate::validation::{validate_price, validate_sku, validate_threshold};

type RawOfferTable = BTreeMap<String, Vec<OfferTier>>;

/// Mapping from SKU to its offer tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOfferTable", into = "RawOfferTable")]
pub struct OfferTable {
    tiers: RawOfferTable,
}

impl OfferTable {
    /// Creates a table with no offers. Every SKU prices linearly.
    pub fn new() -> Self {
        OfferTable::default()
    }

    /// Adds one tier for `sku`.
    ///
    /// ## Errors
    /// `CoreError::InvalidOffer` if the SKU is malformed, the threshold is
    /// not positive, the bundle price is negative, or the SKU already
    /// has a tier with this threshold.
    pub fn insert(&mut self, sku: impl Into<String>, tier: OfferTier) -> CoreResult<()> {
        let sku = sku.into();

        let checked = validate_sku(&sku)
            .and_then(|_| validate_threshold(tier.threshold_quantity))
            .and_then(|_| validate_price("bundle_price", tier.bundle_price));
        if let Err(source) = checked {
            return Err(CoreError::InvalidOffer { sku, source });
        }

        let tiers = self.tiers.entry(sku.clone()).or_default();
        match tiers.binary_search_by_key(&tier.threshold_quantity, |t| t.threshold_quantity) {
            Ok(_) => Err(CoreError::InvalidOffer {
                sku,
                source: ValidationError::Duplicate {
                    field: "threshold_quantity".to_string(),
                    value: tier.threshold_quantity.to_string(),
                },
            }),
            Err(pos) => {
                tiers.insert(pos, tier);
                Ok(())
            }
        }
    }

    /// Builder form of [`insert`](Self::insert).
    ///
    /// ```rust
    /// use checkout_core::{Money, OfferTable};
    ///
    /// let offers = OfferTable::new()
    ///     .with_tier("A", 3, Money::from_major(130))?
    ///     .with_tier("A", 5, Money::from_major(200))?;
    /// assert_eq!(offers.tiers_for("A").len(), 2);
    /// # Ok::<(), checkout_core::CoreError>(())
    /// ```
    pub fn with_tier(
        mut self,
        sku: impl Into<String>,
        threshold_quantity: i64,
        bundle_price: Money,
    ) -> CoreResult<Self> {
        self.insert(sku, OfferTier::new(threshold_quantity, bundle_price))?;
        Ok(self)
    }

    /// Tiers for `sku`, ascending by threshold. Empty when the SKU has none.
    pub fn tiers_for(&self, sku: &str) -> &[OfferTier] {
        self.tiers.get(sku).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Smallest threshold for `sku`, if it has any tier.
    pub fn min_threshold(&self, sku: &str) -> Option<i64> {
        self.tiers_for(sku).first().map(|t| t.threshold_quantity)
    }

    /// The tier with the largest threshold not above `remaining`.
    pub fn best_fit(&self, sku: &str, remaining: i64) -> Option<&OfferTier> {
        largest_fitting(self.tiers_for(sku), remaining)
    }

    /// SKUs that have at least one tier.
    pub fn skus(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(String::as_str)
    }

    /// Number of SKUs with offers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// Largest-threshold tier with `threshold_quantity <= remaining`.
///
/// Works on slices in any order. Tiers with a non-positive threshold never
/// fit.
pub(crate) fn largest_fitting(tiers: &[OfferTier], remaining: i64) -> Option<&OfferTier> {
    tiers
        .iter()
        .filter(|t| t.threshold_quantity > 0 && t.threshold_quantity <= remaining)
        .max_by_key(|t| t.threshold_quantity)
}

impl TryFrom<RawOfferTable> for OfferTable {
    type Error = CoreError;

    fn try_from(raw: RawOfferTable) -> Result<Self, Self::Error> {
        let mut table = OfferTable::new();
        for (sku, tiers) in raw {
            for tier in tiers {
                table.insert(sku.clone(), tier)?;
            }
        }
        Ok(table)
    }
}

impl From<OfferTable> for RawOfferTable {
    fn from(table: OfferTable) -> Self {
        table.tiers
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OfferTable {
        OfferTable::new()
            .with_tier("A", 5, Money::from_major(200))
            .unwrap()
            .with_tier("A", 3, Money::from_major(130))
            .unwrap()
            .with_tier("B", 2, Money::from_major(45))
            .unwrap()
    }

    #[test]
    fn test_tiers_sorted_ascending() {
        let offers = sample();
        let thresholds: Vec<i64> = offers
            .tiers_for("A")
            .iter()
            .map(|t| t.threshold_quantity)
            .collect();
        assert_eq!(thresholds, vec![3, 5]);
        assert_eq!(offers.min_threshold("A"), Some(3));
        assert_eq!(offers.len(), 2);
    }

    #[test]
    fn test_absent_sku_has_no_tiers() {
        let offers = sample();
        assert!(offers.tiers_for("C").is_empty());
        assert_eq!(offers.min_threshold("C"), None);
        assert!(offers.best_fit("C", 10).is_none());
    }

    #[test]
    fn test_best_fit_picks_largest_qualifying() {
        let offers = sample();
        assert!(offers.best_fit("A", 2).is_none());
        assert_eq!(offers.best_fit("A", 3).unwrap().threshold_quantity, 3);
        assert_eq!(offers.best_fit("A", 4).unwrap().threshold_quantity, 3);
        assert_eq!(offers.best_fit("A", 5).unwrap().threshold_quantity, 5);
        assert_eq!(offers.best_fit("A", 15).unwrap().threshold_quantity, 5);
    }

    #[test]
    fn test_largest_fitting_ignores_slice_order() {
        let unsorted = [
            OfferTier::new(5, Money::from_major(200)),
            OfferTier::new(0, Money::from_major(1)),
            OfferTier::new(3, Money::from_major(130)),
        ];
        assert_eq!(largest_fitting(&unsorted, 4).unwrap().threshold_quantity, 3);
        assert_eq!(largest_fitting(&unsorted, 9).unwrap().threshold_quantity, 5);
        assert!(largest_fitting(&unsorted, 2).is_none());
    }

    #[test]
    fn test_accepts_large_thresholds_and_free_form_skus() {
        let offers = OfferTable::new()
            .with_tier("Coke 330ml", 10_000, Money::from_major(5_000))
            .unwrap();
        assert_eq!(offers.min_threshold("Coke 330ml"), Some(10_000));
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let err = OfferTable::new()
            .with_tier("A", 0, Money::from_major(10))
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidOffer {
                source: ValidationError::MustBePositive { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_duplicate_threshold() {
        let err = sample()
            .with_tier("A", 3, Money::from_major(120))
            .unwrap_err();
        match err {
            CoreError::InvalidOffer { sku, source } => {
                assert_eq!(sku, "A");
                assert!(matches!(source, ValidationError::Duplicate { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_negative_bundle_price_and_bad_sku() {
        assert!(OfferTable::new()
            .with_tier("A", 2, Money::from_cents(-1))
            .is_err());
        assert!(OfferTable::new()
            .with_tier("", 2, Money::from_major(1))
            .is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"A":[{"threshold_quantity":5,"bundle_price":20000},{"threshold_quantity":3,"bundle_price":13000}]}"#;
        let offers: OfferTable = serde_json::from_str(json).unwrap();
        assert_eq!(offers.min_threshold("A"), Some(3));

        let dup = r#"{"A":[{"threshold_quantity":3,"bundle_price":1},{"threshold_quantity":3,"bundle_price":2}]}"#;
        assert!(serde_json::from_str::<OfferTable>(dup).is_err());

        let zero = r#"{"A":[{"threshold_quantity":0,"bundle_price":1}]}"#;
        assert!(serde_json::from_str::<OfferTable>(zero).is_err());
    }

    #[test]
    fn test_serialize_is_plain_map() {
        let offers = OfferTable::new()
            .with_tier("B", 2, Money::from_cents(4500))
            .unwrap();
        assert_eq!(
            serde_json::to_string(&offers).unwrap(),
            r#"{"B":[{"threshold_quantity":2,"bundle_price":4500}]}"#
        );
    }
}
