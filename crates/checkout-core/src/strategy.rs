//! # Offer Strategies
//!
//! Decides how a SKU's tiers are applied to a purchased quantity.
//!
//! ## Available Strategies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GREEDY (Default)                    │  OPTIMAL                         │
//! │  ─────────────────                   │  ───────                         │
//! │  Repeatedly take the largest tier    │  Cheapest combination of tiers   │
//! │  that still fits, price the rest     │  and single units (unbounded     │
//! │  linearly.                           │  knapsack over the quantity).    │
//! │                                      │                                  │
//! │  O(tiers²) per line                  │  O(window × tiers) per line      │
//! │                                      │                                  │
//! │  Tiers {3→60, 4→100}, unit 30, qty 6:                                   │
//! │  4-tier + 2 units = 160              │  3-tier × 2 = 120                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tiers may be passed in any order. Tiers with a non-positive threshold
//! are skipped. Every strategy returns `None` when the line total does not
//! fit in [`Money`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::offers::largest_fitting;
use crate::types::OfferTier;

// =============================================================================
// Line Pricing Result
// =============================================================================

/// One tier applied `times` times to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OfferApplication {
    pub threshold_quantity: i64,
    pub bundle_price: Money,
    pub times: i64,
}

impl OfferApplication {
    /// Units consumed by all applications of this tier.
    pub fn units(&self) -> i64 {
        self.threshold_quantity * self.times
    }

    /// Amount charged for all applications of this tier.
    pub fn total(&self) -> Option<Money> {
        self.bundle_price.checked_multiply_quantity(self.times)
    }
}

/// How one line's quantity was priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LinePricing {
    /// Tiers used, largest threshold first.
    pub applications: Vec<OfferApplication>,

    /// Units left over and charged at the unit price.
    pub remainder: i64,

    /// Bundles plus remainder.
    pub total: Money,
}

impl LinePricing {
    /// Builds the result, computing the total from its parts. `None` if
    /// the total overflows.
    pub fn from_parts(
        applications: Vec<OfferApplication>,
        remainder: i64,
        unit_price: Money,
    ) -> Option<Self> {
        let mut total = unit_price.checked_multiply_quantity(remainder)?;
        for app in &applications {
            total = total.checked_add(app.total()?)?;
        }
        Some(LinePricing {
            applications,
            remainder,
            total,
        })
    }

    /// Every unit at the unit price, no offers.
    pub fn linear(unit_price: Money, quantity: i64) -> Option<Self> {
        LinePricing::from_parts(Vec::new(), quantity, unit_price)
    }
}

// =============================================================================
// Strategy Trait
// =============================================================================

/// Policy for applying offer tiers to a single line.
///
/// Implementations must be pure: the same tiers, price and quantity always
/// give the same [`LinePricing`].
pub trait OfferStrategy: fmt::Debug + Send + Sync {
    /// Short name, used in logs and receipts.
    fn name(&self) -> &'static str;

    /// Prices `quantity` units given the SKU's tiers, in any order.
    ///
    /// Returns `None` if the line total overflows.
    fn apply(&self, tiers: &[OfferTier], unit_price: Money, quantity: i64) -> Option<LinePricing>;
}

// =============================================================================
// Greedy
// =============================================================================

/// Largest qualifying tier first, repeated until no tier fits.
///
/// ## Walkthrough: tiers {3→130, 5→200}, qty 8
/// ```text
/// remaining 8 ── largest fit: 5 ──► +200, remaining 3
/// remaining 3 ── largest fit: 3 ──► +130, remaining 0
/// remainder 0 × unit           ──►   +0
///                                    ────
///                                    330
/// ```
///
/// Not guaranteed optimal for every tier set; see [`OptimalBundles`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyLargestFirst;

impl OfferStrategy for GreedyLargestFirst {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn apply(&self, tiers: &[OfferTier], unit_price: Money, quantity: i64) -> Option<LinePricing> {
        let mut remaining = quantity.max(0);
        let mut applications = Vec::new();

        // Picking the same largest tier on consecutive iterations is the same
        // as taking it `remaining / threshold` times in one go.
        while let Some(tier) = largest_fitting(tiers, remaining) {
            let times = remaining / tier.threshold_quantity;
            applications.push(OfferApplication {
                threshold_quantity: tier.threshold_quantity,
                bundle_price: tier.bundle_price,
                times,
            });
            remaining -= tier.threshold_quantity * times;
        }

        LinePricing::from_parts(applications, remaining, unit_price)
    }
}

// =============================================================================
// Optimal
// =============================================================================

/// Largest quantity [`OptimalBundles`] builds its table for.
pub const MAX_SEARCH_UNITS: i64 = 200_000;

/// Cheapest possible combination of bundles and single units.
///
/// Dynamic programming over the quantity: `best[q]` is the cheapest way to
/// buy `q` units, either `best[q - 1]` plus one unit or `best[q - t]` plus
/// one bundle of threshold `t`. Ties go to the option with fewer bundle
/// applications, so a zero-saving tier is never applied.
///
/// ## Large quantities
/// Some optimal answer uses fewer than `t_best` items other than the
/// best-value tier (threshold `t_best`), so at most `t_best × max_threshold`
/// units go to other items. Everything beyond that window is pre-filled
/// with best-value bundles and only the window is searched.
///
/// ```text
/// qty 1_000_000, tiers {3→60, 4→100}, unit 30
///   best value: 3→60      window: 3 × 4 = 12
///   pre-fill 333_329 × (3→60), search the last 13 units
/// ```
///
/// If the window itself exceeds [`MAX_SEARCH_UNITS`] (very large
/// thresholds), the line is priced with [`GreedyLargestFirst`] and a
/// warning is logged.
///
/// Never more expensive than [`GreedyLargestFirst`] on the same input.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalBundles;

impl OfferStrategy for OptimalBundles {
    fn name(&self) -> &'static str {
        "optimal"
    }

    fn apply(&self, tiers: &[OfferTier], unit_price: Money, quantity: i64) -> Option<LinePricing> {
        let usable: Vec<&OfferTier> = tiers.iter().filter(|t| t.threshold_quantity > 0).collect();
        if quantity <= 0 || usable.is_empty() {
            return LinePricing::linear(unit_price, quantity.max(0));
        }

        // Best value per unit among tiers strictly cheaper per unit than
        // buying singles. Ties go to the larger threshold.
        let best_index = usable
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                per_unit_cmp(t.bundle_price, t.threshold_quantity, unit_price, 1) == Ordering::Less
            })
            .min_by(|(_, a), (_, b)| {
                per_unit_cmp(a.bundle_price, a.threshold_quantity, b.bundle_price, b.threshold_quantity)
                    .then(b.threshold_quantity.cmp(&a.threshold_quantity))
            })
            .map(|(i, _)| i);

        // No tier beats single units, so single units are optimal.
        let Some(best_index) = best_index else {
            return LinePricing::linear(unit_price, quantity);
        };

        let t_best = usable[best_index].threshold_quantity;
        let max_threshold = usable.iter().map(|t| t.threshold_quantity).max().unwrap_or(1);
        let window = i128::from(t_best) * i128::from(max_threshold);
        let prefill = if i128::from(quantity) > window {
            // quantity - window < quantity, so this fits in i64
            ((i128::from(quantity) - window) / i128::from(t_best)) as i64
        } else {
            0
        };
        let searched = quantity - prefill * t_best;

        if searched > MAX_SEARCH_UNITS {
            warn!(
                quantity,
                searched,
                max = MAX_SEARCH_UNITS,
                "Offer search window too large, pricing line greedily"
            );
            return GreedyLargestFirst.apply(tiers, unit_price, quantity);
        }

        let mut counts = search(&usable, unit_price, searched as usize)?;
        counts.bundles[best_index] += prefill;

        let mut applications: Vec<OfferApplication> = usable
            .iter()
            .zip(counts.bundles)
            .filter(|(_, times)| *times > 0)
            .map(|(tier, times)| OfferApplication {
                threshold_quantity: tier.threshold_quantity,
                bundle_price: tier.bundle_price,
                times,
            })
            .collect();
        applications.sort_by(|a, b| b.threshold_quantity.cmp(&a.threshold_quantity));

        LinePricing::from_parts(applications, counts.remainder, unit_price)
    }
}

/// Bundle counts per usable tier, plus single units.
struct SearchCounts {
    bundles: Vec<i64>,
    remainder: i64,
}

/// Exact DP for `n` units. `None` if every way to buy `n` units overflows.
fn search(tiers: &[&OfferTier], unit_price: Money, n: usize) -> Option<SearchCounts> {
    // (cost, bundle applications) for q units, and the last step taken
    let mut best: Vec<Option<(Money, i64)>> = Vec::with_capacity(n + 1);
    let mut step: Vec<Option<usize>> = vec![None; n + 1];
    best.push(Some((Money::zero(), 0)));

    for q in 1..=n {
        let mut candidate = best[q - 1]
            .and_then(|(cost, apps)| Some((cost.checked_add(unit_price)?, apps)));
        let mut choice = None;

        for (i, tier) in tiers.iter().enumerate() {
            let t = tier.threshold_quantity as usize;
            if t > q {
                continue;
            }
            let option = best[q - t]
                .and_then(|(cost, apps)| Some((cost.checked_add(tier.bundle_price)?, apps + 1)));
            if let Some(option) = option {
                if candidate.map_or(true, |current| option < current) {
                    candidate = Some(option);
                    choice = Some(i);
                }
            }
        }

        best.push(candidate);
        step[q] = choice;
    }

    best[n]?;

    let mut counts = SearchCounts {
        bundles: vec![0; tiers.len()],
        remainder: 0,
    };
    let mut q = n;
    while q > 0 {
        match step[q] {
            Some(i) => {
                counts.bundles[i] += 1;
                q -= tiers[i].threshold_quantity as usize;
            }
            None => {
                counts.remainder += 1;
                q -= 1;
            }
        }
    }

    Some(counts)
}

/// Compares `a_price / a_qty` with `b_price / b_qty` without division.
fn per_unit_cmp(a_price: Money, a_qty: i64, b_price: Money, b_qty: i64) -> Ordering {
    let lhs = i128::from(a_price.cents()) * i128::from(b_qty);
    let rhs = i128::from(b_price.cents()) * i128::from(a_qty);
    lhs.cmp(&rhs)
}

// =============================================================================
// Strategy Selector
// =============================================================================

/// Serializable choice of strategy, as stored in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// [`GreedyLargestFirst`].
    #[default]
    Greedy,
    /// [`OptimalBundles`].
    Optimal,
}

impl StrategyKind {
    /// Instantiates the strategy.
    pub fn build(&self) -> Box<dyn OfferStrategy> {
        match self {
            StrategyKind::Greedy => Box::new(GreedyLargestFirst),
            StrategyKind::Optimal => Box::new(OptimalBundles),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Greedy => write!(f, "greedy"),
            StrategyKind::Optimal => write!(f, "optimal"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "greedy" | "largest_first" => Ok(StrategyKind::Greedy),
            "optimal" | "dp" => Ok(StrategyKind::Optimal),
            other => Err(ValidationError::InvalidFormat {
                field: "strategy".to_string(),
                reason: format!("unknown strategy '{}', expected greedy or optimal", other),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
