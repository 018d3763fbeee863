//! End-to-end checkout scenarios: scan, price, total.

use checkout_core::{
    compute_total, Cart, CoreError, LineGrouping, LineItem, Money, OfferTable, OptimalBundles,
    PriceList, PricingEngine,
};

fn m(major: i64) -> Money {
    Money::from_major(major)
}

fn store_offers() -> OfferTable {
    OfferTable::new()
        .with_tier("A", 3, m(130))
        .and_then(|t| t.with_tier("A", 5, m(200)))
        .and_then(|t| t.with_tier("B", 2, m(45)))
        .and_then(|t| t.with_tier("B", 4, m(65)))
        .expect("valid offers")
}

fn store_prices() -> PriceList {
    PriceList::new()
        .with_price("A", m(50))
        .and_then(|p| p.with_price("B", m(30)))
        .and_then(|p| p.with_price("C", m(20)))
        .expect("valid prices")
}

#[test]
fn scenario_single_sku_offer_table() {
    let single = OfferTable::new().with_tier("A", 3, m(130)).unwrap();
    let both = store_offers();

    let cases = [
        (&single, 3, m(130)),
        (&single, 4, m(180)),
        (&both, 5, m(200)),
        (&both, 8, m(330)),
        (&both, 15, m(600)),
    ];

    for (offers, qty, expected) in cases {
        let cart = Cart::new().with_item("A", m(50), qty);
        assert_eq!(
            compute_total(Some(&cart), Some(offers)).unwrap(),
            expected,
            "qty {qty}"
        );
    }
}

#[test]
fn scenario_mixed_cart_totals_315() {
    let cart = Cart::new()
        .with_item("A", m(50), 5)
        .with_item("B", m(30), 3)
        .with_item("C", m(20), 2);

    assert_eq!(
        compute_total(Some(&cart), Some(&store_offers())).unwrap(),
        m(315)
    );
}

#[test]
fn scenario_scanned_basket_matches_built_cart() {
    let scans = ["A", "B", "A", "C", "A", "B", "A", "C", "A", "B"];
    let cart = store_prices().cart_from_skus(scans).unwrap();

    let receipt = PricingEngine::new(store_offers())
        .price(Some(&cart))
        .unwrap();

    assert_eq!(receipt.total, m(315));
    assert_eq!(receipt.lines.len(), 3);
}

#[test]
fn scenario_unknown_scan_stops_checkout() {
    let err = store_prices()
        .cart_from_skus(["A", "D"])
        .unwrap_err();
    assert_eq!(err.to_string(), "SKU not priced: D");
}

#[test]
fn scenario_split_lines_still_earn_bundle() {
    let cart = Cart::new()
        .with_item("A", m(50), 1)
        .with_item("C", m(20), 1)
        .with_item("A", m(50), 2);

    let aggregated = PricingEngine::new(store_offers());
    assert_eq!(aggregated.total(Some(&cart)).unwrap(), m(150));

    let per_line = PricingEngine::new(store_offers()).with_grouping(LineGrouping::PerLine);
    assert_eq!(per_line.total(Some(&cart)).unwrap(), m(170));
}

#[test]
fn scenario_repeated_sku_at_two_prices_totals_linearly() {
    // A price override on the second scan must not fail the checkout
    let cart = Cart::new()
        .with_item("A", m(50), 1)
        .with_item("A", m(45), 1);
    assert_eq!(compute_total(Some(&cart), None).unwrap(), m(95));
    assert_eq!(
        compute_total(Some(&cart), Some(&store_offers())).unwrap(),
        m(95)
    );

    let optimal = PricingEngine::new(store_offers()).with_strategy(OptimalBundles);
    assert_eq!(optimal.total(Some(&cart)).unwrap(), m(95));
}

#[test]
fn scenario_bulk_order_beyond_shop_floor_sizes() {
    let five_for_200 = OfferTable::new().with_tier("A", 5, m(200)).unwrap();
    let cart = Cart::new().with_item("A", m(50), 1000);
    assert_eq!(
        compute_total(Some(&cart), Some(&five_for_200)).unwrap(),
        m(40_000)
    );

    let optimal = PricingEngine::new(store_offers()).with_strategy(OptimalBundles);
    let cart = Cart::new().with_item("A", m(50), 1_000_003);
    // 200_000 × (5 for 200) + 1 × (3 for 130)
    assert_eq!(optimal.total(Some(&cart)).unwrap(), m(200_000 * 200 + 130));

    let long_receipt: Cart = (0..250)
        .map(|i| LineItem::new(format!("SKU-{i}"), m(2), 1))
        .collect();
    assert_eq!(compute_total(Some(&long_receipt), None).unwrap(), m(500));
}

#[test]
fn scenario_free_form_sku_strings() {
    let offers = OfferTable::new()
        .with_tier("Coke 330ml", 3, Money::from_cents(500))
        .unwrap();
    let cart = Cart::new()
        .with_item("Coke 330ml", Money::from_cents(200), 3)
        .with_item("Crème brûlée (large)", Money::from_cents(450), 1)
        .with_item("X".repeat(80), Money::from_cents(100), 2);

    assert_eq!(
        compute_total(Some(&cart), Some(&offers)).unwrap(),
        Money::from_cents(500 + 450 + 200)
    );
}

#[test]
fn scenario_optimal_strategy_never_costs_more() {
    let offers = store_offers();
    let greedy = PricingEngine::new(offers.clone());
    let optimal = PricingEngine::new(offers).with_strategy(OptimalBundles);

    for qty in 0..30 {
        let cart = Cart::new()
            .with_item("A", m(50), qty)
            .with_item("B", m(30), qty);
        let g = greedy.total(Some(&cart)).unwrap();
        let o = optimal.total(Some(&cart)).unwrap();
        assert!(o <= g, "qty {qty}: optimal {o} > greedy {g}");
    }
}

#[test]
fn scenario_malformed_offers_rejected_up_front() {
    let json = r#"{"A":[{"threshold_quantity":3,"bundle_price":13000},{"threshold_quantity":3,"bundle_price":12000}]}"#;
    assert!(serde_json::from_str::<OfferTable>(json).is_err());

    let err = OfferTable::new().with_tier("A", 0, m(1)).unwrap_err();
    assert!(matches!(err, CoreError::InvalidOffer { .. }));
}

#[test]
fn scenario_receipt_serializes_for_frontend() {
    let cart = Cart::new().with_item("A", m(50), 4);
    let receipt = PricingEngine::new(store_offers())
        .price(Some(&cart))
        .unwrap();

    let json = serde_json::to_value(&receipt).unwrap();
    assert_eq!(json["total"], 18000);
    assert_eq!(json["subtotal"], 20000);
    assert_eq!(json["lines"][0]["remainder"], 1);
    assert_eq!(json["lines"][0]["applications"][0]["threshold_quantity"], 3);
    assert_eq!(json["strategy"], "greedy");
}
