//! Property tests for checkout totals

use proptest::{prelude::*, test_runner::TestCaseError};
use rust_decimal::Decimal;
use uuid::Uuid;

use bazaar::{
    basket::Basket,
    items::LineItem,
    pricing::{PricingPolicy, compute_totals},
};

/// Raw (unit price in cents, quantity) pairs within well-formed bounds.
fn arb_lines() -> impl Strategy<Value = Vec<(i64, u32)>> {
    prop::collection::vec((0i64..100_000, 1u32..50), 0..12)
}

fn build_items(raw: &[(i64, u32)]) -> Result<Vec<LineItem>, TestCaseError> {
    raw.iter()
        .map(|&(cents, quantity)| {
            LineItem::new(Uuid::now_v7(), "Item", Decimal::new(cents, 2), quantity)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| TestCaseError::fail(error.to_string()))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// The subtotal is exactly the sum of unit price times quantity, and the
    /// total is exactly the sum of its three components.
    #[test]
    fn totals_invariant_holds(raw in arb_lines()) {
        let items = build_items(&raw)?;
        let totals = compute_totals(&items, &PricingPolicy::default());

        let expected_subtotal: Decimal = raw
            .iter()
            .map(|&(cents, quantity)| Decimal::new(cents, 2) * Decimal::from(quantity))
            .sum();

        prop_assert_eq!(totals.subtotal, expected_subtotal);
        prop_assert_eq!(totals.total, totals.subtotal + totals.tax + totals.shipping);
    }

    /// Shipping is waived exactly when the subtotal strictly exceeds the
    /// threshold; at or below it, the flat fee applies (empty baskets aside).
    #[test]
    fn free_shipping_boundary_is_exclusive(raw in arb_lines()) {
        let policy = PricingPolicy::default();
        let items = build_items(&raw)?;
        let totals = compute_totals(&items, &policy);

        if items.is_empty() {
            prop_assert_eq!(totals.shipping, Decimal::ZERO);
        } else if totals.subtotal > policy.free_shipping_threshold {
            prop_assert_eq!(totals.shipping, Decimal::ZERO);
        } else {
            prop_assert_eq!(totals.shipping, policy.flat_shipping_fee);
        }
    }

    /// Well-formed input never produces a negative figure.
    #[test]
    fn totals_are_never_negative(raw in arb_lines()) {
        let items = build_items(&raw)?;
        let totals = compute_totals(&items, &PricingPolicy::default());

        prop_assert!(!totals.subtotal.is_sign_negative() || totals.subtotal.is_zero());
        prop_assert!(!totals.tax.is_sign_negative() || totals.tax.is_zero());
        prop_assert!(!totals.shipping.is_sign_negative() || totals.shipping.is_zero());
        prop_assert!(!totals.total.is_sign_negative() || totals.total.is_zero());
    }

    /// Totals are a pure function of the items.
    #[test]
    fn totals_are_deterministic(raw in arb_lines()) {
        let policy = PricingPolicy::default();
        let items = build_items(&raw)?;

        prop_assert_eq!(
            compute_totals(&items, &policy),
            compute_totals(&items, &policy)
        );
    }

    /// However a product's quantity arrives, one add or many, the basket
    /// holds one line carrying the summed quantity.
    #[test]
    fn repeated_adds_merge_into_one_line(quantities in prop::collection::vec(1u32..20, 1..8)) {
        let product_id = Uuid::now_v7();
        let mut basket = Basket::new();

        for &quantity in &quantities {
            let item = LineItem::new(product_id, "Item", Decimal::new(9_99, 2), quantity)
                .map_err(|error| TestCaseError::fail(error.to_string()))?;
            basket.add(item);
        }

        prop_assert_eq!(basket.len(), 1);
        prop_assert_eq!(basket.quantity_of(product_id), quantities.iter().sum::<u32>());
    }
}
