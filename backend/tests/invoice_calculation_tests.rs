//! Invoice calculation tests
//!
//! Property-based and unit tests for:
//! - Line total formula and monotonicity
//! - Invoice totals consistency
//! - Invoice number sequencing

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    compute_invoice_totals, compute_item_total, next_invoice_number, try_next_invoice_number,
    InvoiceDraft, LineItem, LineItemInput,
};
use std::str::FromStr;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Non-negative amount with up to 2 decimals
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Quantity with up to 3 decimals
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000).prop_map(|milli| Decimal::new(milli, 3))
}

/// Turkish VAT rates plus arbitrary percentages
fn tax_rate_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        Just(Decimal::from(1)),
        Just(Decimal::from(8)),
        Just(Decimal::from(10)),
        Just(Decimal::from(18)),
        Just(Decimal::from(20)),
        (0i64..10_000).prop_map(|bp| Decimal::new(bp, 2)),
    ]
}

fn line_strategy() -> impl Strategy<Value = LineItemInput> {
    (
        "[A-Za-zğüşıöçĞÜŞİÖÇ ]{1,30}",
        quantity_strategy(),
        amount_strategy(),
        tax_rate_strategy(),
    )
        .prop_map(|(description, quantity, unit_price, tax_rate)| LineItemInput {
            description: format!("Kalem {}", description),
            quantity,
            unit_price,
            tax_rate,
        })
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Line total = q*p + q*p*r/100
    #[test]
    fn property_item_total_formula(
        q in quantity_strategy(),
        p in amount_strategy(),
        r in tax_rate_strategy(),
    ) {
        let subtotal = q * p;
        prop_assert_eq!(
            compute_item_total(q, p, r).unwrap(),
            subtotal + subtotal * r / Decimal::ONE_HUNDRED
        );
    }

    /// Raising any input never lowers the line total
    #[test]
    fn property_item_total_monotonic(
        q in quantity_strategy(),
        p in amount_strategy(),
        r in tax_rate_strategy(),
        bump in amount_strategy(),
    ) {
        let total = |q, p, r| compute_item_total(q, p, r).unwrap();
        let base = total(q, p, r);
        prop_assert!(total(q + bump, p, r) >= base);
        prop_assert!(total(q, p + bump, r) >= base);
        prop_assert!(total(q, p, r + bump) >= base);
    }

    /// Invoice total equals the sum of line totals and subtotal + tax
    #[test]
    fn property_totals_match_lines(lines in prop::collection::vec(line_strategy(), 1..15)) {
        let items: Vec<LineItem> = lines
            .into_iter()
            .map(|line| LineItem::try_from(line).unwrap())
            .collect();

        let totals = compute_invoice_totals(&items).unwrap();
        let sum: Decimal = items.iter().map(|i| i.total()).sum();

        prop_assert_eq!(totals.total, sum);
        prop_assert_eq!(totals.total, totals.subtotal + totals.tax_total);
        prop_assert!(totals.tax_total >= Decimal::ZERO);
    }

    /// Numbers keep increasing by exactly one
    #[test]
    fn property_next_number_increments(n in 1u32..200_000) {
        let current = format!("INV-{:04}", n);
        let next = try_next_invoice_number(Some(&current)).unwrap();
        prop_assert_eq!(next, format!("INV-{:04}", n + 1));
    }

    /// Anything that is not INV-<digits> restarts the suggestion
    #[test]
    fn property_malformed_number_falls_back(s in "[A-Za-z]{0,6}-?[a-z]{1,4}") {
        prop_assert_eq!(next_invoice_number(Some(&s)), "INV-0001");
        prop_assert!(try_next_invoice_number(Some(&s)).is_err());
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_two_line_scenario() {
    let draft: InvoiceDraft = serde_json::from_str(
        r#"{
            "customer_id": "6f1c1f3e-9c55-4c4f-9a49-1f3f8f1d2c10",
            "invoice_date": "2024-06-01",
            "due_date": "2024-06-30",
            "items": [
                {"description": "Web tasarım", "quantity": "2", "unit_price": "100", "tax_rate": "18"},
                {"description": "Alan adı", "quantity": "1", "unit_price": "50", "tax_rate": "0"}
            ]
        }"#,
    )
    .unwrap();

    let invoice = draft.validate().unwrap();
    let line_totals: Vec<Decimal> = invoice.items.iter().map(|i| i.total()).collect();

    assert_eq!(line_totals, vec![dec("236"), dec("50")]);
    assert_eq!(invoice.totals.subtotal, dec("250"));
    assert_eq!(invoice.totals.tax_total, dec("36"));
    assert_eq!(invoice.totals.total, dec("286"));
}

#[test]
fn test_empty_totals_are_zero() {
    let totals = compute_invoice_totals::<LineItem>(&[]).unwrap();
    assert_eq!(totals.subtotal, Decimal::ZERO);
    assert_eq!(totals.tax_total, Decimal::ZERO);
    assert_eq!(totals.total, Decimal::ZERO);
}

#[test]
fn test_fractional_amounts_are_not_rounded() {
    // 3 x 33.33 at 18% = 99.99 + 17.9982
    assert_eq!(
        compute_item_total(dec("3"), dec("33.33"), dec("18")),
        Ok(dec("117.9882"))
    );
}

#[test]
fn test_oversized_amounts_are_field_errors() {
    let err = LineItem::new("Kalem", Decimal::MAX, dec("2"), Decimal::ZERO).unwrap_err();
    assert_eq!(err.field, "quantity");
    assert_eq!(err.message_tr, "Tutar çok büyük");

    let draft: InvoiceDraft = serde_json::from_str(
        r#"{
            "customer_id": null,
            "invoice_date": "2024-06-01",
            "due_date": "2024-06-01",
            "items": [
                {"description": "Kalem", "quantity": "79228162514264337593543950335", "unit_price": "2", "tax_rate": "0"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(draft.preview().unwrap_err().field, "items[0].quantity");
}

#[test]
fn test_number_sequence_edges() {
    assert_eq!(next_invoice_number(None), "INV-0001");
    assert_eq!(next_invoice_number(Some("INV-0042")), "INV-0043");
    assert_eq!(next_invoice_number(Some("INV-9999")), "INV-10000");
    assert_eq!(next_invoice_number(Some("INV-abc")), "INV-0001");
}
