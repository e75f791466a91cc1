//! WebAssembly module for the Invoicer platform
//!
//! Provides client-side computation for:
//! - Line and invoice totals while the form is edited
//! - Suggested invoice numbers
//! - Locale-aware amount formatting
//! - Offline input validation

use std::str::FromStr;

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::calculator::*;
pub use shared::format::*;
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, JsValue> {
    Decimal::from_str(value.trim())
        .map_err(|_| JsValue::from_str(&format!("Invalid number for {}: '{}'", field, value)))
}

fn language(code: &str) -> Language {
    Language::from_code(code).unwrap_or_default()
}

/// Line total as a decimal string. Amounts are passed as strings to keep
/// full decimal precision across the JS boundary.
#[wasm_bindgen]
pub fn calculate_item_total(quantity: &str, unit_price: &str, tax_rate: &str) -> Result<String, JsValue> {
    let item = LineItem::new(
        "line",
        parse_decimal("quantity", quantity)?,
        parse_decimal("unit_price", unit_price)?,
        parse_decimal("tax_rate", tax_rate)?,
    )
    .map_err(|e| JsValue::from_str(&e.message_en))?;

    Ok(item.total().to_string())
}

/// Totals of a JSON array of `{description, quantity, unit_price, tax_rate}`
/// as `{subtotal, tax_total, total}` JSON
#[wasm_bindgen]
pub fn calculate_invoice_totals(items_json: &str) -> Result<String, JsValue> {
    let inputs: Vec<LineItemInput> = serde_json::from_str(items_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid items JSON: {}", e)))?;

    let items = inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            LineItem::try_from(input)
                .map_err(|e| JsValue::from_str(&format!("items[{}]: {}", index, e.message_en)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let totals = compute_invoice_totals(&items).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&totals).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Suggested number for the next invoice (display only)
#[wasm_bindgen]
pub fn suggest_invoice_number(last_issued: Option<String>) -> String {
    next_invoice_number(last_issued.as_deref())
}

/// `1.234,56` for "tr", `1,234.56` for "en"
#[wasm_bindgen]
pub fn format_amount_for(amount: &str, language_code: &str) -> Result<String, JsValue> {
    Ok(format_amount(parse_decimal("amount", amount)?, language(language_code)))
}

/// Amount with currency code, e.g. `286,00 TL`
#[wasm_bindgen]
pub fn format_money_for(amount: &str, currency: &str, language_code: &str) -> Result<String, JsValue> {
    let currency = Currency::from_code(currency)
        .ok_or_else(|| JsValue::from_str(&format!("Unsupported currency '{}'", currency)))?;
    Ok(format_money(parse_decimal("amount", amount)?, currency, language(language_code)))
}

#[wasm_bindgen]
pub fn is_valid_email(email: &str) -> bool {
    validate_email(email).is_ok()
}

/// Accepts 10-digit VKN and 11-digit TCKN with a valid checksum
#[wasm_bindgen]
pub fn is_valid_tax_number(tax_number: &str) -> bool {
    validate_turkish_tax_number(tax_number).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_total() {
        assert_eq!(calculate_item_total("2", "100", "18").unwrap(), "236");
        assert_eq!(calculate_item_total("1", "50", "0").unwrap(), "50");
    }

    #[test]
    fn test_invoice_totals_json() {
        let json = r#"[
            {"description": "Web tasarım", "quantity": "2", "unit_price": "100", "tax_rate": "18"},
            {"description": "Alan adı", "quantity": 1, "unit_price": 50, "tax_rate": 0}
        ]"#;
        let totals: InvoiceTotals = serde_json::from_str(&calculate_invoice_totals(json).unwrap()).unwrap();
        assert_eq!(totals.subtotal, Decimal::from(250));
        assert_eq!(totals.tax_total, Decimal::from(36));
        assert_eq!(totals.total, Decimal::from(286));
    }

    #[test]
    fn test_suggested_number() {
        assert_eq!(suggest_invoice_number(None), "INV-0001");
        assert_eq!(suggest_invoice_number(Some("INV-0041".to_string())), "INV-0042");
        assert_eq!(suggest_invoice_number(Some("taslak".to_string())), "INV-0001");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_amount_for("1234.5", "tr").unwrap(), "1.234,50");
        assert_eq!(format_amount_for("1234.5", "en").unwrap(), "1,234.50");
        assert_eq!(format_money_for("286", "TL", "tr").unwrap(), "286,00 TL");
    }

    #[test]
    fn test_validators() {
        assert!(is_valid_email("muhasebe@firma.com.tr"));
        assert!(!is_valid_email("muhasebe"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(is_valid_tax_number("1234567890"));
        assert!(is_valid_tax_number("10000000146"));
        assert!(!is_valid_tax_number("10000000147"));
    }
}
