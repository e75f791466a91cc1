//! Invoice calculator
//!
//! Derives line and invoice totals from quantities, unit prices and tax
//! rates, and formats sequential invoice numbers. All arithmetic is exact
//! decimal arithmetic; rounding only happens when amounts are formatted
//! for display (see [`crate::format`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of every invoice number (`INV-0001`)
pub const INVOICE_NUMBER_PREFIX: &str = "INV";

/// Minimum digits of the zero-padded sequence part
pub const INVOICE_NUMBER_WIDTH: usize = 4;

/// Anything that carries the three inputs of a line total
pub trait LineAmounts {
    fn quantity(&self) -> Decimal;
    fn unit_price(&self) -> Decimal;
    fn tax_rate(&self) -> Decimal;
}

/// Amounts of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemAmounts {
    /// quantity * unit_price
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Aggregated invoice amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
}

/// An amount left the representable decimal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("amount too large")]
pub struct AmountOverflow;

/// Split a line into subtotal, tax and total.
///
/// Inputs are expected to be validated as non-negative by the caller.
pub fn item_amounts(
    quantity: Decimal,
    unit_price: Decimal,
    tax_rate: Decimal,
) -> Result<ItemAmounts, AmountOverflow> {
    let subtotal = quantity.checked_mul(unit_price).ok_or(AmountOverflow)?;
    let tax = subtotal
        .checked_mul(tax_rate)
        .and_then(|t| t.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(AmountOverflow)?;
    let total = subtotal.checked_add(tax).ok_or(AmountOverflow)?;

    Ok(ItemAmounts { subtotal, tax, total })
}

/// Line total: `quantity * unit_price * (1 + tax_rate / 100)`
pub fn compute_item_total(
    quantity: Decimal,
    unit_price: Decimal,
    tax_rate: Decimal,
) -> Result<Decimal, AmountOverflow> {
    item_amounts(quantity, unit_price, tax_rate).map(|amounts| amounts.total)
}

/// Aggregate line amounts in input order. An empty slice yields zeros.
pub fn compute_invoice_totals<T: LineAmounts>(items: &[T]) -> Result<InvoiceTotals, AmountOverflow> {
    let mut totals = InvoiceTotals::default();

    for item in items {
        let amounts = item_amounts(item.quantity(), item.unit_price(), item.tax_rate())?;
        totals.subtotal = totals
            .subtotal
            .checked_add(amounts.subtotal)
            .ok_or(AmountOverflow)?;
        totals.tax_total = totals
            .tax_total
            .checked_add(amounts.tax)
            .ok_or(AmountOverflow)?;
    }

    totals.total = totals
        .subtotal
        .checked_add(totals.tax_total)
        .ok_or(AmountOverflow)?;
    Ok(totals)
}

/// Invoice number parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceNumberError {
    #[error("invoice number '{0}' is not in INV-NNNN format")]
    Malformed(String),

    #[error("invoice number sequence exhausted after '{0}'")]
    Overflow(String),
}

/// Format a sequence value as `INV-` plus at least four digits
pub fn format_invoice_number(sequence: u32) -> String {
    format!(
        "{}-{:0width$}",
        INVOICE_NUMBER_PREFIX,
        sequence,
        width = INVOICE_NUMBER_WIDTH
    )
}

/// Extract the numeric sequence from an `INV-NNNN` number
pub fn parse_invoice_sequence(number: &str) -> Result<u32, InvoiceNumberError> {
    let malformed = || InvoiceNumberError::Malformed(number.to_string());

    let digits = number
        .trim()
        .strip_prefix(INVOICE_NUMBER_PREFIX)
        .and_then(|rest| rest.strip_prefix('-'))
        .ok_or_else(malformed)?;

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }

    digits.parse::<u32>().map_err(|_| malformed())
}

/// Number that follows `last_issued`; the first number when there is none.
///
/// Malformed or exhausted input is reported as an error.
pub fn try_next_invoice_number(last_issued: Option<&str>) -> Result<String, InvoiceNumberError> {
    let next = match last_issued {
        None => 1,
        Some(last) => parse_invoice_sequence(last)?
            .checked_add(1)
            .ok_or_else(|| InvoiceNumberError::Overflow(last.to_string()))?,
    };
    Ok(format_invoice_number(next))
}

/// Lenient variant of [`try_next_invoice_number`]: anything unparseable
/// starts over at `INV-0001`.
///
/// Only suitable for suggestions shown before saving; numbers that are
/// actually issued come from the store's per-owner sequence.
pub fn next_invoice_number(last_issued: Option<&str>) -> String {
    try_next_invoice_number(last_issued).unwrap_or_else(|_| format_invoice_number(1))
}
