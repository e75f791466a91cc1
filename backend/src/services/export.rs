//! CSV export of the invoice list

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use shared::models::Invoice;

use crate::error::{AppError, AppResult};

/// One exported invoice
#[derive(Debug, Serialize)]
pub struct InvoiceCsvRow {
    pub invoice_number: String,
    pub invoice_date: String,
    pub due_date: String,
    pub customer: String,
    pub currency: String,
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
}

impl From<&Invoice> for InvoiceCsvRow {
    fn from(invoice: &Invoice) -> Self {
        Self {
            invoice_number: invoice.invoice_number.clone(),
            invoice_date: invoice.invoice_date.to_string(),
            due_date: invoice.due_date.to_string(),
            customer: invoice
                .customer
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            currency: invoice.currency.to_string(),
            subtotal: round_cents(invoice.subtotal),
            tax_total: round_cents(invoice.tax_total),
            total: round_cents(invoice.total),
        }
    }
}

/// Always two decimal places so every row reads the same way
fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Export data to CSV format
pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)
            .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_writes_header_and_rows() {
        let rows = vec![InvoiceCsvRow {
            invoice_number: "INV-0001".to_string(),
            invoice_date: "2024-06-01".to_string(),
            due_date: "2024-06-30".to_string(),
            customer: "Yıldız Market".to_string(),
            currency: "TL".to_string(),
            subtotal: round_cents(Decimal::new(2500, 1)),
            tax_total: round_cents(Decimal::new(36005, 3)),
            total: Decimal::new(28601, 2),
        }];

        let csv = export_to_csv(&rows).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("invoice_number,invoice_date,due_date,customer,currency,subtotal,tax_total,total")
        );
        assert_eq!(
            lines.next(),
            Some("INV-0001,2024-06-01,2024-06-30,Yıldız Market,TL,250.00,36.01,286.01")
        );
    }
}
