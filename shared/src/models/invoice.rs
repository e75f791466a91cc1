//! Invoice and line item models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{normalize_text, Customer};
use crate::calculator::{
    compute_invoice_totals, item_amounts, AmountOverflow, InvoiceTotals, ItemAmounts, LineAmounts,
};
use crate::types::Currency;
use crate::validation::{validate_due_date, validate_non_negative, validate_required, FieldError};

/// A saved invoice. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Sequential per owner (e.g., "INV-0001")
    pub invoice_number: String,
    pub customer_id: Uuid,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub currency: Currency,
    pub notes: Option<String>,
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    /// Ordered by `order_index`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<InvoiceItem>,
}

impl Invoice {
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals {
            subtotal: self.subtotal,
            tax_total: self.tax_total,
            total: self.total,
        }
    }
}

/// A persisted invoice line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Percentage, e.g. 18 for 18%
    pub tax_rate: Decimal,
    pub total: Decimal,
    pub order_index: i32,
}

impl LineAmounts for InvoiceItem {
    fn quantity(&self) -> Decimal {
        self.quantity
    }

    fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }
}

/// Raw line as entered on the invoice form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemInput {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
}

/// A validated line being composed. `amounts` always reflect the current
/// quantity, unit price and tax rate.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineItem {
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    tax_rate: Decimal,
    #[serde(flatten)]
    amounts: ItemAmounts,
}

fn amount_too_large(field: &str) -> impl FnOnce(AmountOverflow) -> FieldError + '_ {
    move |_| FieldError::new(field, "Amount too large", "Tutar çok büyük")
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        tax_rate: Decimal,
    ) -> Result<Self, FieldError> {
        let description = description.into().trim().to_string();
        validate_required("description", &description)?;
        validate_non_negative("quantity", quantity)?;
        validate_non_negative("unit_price", unit_price)?;
        validate_non_negative("tax_rate", tax_rate)?;
        let amounts =
            item_amounts(quantity, unit_price, tax_rate).map_err(amount_too_large("quantity"))?;

        Ok(Self {
            description,
            quantity,
            unit_price,
            tax_rate,
            amounts,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn total(&self) -> Decimal {
        self.amounts.total
    }

    pub fn amounts(&self) -> ItemAmounts {
        self.amounts
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), FieldError> {
        let description = description.into().trim().to_string();
        validate_required("description", &description)?;
        self.description = description;
        Ok(())
    }

    /// A rejected value leaves the line unchanged
    pub fn set_quantity(&mut self, quantity: Decimal) -> Result<(), FieldError> {
        validate_non_negative("quantity", quantity)?;
        self.amounts = item_amounts(quantity, self.unit_price, self.tax_rate)
            .map_err(amount_too_large("quantity"))?;
        self.quantity = quantity;
        Ok(())
    }

    pub fn set_unit_price(&mut self, unit_price: Decimal) -> Result<(), FieldError> {
        validate_non_negative("unit_price", unit_price)?;
        self.amounts = item_amounts(self.quantity, unit_price, self.tax_rate)
            .map_err(amount_too_large("unit_price"))?;
        self.unit_price = unit_price;
        Ok(())
    }

    pub fn set_tax_rate(&mut self, tax_rate: Decimal) -> Result<(), FieldError> {
        validate_non_negative("tax_rate", tax_rate)?;
        self.amounts = item_amounts(self.quantity, self.unit_price, tax_rate)
            .map_err(amount_too_large("tax_rate"))?;
        self.tax_rate = tax_rate;
        Ok(())
    }
}

impl LineAmounts for LineItem {
    fn quantity(&self) -> Decimal {
        self.quantity
    }

    fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }
}

impl TryFrom<LineItemInput> for LineItem {
    type Error = FieldError;

    fn try_from(input: LineItemInput) -> Result<Self, Self::Error> {
        LineItem::new(input.description, input.quantity, input.unit_price, input.tax_rate)
    }
}

/// An invoice being composed, before it has a number
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceDraft {
    pub customer_id: Option<Uuid>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<LineItemInput>,
}

/// Computed amounts of a draft that has not been saved
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DraftPreview {
    pub items: Vec<LineItem>,
    pub totals: InvoiceTotals,
}

/// A draft that passed validation, ready to be written with a new number
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub customer_id: Uuid,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub currency: Currency,
    pub notes: Option<String>,
    /// In display order; stored with `order_index` = position
    pub items: Vec<LineItem>,
    pub totals: InvoiceTotals,
}

impl InvoiceDraft {
    /// Validate every line, reporting the offending one as `items[i].field`
    pub fn line_items(&self) -> Result<Vec<LineItem>, FieldError> {
        if self.items.is_empty() {
            return Err(FieldError::new(
                "items",
                "An invoice needs at least one item",
                "Faturada en az bir kalem olmalıdır",
            ));
        }

        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                LineItem::try_from(item.clone()).map_err(|e| e.within(&format!("items[{}]", index)))
            })
            .collect()
    }

    /// Compute line and invoice totals without saving
    pub fn preview(&self) -> Result<DraftPreview, FieldError> {
        let items = self.line_items()?;
        let totals = compute_invoice_totals(&items).map_err(amount_too_large("items"))?;
        Ok(DraftPreview { items, totals })
    }

    /// Full validation for submission: customer, dates and lines
    pub fn validate(self) -> Result<NewInvoice, FieldError> {
        let customer_id = self.customer_id.ok_or_else(|| {
            FieldError::new(
                "customer_id",
                "Please select a customer",
                "Lütfen bir müşteri seçin",
            )
        })?;
        validate_due_date(self.invoice_date, self.due_date)?;

        let items = self.line_items()?;
        let totals = compute_invoice_totals(&items).map_err(amount_too_large("items"))?;

        Ok(NewInvoice {
            customer_id,
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            currency: self.currency,
            notes: normalize_text(self.notes),
            items,
            totals,
        })
    }
}
