//! Persistence for companies, customers and invoices
//!
//! Every operation is scoped by the owner's user id. Two implementations:
//! [`PgStore`] for PostgreSQL and [`MemoryStore`] for development and tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{
    Company, CompanyInput, Customer, CustomerInput, CustomerStatus, Invoice, NewInvoice,
};
use shared::types::DateRange;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Invoice list filter, `from` and `to` inclusive on `invoice_date`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilter {
    pub customer_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl InvoiceFilter {
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.from,
            end: self.to,
        }
    }

    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.customer_id.map_or(true, |id| invoice.customer_id == id)
            && self.date_range().contains(invoice.invoice_date)
    }
}

/// Owner-scoped persistence operations
#[async_trait]
pub trait Store: Send + Sync {
    /// Check connectivity
    async fn ping(&self) -> AppResult<()>;

    async fn find_company(&self, owner: Uuid) -> AppResult<Option<Company>>;

    /// Insert the owner's company or replace its fields
    async fn save_company(&self, owner: Uuid, input: &CompanyInput) -> AppResult<Company>;

    /// Customers ordered by name
    async fn list_customers(&self, owner: Uuid, status: CustomerStatus) -> AppResult<Vec<Customer>>;

    async fn find_customer(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Customer>>;

    async fn insert_customer(&self, owner: Uuid, input: &CustomerInput) -> AppResult<Customer>;

    /// `None` when the customer does not exist for this owner.
    /// An absent `is_active` keeps the current value.
    async fn update_customer(
        &self,
        owner: Uuid,
        id: Uuid,
        input: &CustomerInput,
    ) -> AppResult<Option<Customer>>;

    /// Flips `is_active` in a single write and returns the new state
    async fn toggle_customer_active(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Customer>>;

    /// `false` when nothing was deleted. Fails with a conflict while
    /// invoices still reference the customer.
    async fn delete_customer(&self, owner: Uuid, id: Uuid) -> AppResult<bool>;

    /// Invoices newest first, each with its customer but without items
    async fn list_invoices(&self, owner: Uuid, filter: &InvoiceFilter) -> AppResult<Vec<Invoice>>;

    /// Invoice with its customer and items ordered by `order_index`
    async fn find_invoice(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Invoice>>;

    /// Number of the most recently created invoice
    async fn last_invoice_number(&self, owner: Uuid) -> AppResult<Option<String>>;

    /// Allocate the owner's next invoice number and write the header and all
    /// items as one unit. Either everything is stored or nothing is, and no
    /// two invoices of one owner receive the same number.
    async fn create_invoice(&self, owner: Uuid, invoice: &NewInvoice) -> AppResult<Invoice>;
}

/// Deleting a customer that invoices still reference
pub(crate) fn customer_in_use() -> AppError {
    AppError::Conflict {
        resource: "customer".to_string(),
        message: "Customer has invoices and cannot be deleted".to_string(),
        message_tr: "Faturası bulunan müşteri silinemez".to_string(),
    }
}
