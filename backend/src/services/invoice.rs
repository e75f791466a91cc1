//! Invoice service
//!
//! Numbers are allocated by the store inside the same atomic write as the
//! header and items. The client-side suggestion from [`next_invoice_number`]
//! is informational only.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::calculator::next_invoice_number;
use shared::document::InvoiceDocument;
use shared::models::{DraftPreview, Invoice, InvoiceDraft, LineItemInput};
use shared::types::Language;
use uuid::Uuid;

use super::export::{export_to_csv, InvoiceCsvRow};
use crate::config::InvoicingConfig;
use crate::error::{AppError, AppResult};
use crate::store::{InvoiceFilter, Store};

/// A blank invoice form
#[derive(Debug, Clone, Serialize)]
pub struct DraftTemplate {
    /// Number the invoice will most likely get; the saved one may differ
    pub suggested_number: String,
    pub draft: InvoiceDraft,
}

#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<dyn Store>,
    defaults: InvoicingConfig,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn Store>, defaults: InvoicingConfig) -> Self {
        Self { store, defaults }
    }

    /// Blank draft dated today with one default line
    pub async fn draft_template(&self, owner: Uuid) -> AppResult<DraftTemplate> {
        // A failed lookup must not fall back to INV-0001
        let last = self.store.last_invoice_number(owner).await?;
        let today = Utc::now().date_naive();

        Ok(DraftTemplate {
            suggested_number: next_invoice_number(last.as_deref()),
            draft: InvoiceDraft {
                customer_id: None,
                invoice_date: today,
                due_date: today,
                currency: self.defaults.default_currency,
                notes: None,
                items: vec![LineItemInput {
                    description: String::new(),
                    quantity: Decimal::ONE,
                    unit_price: Decimal::ZERO,
                    tax_rate: self.defaults.default_tax_rate,
                }],
            },
        })
    }

    /// Line and invoice totals of an unsaved draft
    pub fn preview(&self, draft: &InvoiceDraft) -> AppResult<DraftPreview> {
        Ok(draft.preview()?)
    }

    /// Validate, number and persist a draft
    pub async fn create(&self, owner: Uuid, draft: InvoiceDraft) -> AppResult<Invoice> {
        let new_invoice = draft.validate()?;

        let customer = self
            .store
            .find_customer(owner, new_invoice.customer_id)
            .await
            .map_err(|e| not_saved(owner, e))?
            .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        if !customer.is_active {
            return Err(AppError::Validation {
                field: "customer_id".to_string(),
                message: "Customer is inactive".to_string(),
                message_tr: "Müşteri pasif durumda".to_string(),
            });
        }

        let invoice = self
            .store
            .create_invoice(owner, &new_invoice)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) | AppError::Validation { .. } => e,
                other => not_saved(owner, other),
            })?;

        tracing::info!(
            owner = %owner,
            invoice_number = %invoice.invoice_number,
            total = %invoice.total,
            "Invoice created"
        );

        Ok(invoice)
    }

    /// Invoices newest first
    pub async fn list(&self, owner: Uuid, filter: &InvoiceFilter) -> AppResult<Vec<Invoice>> {
        self.store.list_invoices(owner, filter).await
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> AppResult<Invoice> {
        self.store
            .find_invoice(owner, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invoice".to_string()))
    }

    /// Printable document; `language` defaults to the configured one
    pub async fn document(
        &self,
        owner: Uuid,
        id: Uuid,
        language: Option<Language>,
    ) -> AppResult<InvoiceDocument> {
        let invoice = self.get(owner, id).await?;
        let company = self
            .store
            .find_company(owner)
            .await?
            .ok_or_else(|| AppError::NotFound("Company".to_string()))?;

        let language = language.unwrap_or(self.defaults.default_language);
        Ok(InvoiceDocument::build(&company, &invoice, language)?)
    }

    pub async fn export_csv(&self, owner: Uuid, filter: &InvoiceFilter) -> AppResult<String> {
        let invoices = self.list(owner, filter).await?;
        let rows: Vec<InvoiceCsvRow> = invoices.iter().map(InvoiceCsvRow::from).collect();
        export_to_csv(&rows)
    }
}

fn not_saved(owner: Uuid, err: AppError) -> AppError {
    tracing::error!(owner = %owner, error = %err, "Invoice could not be saved");
    AppError::InvoiceNotSaved(err.to_string())
}
