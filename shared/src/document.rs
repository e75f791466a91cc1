//! Printable invoice document
//!
//! Everything an external PDF/print renderer needs, already localized and
//! formatted. The renderer never touches raw amounts.

use serde::Serialize;

use crate::format::{format_amount, format_date, format_money};
use crate::models::{Company, Invoice};
use crate::types::Language;
use crate::validation::FieldError;

/// Static captions of the invoice layout
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocumentLabels {
    pub title: &'static str,
    pub date: &'static str,
    pub due_date: &'static str,
    pub bill_to: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub tax_number: &'static str,
    pub description: &'static str,
    pub quantity: &'static str,
    pub unit_price: &'static str,
    pub tax_rate: &'static str,
    pub line_total: &'static str,
    pub subtotal: &'static str,
    pub tax_total: &'static str,
    pub total: &'static str,
    pub notes: &'static str,
    pub payment_details: &'static str,
}

impl DocumentLabels {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Turkish => Self {
                title: "FATURA",
                date: "Tarih",
                due_date: "Vade",
                bill_to: "Fatura Edilen",
                phone: "Tel",
                email: "E-posta",
                tax_number: "Vergi No",
                description: "Açıklama",
                quantity: "Miktar",
                unit_price: "Birim Fiyat",
                tax_rate: "KDV %",
                line_total: "Toplam",
                subtotal: "Ara Toplam",
                tax_total: "KDV",
                total: "Toplam",
                notes: "Notlar",
                payment_details: "Ödeme Bilgileri",
            },
            Language::English => Self {
                title: "INVOICE",
                date: "Date",
                due_date: "Due",
                bill_to: "Bill To",
                phone: "Phone",
                email: "Email",
                tax_number: "Tax No",
                description: "Description",
                quantity: "Quantity",
                unit_price: "Unit Price",
                tax_rate: "VAT %",
                line_total: "Total",
                subtotal: "Subtotal",
                tax_total: "VAT",
                total: "Total",
                notes: "Notes",
                payment_details: "Payment Details",
            },
        }
    }
}

/// Name and contact block of the seller or the customer
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PartyBlock {
    pub name: String,
    pub logo_url: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocumentRow {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub tax_rate: String,
    pub total: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub language: Language,
    pub file_name: String,
    pub labels: DocumentLabels,
    pub invoice_number: String,
    pub invoice_date: String,
    pub due_date: String,
    pub seller: PartyBlock,
    pub bill_to: PartyBlock,
    pub rows: Vec<DocumentRow>,
    pub subtotal: String,
    pub tax_total: String,
    pub total: String,
    pub notes: Option<String>,
    pub bank_info: Option<String>,
}

impl InvoiceDocument {
    /// Build the document for a saved invoice.
    ///
    /// The invoice must carry its customer; rows follow `order_index`.
    pub fn build(company: &Company, invoice: &Invoice, language: Language) -> Result<Self, FieldError> {
        let customer = invoice.customer.as_ref().ok_or_else(|| {
            FieldError::new(
                "customer",
                "Invoice customer is missing",
                "Fatura müşterisi bulunamadı",
            )
        })?;

        let mut items: Vec<_> = invoice.items.iter().collect();
        items.sort_by_key(|item| item.order_index);

        let rows = items
            .into_iter()
            .map(|item| DocumentRow {
                description: item.description.clone(),
                quantity: format_amount(item.quantity, language),
                unit_price: format_amount(item.unit_price, language),
                tax_rate: format_amount(item.tax_rate, language),
                total: format_amount(item.total, language),
            })
            .collect();

        Ok(Self {
            language,
            file_name: format!("{}.pdf", invoice.invoice_number),
            labels: DocumentLabels::for_language(language),
            invoice_number: invoice.invoice_number.clone(),
            invoice_date: format_date(invoice.invoice_date, language),
            due_date: format_date(invoice.due_date, language),
            seller: PartyBlock {
                name: company.name.clone(),
                logo_url: company.logo_url.clone(),
                address: company.address.clone(),
                phone: company.phone.clone(),
                email: company.email.clone(),
                tax_number: company.tax_number.clone(),
            },
            bill_to: PartyBlock {
                name: customer.name.clone(),
                logo_url: None,
                address: customer.address.clone(),
                phone: customer.phone.clone(),
                email: customer.email.clone(),
                tax_number: customer.tax_number.clone(),
            },
            rows,
            subtotal: format_money(invoice.subtotal, invoice.currency, language),
            tax_total: format_money(invoice.tax_total, invoice.currency, language),
            total: format_money(invoice.total, invoice.currency, language),
            notes: invoice.notes.clone(),
            bank_info: company.bank_info.clone(),
        })
    }
}
