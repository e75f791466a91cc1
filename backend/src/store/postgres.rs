use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::calculator::{format_invoice_number, LineAmounts};
use shared::models::{
    Company, CompanyInput, Customer, CustomerInput, CustomerStatus, Invoice, InvoiceItem,
    NewInvoice,
};
use shared::types::Currency;
use sqlx::PgPool;
use uuid::Uuid;

use super::{customer_in_use, InvoiceFilter, Store};
use crate::error::{AppError, AppResult};

/// PostgreSQL foreign key violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

const COMPANY_COLUMNS: &str =
    "id, user_id, name, logo_url, address, phone, email, tax_number, bank_info, created_at, updated_at";

const CUSTOMER_COLUMNS: &str =
    "id, user_id, name, address, phone, email, tax_number, is_active, created_at, updated_at";

const INVOICE_COLUMNS: &str = "id, user_id, invoice_number, customer_id, invoice_date, due_date, \
     currency, notes, subtotal, tax_total, total, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, invoice_id, description, quantity, unit_price, tax_rate, total, order_index";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn customers_by_id(&self, owner: Uuid, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE user_id = $1 AND id = ANY($2)",
            CUSTOMER_COLUMNS
        ))
        .bind(owner)
        .bind(ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.id, Customer::from(row)))
            .collect())
    }
}

/// Database row for company
#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    logo_url: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    tax_number: Option<String>,
    bank_info: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            logo_url: row.logo_url,
            address: row.address,
            phone: row.phone,
            email: row.email,
            tax_number: row.tax_number,
            bank_info: row.bank_info,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for customer
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    tax_number: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            email: row.email,
            tax_number: row.tax_number,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for invoice header
#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    user_id: Uuid,
    invoice_number: String,
    customer_id: Uuid,
    invoice_date: NaiveDate,
    due_date: NaiveDate,
    currency: String,
    notes: Option<String>,
    subtotal: Decimal,
    tax_total: Decimal,
    total: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = AppError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let currency = Currency::from_code(&row.currency).ok_or_else(|| {
            AppError::Internal(format!("Unknown currency '{}' on invoice {}", row.currency, row.id))
        })?;

        Ok(Invoice {
            id: row.id,
            user_id: row.user_id,
            invoice_number: row.invoice_number,
            customer_id: row.customer_id,
            invoice_date: row.invoice_date,
            due_date: row.due_date,
            currency,
            notes: row.notes,
            subtotal: row.subtotal,
            tax_total: row.tax_total,
            total: row.total,
            created_at: row.created_at,
            updated_at: row.updated_at,
            customer: None,
            items: Vec::new(),
        })
    }
}

/// Database row for invoice item
#[derive(Debug, sqlx::FromRow)]
struct InvoiceItemRow {
    id: Uuid,
    invoice_id: Uuid,
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    tax_rate: Decimal,
    total: Decimal,
    order_index: i32,
}

impl From<InvoiceItemRow> for InvoiceItem {
    fn from(row: InvoiceItemRow) -> Self {
        InvoiceItem {
            id: row.id,
            invoice_id: row.invoice_id,
            description: row.description,
            quantity: row.quantity,
            unit_price: row.unit_price,
            tax_rate: row.tax_rate,
            total: row.total,
            order_index: row.order_index,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn find_company(&self, owner: Uuid) -> AppResult<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT {} FROM companies WHERE user_id = $1",
            COMPANY_COLUMNS
        ))
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Company::from))
    }

    async fn save_company(&self, owner: Uuid, input: &CompanyInput) -> AppResult<Company> {
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            r#"
            INSERT INTO companies (id, user_id, name, logo_url, address, phone, email, tax_number, bank_info)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE
            SET name = EXCLUDED.name, logo_url = EXCLUDED.logo_url, address = EXCLUDED.address,
                phone = EXCLUDED.phone, email = EXCLUDED.email, tax_number = EXCLUDED.tax_number,
                bank_info = EXCLUDED.bank_info, updated_at = NOW()
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&input.name)
        .bind(&input.logo_url)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.tax_number)
        .bind(&input.bank_info)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn list_customers(&self, owner: Uuid, status: CustomerStatus) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            SELECT {} FROM customers
            WHERE user_id = $1 AND ($2::boolean IS NULL OR is_active = $2)
            ORDER BY name
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(owner)
        .bind(status.is_active())
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn find_customer(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE id = $1 AND user_id = $2",
            CUSTOMER_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn insert_customer(&self, owner: Uuid, input: &CustomerInput) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            INSERT INTO customers (id, user_id, name, address, phone, email, tax_number, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.tax_number)
        .bind(input.is_active.unwrap_or(true))
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn update_customer(
        &self,
        owner: Uuid,
        id: Uuid,
        input: &CustomerInput,
    ) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            UPDATE customers
            SET name = $1, address = $2, phone = $3, email = $4, tax_number = $5,
                is_active = COALESCE($6, is_active), updated_at = NOW()
            WHERE id = $7 AND user_id = $8
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.tax_number)
        .bind(input.is_active)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn toggle_customer_active(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            UPDATE customers SET is_active = NOT is_active, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn delete_customer(&self, owner: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
                Err(customer_in_use())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_invoices(&self, owner: Uuid, filter: &InvoiceFilter) -> AppResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            r#"
            SELECT {} FROM invoices
            WHERE user_id = $1
              AND ($2::uuid IS NULL OR customer_id = $2)
              AND ($3::date IS NULL OR invoice_date >= $3)
              AND ($4::date IS NULL OR invoice_date <= $4)
            ORDER BY created_at DESC
            "#,
            INVOICE_COLUMNS
        ))
        .bind(owner)
        .bind(filter.customer_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.db)
        .await?;

        let mut invoices = rows
            .into_iter()
            .map(Invoice::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        let mut customer_ids: Vec<Uuid> = invoices.iter().map(|inv| inv.customer_id).collect();
        customer_ids.sort();
        customer_ids.dedup();
        let customers = self.customers_by_id(owner, &customer_ids).await?;

        for invoice in &mut invoices {
            invoice.customer = customers.get(&invoice.customer_id).cloned();
        }

        Ok(invoices)
    }

    async fn find_invoice(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {} FROM invoices WHERE id = $1 AND user_id = $2",
            INVOICE_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut invoice = Invoice::try_from(row)?;

        let items = sqlx::query_as::<_, InvoiceItemRow>(&format!(
            "SELECT {} FROM invoice_items WHERE invoice_id = $1 ORDER BY order_index",
            ITEM_COLUMNS
        ))
        .bind(invoice.id)
        .fetch_all(&self.db)
        .await?;

        invoice.items = items.into_iter().map(InvoiceItem::from).collect();
        invoice.customer = self.find_customer(owner, invoice.customer_id).await?;

        Ok(Some(invoice))
    }

    async fn last_invoice_number(&self, owner: Uuid) -> AppResult<Option<String>> {
        let number = sqlx::query_scalar::<_, String>(
            "SELECT invoice_number FROM invoices WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        Ok(number)
    }

    async fn create_invoice(&self, owner: Uuid, new: &NewInvoice) -> AppResult<Invoice> {
        let mut tx = self.db.begin().await?;

        // Row lock on the owner's counter serializes concurrent creations
        let sequence = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO invoice_sequences (user_id, last_value) VALUES ($1, 1)
            ON CONFLICT (user_id) DO UPDATE SET last_value = invoice_sequences.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(owner)
        .fetch_one(&mut *tx)
        .await?;

        let sequence = u32::try_from(sequence)
            .map_err(|_| AppError::Internal(format!("Invalid invoice sequence {}", sequence)))?;

        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            r#"
            INSERT INTO invoices (id, user_id, invoice_number, customer_id, invoice_date, due_date,
                                  currency, notes, subtotal, tax_total, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            INVOICE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(format_invoice_number(sequence))
        .bind(new.customer_id)
        .bind(new.invoice_date)
        .bind(new.due_date)
        .bind(new.currency.as_str())
        .bind(&new.notes)
        .bind(new.totals.subtotal)
        .bind(new.totals.tax_total)
        .bind(new.totals.total)
        .fetch_one(&mut *tx)
        .await?;

        let mut invoice = Invoice::try_from(row)?;

        for (index, item) in new.items.iter().enumerate() {
            let item_row = sqlx::query_as::<_, InvoiceItemRow>(&format!(
                r#"
                INSERT INTO invoice_items (id, invoice_id, description, quantity, unit_price,
                                           tax_rate, total, order_index)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING {}
                "#,
                ITEM_COLUMNS
            ))
            .bind(Uuid::new_v4())
            .bind(invoice.id)
            .bind(item.description())
            .bind(item.quantity())
            .bind(item.unit_price())
            .bind(item.tax_rate())
            .bind(item.total())
            .bind(index as i32)
            .fetch_one(&mut *tx)
            .await?;

            invoice.items.push(item_row.into());
        }

        // Read inside the transaction so nothing can fail once the commit succeeds
        let customer = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE id = $1 AND user_id = $2",
            CUSTOMER_COLUMNS
        ))
        .bind(invoice.customer_id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;
        invoice.customer = customer.map(Customer::from);

        tx.commit().await?;
        Ok(invoice)
    }
}
