use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use shared::calculator::{format_invoice_number, LineAmounts};
use shared::models::{
    Company, CompanyInput, Customer, CustomerInput, CustomerStatus, Invoice, InvoiceItem,
    NewInvoice,
};
use uuid::Uuid;

use super::{customer_in_use, InvoiceFilter, Store};
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
struct Tables {
    /// Keyed by owner, one company each
    companies: HashMap<Uuid, Company>,
    customers: HashMap<Uuid, Customer>,
    /// Insertion order is creation order
    invoices: Vec<Invoice>,
    /// Last number handed out per owner
    sequences: HashMap<Uuid, u32>,
}

/// Process-local store.
///
/// Intended for tests and local runs. Invoice creation holds the write lock
/// from number allocation to the last item, so it is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| AppError::StorageUnavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| AppError::StorageUnavailable("lock poisoned".to_string()))
    }
}

impl Tables {
    fn owned_customer(&self, owner: Uuid, id: Uuid) -> Option<&Customer> {
        self.customers.get(&id).filter(|c| c.user_id == owner)
    }

    fn with_customer(&self, invoice: &Invoice) -> Invoice {
        let mut invoice = invoice.clone();
        invoice.customer = self.customers.get(&invoice.customer_id).cloned();
        invoice
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        self.read().map(|_| ())
    }

    async fn find_company(&self, owner: Uuid) -> AppResult<Option<Company>> {
        Ok(self.read()?.companies.get(&owner).cloned())
    }

    async fn save_company(&self, owner: Uuid, input: &CompanyInput) -> AppResult<Company> {
        let mut tables = self.write()?;
        let now = Utc::now();

        let company = tables.companies.entry(owner).or_insert_with(|| Company {
            id: Uuid::new_v4(),
            user_id: owner,
            name: String::new(),
            logo_url: None,
            address: None,
            phone: None,
            email: None,
            tax_number: None,
            bank_info: None,
            created_at: now,
            updated_at: now,
        });

        company.name = input.name.clone();
        company.logo_url = input.logo_url.clone();
        company.address = input.address.clone();
        company.phone = input.phone.clone();
        company.email = input.email.clone();
        company.tax_number = input.tax_number.clone();
        company.bank_info = input.bank_info.clone();
        company.updated_at = now;

        Ok(company.clone())
    }

    async fn list_customers(&self, owner: Uuid, status: CustomerStatus) -> AppResult<Vec<Customer>> {
        let tables = self.read()?;
        let mut customers: Vec<Customer> = tables
            .customers
            .values()
            .filter(|c| c.user_id == owner && status.matches(c))
            .cloned()
            .collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn find_customer(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Customer>> {
        Ok(self.read()?.owned_customer(owner, id).cloned())
    }

    async fn insert_customer(&self, owner: Uuid, input: &CustomerInput) -> AppResult<Customer> {
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            user_id: owner,
            name: input.name.clone(),
            address: input.address.clone(),
            phone: input.phone.clone(),
            email: input.email.clone(),
            tax_number: input.tax_number.clone(),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        self.write()?.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn update_customer(
        &self,
        owner: Uuid,
        id: Uuid,
        input: &CustomerInput,
    ) -> AppResult<Option<Customer>> {
        let mut tables = self.write()?;
        let Some(customer) = tables.customers.get_mut(&id).filter(|c| c.user_id == owner) else {
            return Ok(None);
        };

        customer.name = input.name.clone();
        customer.address = input.address.clone();
        customer.phone = input.phone.clone();
        customer.email = input.email.clone();
        customer.tax_number = input.tax_number.clone();
        if let Some(is_active) = input.is_active {
            customer.is_active = is_active;
        }
        customer.updated_at = Utc::now();

        Ok(Some(customer.clone()))
    }

    async fn toggle_customer_active(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Customer>> {
        let mut tables = self.write()?;
        Ok(tables
            .customers
            .get_mut(&id)
            .filter(|c| c.user_id == owner)
            .map(|customer| {
                customer.is_active = !customer.is_active;
                customer.updated_at = Utc::now();
                customer.clone()
            }))
    }

    async fn delete_customer(&self, owner: Uuid, id: Uuid) -> AppResult<bool> {
        let mut tables = self.write()?;
        if tables.owned_customer(owner, id).is_none() {
            return Ok(false);
        }
        if tables.invoices.iter().any(|inv| inv.customer_id == id) {
            return Err(customer_in_use());
        }
        Ok(tables.customers.remove(&id).is_some())
    }

    async fn list_invoices(&self, owner: Uuid, filter: &InvoiceFilter) -> AppResult<Vec<Invoice>> {
        let tables = self.read()?;
        Ok(tables
            .invoices
            .iter()
            .rev()
            .filter(|inv| inv.user_id == owner && filter.matches(inv))
            .map(|inv| {
                let mut invoice = tables.with_customer(inv);
                invoice.items.clear();
                invoice
            })
            .collect())
    }

    async fn find_invoice(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Invoice>> {
        let tables = self.read()?;
        Ok(tables
            .invoices
            .iter()
            .find(|inv| inv.id == id && inv.user_id == owner)
            .map(|inv| tables.with_customer(inv)))
    }

    async fn last_invoice_number(&self, owner: Uuid) -> AppResult<Option<String>> {
        Ok(self
            .read()?
            .invoices
            .iter()
            .rev()
            .find(|inv| inv.user_id == owner)
            .map(|inv| inv.invoice_number.clone()))
    }

    async fn create_invoice(&self, owner: Uuid, new: &NewInvoice) -> AppResult<Invoice> {
        let mut tables = self.write()?;

        if tables.owned_customer(owner, new.customer_id).is_none() {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let last = tables.sequences.get(&owner).copied().unwrap_or(0);
        let sequence = last
            .checked_add(1)
            .ok_or_else(|| AppError::Internal("invoice sequence exhausted".to_string()))?;

        let now = Utc::now();
        let id = Uuid::new_v4();
        let items = new
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| InvoiceItem {
                id: Uuid::new_v4(),
                invoice_id: id,
                description: item.description().to_string(),
                quantity: item.quantity(),
                unit_price: item.unit_price(),
                tax_rate: item.tax_rate(),
                total: item.total(),
                order_index: index as i32,
            })
            .collect();

        let invoice = Invoice {
            id,
            user_id: owner,
            invoice_number: format_invoice_number(sequence),
            customer_id: new.customer_id,
            invoice_date: new.invoice_date,
            due_date: new.due_date,
            currency: new.currency,
            notes: new.notes.clone(),
            subtotal: new.totals.subtotal,
            tax_total: new.totals.tax_total,
            total: new.totals.total,
            created_at: now,
            updated_at: now,
            customer: None,
            items,
        };

        tables.sequences.insert(owner, sequence);
        tables.invoices.push(invoice.clone());

        Ok(tables.with_customer(&invoice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::models::LineItem;

    fn customer_input(name: &str) -> CustomerInput {
        CustomerInput {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn new_invoice(customer_id: Uuid) -> NewInvoice {
        let items = vec![LineItem::new("Hizmet", Decimal::ONE, Decimal::from(100), Decimal::from(18)).unwrap()];
        NewInvoice {
            customer_id,
            invoice_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            currency: Default::default(),
            notes: None,
            totals: shared::calculator::compute_invoice_totals(&items).unwrap(),
            items,
        }
    }

    #[tokio::test]
    async fn test_numbers_are_per_owner() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let a = store.insert_customer(alice, &customer_input("A")).await.unwrap();
        let b = store.insert_customer(bob, &customer_input("B")).await.unwrap();

        let first = store.create_invoice(alice, &new_invoice(a.id)).await.unwrap();
        let second = store.create_invoice(alice, &new_invoice(a.id)).await.unwrap();
        let other = store.create_invoice(bob, &new_invoice(b.id)).await.unwrap();

        assert_eq!(first.invoice_number, "INV-0001");
        assert_eq!(second.invoice_number, "INV-0002");
        assert_eq!(other.invoice_number, "INV-0001");
        assert_eq!(
            store.last_invoice_number(alice).await.unwrap().as_deref(),
            Some("INV-0002")
        );
    }

    #[tokio::test]
    async fn test_customers_sorted_and_scoped() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        store.insert_customer(owner, &customer_input("Zeytin")).await.unwrap();
        store.insert_customer(owner, &customer_input("Armut")).await.unwrap();
        store.insert_customer(Uuid::new_v4(), &customer_input("Başka")).await.unwrap();

        let names: Vec<String> = store
            .list_customers(owner, CustomerStatus::All)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Armut", "Zeytin"]);
    }

    #[tokio::test]
    async fn test_delete_customer_with_invoices_conflicts() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let customer = store.insert_customer(owner, &customer_input("A")).await.unwrap();
        store.create_invoice(owner, &new_invoice(customer.id)).await.unwrap();

        let err = store.delete_customer(owner, customer.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert!(!store.delete_customer(owner, Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_customer_stores_nothing() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        assert!(store.create_invoice(owner, &new_invoice(Uuid::new_v4())).await.is_err());
        assert!(store.last_invoice_number(owner).await.unwrap().is_none());

        // the failed attempt did not consume a number
        let customer = store.insert_customer(owner, &customer_input("A")).await.unwrap();
        let invoice = store.create_invoice(owner, &new_invoice(customer.id)).await.unwrap();
        assert_eq!(invoice.invoice_number, "INV-0001");
        assert_eq!(invoice.items[0].order_index, 0);
    }
}
