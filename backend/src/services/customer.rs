//! Customer management service

use std::sync::Arc;

use shared::models::{Customer, CustomerInput, CustomerStatus};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::Store;

#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn Store>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// List customers ordered by name
    pub async fn list(&self, owner: Uuid, status: CustomerStatus) -> AppResult<Vec<Customer>> {
        self.store.list_customers(owner, status).await
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> AppResult<Customer> {
        self.store
            .find_customer(owner, id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn create(&self, owner: Uuid, input: CustomerInput) -> AppResult<Customer> {
        let input = input.normalize()?;
        let customer = self.store.insert_customer(owner, &input).await?;

        tracing::info!(owner = %owner, customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    pub async fn update(&self, owner: Uuid, id: Uuid, input: CustomerInput) -> AppResult<Customer> {
        let input = input.normalize()?;
        self.store
            .update_customer(owner, id, &input)
            .await?
            .ok_or_else(not_found)
    }

    /// Flip `is_active`; inactive customers cannot be invoiced
    pub async fn toggle_active(&self, owner: Uuid, id: Uuid) -> AppResult<Customer> {
        let customer = self
            .store
            .toggle_customer_active(owner, id)
            .await?
            .ok_or_else(not_found)?;

        tracing::info!(
            owner = %owner,
            customer_id = %id,
            is_active = customer.is_active,
            "Customer status changed"
        );
        Ok(customer)
    }

    /// Delete a customer that no invoice references
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<()> {
        if !self.store.delete_customer(owner, id).await? {
            return Err(not_found());
        }

        tracing::info!(owner = %owner, customer_id = %id, "Customer deleted");
        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Customer".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn input(name: &str) -> CustomerInput {
        CustomerInput {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_toggle_and_filter() {
        let service = CustomerService::new(Arc::new(MemoryStore::new()));
        let owner = Uuid::new_v4();
        let a = service.create(owner, input("Armut")).await.unwrap();
        service.create(owner, input("Badem")).await.unwrap();

        let toggled = service.toggle_active(owner, a.id).await.unwrap();
        assert!(!toggled.is_active);

        let active = service.list(owner, CustomerStatus::Active).await.unwrap();
        let inactive = service.list(owner, CustomerStatus::Inactive).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Badem");
        assert_eq!(inactive[0].id, a.id);

        assert!(service.toggle_active(owner, a.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_concurrent_toggles_each_flip_once() {
        let service = Arc::new(CustomerService::new(Arc::new(MemoryStore::new())));
        let owner = Uuid::new_v4();
        let customer = service.create(owner, input("Ceviz")).await.unwrap();
        assert!(customer.is_active);
        let id = customer.id;

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.toggle_active(owner, id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // An even number of flips lands back on the starting state
        assert!(service.get(owner, id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_toggle_unknown_customer_is_not_found() {
        let service = CustomerService::new(Arc::new(MemoryStore::new()));
        assert!(matches!(
            service.toggle_active(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_other_owner_cannot_see_customer() {
        let service = CustomerService::new(Arc::new(MemoryStore::new()));
        let customer = service.create(Uuid::new_v4(), input("Gizli")).await.unwrap();

        let stranger = Uuid::new_v4();
        assert!(matches!(
            service.get(stranger, customer.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(stranger, customer.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_status_when_absent() {
        let service = CustomerService::new(Arc::new(MemoryStore::new()));
        let owner = Uuid::new_v4();
        let customer = service
            .create(
                owner,
                CustomerInput {
                    is_active: Some(false),
                    ..input("Kiraz")
                },
            )
            .await
            .unwrap();

        let updated = service
            .update(
                owner,
                customer.id,
                CustomerInput {
                    email: Some("satis@kiraz.com".to_string()),
                    ..input("Kiraz Ltd.")
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Kiraz Ltd.");
        assert!(!updated.is_active);
    }
}
