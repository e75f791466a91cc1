//! Company profile service. One profile per owner.

use std::sync::Arc;

use shared::models::{Company, CompanyInput};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::Store;

#[derive(Clone)]
pub struct CompanyService {
    store: Arc<dyn Store>,
}

impl CompanyService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Get the owner's company profile
    pub async fn get(&self, owner: Uuid) -> AppResult<Company> {
        self.store
            .find_company(owner)
            .await?
            .ok_or_else(|| AppError::NotFound("Company".to_string()))
    }

    /// Create or replace the owner's company profile
    pub async fn upsert(&self, owner: Uuid, input: CompanyInput) -> AppResult<Company> {
        let input = input.normalize()?;
        let company = self.store.save_company(owner, &input).await?;

        tracing::info!(owner = %owner, company_id = %company.id, "Company profile saved");
        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_upsert_replaces_profile() {
        let service = CompanyService::new(Arc::new(MemoryStore::new()));
        let owner = Uuid::new_v4();

        assert!(matches!(service.get(owner).await, Err(AppError::NotFound(_))));

        let first = service
            .upsert(
                owner,
                CompanyInput {
                    name: "Demir Yazılım".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let second = service
            .upsert(
                owner,
                CompanyInput {
                    name: " Demir Yazılım A.Ş. ".to_string(),
                    bank_info: Some("TR12 0006 2000 0000 0000 0000 01".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(service.get(owner).await.unwrap().name, "Demir Yazılım A.Ş.");
    }

    #[tokio::test]
    async fn test_upsert_rejects_blank_name() {
        let service = CompanyService::new(Arc::new(MemoryStore::new()));
        let err = service
            .upsert(Uuid::new_v4(), CompanyInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "name"));
    }
}
