//! Customer models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{check_tax_number, normalize_text};
use crate::validation::{validate_required, FieldError};

/// A customer invoices are issued to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_number: Option<String>,
    /// Inactive customers are kept for history but cannot be invoiced
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a customer
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CustomerInput {
    #[validate(length(max = 200))]
    pub name: String,
    pub address: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub tax_number: Option<String>,
    pub is_active: Option<bool>,
}

impl CustomerInput {
    /// Trim every field, drop blank optionals and validate the result
    pub fn normalize(self) -> Result<Self, FieldError> {
        let input = CustomerInput {
            name: self.name.trim().to_string(),
            address: normalize_text(self.address),
            phone: normalize_text(self.phone),
            email: normalize_text(self.email),
            tax_number: normalize_text(self.tax_number),
            is_active: self.is_active,
        };

        validate_required("name", &input.name)?;
        input
            .validate()
            .map_err(|e| FieldError::from_validation_errors(&e))?;
        check_tax_number(input.tax_number.as_deref())?;

        Ok(input)
    }
}

/// Customer list filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    #[default]
    All,
    Active,
    Inactive,
}

impl CustomerStatus {
    pub fn matches(&self, customer: &Customer) -> bool {
        match self {
            CustomerStatus::All => true,
            CustomerStatus::Active => customer.is_active,
            CustomerStatus::Inactive => !customer.is_active,
        }
    }

    /// `is_active` value to filter on, `None` for no filter
    pub fn is_active(&self) -> Option<bool> {
        match self {
            CustomerStatus::All => None,
            CustomerStatus::Active => Some(true),
            CustomerStatus::Inactive => Some(false),
        }
    }
}
