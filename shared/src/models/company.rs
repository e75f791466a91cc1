//! Company profile models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{check_tax_number, normalize_text};
use crate::validation::{validate_required, FieldError};

/// The seller profile printed on every invoice. One per owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub logo_url: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_number: Option<String>,
    /// Free-form payment details (IBAN, bank name)
    pub bank_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing the company profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CompanyInput {
    #[validate(length(max = 200))]
    pub name: String,
    #[validate(url)]
    pub logo_url: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub tax_number: Option<String>,
    pub bank_info: Option<String>,
}

impl CompanyInput {
    /// Trim every field, drop blank optionals and validate the result
    pub fn normalize(self) -> Result<Self, FieldError> {
        let input = CompanyInput {
            name: self.name.trim().to_string(),
            logo_url: normalize_text(self.logo_url),
            address: normalize_text(self.address),
            phone: normalize_text(self.phone),
            email: normalize_text(self.email),
            tax_number: normalize_text(self.tax_number),
            bank_info: normalize_text(self.bank_info),
        };

        validate_required("name", &input.name)?;
        input
            .validate()
            .map_err(|e| FieldError::from_validation_errors(&e))?;
        check_tax_number(input.tax_number.as_deref())?;

        Ok(input)
    }
}
