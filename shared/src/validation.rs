//! Validation utilities for the Invoicer platform
//!
//! Every failure carries a field name plus English and Turkish messages so
//! the caller can surface a field-level error in either language.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationErrors;

/// A field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {message_en}")]
pub struct FieldError {
    pub field: String,
    pub message_en: String,
    pub message_tr: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        message_en: impl Into<String>,
        message_tr: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message_en: message_en.into(),
            message_tr: message_tr.into(),
        }
    }

    /// Prefix the field name, e.g. `quantity` -> `items[2].quantity`
    pub fn within(mut self, prefix: &str) -> Self {
        self.field = format!("{}.{}", prefix, self.field);
        self
    }

    /// Convert derive-based validation failures into a single field error.
    ///
    /// Fields are visited in name order so the reported field is stable.
    pub fn from_validation_errors(errors: &ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.keys().copied().collect();
        fields.sort_unstable();

        let Some(field) = fields.first().copied() else {
            return FieldError::new("input", "Invalid input", "Geçersiz giriş");
        };
        let code = field_errors[field]
            .first()
            .map(|e| e.code.as_ref())
            .unwrap_or_default();

        match code {
            "email" => FieldError::new(field, "Invalid email format", "Geçersiz e-posta biçimi"),
            "length" => FieldError::new(
                field,
                format!("{} has an invalid length", field),
                format!("{} alanının uzunluğu geçersiz", field),
            ),
            "url" => FieldError::new(field, "Invalid URL", "Geçersiz bağlantı adresi"),
            _ => FieldError::new(
                field,
                format!("{} is invalid", field),
                format!("{} alanı geçersiz", field),
            ),
        }
    }
}

// ============================================================================
// Amount Validations
// ============================================================================

/// Reject negative monetary or quantity inputs
pub fn validate_non_negative(field: &str, value: Decimal) -> Result<(), FieldError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(FieldError::new(
            field,
            format!("{} cannot be negative", field),
            format!("{} negatif olamaz", field),
        ));
    }
    Ok(())
}

/// Reject empty or whitespace-only required text
pub fn validate_required(field: &str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(
            field,
            format!("{} is required", field),
            format!("{} zorunludur", field),
        ));
    }
    Ok(())
}

/// Due date must not precede the invoice date
pub fn validate_due_date(invoice_date: NaiveDate, due_date: NaiveDate) -> Result<(), FieldError> {
    if due_date < invoice_date {
        return Err(FieldError::new(
            "due_date",
            "Due date cannot be before the invoice date",
            "Vade tarihi fatura tarihinden önce olamaz",
        ));
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Same email rule as the `#[validate(email)]` derives on the input types
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if validator::validate_email(email) {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

// ============================================================================
// Turkey-Specific Validations
// ============================================================================

/// Validate a Turkish tax identifier.
///
/// Companies use a 10-digit VKN (vergi kimlik numarası); individuals use
/// their 11-digit TCKN (T.C. kimlik numarası), which carries two check digits.
pub fn validate_turkish_tax_number(tax_number: &str) -> Result<(), &'static str> {
    let digits: Vec<u32> = tax_number
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(10))
        .collect::<Option<_>>()
        .ok_or("Tax number must contain digits only")?;

    match digits.len() {
        10 => Ok(()),
        11 => validate_tckn(&digits),
        _ => Err("Tax number must be 10 (VKN) or 11 (TCKN) digits"),
    }
}

fn validate_tckn(d: &[u32]) -> Result<(), &'static str> {
    if d[0] == 0 {
        return Err("TCKN cannot start with 0");
    }

    let odd: u32 = d[0] + d[2] + d[4] + d[6] + d[8];
    let even: u32 = d[1] + d[3] + d[5] + d[7];
    let tenth = ((odd * 7 + 10 * 9) - even) % 10;
    if tenth != d[9] {
        return Err("Invalid TCKN checksum");
    }

    let eleventh = d[..10].iter().sum::<u32>() % 10;
    if eleventh != d[10] {
        return Err("Invalid TCKN checksum");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("quantity", Decimal::ZERO).is_ok());
        assert!(validate_non_negative("quantity", Decimal::new(15, 1)).is_ok());
        let err = validate_non_negative("quantity", Decimal::new(-1, 2)).unwrap_err();
        assert_eq!(err.field, "quantity");
        assert_eq!(err.message_tr, "quantity negatif olamaz");
    }

    #[test]
    fn test_negative_zero_is_accepted() {
        let negative_zero = -Decimal::ZERO;
        assert!(validate_non_negative("tax_rate", negative_zero).is_ok());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("name", "Acme").is_ok());
        assert!(validate_required("name", "   ").is_err());
    }

    #[test]
    fn test_field_error_within() {
        let err = FieldError::new("unit_price", "x", "y").within("items[2]");
        assert_eq!(err.field, "items[2].unit_price");
    }

    #[test]
    fn test_validate_due_date() {
        let d1 = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        assert!(validate_due_date(d1, d1).is_ok());
        assert!(validate_due_date(d1, d2).is_ok());
        assert_eq!(validate_due_date(d2, d1).unwrap_err().field, "due_date");
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("muhasebe@firma.com.tr").is_ok());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@firma.com").is_err());
    }

    #[test]
    fn test_validate_email_matches_input_derives() {
        for email in ["a@@b.com", "a b@c.com", "x@y.z."] {
            assert!(validate_email(email).is_err(), "{email} should be rejected");
        }
        assert!(validate_email("fatura+2024@ornek.com.tr").is_ok());
    }

    #[test]
    fn test_validate_turkish_tax_number_vkn() {
        assert!(validate_turkish_tax_number("1234567890").is_ok());
        assert!(validate_turkish_tax_number("123 456 7890").is_ok());
    }

    #[test]
    fn test_validate_turkish_tax_number_tckn() {
        assert!(validate_turkish_tax_number("10000000146").is_ok());
        assert!(validate_turkish_tax_number("10000000147").is_err());
        assert!(validate_turkish_tax_number("01234567890").is_err());
    }

    #[test]
    fn test_validate_turkish_tax_number_invalid() {
        assert!(validate_turkish_tax_number("12345").is_err());
        assert!(validate_turkish_tax_number("12345abcde").is_err());
        assert!(validate_turkish_tax_number("").is_err());
    }
}
