//! Domain models for the Invoicer platform

mod company;
mod customer;
mod invoice;

pub use company::*;
pub use customer::*;
pub use invoice::*;

/// Trim optional free text; blank strings become `None`
pub(crate) fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Tax numbers made only of digits must be valid Turkish identifiers;
/// anything else (foreign VAT ids) is stored as entered.
pub(crate) fn check_tax_number(tax_number: Option<&str>) -> Result<(), crate::FieldError> {
    match tax_number {
        Some(number) if number.chars().all(|c| c.is_ascii_digit() || c == ' ') => {
            crate::validate_turkish_tax_number(number).map_err(|msg| {
                crate::FieldError::new(
                    "tax_number",
                    msg,
                    "Vergi numarası 10 haneli VKN veya 11 haneli TCKN olmalıdır",
                )
            })
        }
        _ => Ok(()),
    }
}
