//! Locale-aware display formatting
//!
//! Amounts are stored unrounded; they are rounded to two decimals here and
//! nowhere else.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Currency, Language};

struct Separators {
    group: char,
    decimal: char,
}

fn separators(language: Language) -> Separators {
    match language {
        Language::Turkish => Separators {
            group: '.',
            decimal: ',',
        },
        Language::English => Separators {
            group: ',',
            decimal: '.',
        },
    }
}

/// Two-decimal amount with digit grouping: `1.234,56` (tr) or `1,234.56` (en)
pub fn format_amount(amount: Decimal, language: Language) -> String {
    let sep = separators(language);

    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let plain = rounded.abs().to_string();
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(sep.group);
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{}{}{}{}", sign, grouped, sep.decimal, fraction)
}

/// Amount followed by the currency code: `1.234,56 TL`
pub fn format_money(amount: Decimal, currency: Currency, language: Language) -> String {
    format!("{} {}", format_amount(amount, language), currency)
}

/// `16.10.2026` (tr) or `10/16/2026` (en)
pub fn format_date(date: NaiveDate, language: Language) -> String {
    match language {
        Language::Turkish => date.format("%d.%m.%Y").to_string(),
        Language::English => date.format("%m/%d/%Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_amount_turkish() {
        assert_eq!(format_amount(dec("1234.5"), Language::Turkish), "1.234,50");
        assert_eq!(format_amount(dec("0"), Language::Turkish), "0,00");
        assert_eq!(format_amount(dec("999"), Language::Turkish), "999,00");
        assert_eq!(format_amount(dec("1234567.891"), Language::Turkish), "1.234.567,89");
    }

    #[test]
    fn test_format_amount_english() {
        assert_eq!(format_amount(dec("1234.5"), Language::English), "1,234.50");
        assert_eq!(format_amount(dec("100000"), Language::English), "100,000.00");
    }

    #[test]
    fn test_format_amount_rounds_half_away_from_zero() {
        assert_eq!(format_amount(dec("2.345"), Language::English), "2.35");
        assert_eq!(format_amount(dec("2.3449"), Language::English), "2.34");
        assert_eq!(format_amount(dec("0.0118"), Language::English), "0.01");
    }

    #[test]
    fn test_format_amount_negative() {
        assert_eq!(format_amount(dec("-1234.5"), Language::Turkish), "-1.234,50");
        assert_eq!(format_amount(dec("-0.001"), Language::Turkish), "0,00");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec("286"), Currency::Tl, Language::Turkish), "286,00 TL");
        assert_eq!(format_money(dec("1500.2"), Currency::Usd, Language::English), "1,500.20 USD");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 6).unwrap();
        assert_eq!(format_date(date, Language::Turkish), "06.10.2026");
        assert_eq!(format_date(date, Language::English), "10/06/2026");
    }
}
