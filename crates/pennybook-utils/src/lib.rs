//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a string of digits with thousands separators
pub fn format_number(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format an amount with a fixed number of decimal places and grouped integer digits.
///
/// Rounds half away from zero, so `2.345` with two places becomes `2.35`.
pub fn format_amount(amount: Decimal, decimal_places: u32, separator: &str) -> String {
    let rounded = amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", decimal_places as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&format_number(int_part, separator));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Place a currency symbol before or after a formatted amount; a minus sign
/// always leads.
pub fn with_symbol(formatted: &str, symbol: &str, before: bool) -> String {
    if before {
        match formatted.strip_prefix('-') {
            Some(rest) => format!("-{}{}", symbol, rest),
            None => format!("{}{}", symbol, formatted),
        }
    } else {
        format!("{} {}", formatted, symbol)
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
    fn test_format_number() {
        assert_eq!(format_number("1234567", ","), "1,234,567");
        assert_eq!(format_number("123", ","), "123");
        assert_eq!(format_number("1000", " "), "1 000");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("125"), 2, ","), "125.00");
        assert_eq!(format_amount(dec("1234.5"), 2, ","), "1,234.50");
        assert_eq!(format_amount(dec("2.345"), 2, ","), "2.35");
        assert_eq!(format_amount(dec("-1500"), 0, ","), "-1,500");
        assert_eq!(format_amount(dec("-0.001"), 2, ","), "0.00");
    }

    #[test]
    fn test_with_symbol() {
        assert_eq!(with_symbol("85.00", "£", true), "£85.00");
        assert_eq!(with_symbol("-15.00", "£", true), "-£15.00");
        assert_eq!(with_symbol("85.00", "EUR", false), "85.00 EUR");
    }
}
