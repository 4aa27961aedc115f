use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{Amount, Currency};
use crate::models::NOT_AVAILABLE;

/// Formatea un monto con el prefijo de su moneda: `C$1,234.50`, `US$10.00`.
///
/// `"N/A"` si no hay monto; el texto original si no es numérico.
pub fn format_currency(amount: Option<&Amount>, currency: Option<&Currency>) -> String {
    let amount = match amount {
        Some(amount) if !amount.is_blank() => amount,
        _ => return NOT_AVAILABLE.to_string(),
    };

    let value = match amount.to_decimal() {
        Some(value) => value,
        None => return amount.raw(),
    };

    let symbol = currency.map(Currency::symbol).unwrap_or("");
    format!("{}{}", symbol, format_number_with_separators(value, 2))
}

/// Agrupa miles con coma y usa punto decimal.
pub fn format_number_with_separators(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let formatted = format!("{:.*}", decimals as usize, rounded.abs());

    let (integer, decimal) = match formatted.split_once('.') {
        Some((integer, decimal)) => (integer, Some(decimal)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    for (count, c) in integer.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let mut result: String = grouped.chars().rev().collect();

    if rounded.is_sign_negative() && !rounded.is_zero() {
        result.insert(0, '-');
    }
    if let Some(decimal) = decimal {
        result.push('.');
        result.push_str(decimal);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn groups_thousands() {
        let value = Decimal::from_str("1234567.891").unwrap();
        assert_eq!(format_number_with_separators(value, 2), "1,234,567.89");
    }

    #[test]
    fn keeps_sign_for_negative_values() {
        let value = Decimal::from_str("-1500").unwrap();
        assert_eq!(format_number_with_separators(value, 2), "-1,500.00");
    }

    #[test]
    fn small_values_are_not_grouped() {
        assert_eq!(format_number_with_separators(Decimal::from(999), 2), "999.00");
    }
}
