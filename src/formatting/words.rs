use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{Amount, Currency};

const UNITS: [&str; 10] = [
    "", "UNO", "DOS", "TRES", "CUATRO", "CINCO", "SEIS", "SIETE", "OCHO", "NUEVE",
];

const TEENS: [&str; 10] = [
    "DIEZ", "ONCE", "DOCE", "TRECE", "CATORCE", "QUINCE", "DIECISEIS", "DIECISIETE",
    "DIECIOCHO", "DIECINUEVE",
];

const TENS: [&str; 10] = [
    "", "", "VEINTE", "TREINTA", "CUARENTA", "CINCUENTA", "SESENTA", "SETENTA", "OCHENTA",
    "NOVENTA",
];

const HUNDREDS: [&str; 10] = [
    "", "CIENTO", "DOSCIENTOS", "TRESCIENTOS", "CUATROCIENTOS", "QUINIENTOS", "SEISCIENTOS",
    "SETECIENTOS", "OCHOCIENTOS", "NOVECIENTOS",
];

/// Convierte un monto al texto legal usado en las solicitudes,
/// p. ej. `"MIL DOSCIENTOS CON 50/100 CORDOBAS"`.
///
/// Devuelve cadena vacía cuando falta el monto o la moneda, o cuando el monto
/// no es numérico o es negativo. La conversión es deliberadamente simple: no
/// hay millones ni singular, así el texto coincide con lo ya guardado.
pub fn amount_to_words(amount: Option<&Amount>, currency: Option<&Currency>) -> String {
    let (amount, currency) = match (amount, currency) {
        (Some(amount), Some(currency)) if !amount.is_blank() && !currency.is_blank() => {
            (amount, currency)
        }
        _ => return String::new(),
    };

    let value = match amount.to_decimal() {
        Some(value) if !value.is_sign_negative() || value.is_zero() => value,
        _ => return String::new(),
    };

    let plural = currency.plural_word();

    if value.is_zero() {
        return format!("CERO CON 00/100 {}", plural);
    }

    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let integer = rounded.trunc();
    let cents = ((rounded - integer) * Decimal::ONE_HUNDRED)
        .round()
        .to_u64()
        .unwrap_or(0);

    let integer_words = match integer.to_u64() {
        Some(0) => "CERO".to_string(),
        Some(n) => number_words(n),
        None => return String::new(),
    };

    format!("{} CON {:02}/100 {}", integer_words, cents, plural)
}

/// Palabras para un entero positivo. Los miles se resuelven con la misma
/// función, por eso un millón sale como "MIL MIL".
fn number_words(n: u64) -> String {
    match n {
        0 => String::new(),
        1..=9 => UNITS[n as usize].to_string(),
        10..=19 => TEENS[(n - 10) as usize].to_string(),
        20 => "VEINTE".to_string(),
        21..=29 => format!("VEINTI{}", UNITS[(n - 20) as usize]),
        30..=99 => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                units => format!("{} Y {}", tens, UNITS[units as usize]),
            }
        }
        100 => "CIEN".to_string(),
        101..=999 => {
            let hundreds = HUNDREDS[(n / 100) as usize];
            match n % 100 {
                0 => hundreds.to_string(),
                rest => format!("{} {}", hundreds, number_words(rest)),
            }
        }
        _ => {
            let thousands = n / 1000;
            let prefix = if thousands == 1 {
                "MIL".to_string()
            } else {
                format!("{} MIL", number_words(thousands))
            };
            match n % 1000 {
                0 => prefix,
                rest => format!("{} {}", prefix, number_words(rest)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irregular_forms() {
        assert_eq!(number_words(15), "QUINCE");
        assert_eq!(number_words(20), "VEINTE");
        assert_eq!(number_words(22), "VEINTIDOS");
        assert_eq!(number_words(45), "CUARENTA Y CINCO");
        assert_eq!(number_words(100), "CIEN");
        assert_eq!(number_words(101), "CIENTO UNO");
        assert_eq!(number_words(999), "NOVECIENTOS NOVENTA Y NUEVE");
    }

    #[test]
    fn thousands_recurse() {
        assert_eq!(number_words(1000), "MIL");
        assert_eq!(number_words(2500), "DOS MIL QUINIENTOS");
        assert_eq!(number_words(21_021), "VEINTIUNO MIL VEINTIUNO");
        assert_eq!(number_words(1_000_000), "MIL MIL");
    }
}
