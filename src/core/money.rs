use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monto tal como lo captura el formulario: número o texto numérico.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Un texto vacío cuenta como monto ausente.
    pub fn is_blank(&self) -> bool {
        match self {
            Amount::Number(_) => false,
            Amount::Text(s) => s.trim().is_empty(),
        }
    }

    /// Valor decimal exacto, o `None` si no es un número finito.
    ///
    /// Las comas solo se aceptan como separador de miles (`1,234.50`). Una
    /// coma decimal como `2,50` no es un número.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Amount::Number(n) => Decimal::from_f64(*n),
            Amount::Text(s) => {
                let trimmed = s.trim();
                if let Ok(value) = Decimal::from_str(trimmed) {
                    return Some(value);
                }
                if has_thousands_grouping(trimmed) {
                    Decimal::from_str(&trimmed.replace(',', "")).ok()
                } else {
                    None
                }
            }
        }
    }

    /// Representación original, usada cuando el valor no es numérico.
    pub fn raw(&self) -> String {
        match self {
            Amount::Number(n) => n.to_string(),
            Amount::Text(s) => s.clone(),
        }
    }
}

/// `^-?\d{1,3}(,\d{3})+(\.\d+)?$`
fn has_thousands_grouping(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if let Some(fraction) = fraction {
        if !all_digits(fraction) {
            return false;
        }
    }

    let mut groups = integer.split(',');
    let first_ok = groups
        .next()
        .map(|first| all_digits(first) && first.len() <= 3)
        .unwrap_or(false);
    let rest: Vec<&str> = groups.collect();
    first_ok && !rest.is_empty() && rest.into_iter().all(|group| all_digits(group) && group.len() == 3)
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Amount::Text(value)
    }
}

/// Moneda de la solicitud. Los códigos no reconocidos se conservan tal cual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    Cordoba,
    Dolar,
    Euro,
    Other(String),
}

impl Currency {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "cordoba" | "cordobas" | "córdoba" | "córdobas" | "nio" => Currency::Cordoba,
            "dolar" | "dolares" | "dólar" | "dólares" | "usd" => Currency::Dolar,
            "euro" | "euros" | "eur" => Currency::Euro,
            _ => Currency::Other(code.trim().to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Currency::Cordoba => "cordoba",
            Currency::Dolar => "dolar",
            Currency::Euro => "euro",
            Currency::Other(code) => code,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Currency::Other(code) if code.trim().is_empty())
    }

    /// Prefijo usado al mostrar montos.
    pub fn symbol(&self) -> &str {
        match self {
            Currency::Cordoba => "C$",
            Currency::Dolar => "US$",
            Currency::Euro => "€",
            Currency::Other(_) => "",
        }
    }

    /// Nombre en plural usado en el monto en letras.
    pub fn plural_word(&self) -> String {
        match self {
            Currency::Cordoba => "CORDOBAS".to_string(),
            Currency::Dolar => "DOLARES".to_string(),
            Currency::Euro => "EUROS".to_string(),
            Currency::Other(code) => code.to_uppercase(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Currency::Cordoba => "Córdobas",
            Currency::Dolar => "Dólares",
            Currency::Euro => "Euros",
            Currency::Other(code) => code,
        }
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        Currency::from_code(&code)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
