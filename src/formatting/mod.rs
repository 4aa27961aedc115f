pub mod currency;
pub mod dates;
pub mod words;

pub use currency::{format_currency, format_number_with_separators};
pub use dates::{datetime_cell, file_date, long_date_es};
pub use words::amount_to_words;

use crate::models::NOT_AVAILABLE;

/// Texto de un campo opcional, o `"N/A"` si está vacío.
pub fn or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Sí"
    } else {
        "No"
    }
}
