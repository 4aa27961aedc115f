use chrono::{Datelike, NaiveDate, NaiveDateTime};

const MONTHS: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];

/// Fecha larga en español: `19 de octubre de 2026`.
pub fn long_date_es(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Formato de celdas de fecha en exportaciones tabulares.
pub fn datetime_cell(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn file_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
