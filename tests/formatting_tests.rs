use rust_decimal_macros::dec;
use solicitudes_aduana::core::{Amount, Currency};
use solicitudes_aduana::formatting::{
    amount_to_words, format_currency, format_number_with_separators, long_date_es,
};

fn words(amount: impl Into<Amount>, currency: &str) -> String {
    amount_to_words(Some(&amount.into()), Some(&Currency::from_code(currency)))
}

fn money(amount: impl Into<Amount>, currency: &str) -> String {
    format_currency(Some(&amount.into()), Some(&Currency::from_code(currency)))
}

#[test]
fn zero_cordobas() {
    assert_eq!(words(0.0, "cordoba"), "CERO CON 00/100 CORDOBAS");
}

#[test]
fn twenty_one_dollars_uses_fused_form() {
    let text = words(21.0, "dolar");
    assert!(text.contains("VEINTIUNO"), "{}", text);
    assert!(text.ends_with("DOLARES"), "{}", text);
}

#[test]
fn one_thousand_euros_starts_with_mil() {
    let text = words(1000.0, "euro");
    assert!(text.starts_with("MIL"), "{}", text);
    assert!(!text.starts_with("UNO MIL"));
    assert_eq!(text, "MIL CON 00/100 EUROS");
}

#[test]
fn cents_are_rounded_half_up() {
    assert_eq!(words("1234.567", "cordoba"), "MIL DOSCIENTOS TREINTA Y CUATRO CON 57/100 CORDOBAS");
    assert_eq!(words("0.005", "dolar"), "CERO CON 01/100 DOLARES");
}

#[test]
fn unknown_currency_passes_through_uppercased() {
    assert_eq!(words(5.0, "yen"), "CINCO CON 00/100 YEN");
}

#[test]
fn hundreds_never_take_y() {
    assert_eq!(words(135.0, "cordoba"), "CIENTO TREINTA Y CINCO CON 00/100 CORDOBAS");
    assert_eq!(words(100.0, "cordoba"), "CIEN CON 00/100 CORDOBAS");
}

#[test]
fn missing_or_invalid_amounts_give_empty_words() {
    let cordoba = Currency::Cordoba;
    assert_eq!(amount_to_words(None, Some(&cordoba)), "");
    assert_eq!(amount_to_words(Some(&Amount::from(10.0)), None), "");
    assert_eq!(words("abc", "cordoba"), "");
    assert_eq!(words(-5.0, "cordoba"), "");
    assert_eq!(words("", "cordoba"), "");
}

#[test]
fn cordoba_amount_is_grouped_with_two_decimals() {
    assert_eq!(money(1234.5, "cordoba"), "C$1,234.50");
    assert_eq!(money(1_000_000.0, "dolar"), "US$1,000,000.00");
    assert_eq!(money("15", "euro"), "€15.00");
    assert_eq!(money(42.0, "yen"), "42.00");
}

#[test]
fn missing_amount_is_not_available() {
    let dolar = Currency::Dolar;
    assert_eq!(format_currency(None, Some(&dolar)), "N/A");
    assert_eq!(money("   ", "dolar"), "N/A");
}

#[test]
fn non_numeric_amount_is_kept_verbatim() {
    assert_eq!(money("pendiente", "cordoba"), "pendiente");
}

#[test]
fn decimal_comma_amounts_are_not_reinterpreted() {
    for text in ["1,5", "2,50", "1.234,50"] {
        assert_eq!(money(text, "cordoba"), text);
        assert_eq!(words(text, "cordoba"), "");
    }
}

#[test]
fn grouped_text_amounts_are_parsed() {
    assert_eq!(money("1,234.50", "cordoba"), "C$1,234.50");
    assert_eq!(
        words("1,234.50", "cordoba"),
        "MIL DOSCIENTOS TREINTA Y CUATRO CON 50/100 CORDOBAS"
    );
}

#[test]
fn grouping_helper_handles_small_values() {
    assert_eq!(format_number_with_separators(dec!(0.5), 2), "0.50");
    assert_eq!(format_number_with_separators(dec!(12345), 0), "12,345");
}

#[test]
fn long_dates_are_spanish() {
    let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    assert_eq!(long_date_es(date), "19 de octubre de 2026");
}
