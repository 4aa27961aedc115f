use serde::{Deserialize, Serialize};

/// Valor literal que el formulario guarda cuando el pago es por cheque.
pub const NO_BANK_SENTINEL: &str = "ACCION POR CHEQUE/NO APLICA BANCO";

/// Texto usado para cualquier valor ausente en reportes.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bank {
    Banpro,
    Bac,
    Lafise,
    Ficohsa,
    Bdf,
    Avanz,
}

impl Bank {
    pub fn display_name(&self) -> &'static str {
        match self {
            Bank::Banpro => "BANPRO",
            Bank::Bac => "BAC CREDOMATIC",
            Bank::Lafise => "LAFISE BANCENTRO",
            Bank::Ficohsa => "FICOHSA",
            Bank::Bdf => "BDF",
            Bank::Avanz => "AVANZ",
        }
    }
}

/// Banco seleccionado. `NoBank` suprime los datos de cuenta en los reportes
/// y `Other` lleva el nombre escrito a mano.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BankSelection {
    Known { value: Bank },
    NoBank,
    Other { label: String },
}

impl BankSelection {
    pub fn is_no_bank(&self) -> bool {
        matches!(self, BankSelection::NoBank)
    }

    pub fn display(&self) -> String {
        match self {
            BankSelection::Known { value } => value.display_name().to_string(),
            BankSelection::NoBank => NO_BANK_SENTINEL.to_string(),
            BankSelection::Other { label } if label.trim().is_empty() => NOT_AVAILABLE.to_string(),
            BankSelection::Other { label } => label.trim().to_string(),
        }
    }
}

/// Moneda de la cuenta destino, con su propia salida "otra".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountCurrency {
    Cordobas,
    Dolares,
    Euros,
    Other { label: String },
}

impl AccountCurrency {
    pub fn display(&self) -> String {
        match self {
            AccountCurrency::Cordobas => "Córdobas".to_string(),
            AccountCurrency::Dolares => "Dólares".to_string(),
            AccountCurrency::Euros => "Euros".to_string(),
            AccountCurrency::Other { label } if label.trim().is_empty() => {
                NOT_AVAILABLE.to_string()
            }
            AccountCurrency::Other { label } => label.trim().to_string(),
        }
    }
}
