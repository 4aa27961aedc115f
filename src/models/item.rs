use serde::{Deserialize, Deserializer, Serialize};

use super::{AccountCurrency, BankSelection};
use crate::core::{Amount, Currency};
use crate::formatting::amount_to_words;

/// Campos capturados para una solicitud de cheque o transferencia.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItemData {
    pub amount: Option<Amount>,
    pub currency: Option<Currency>,
    pub amount_in_words: Option<String>,
    pub consignee: Option<String>,
    pub declaration_number: Option<String>,
    pub customs_code: Option<String>,
    pub reference_code: Option<String>,
    pub bank: Option<BankSelection>,
    pub account_number: Option<String>,
    pub account_currency: Option<AccountCurrency>,
    pub check_payee: Option<String>,
    pub transfer_payee: Option<String>,

    // Pago de impuestos
    pub tax_payment: bool,
    pub tax_receipt_attached: bool,
    pub tax_payment_reference: Option<String>,

    // Constancia de no retención
    pub no_withholding: bool,
    pub certificate_attached: bool,
    pub certificate_number: Option<String>,
    pub certificate_valid: Option<bool>,

    #[serde(deserialize_with = "deserialize_emails")]
    pub notification_emails: Vec<String>,
    pub observation: Option<String>,
}

/// Solicitud con su identificador `{NE}-{yyyyMMdd}-{HHmmss}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    #[serde(flatten)]
    pub data: LineItemData,
}

impl LineItemData {
    /// Completa el monto en letras cuando el usuario no lo escribió.
    pub fn with_derived_amount_in_words(mut self) -> Self {
        let blank = self
            .amount_in_words
            .as_deref()
            .map(|words| words.trim().is_empty())
            .unwrap_or(true);

        if blank {
            let words = amount_to_words(self.amount.as_ref(), self.currency.as_ref());
            self.amount_in_words = if words.is_empty() { None } else { Some(words) };
        }
        self
    }

    /// Sin banco no hay cuenta que mostrar.
    pub fn suppresses_account(&self) -> bool {
        self.bank.as_ref().map(BankSelection::is_no_bank).unwrap_or(false)
    }

    pub fn emails_display(&self) -> String {
        self.notification_emails.join("; ")
    }
}

/// Separa una lista de correos delimitada por `;`.
pub fn parse_emails(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .collect()
}

fn deserialize_emails<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Emails {
        Joined(String),
        List(Vec<String>),
        Missing(()),
    }

    Ok(match Emails::deserialize(deserializer)? {
        Emails::Joined(raw) => parse_emails(&raw),
        Emails::List(list) => list
            .iter()
            .flat_map(|entry| parse_emails(entry))
            .collect(),
        Emails::Missing(()) => Vec::new(),
    })
}
