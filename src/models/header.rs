use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Datos generales de la sesión: NE, referencia, gestor y destinatario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderContext {
    pub tracking_code: String,
    pub reference: Option<String>,
    pub manager: String,
    pub recipient: Option<String>,
    pub date: NaiveDate,
}

/// Cambios parciales enviados desde el formulario de datos iniciales.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderPatch {
    pub tracking_code: Option<String>,
    pub reference: Option<String>,
    pub manager: Option<String>,
    pub recipient: Option<String>,
    pub date: Option<NaiveDate>,
}

impl HeaderContext {
    pub fn empty(date: NaiveDate) -> Self {
        HeaderContext {
            tracking_code: String::new(),
            reference: None,
            manager: String::new(),
            recipient: None,
            date,
        }
    }

    pub fn has_tracking_code(&self) -> bool {
        !self.tracking_code.trim().is_empty()
    }

    /// Aplica solo los campos presentes en el parche.
    pub fn apply(&mut self, patch: HeaderPatch) {
        if let Some(tracking_code) = patch.tracking_code {
            self.tracking_code = tracking_code.trim().to_string();
        }
        if let Some(reference) = patch.reference {
            self.reference = Some(reference);
        }
        if let Some(manager) = patch.manager {
            self.manager = manager;
        }
        if let Some(recipient) = patch.recipient {
            self.recipient = Some(recipient);
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}

impl HeaderPatch {
    /// Indica si el parche cambiaría el NE actual.
    pub fn changes_tracking_code(&self, current: &str) -> bool {
        self.tracking_code
            .as_deref()
            .map(|code| code.trim() != current)
            .unwrap_or(false)
    }
}
