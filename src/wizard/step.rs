use serde::{Deserialize, Serialize};
use std::fmt;

/// Pasos del asistente, en orden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    InitialData,
    ProductList,
    Preview,
    Success,
}

impl WizardStep {
    /// Destino del botón "Atrás", si el paso lo tiene.
    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::ProductList => Some(WizardStep::InitialData),
            WizardStep::Preview => Some(WizardStep::ProductList),
            WizardStep::InitialData | WizardStep::Success => None,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::InitialData => "INITIAL_DATA",
            WizardStep::ProductList => "PRODUCT_LIST",
            WizardStep::Preview => "PREVIEW",
            WizardStep::Success => "SUCCESS",
        };
        write!(f, "{}", name)
    }
}
