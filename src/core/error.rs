use std::fmt;
use thiserror::Error;

use crate::generators::ExportError;
use crate::storage::StorageError;
use crate::wizard::WizardError;

/// Campo faltante o inválido antes de una transición del asistente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación: {0}")]
    Validation(#[from] ValidationError),

    #[error("Error del asistente: {0}")]
    Wizard(#[from] WizardError),

    #[error("Error de almacenamiento: {0}")]
    Storage(#[from] StorageError),

    #[error("Error de exportación: {0}")]
    Export(#[from] ExportError),

    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("No encontrado: {0}")]
    NotFound(String),

    #[error("Acceso denegado: {0}")]
    Forbidden(String),
}

pub type AppResult<T> = Result<T, AppError>;
