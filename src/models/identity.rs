use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Gestor,
    Consulta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    EditWizard,
    SaveRecords,
    ExportReports,
    SearchRecords,
    /// Buscar registros creados por otros usuarios.
    SearchAllRecords,
}

impl Role {
    pub fn allows(&self, permission: Permission) -> bool {
        match self {
            Role::Admin => true,
            Role::Gestor => !matches!(permission, Permission::SearchAllRecords),
            Role::Consulta => matches!(
                permission,
                Permission::ExportReports | Permission::SearchRecords
            ),
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "gestor" => Ok(Role::Gestor),
            "consulta" => Ok(Role::Consulta),
            other => Err(AppError::Config(format!("Rol desconocido: {}", other))),
        }
    }
}

/// Usuario autenticado entregado por el proveedor de identidad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub role: Option<Role>,
}

impl Identity {
    /// Sin rol asignado el usuario solo puede consultar.
    pub fn can(&self, permission: Permission) -> bool {
        self.role.unwrap_or(Role::Consulta).allows(permission)
    }
}
