pub mod memory;
pub mod repository;
pub mod sqlite;

pub use memory::MemoryRecordStore;
pub use repository::{FailedItem, RecordRepository, SaveReport, SearchCriteria};
pub use sqlite::SqliteRecordStore;

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("documento inválido: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("base de datos: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

impl FilterOp {
    pub fn sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
        }
    }

    fn matches(&self, ordering: Ordering) -> bool {
        match self {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Gte => ordering != Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
        }
    }
}

/// Filtro sobre un campo del documento. `field` admite rutas con punto,
/// p. ej. `header.tracking_code`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        FieldFilter {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Evalúa el filtro contra un documento en memoria.
    pub fn matches(&self, document: &Value) -> bool {
        lookup(document, &self.field)
            .and_then(|found| compare_values(found, &self.value))
            .map(|ordering| self.op.matches(ordering))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            direction: Direction::Desc,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            direction: Direction::Asc,
        }
    }
}

/// Almacén de documentos con clave de texto.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Value>, StorageError>;

    async fn set(&self, id: &str, document: Value) -> Result<(), StorageError>;

    async fn query(
        &self,
        filters: &[FieldFilter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Value>, StorageError>;
}

pub(crate) fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, key| current.get(key))
}

pub(crate) fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Ruta JSON para `json_extract`, solo con caracteres de identificador.
pub(crate) fn json_path(field: &str) -> Result<String, StorageError> {
    let valid = !field.is_empty()
        && field
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    if valid {
        Ok(format!("$.{}", field))
    } else {
        Err(StorageError::Unavailable(format!("campo de consulta inválido: {}", field)))
    }
}
