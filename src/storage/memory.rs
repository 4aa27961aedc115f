use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{compare_values, lookup, Direction, FieldFilter, OrderBy, RecordStore, StorageError};

/// Almacén en memoria, usado cuando no hay `DATABASE_URL` y en pruebas.
#[derive(Default)]
pub struct MemoryRecordStore {
    documents: RwLock<HashMap<String, Value>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, id: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn set(&self, id: &str, document: Value) -> Result<(), StorageError> {
        self.documents.write().await.insert(id.to_string(), document);
        Ok(())
    }

    async fn query(
        &self,
        filters: &[FieldFilter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Value>, StorageError> {
        let documents = self.documents.read().await;
        let mut matches: Vec<(&String, &Value)> = documents
            .iter()
            .filter(|(_, document)| filters.iter().all(|filter| filter.matches(document)))
            .collect();

        // Orden estable por ID para que resultados empatados no dependan del HashMap.
        matches.sort_by(|(a, _), (b, _)| a.cmp(b));

        if let Some(order) = order_by {
            matches.sort_by(|(_, a), (_, b)| {
                let ordering = match (lookup(a, &order.field), lookup(b, &order.field)) {
                    (Some(a), Some(b)) => compare_values(a, b).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                match order.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        Ok(matches.into_iter().map(|(_, document)| document.clone()).collect())
    }
}
