use chrono::{Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::sync::Arc;

use super::{FieldFilter, FilterOp, OrderBy, RecordStore, StorageError};
use crate::models::{HeaderContext, Identity, LineItem, StoredRecord, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedItem {
    pub index: usize,
    pub id: Option<String>,
    pub error: String,
}

/// Resultado del guardado de una sesión. No es atómico: lo guardado se queda.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveReport {
    pub saved: Vec<String>,
    pub failed: Vec<FailedItem>,
}

impl SaveReport {
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub tracking_code: Option<String>,
    pub manager: Option<String>,
    pub created_by: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SearchCriteria {
    /// Filtros del almacén. Las fechas `from`/`to` son días de calendario en
    /// `tz`, la misma zona con la que se muestran los registros.
    pub fn filters_in<Tz: TimeZone>(&self, tz: &Tz) -> Vec<FieldFilter> {
        let mut filters = Vec::new();
        if let Some(code) = non_blank(&self.tracking_code) {
            filters.push(FieldFilter::new("header.tracking_code", FilterOp::Eq, code));
        }
        if let Some(manager) = non_blank(&self.manager) {
            filters.push(FieldFilter::new("header.manager", FilterOp::Eq, manager));
        }
        if let Some(created_by) = non_blank(&self.created_by) {
            filters.push(FieldFilter::new("created_by", FilterOp::Eq, created_by));
        }
        let from = self
            .from
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|start| tz.from_local_datetime(&start).earliest());
        if let Some(from) = from {
            let from = Timestamp::from(from.with_timezone(&Utc));
            filters.push(FieldFilter::new("created_at", FilterOp::Gte, from.millis()));
        }
        let to = self
            .to
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
            .and_then(|end| tz.from_local_datetime(&end).latest());
        if let Some(to) = to {
            let to = Timestamp::from(to.with_timezone(&Utc));
            filters.push(FieldFilter::new("created_at", FilterOp::Lte, to.millis()));
        }
        filters
    }
}


fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Guarda y consulta solicitudes finalizadas sobre cualquier [`RecordStore`].
pub struct RecordRepository {
    store: Arc<dyn RecordStore>,
}

impl RecordRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        RecordRepository { store }
    }

    /// Una escritura por solicitud, en orden. Un fallo se registra y el ciclo
    /// sigue con la siguiente; no hay reversión.
    pub async fn save_session(
        &self,
        owner: &Identity,
        header: &HeaderContext,
        items: &[LineItem],
    ) -> SaveReport {
        let mut report = SaveReport::default();
        let created_at = Timestamp::now();

        for (index, item) in items.iter().enumerate() {
            if item.id.trim().is_empty() {
                tracing::warn!(index, "Skipping item without id");
                report.failed.push(FailedItem {
                    index,
                    id: None,
                    error: "solicitud sin ID".to_string(),
                });
                continue;
            }

            let record = StoredRecord::new(owner, header, item, created_at);
            let result = match serde_json::to_value(&record) {
                Ok(document) => self.store.set(&item.id, document).await,
                Err(e) => Err(StorageError::from(e)),
            };

            match result {
                Ok(()) => {
                    tracing::info!(item_id = %item.id, "Record saved");
                    report.saved.push(item.id.clone());
                }
                Err(e) => {
                    tracing::error!(item_id = %item.id, "Failed to save record: {}", e);
                    report.failed.push(FailedItem {
                        index,
                        id: Some(item.id.clone()),
                        error: e.to_string(),
                    });
                }
            }
        }

        if report.is_partial() {
            tracing::warn!(
                saved = report.saved.len(),
                failed = report.failed.len(),
                "Session saved partially"
            );
        }
        report
    }

    pub async fn find(&self, id: &str) -> Result<Option<StoredRecord>, StorageError> {
        match self.store.get(id).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    /// Más recientes primero, con las fechas en la zona local del servidor.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<StoredRecord>, StorageError> {
        self.search_in(criteria, &Local).await
    }

    pub async fn search_in<Tz: TimeZone>(
        &self,
        criteria: &SearchCriteria,
        tz: &Tz,
    ) -> Result<Vec<StoredRecord>, StorageError> {
        let documents = self
            .store
            .query(&criteria.filters_in(tz), Some(&OrderBy::desc("created_at")))
            .await?;

        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            match serde_json::from_value::<StoredRecord>(document) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping malformed record: {}", e),
            }
        }
        Ok(records)
    }
}
