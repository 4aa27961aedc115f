use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{HeaderContext, Identity, LineItem, LineItemData};

/// Marca de tiempo del almacén: milisegundos desde epoch, ordenable como número.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn now() -> Self {
        Timestamp::from(Utc::now())
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp(value.timestamp_millis())
    }
}

/// Documento persistido por cada solicitud finalizada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub header: HeaderContext,
    #[serde(flatten)]
    pub item: LineItemData,
    pub created_by: String,
    pub created_by_email: String,
    pub created_at: Timestamp,
}

impl StoredRecord {
    pub fn new(owner: &Identity, header: &HeaderContext, item: &LineItem, created_at: Timestamp) -> Self {
        StoredRecord {
            id: item.id.clone(),
            header: header.clone(),
            item: item.data.clone(),
            created_by: owner.id.clone(),
            created_by_email: owner.email.clone(),
            created_at,
        }
    }

    pub fn line_item(&self) -> LineItem {
        LineItem {
            id: self.id.clone(),
            data: self.item.clone(),
        }
    }
}
