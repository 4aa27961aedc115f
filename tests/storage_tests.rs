use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

use solicitudes_aduana::core::{Amount, Currency};
use solicitudes_aduana::models::{
    HeaderContext, Identity, LineItem, LineItemData, Role, StoredRecord, Timestamp,
};
use solicitudes_aduana::storage::{
    FieldFilter, FilterOp, MemoryRecordStore, OrderBy, RecordRepository, RecordStore,
    SearchCriteria, SqliteRecordStore, StorageError,
};

fn owner() -> Identity {
    Identity {
        id: "u-ana".to_string(),
        email: "ana@agencia.ni".to_string(),
        role: Some(Role::Gestor),
    }
}

fn header(tracking_code: &str) -> HeaderContext {
    HeaderContext {
        tracking_code: tracking_code.to_string(),
        reference: None,
        manager: "María López".to_string(),
        recipient: Some("Contabilidad".to_string()),
        date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
    }
}

fn item(id: &str, amount: f64) -> LineItem {
    LineItem {
        id: id.to_string(),
        data: LineItemData {
            amount: Some(Amount::from(amount)),
            currency: Some(Currency::Dolar),
            ..LineItemData::default()
        },
    }
}

/// Almacén que rechaza escrituras para un ID concreto.
struct FlakyStore {
    inner: MemoryRecordStore,
    reject: String,
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn get(&self, id: &str) -> Result<Option<Value>, StorageError> {
        self.inner.get(id).await
    }

    async fn set(&self, id: &str, document: Value) -> Result<(), StorageError> {
        if id == self.reject {
            return Err(StorageError::Unavailable("permiso denegado".to_string()));
        }
        self.inner.set(id, document).await
    }

    async fn query(
        &self,
        filters: &[FieldFilter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Value>, StorageError> {
        self.inner.query(filters, order_by).await
    }
}

async fn seed(store: &dyn RecordStore) {
    store
        .set("a", json!({"header": {"tracking_code": "NE-1"}, "created_at": 30, "created_by": "u1"}))
        .await
        .unwrap();
    store
        .set("b", json!({"header": {"tracking_code": "NE-2"}, "created_at": 10, "created_by": "u2"}))
        .await
        .unwrap();
    store
        .set("c", json!({"header": {"tracking_code": "NE-1"}, "created_at": 20, "created_by": "u1"}))
        .await
        .unwrap();
}

async fn assert_query_semantics(store: &dyn RecordStore) {
    seed(store).await;

    let by_code = store
        .query(
            &[FieldFilter::new("header.tracking_code", FilterOp::Eq, "NE-1")],
            Some(&OrderBy::asc("created_at")),
        )
        .await
        .unwrap();
    let ids: Vec<i64> = by_code.iter().map(|d| d["created_at"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![20, 30]);

    let recent = store
        .query(
            &[FieldFilter::new("created_at", FilterOp::Gte, 15)],
            Some(&OrderBy::desc("created_at")),
        )
        .await
        .unwrap();
    let ids: Vec<i64> = recent.iter().map(|d| d["created_at"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![30, 20]);

    assert_eq!(store.query(&[], None).await.unwrap().len(), 3);
    assert!(store.get("missing").await.unwrap().is_none());

    store.set("b", json!({"created_at": 99})).await.unwrap();
    assert_eq!(store.get("b").await.unwrap().unwrap()["created_at"], 99);
}

#[tokio::test]
async fn memory_store_filters_and_orders() {
    let store = MemoryRecordStore::new();
    assert_query_semantics(&store).await;
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn sqlite_store_filters_and_orders() {
    let store = SqliteRecordStore::connect("sqlite::memory:").await.unwrap();
    assert!(store.ping().await);
    assert_query_semantics(&store).await;
}

#[tokio::test]
async fn sqlite_rejects_unsafe_field_names() {
    let store = SqliteRecordStore::connect("sqlite::memory:").await.unwrap();
    let result = store
        .query(&[FieldFilter::new("x') OR 1=1 --", FilterOp::Eq, "y")], None)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn save_session_writes_every_item_in_order() {
    let store = Arc::new(MemoryRecordStore::new());
    let repository = RecordRepository::new(store.clone());
    let items = vec![item("NE-1-20261019-090000", 10.0), item("NE-1-20261019-090001", 20.0)];

    let report = repository.save_session(&owner(), &header("NE-1"), &items).await;

    assert_eq!(report.saved, vec!["NE-1-20261019-090000", "NE-1-20261019-090001"]);
    assert!(!report.is_partial());

    let record = repository.find("NE-1-20261019-090001").await.unwrap().unwrap();
    assert_eq!(record.header.tracking_code, "NE-1");
    assert_eq!(record.created_by, "u-ana");
    assert_eq!(record.created_by_email, "ana@agencia.ni");
    assert_eq!(record.line_item(), items[1]);
}

#[tokio::test]
async fn failed_item_does_not_stop_the_batch() {
    let store = Arc::new(FlakyStore {
        inner: MemoryRecordStore::new(),
        reject: "NE-1-b".to_string(),
    });
    let repository = RecordRepository::new(store.clone());
    let items = vec![item("NE-1-a", 1.0), item("NE-1-b", 2.0), item("", 3.0), item("NE-1-d", 4.0)];

    let report = repository.save_session(&owner(), &header("NE-1"), &items).await;

    assert!(report.is_partial());
    assert_eq!(report.saved, vec!["NE-1-a", "NE-1-d"]);
    assert_eq!(report.failed.len(), 2);
    assert_eq!(report.failed[0].index, 1);
    assert_eq!(report.failed[0].id.as_deref(), Some("NE-1-b"));
    assert_eq!(report.failed[1].index, 2);
    assert!(report.failed[1].id.is_none());

    assert!(repository.find("NE-1-a").await.unwrap().is_some());
    assert!(repository.find("NE-1-b").await.unwrap().is_none());
}

#[tokio::test]
async fn search_filters_by_owner_and_code() {
    let store = Arc::new(MemoryRecordStore::new());
    let repository = RecordRepository::new(store.clone());

    repository
        .save_session(&owner(), &header("NE-1"), &[item("NE-1-x", 1.0)])
        .await;
    let other = Identity {
        id: "u-luis".to_string(),
        email: "luis@agencia.ni".to_string(),
        role: None,
    };
    repository
        .save_session(&other, &header("NE-2"), &[item("NE-2-x", 2.0)])
        .await;

    let mine = repository
        .search(&SearchCriteria {
            created_by: Some("u-ana".to_string()),
            ..SearchCriteria::default()
        })
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].header.tracking_code, "NE-1");

    let by_code = repository
        .search(&SearchCriteria {
            tracking_code: Some("NE-2".to_string()),
            ..SearchCriteria::default()
        })
        .await
        .unwrap();
    assert_eq!(by_code.len(), 1);
    assert_eq!(by_code[0].created_by, "u-luis");

    let all = repository.search(&SearchCriteria::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn date_range_follows_the_display_offset() {
    let store = Arc::new(MemoryRecordStore::new());
    let repository = RecordRepository::new(store.clone());

    // 20:00 del 19 en Managua (UTC-6) ya es el 20 en UTC.
    let managua = FixedOffset::west_opt(6 * 3600).unwrap();
    let created_at = Timestamp::from(Utc.with_ymd_and_hms(2026, 10, 20, 2, 0, 0).unwrap());
    let record = StoredRecord::new(&owner(), &header("NE-9"), &item("NE-9-x", 5.0), created_at);
    store
        .set("NE-9-x", serde_json::to_value(&record).unwrap())
        .await
        .unwrap();

    let shown = created_at.to_datetime().unwrap().with_timezone(&managua);
    let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    assert_eq!(shown.date_naive(), day);

    let same_day = SearchCriteria {
        from: Some(day),
        to: Some(day),
        ..SearchCriteria::default()
    };
    let found = repository.search_in(&same_day, &managua).await.unwrap();
    assert_eq!(found.len(), 1);

    let next_day = day.succ_opt().unwrap();
    let next = SearchCriteria {
        from: Some(next_day),
        to: Some(next_day),
        ..SearchCriteria::default()
    };
    assert!(repository.search_in(&next, &managua).await.unwrap().is_empty());
}
