use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use super::{json_path, Direction, FieldFilter, OrderBy, RecordStore, StorageError};

/// Documentos JSON en una tabla SQLite, filtrados con `json_extract`.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        // Una base en memoria existe por conexión: un solo enlace la mantiene.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = SqliteRecordStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY NOT NULL,
                document TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn get(&self, id: &str) -> Result<Option<Value>, StorageError> {
        let row = sqlx::query("SELECT document FROM records WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("document")?;
                Ok(Some(serde_json::from_str(&raw)?))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, id: &str, document: Value) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&document)?;
        sqlx::query(
            "INSERT INTO records (id, document, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET document = excluded.document, updated_at = excluded.updated_at",
        )
        .bind(id)
        .bind(raw)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn query(
        &self,
        filters: &[FieldFilter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Value>, StorageError> {
        let mut sql = String::from("SELECT document FROM records");
        let mut paths = Vec::with_capacity(filters.len());

        for (index, filter) in filters.iter().enumerate() {
            paths.push(json_path(&filter.field)?);
            sql.push_str(if index == 0 { " WHERE " } else { " AND " });
            sql.push_str(&format!("json_extract(document, ?) {} ?", filter.op.sql()));
        }

        let order_path = match order_by {
            Some(order) => {
                let path = json_path(&order.field)?;
                let direction = match order.direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                sql.push_str(&format!(" ORDER BY json_extract(document, ?) {}, id ASC", direction));
                Some(path)
            }
            None => {
                sql.push_str(" ORDER BY id ASC");
                None
            }
        };

        let mut query = sqlx::query(&sql);
        for (filter, path) in filters.iter().zip(paths) {
            query = query.bind(path);
            query = match &filter.value {
                Value::Number(n) if n.is_i64() => query.bind(n.as_i64()),
                Value::Number(n) => query.bind(n.as_f64()),
                Value::Bool(b) => query.bind(*b),
                Value::String(s) => query.bind(s.clone()),
                other => query.bind(other.to_string()),
            };
        }
        if let Some(path) = order_path {
            query = query.bind(path);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| -> Result<Value, StorageError> {
                let raw: String = row.try_get("document")?;
                Ok(serde_json::from_str(&raw)?)
            })
            .collect()
    }
}
