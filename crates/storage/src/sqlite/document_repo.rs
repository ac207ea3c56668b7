use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{DocumentPath, DocumentRepository, StorageError, StoredDocument};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl DocumentRepository for SqliteRepository {
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Value>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT body
            FROM documents
            WHERE collection = ?1 AND id = ?2
            ",
        )
        .bind(path.collection())
        .bind(path.id())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let body: String = row.try_get("body").map_err(ser)?;
        serde_json::from_str(&body).map(Some).map_err(ser)
    }

    async fn set_document(&self, path: &DocumentPath, body: &Value) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(body).map_err(ser)?;
        let now = Utc::now();
        sqlx::query(
            r"
            INSERT INTO documents (collection, id, body, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(collection, id) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            ",
        )
        .bind(path.collection())
        .bind(path.id())
        .bind(encoded)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        tracing::debug!(%path, "document written");
        Ok(())
    }

    async fn add_document(&self, collection: &str, body: &Value) -> Result<String, StorageError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let encoded = serde_json::to_string(body).map_err(ser)?;
        let now = Utc::now();
        let res = sqlx::query(
            r"
            INSERT INTO documents (collection, id, body, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(collection, id) DO NOTHING
            ",
        )
        .bind(collection)
        .bind(id.clone())
        .bind(encoded)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(id)
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, body
            FROM documents
            WHERE collection = ?1
            ORDER BY created_at ASC, rowid ASC
            ",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.into_iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(ser)?;
                let body: String = row.try_get("body").map_err(ser)?;
                let body = serde_json::from_str(&body).map_err(ser)?;
                Ok(StoredDocument { id, body })
            })
            .collect()
    }

    async fn delete_document(&self, path: &DocumentPath) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM documents WHERE collection = ?1 AND id = ?2")
            .bind(path.collection())
            .bind(path.id())
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
