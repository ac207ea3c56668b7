use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Address of a single document: `collection/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    collection: String,
    id: String,
}

impl DocumentPath {
    #[must_use]
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A document as returned by a collection listing.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub body: Value,
}

/// Key-document store contract.
///
/// Writes always replace the whole document; there is no field-level patching
/// and no version check, so the last writer wins.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Fetch a document body.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached or the stored
    /// body cannot be decoded. A missing document is `Ok(None)`.
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Value>, StorageError>;

    /// Create or overwrite a document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be stored.
    async fn set_document(&self, path: &DocumentPath, body: &Value) -> Result<(), StorageError>;

    /// Create a document with a store-assigned id and return that id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be stored.
    async fn add_document(&self, collection: &str, body: &Value) -> Result<String, StorageError>;

    /// List every document of a collection in creation order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached or a body
    /// cannot be decoded.
    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StorageError>;

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if it does not exist, or other storage errors.
    async fn delete_document(&self, path: &DocumentPath) -> Result<(), StorageError>;
}

#[derive(Default)]
struct MemoryInner {
    next_seq: u64,
    docs: HashMap<DocumentPath, (u64, Value)>,
}

/// Simple in-memory document store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<Mutex<MemoryInner>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl DocumentRepository for InMemoryRepository {
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Value>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.docs.get(path).map(|(_, body)| body.clone()))
    }

    async fn set_document(&self, path: &DocumentPath, body: &Value) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        let existing = guard.docs.get(path).map(|(seq, _)| *seq);
        let seq = match existing {
            Some(seq) => seq,
            None => {
                guard.next_seq += 1;
                guard.next_seq
            }
        };
        guard.docs.insert(path.clone(), (seq, body.clone()));
        Ok(())
    }

    async fn add_document(&self, collection: &str, body: &Value) -> Result<String, StorageError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.set_document(&DocumentPath::new(collection, id.clone()), body)
            .await?;
        Ok(id)
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StorageError> {
        let guard = self.lock()?;
        let mut found: Vec<(u64, StoredDocument)> = guard
            .docs
            .iter()
            .filter(|(path, _)| path.collection() == collection)
            .map(|(path, (seq, body))| {
                (
                    *seq,
                    StoredDocument {
                        id: path.id().to_owned(),
                        body: body.clone(),
                    },
                )
            })
            .collect();
        found.sort_by_key(|(seq, _)| *seq);
        Ok(found.into_iter().map(|(_, doc)| doc).collect())
    }

    async fn delete_document(&self, path: &DocumentPath) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard
            .docs
            .remove(path)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

/// Wraps the document repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub documents: Arc<dyn DocumentRepository>,
}

impl Storage {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentRepository>) -> Self {
        Self { documents }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_overwrites_whole_document() {
        let repo = InMemoryRepository::new();
        let path = DocumentPath::new("strategy", "userData");
        repo.set_document(&path, &json!({"pyqCount": 3, "mistakes": []}))
            .await
            .unwrap();
        repo.set_document(&path, &json!({"pyqCount": 4}))
            .await
            .unwrap();

        let body = repo.get_document(&path).await.unwrap().unwrap();
        assert_eq!(body, json!({"pyqCount": 4}));
    }

    #[tokio::test]
    async fn missing_document_is_none() {
        let repo = InMemoryRepository::new();
        let got = repo
            .get_document(&DocumentPath::new("progress", "userData"))
            .await
            .unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn list_returns_collection_in_creation_order() {
        let repo = InMemoryRepository::new();
        let first = repo
            .add_document("knowledgeHub", &json!({"name": "OS"}))
            .await
            .unwrap();
        repo.set_document(&DocumentPath::new("progress", "userData"), &json!({}))
            .await
            .unwrap();
        let second = repo
            .add_document("knowledgeHub", &json!({"name": "DBMS"}))
            .await
            .unwrap();
        // rewriting keeps the original position
        repo.set_document(
            &DocumentPath::new("knowledgeHub", first.clone()),
            &json!({"name": "Operating Systems"}),
        )
        .await
        .unwrap();

        let docs = repo.list_documents("knowledgeHub").await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec![first.as_str(), second.as_str()]);
        assert_eq!(docs[0].body, json!({"name": "Operating Systems"}));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo
            .delete_document(&DocumentPath::new("knowledgeHub", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[test]
    fn document_path_displays_as_address() {
        assert_eq!(
            DocumentPath::new("progress", "userData").to_string(),
            "progress/userData"
        );
    }
}
