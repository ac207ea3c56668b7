//! Document store reached over HTTP.
//!
//! The remote service exposes one resource per document:
//!
//! - `GET    {base}/{collection}/{id}` returns the JSON body, `404` when absent
//! - `PUT    {base}/{collection}/{id}` replaces the body
//! - `DELETE {base}/{collection}/{id}` removes it
//! - `GET    {base}/{collection}` returns `[{ "id": ..., "data": {...} }]`
//! - `POST   {base}/{collection}` creates a document and returns `{ "id": ... }`

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::repository::{DocumentPath, DocumentRepository, Storage, StorageError, StoredDocument};

#[derive(Clone)]
pub struct HttpDocumentRepository {
    client: Client,
    base: Url,
}

#[derive(Deserialize)]
struct CreatedDocument {
    id: String,
}

#[derive(Deserialize)]
struct ListedDocument {
    id: String,
    data: Value,
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn check_status(status: StatusCode) -> Result<(), StorageError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => Err(StorageError::NotFound),
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => Err(StorageError::Conflict),
        s => Err(StorageError::Connection(format!("unexpected status {s}"))),
    }
}

impl HttpDocumentRepository {
    /// Build a client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the URL cannot be parsed or
    /// cannot carry path segments.
    pub fn new(base_url: &str) -> Result<Self, StorageError> {
        let base = Url::parse(base_url).map_err(conn)?;
        if base.cannot_be_a_base() {
            return Err(StorageError::Connection(format!(
                "not a base url: {base_url}"
            )));
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    /// URL for a collection, or for a single document when `id` is given.
    ///
    /// Segments are percent-encoded, so ids never escape their collection.
    #[must_use]
    pub fn url_for(&self, collection: &str, id: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(collection);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }
}

#[async_trait]
impl DocumentRepository for HttpDocumentRepository {
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Value>, StorageError> {
        let url = self.url_for(path.collection(), Some(path.id()));
        let resp = self.client.get(url).send().await.map_err(conn)?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(resp.status())?;
        resp.json::<Value>().await.map(Some).map_err(ser)
    }

    async fn set_document(&self, path: &DocumentPath, body: &Value) -> Result<(), StorageError> {
        let url = self.url_for(path.collection(), Some(path.id()));
        let resp = self.client.put(url).json(body).send().await.map_err(conn)?;
        check_status(resp.status())?;
        tracing::debug!(%path, "remote document written");
        Ok(())
    }

    async fn add_document(&self, collection: &str, body: &Value) -> Result<String, StorageError> {
        let url = self.url_for(collection, None);
        let resp = self.client.post(url).json(body).send().await.map_err(conn)?;
        check_status(resp.status())?;
        let created: CreatedDocument = resp.json().await.map_err(ser)?;
        Ok(created.id)
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StorageError> {
        let url = self.url_for(collection, None);
        let resp = self.client.get(url).send().await.map_err(conn)?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        check_status(resp.status())?;
        let listed: Vec<ListedDocument> = resp.json().await.map_err(ser)?;
        Ok(listed
            .into_iter()
            .map(|doc| StoredDocument {
                id: doc.id,
                body: doc.data,
            })
            .collect())
    }

    async fn delete_document(&self, path: &DocumentPath) -> Result<(), StorageError> {
        let url = self.url_for(path.collection(), Some(path.id()));
        let resp = self.client.delete(url).send().await.map_err(conn)?;
        check_status(resp.status())
    }
}

impl Storage {
    /// Build a `Storage` backed by a remote HTTP document service.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the base URL is invalid.
    pub fn http(base_url: &str) -> Result<Self, StorageError> {
        let repo = HttpDocumentRepository::new(base_url)?;
        let documents: Arc<dyn DocumentRepository> = Arc::new(repo);
        Ok(Self::new(documents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_for_appends_encoded_segments() {
        let repo = HttpDocumentRepository::new("https://store.example.com/api/").unwrap();
        assert_eq!(
            repo.url_for("progress", Some("userData")).as_str(),
            "https://store.example.com/api/progress/userData"
        );
        assert_eq!(
            repo.url_for("knowledgeHub", None).as_str(),
            "https://store.example.com/api/knowledgeHub"
        );
        assert_eq!(
            repo.url_for("knowledgeHub", Some("a/b")).as_str(),
            "https://store.example.com/api/knowledgeHub/a%2Fb"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(HttpDocumentRepository::new("not a url").is_err());
        assert!(HttpDocumentRepository::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn status_mapping() {
        assert!(check_status(StatusCode::NO_CONTENT).is_ok());
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND),
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            check_status(StatusCode::CONFLICT),
            Err(StorageError::Conflict)
        ));
        assert!(matches!(
            check_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(StorageError::Connection(_))
        ));
    }
}
