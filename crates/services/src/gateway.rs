use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use storage::repository::{DocumentPath, DocumentRepository, StorageError};
use tracker_core::model::{
    Curriculum, HubEntry, HubEntryDoc, HubEntryId, Progress, ProgressAdjustment, Strategy,
};

use crate::error::TrackerError;

const PROGRESS_COLLECTION: &str = "progress";
const HUB_COLLECTION: &str = "knowledgeHub";
const STRATEGY_COLLECTION: &str = "strategy";
const USER_DOC: &str = "userData";

/// One independently loaded and saved group of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slice {
    Progress,
    KnowledgeHub,
    Strategy,
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slice::Progress => "progress",
            Slice::KnowledgeHub => "knowledge hub",
            Slice::Strategy => "strategy",
        };
        f.write_str(name)
    }
}

fn progress_path() -> DocumentPath {
    DocumentPath::new(PROGRESS_COLLECTION, USER_DOC)
}

fn strategy_path() -> DocumentPath {
    DocumentPath::new(STRATEGY_COLLECTION, USER_DOC)
}

fn hub_path(id: &HubEntryId) -> DocumentPath {
    DocumentPath::new(HUB_COLLECTION, id.as_str())
}

fn decode<T: DeserializeOwned>(slice: Slice, body: Value) -> Result<T, TrackerError> {
    serde_json::from_value(body).map_err(|source| TrackerError::Decode { slice, source })
}

fn encode<T: Serialize>(slice: Slice, value: &T) -> Result<Value, TrackerError> {
    serde_json::to_value(value).map_err(|source| TrackerError::Encode { slice, source })
}

/// Loads and saves state slices against the document store.
///
/// Every save replaces the whole slice document.
#[derive(Clone)]
pub struct PersistenceGateway {
    documents: Arc<dyn DocumentRepository>,
}

impl PersistenceGateway {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentRepository>) -> Self {
        Self { documents }
    }

    /// Load progress and align it with the curriculum.
    ///
    /// A missing document yields all-false progress for every subject.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if the read fails, or
    /// `TrackerError::Decode` if the stored document is not a key to flag-list map.
    pub async fn load_progress(&self, curriculum: &Curriculum) -> Result<Progress, TrackerError> {
        let Some(body) = self.documents.get_document(&progress_path()).await? else {
            info!("no stored progress, starting from an empty plan");
            return Ok(Progress::empty_for(curriculum));
        };

        let stored: BTreeMap<String, Vec<bool>> = decode(Slice::Progress, body)?;
        let (progress, adjustments) = Progress::reconcile(curriculum, stored);
        for adjustment in &adjustments {
            log_adjustment(adjustment);
        }
        Ok(progress)
    }

    /// Overwrite the stored progress document.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if encoding or the write fails.
    pub async fn save_progress(&self, progress: &Progress) -> Result<(), TrackerError> {
        let body = encode(Slice::Progress, progress)?;
        self.write(Slice::Progress, &progress_path(), &body).await
    }

    /// Load the strategy document, defaulting to zero PYQs and no mistakes.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if the read or decoding fails.
    pub async fn load_strategy(&self) -> Result<Strategy, TrackerError> {
        match self.documents.get_document(&strategy_path()).await? {
            Some(body) => decode(Slice::Strategy, body),
            None => Ok(Strategy::default()),
        }
    }

    /// Overwrite the stored strategy document.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if encoding or the write fails.
    pub async fn save_strategy(&self, strategy: &Strategy) -> Result<(), TrackerError> {
        let body = encode(Slice::Strategy, strategy)?;
        self.write(Slice::Strategy, &strategy_path(), &body).await
    }

    /// Load every knowledge-hub entry in store order.
    ///
    /// Documents that fail to decode or carry a blank id are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if the collection cannot be listed.
    pub async fn load_hub(&self) -> Result<Vec<HubEntry>, TrackerError> {
        let docs = self.documents.list_documents(HUB_COLLECTION).await?;
        let mut entries = Vec::with_capacity(docs.len());
        for doc in docs {
            let id = match doc.id.parse::<HubEntryId>() {
                Ok(id) => id,
                Err(err) => {
                    warn!(id = %doc.id, error = %err, "skipping knowledge hub document");
                    continue;
                }
            };
            match decode::<HubEntryDoc>(Slice::KnowledgeHub, doc.body) {
                Ok(body) => entries.push(HubEntry::new(id, body)),
                Err(err) => warn!(%id, error = %err, "skipping knowledge hub document"),
            }
        }
        Ok(entries)
    }

    /// Store a new knowledge-hub entry as its own document.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if encoding or the write fails.
    pub async fn create_hub_entry(&self, doc: &HubEntryDoc) -> Result<HubEntryId, TrackerError> {
        let body = encode(Slice::KnowledgeHub, doc)?;
        match self.documents.add_document(HUB_COLLECTION, &body).await {
            Ok(raw) => {
                let id = raw
                    .parse::<HubEntryId>()
                    .map_err(|err| StorageError::Serialization(err.to_string()))?;
                info!(%id, name = %doc.name, "knowledge hub entry created");
                Ok(id)
            }
            Err(err) => {
                warn!(error = %err, "creating knowledge hub entry failed");
                Err(err.into())
            }
        }
    }

    /// Overwrite one knowledge-hub entry document.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if encoding or the write fails.
    pub async fn save_hub_entry(&self, entry: &HubEntry) -> Result<(), TrackerError> {
        let body = encode(Slice::KnowledgeHub, entry.doc())?;
        self.write(Slice::KnowledgeHub, &hub_path(entry.id()), &body)
            .await
    }

    /// Remove a knowledge-hub entry document. An already-missing document is not an error.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if the delete fails.
    pub async fn delete_hub_entry(&self, id: &HubEntryId) -> Result<(), TrackerError> {
        match self.documents.delete_document(&hub_path(id)).await {
            Ok(()) => {
                info!(%id, "knowledge hub entry deleted");
                Ok(())
            }
            Err(StorageError::NotFound) => {
                warn!(%id, "knowledge hub entry was already gone");
                Ok(())
            }
            Err(err) => {
                warn!(%id, error = %err, "deleting knowledge hub entry failed");
                Err(err.into())
            }
        }
    }

    async fn write(
        &self,
        slice: Slice,
        path: &DocumentPath,
        body: &Value,
    ) -> Result<(), TrackerError> {
        match self.documents.set_document(path, body).await {
            Ok(()) => {
                info!(%slice, %path, "saved");
                Ok(())
            }
            Err(err) => {
                warn!(%slice, %path, error = %err, "save failed; keeping in-memory state");
                Err(err.into())
            }
        }
    }
}

fn log_adjustment(adjustment: &ProgressAdjustment) {
    match adjustment {
        ProgressAdjustment::Resized {
            key,
            stored,
            expected,
        } => warn!(%key, stored, expected, "stored progress resized to curriculum"),
        ProgressAdjustment::Synthesized { key } => {
            warn!(%key, "no stored progress for subject, starting empty");
        }
        ProgressAdjustment::LegacyIndex { raw, key } => {
            warn!(raw = %raw, %key, "mapped positional progress key");
        }
        ProgressAdjustment::Dropped { raw } => {
            warn!(raw = %raw, "dropped progress for unknown subject");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storage::repository::InMemoryRepository;
    use tracker_core::model::{CurriculumDraft, SubjectDraft, SubjectKey, Task};

    fn gateway() -> (PersistenceGateway, Arc<InMemoryRepository>) {
        let repo = Arc::new(InMemoryRepository::new());
        (PersistenceGateway::new(repo.clone()), repo)
    }

    fn plan_with_counts(counts: &[usize]) -> Curriculum {
        let start = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        CurriculumDraft {
            subjects: counts
                .iter()
                .enumerate()
                .map(|(i, n)| SubjectDraft {
                    key: None,
                    subject: format!("Subject {i}"),
                    duration: 1,
                    start_date: start,
                    end_date: start,
                    tasks: (0..*n).map(|t| Task::new(1, "Day", format!("T{t}"))).collect(),
                })
                .collect(),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn missing_progress_synthesizes_all_false_lists() {
        let (gateway, _) = gateway();
        let plan = plan_with_counts(&[7, 4]);
        let progress = gateway.load_progress(&plan).await.unwrap();

        let lists: Vec<Vec<bool>> = plan
            .subjects()
            .iter()
            .map(|s| progress.flags(s.key()).unwrap().to_vec())
            .collect();
        assert_eq!(lists, vec![vec![false; 7], vec![false; 4]]);
    }

    #[tokio::test]
    async fn progress_document_is_keyed_by_subject() {
        let (gateway, repo) = gateway();
        let plan = plan_with_counts(&[2, 1]);
        let mut progress = Progress::empty_for(&plan);
        let key: SubjectKey = "subject-0".parse().unwrap();
        progress.toggle(&key, 1).unwrap();

        gateway.save_progress(&progress).await.unwrap();

        let stored = repo
            .get_document(&DocumentPath::new("progress", "userData"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, json!({"subject-0": [false, true], "subject-1": [false]}));
        assert_eq!(gateway.load_progress(&plan).await.unwrap(), progress);
    }

    #[tokio::test]
    async fn legacy_positional_progress_is_mapped() {
        let (gateway, repo) = gateway();
        let plan = plan_with_counts(&[2, 1]);
        repo.set_document(
            &DocumentPath::new("progress", "userData"),
            &json!({"0": [true, true], "1": [true]}),
        )
        .await
        .unwrap();

        let progress = gateway.load_progress(&plan).await.unwrap();
        assert_eq!(progress.completed(&"subject-0".parse().unwrap()), 2);
        assert_eq!(progress.completed(&"subject-1".parse().unwrap()), 1);
    }

    #[tokio::test]
    async fn malformed_progress_is_a_decode_error() {
        let (gateway, repo) = gateway();
        repo.set_document(&DocumentPath::new("progress", "userData"), &json!([1, 2]))
            .await
            .unwrap();
        let err = gateway
            .load_progress(&plan_with_counts(&[1]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Decode {
                slice: Slice::Progress,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn strategy_defaults_and_tolerates_missing_fields() {
        let (gateway, repo) = gateway();
        assert_eq!(gateway.load_strategy().await.unwrap(), Strategy::default());

        repo.set_document(&DocumentPath::new("strategy", "userData"), &json!({"pyqCount": 4}))
            .await
            .unwrap();
        let strategy = gateway.load_strategy().await.unwrap();
        assert_eq!(strategy.pyq_count(), 4);
        assert!(strategy.mistakes().is_empty());
    }

    #[tokio::test]
    async fn strategy_wire_shape_uses_camel_case() {
        let (gateway, repo) = gateway();
        gateway
            .save_strategy(&Strategy::new(2, Vec::new()))
            .await
            .unwrap();
        let stored = repo
            .get_document(&DocumentPath::new("strategy", "userData"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, json!({"pyqCount": 2, "mistakes": []}));
    }

    #[tokio::test]
    async fn hub_entries_round_trip_and_skip_bad_documents() {
        let (gateway, repo) = gateway();
        let id = gateway
            .create_hub_entry(&HubEntryDoc::new("Operating Systems").unwrap())
            .await
            .unwrap();
        repo.add_document("knowledgeHub", &json!({"topics": "nope"}))
            .await
            .unwrap();

        let entries = gateway.load_hub().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id(), &id);
        assert_eq!(entries[0].name(), "Operating Systems");

        repo.set_document(
            &DocumentPath::new("knowledgeHub", "  "),
            &json!({"name": "Ghost", "topics": []}),
        )
        .await
        .unwrap();
        let entries = gateway.load_hub().await.unwrap();
        assert_eq!(entries.len(), 1, "blank-id document is skipped");

        gateway.delete_hub_entry(&id).await.unwrap();
        // deleting again is tolerated
        gateway.delete_hub_entry(&id).await.unwrap();
        assert!(gateway.load_hub().await.unwrap().is_empty());
    }
}
