use std::collections::BTreeSet;
use std::sync::Arc;

use storage::repository::DocumentRepository;
use tracing::{info, warn};
use tracker_core::model::{
    Curriculum, HubEntry, HubEntryDoc, HubEntryId, MistakeDraft, Progress, Strategy, SubjectKey,
    TopicNote,
};

use crate::Clock;
use crate::error::{SliceLoadError, TrackerError};
use crate::gateway::{PersistenceGateway, Slice};
use crate::state::{AppState, LoadedState};

/// Mutation handlers for the tracker.
///
/// Each handler validates its input, mutates the caller's `AppState`, then
/// writes the whole affected slice. Validation failures leave the state
/// untouched. A failed write is returned as an error but the mutation is kept:
/// in-memory state stays the source of truth and the next successful save of
/// that slice carries it. Handlers that write a slice whose startup load
/// failed reload it first and refuse to write if that reload fails too.
#[derive(Clone)]
pub struct TrackerService {
    clock: Clock,
    curriculum: Arc<Curriculum>,
    gateway: PersistenceGateway,
}

impl TrackerService {
    #[must_use]
    pub fn new(
        clock: Clock,
        curriculum: Arc<Curriculum>,
        documents: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            clock,
            curriculum,
            gateway: PersistenceGateway::new(documents),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn curriculum(&self) -> Arc<Curriculum> {
        Arc::clone(&self.curriculum)
    }

    #[must_use]
    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    /// Load all three slices.
    ///
    /// A slice that fails to load is logged, replaced by its default and
    /// reported in `LoadedState::failures`; the others still load.
    pub async fn load_state(&self) -> LoadedState {
        let mut failures = Vec::new();

        let progress = match self.gateway.load_progress(&self.curriculum).await {
            Ok(progress) => progress,
            Err(source) => {
                failures.push(SliceLoadError {
                    slice: Slice::Progress,
                    source,
                });
                Progress::empty_for(&self.curriculum)
            }
        };

        let hub = match self.gateway.load_hub().await {
            Ok(hub) => hub,
            Err(source) => {
                failures.push(SliceLoadError {
                    slice: Slice::KnowledgeHub,
                    source,
                });
                Vec::new()
            }
        };

        let strategy = match self.gateway.load_strategy().await {
            Ok(strategy) => strategy,
            Err(source) => {
                failures.push(SliceLoadError {
                    slice: Slice::Strategy,
                    source,
                });
                Strategy::default()
            }
        };

        for failure in &failures {
            warn!(slice = %failure.slice, error = %failure.source, "using default for slice");
        }
        info!(
            subjects = self.curriculum.len(),
            hub_entries = hub.len(),
            mistakes = strategy.mistakes().len(),
            "state loaded"
        );

        let unloaded: BTreeSet<Slice> = failures.iter().map(|f| f.slice).collect();
        LoadedState {
            state: AppState::from_parts(
                Arc::clone(&self.curriculum),
                progress,
                hub,
                strategy,
                unloaded,
            ),
            failures,
        }
    }

    /// Reload `slice` if its startup load failed, so a save never replaces
    /// stored data with the placeholder default.
    async fn ensure_loaded(&self, state: &mut AppState, slice: Slice) -> Result<(), TrackerError> {
        if !state.is_unloaded(slice) {
            return Ok(());
        }

        let reloaded = match slice {
            Slice::Progress => self
                .gateway
                .load_progress(&self.curriculum)
                .await
                .map(|progress| state.replace_progress(progress)),
            Slice::KnowledgeHub => self
                .gateway
                .load_hub()
                .await
                .map(|entries| state.replace_hub(entries)),
            Slice::Strategy => self
                .gateway
                .load_strategy()
                .await
                .map(|strategy| state.replace_strategy(strategy)),
        };

        match reloaded {
            Ok(()) => {
                info!(%slice, "slice reloaded");
                Ok(())
            }
            Err(source) => {
                warn!(%slice, error = %source, "slice still unavailable; refusing to save");
                Err(TrackerError::Unloaded {
                    slice,
                    source: Box::new(source),
                })
            }
        }
    }

    /// Flip one task's completion flag and save progress. Returns the new flag.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Progress` for an unknown subject or out-of-range
    /// index (no state change), or `TrackerError::Storage` if the save fails.
    pub async fn toggle_task(
        &self,
        state: &mut AppState,
        key: &SubjectKey,
        index: usize,
    ) -> Result<bool, TrackerError> {
        self.ensure_loaded(state, Slice::Progress).await?;
        let done = state.toggle_task(key, index)?;
        self.gateway.save_progress(state.progress()).await?;
        Ok(done)
    }

    /// Create a knowledge-hub subject as a new document, then reload the hub.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Hub` if the trimmed name is empty, or
    /// `TrackerError::Storage` if the document cannot be created.
    pub async fn add_hub_subject(
        &self,
        state: &mut AppState,
        name: &str,
    ) -> Result<HubEntryId, TrackerError> {
        let doc = HubEntryDoc::new(name)?;
        let id = self.gateway.create_hub_entry(&doc).await?;

        match self.gateway.load_hub().await {
            Ok(entries) => state.replace_hub(entries),
            Err(err) => {
                warn!(error = %err, "reloading knowledge hub failed; appending locally");
                state.push_hub_entry(HubEntry::new(id.clone(), doc));
            }
        }
        Ok(id)
    }

    /// Append a note to a knowledge-hub subject and overwrite its document.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Hub` for a blank title or unknown entry, or
    /// `TrackerError::Storage` if the save fails.
    pub async fn add_hub_topic(
        &self,
        state: &mut AppState,
        id: &HubEntryId,
        title: &str,
        body: &str,
    ) -> Result<(), TrackerError> {
        let note = TopicNote::new(title, body)?;
        self.ensure_loaded(state, Slice::KnowledgeHub).await?;
        let entry = state.add_topic(id, note)?.clone();
        self.gateway.save_hub_entry(&entry).await
    }

    /// Remove a knowledge-hub subject locally and from the store.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Hub` if the entry is unknown, or
    /// `TrackerError::Storage` if the delete fails.
    pub async fn delete_hub_subject(
        &self,
        state: &mut AppState,
        id: &HubEntryId,
    ) -> Result<(), TrackerError> {
        self.ensure_loaded(state, Slice::KnowledgeHub).await?;
        state.remove_hub_entry(id)?;
        self.gateway.delete_hub_entry(id).await
    }

    /// Append a timestamped mistake and save the strategy document.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Mistake` if any field is blank (no state
    /// change), or `TrackerError::Storage` if the save fails.
    pub async fn add_mistake(
        &self,
        state: &mut AppState,
        draft: MistakeDraft,
    ) -> Result<(), TrackerError> {
        self.ensure_loaded(state, Slice::Strategy).await?;
        state.add_mistake(draft, self.clock.now())?;
        self.gateway.save_strategy(state.strategy()).await
    }

    /// Adjust the PYQ counter, flooring at zero, and save the strategy document.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if the save fails; the new count is
    /// kept in memory regardless.
    pub async fn adjust_pyq(&self, state: &mut AppState, delta: i64) -> Result<u64, TrackerError> {
        self.ensure_loaded(state, Slice::Strategy).await?;
        let count = state.adjust_pyq(delta);
        self.gateway.save_strategy(state.strategy()).await?;
        Ok(count)
    }
}
