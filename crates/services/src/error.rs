//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use tracker_core::model::{CurriculumError, HubError, MistakeError, ProgressError};

use crate::gateway::Slice;

/// Errors emitted by the gateway and `TrackerService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrackerError {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Hub(#[from] HubError),
    #[error(transparent)]
    Mistake(#[from] MistakeError),
    #[error(transparent)]
    Curriculum(#[from] CurriculumError),
    #[error("malformed {slice} document: {source}")]
    Decode {
        slice: Slice,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode {slice} document: {source}")]
    Encode {
        slice: Slice,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed curriculum file: {0}")]
    CurriculumFormat(#[source] serde_json::Error),
    #[error("cannot read curriculum file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The slice never loaded, so saving it would overwrite stored data with
    /// a placeholder. Nothing was changed.
    #[error("{slice} is not loaded yet: {source}")]
    Unloaded {
        slice: Slice,
        #[source]
        source: Box<TrackerError>,
    },
}

impl TrackerError {
    /// True for input the user can correct; no state was changed.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TrackerError::Progress(_) | TrackerError::Hub(_) | TrackerError::Mistake(_)
        )
    }
}

/// A slice that could not be loaded at startup and was replaced by its default.
#[derive(Debug, Error)]
#[error("failed to load {slice}: {source}")]
pub struct SliceLoadError {
    pub slice: Slice,
    #[source]
    pub source: TrackerError,
}
