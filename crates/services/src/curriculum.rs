use std::path::Path;

use tracker_core::model::{Curriculum, CurriculumDraft};

use crate::error::TrackerError;

/// Parse a curriculum from its JSON file format.
///
/// # Errors
///
/// Returns `TrackerError::CurriculumFormat` for malformed JSON, or
/// `TrackerError::Curriculum` if a subject fails validation.
pub fn parse_curriculum(json: &str) -> Result<Curriculum, TrackerError> {
    let draft: CurriculumDraft =
        serde_json::from_str(json).map_err(TrackerError::CurriculumFormat)?;
    Ok(draft.validate()?)
}

/// Read and parse a curriculum file.
///
/// # Errors
///
/// Returns `TrackerError::Io` if the file cannot be read, plus any error of
/// [`parse_curriculum`].
pub fn load_curriculum(path: &Path) -> Result<Curriculum, TrackerError> {
    let raw = std::fs::read_to_string(path)?;
    parse_curriculum(&raw)
}
