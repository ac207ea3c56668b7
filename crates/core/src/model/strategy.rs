use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MistakeError {
    #[error("mistake subject cannot be empty")]
    EmptySubject,

    #[error("mistake topic cannot be empty")]
    EmptyTopic,

    #[error("mistake note cannot be empty")]
    EmptyNote,
}

/// User input for a new mistake entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MistakeDraft {
    pub subject: String,
    pub topic: String,
    pub note: String,
}

impl MistakeDraft {
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        topic: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            topic: topic.into(),
            note: note.into(),
        }
    }

    /// Validate the draft and stamp it with `now`.
    ///
    /// # Errors
    ///
    /// Returns `MistakeError` for the first field that is blank after trimming.
    pub fn validate(self, now: DateTime<Utc>) -> Result<Mistake, MistakeError> {
        let subject = self.subject.trim();
        if subject.is_empty() {
            return Err(MistakeError::EmptySubject);
        }
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(MistakeError::EmptyTopic);
        }
        let note = self.note.trim();
        if note.is_empty() {
            return Err(MistakeError::EmptyNote);
        }
        Ok(Mistake {
            subject: subject.to_owned(),
            topic: topic.to_owned(),
            note: note.to_owned(),
            date: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    pub subject: String,
    pub topic: String,
    pub note: String,
    pub date: DateTime<Utc>,
}

/// Strategy-room document: PYQ counter plus the append-only mistake log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    #[serde(default)]
    pyq_count: u64,
    #[serde(default)]
    mistakes: Vec<Mistake>,
}

impl Strategy {
    #[must_use]
    pub fn new(pyq_count: u64, mistakes: Vec<Mistake>) -> Self {
        Self {
            pyq_count,
            mistakes,
        }
    }

    #[must_use]
    pub fn pyq_count(&self) -> u64 {
        self.pyq_count
    }

    /// Oldest first, in insertion order.
    #[must_use]
    pub fn mistakes(&self) -> &[Mistake] {
        &self.mistakes
    }

    pub fn recent_mistakes(&self) -> impl Iterator<Item = &Mistake> {
        self.mistakes.iter().rev()
    }

    pub fn push_mistake(&mut self, mistake: Mistake) {
        self.mistakes.push(mistake);
    }

    /// Apply a signed delta, flooring at zero. Returns the new count.
    pub fn adjust_pyq(&mut self, delta: i64) -> u64 {
        self.pyq_count = if delta.is_negative() {
            self.pyq_count.saturating_sub(delta.unsigned_abs())
        } else {
            self.pyq_count.saturating_add(delta.unsigned_abs())
        };
        self.pyq_count
    }
}
