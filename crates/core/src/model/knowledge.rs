use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::HubEntryId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HubError {
    #[error("subject name cannot be empty")]
    EmptyName,

    #[error("note title cannot be empty")]
    EmptyTitle,

    #[error("unknown knowledge hub entry: {0}")]
    UnknownEntry(HubEntryId),
}

/// A titled markdown note filed under a knowledge-hub subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNote {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl TopicNote {
    /// Build a note, trimming the title.
    ///
    /// # Errors
    ///
    /// Returns `HubError::EmptyTitle` if the title is blank.
    pub fn new(title: &str, body: impl Into<String>) -> Result<Self, HubError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(HubError::EmptyTitle);
        }
        Ok(Self {
            title: title.to_owned(),
            body: body.into(),
        })
    }
}

/// Document body of a knowledge-hub entry (`{ name, topics }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubEntryDoc {
    pub name: String,
    #[serde(default)]
    pub topics: Vec<TopicNote>,
}

impl HubEntryDoc {
    /// A fresh entry with no notes.
    ///
    /// # Errors
    ///
    /// Returns `HubError::EmptyName` if the trimmed name is empty.
    pub fn new(name: &str) -> Result<Self, HubError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HubError::EmptyName);
        }
        Ok(Self {
            name: name.to_owned(),
            topics: Vec::new(),
        })
    }
}

/// A knowledge-hub subject as held in memory: the document plus its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubEntry {
    id: HubEntryId,
    doc: HubEntryDoc,
}

impl HubEntry {
    #[must_use]
    pub fn new(id: HubEntryId, doc: HubEntryDoc) -> Self {
        Self { id, doc }
    }

    #[must_use]
    pub fn id(&self) -> &HubEntryId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.doc.name
    }

    #[must_use]
    pub fn topics(&self) -> &[TopicNote] {
        &self.doc.topics
    }

    #[must_use]
    pub fn doc(&self) -> &HubEntryDoc {
        &self.doc
    }

    pub fn push_topic(&mut self, note: TopicNote) {
        self.doc.topics.push(note);
    }
}
