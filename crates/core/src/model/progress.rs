use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::curriculum::Curriculum;
use crate::model::ids::SubjectKey;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("unknown subject: {0}")]
    UnknownSubject(SubjectKey),

    #[error("task {index} out of range for subject {key} ({len} tasks)")]
    TaskOutOfRange {
        key: SubjectKey,
        index: usize,
        len: usize,
    },
}

/// A correction applied while aligning stored progress with the curriculum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressAdjustment {
    /// The stored list had a different length than the subject's task count.
    Resized {
        key: SubjectKey,
        stored: usize,
        expected: usize,
    },
    /// No stored list existed; an all-false list was synthesized.
    Synthesized { key: SubjectKey },
    /// A positional key (`"0"`, `"1"`, ...) was mapped onto a subject key.
    LegacyIndex { raw: String, key: SubjectKey },
    /// A stored key matched no subject and was discarded.
    Dropped { raw: String },
}

/// Per-subject task completion flags.
///
/// Every subject of the curriculum the progress was built for has exactly one
/// list whose length equals that subject's task count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress {
    flags: BTreeMap<SubjectKey, Vec<bool>>,
}

impl Progress {
    /// All-false progress for every subject of the curriculum.
    #[must_use]
    pub fn empty_for(curriculum: &Curriculum) -> Self {
        let flags = curriculum
            .subjects()
            .iter()
            .map(|s| (s.key().clone(), vec![false; s.task_count()]))
            .collect();
        Self { flags }
    }

    /// Align a stored progress document with the curriculum.
    ///
    /// Explicit subject keys win over legacy positional keys that resolve to
    /// the same subject.
    #[must_use]
    pub fn reconcile(
        curriculum: &Curriculum,
        stored: BTreeMap<String, Vec<bool>>,
    ) -> (Self, Vec<ProgressAdjustment>) {
        let mut adjustments = Vec::new();
        let mut by_key: BTreeMap<SubjectKey, Vec<bool>> = BTreeMap::new();
        let mut legacy = Vec::new();

        for (raw, list) in stored {
            match raw.parse::<SubjectKey>() {
                Ok(key) if curriculum.get(&key).is_some() => {
                    by_key.insert(key, list);
                }
                _ => legacy.push((raw, list)),
            }
        }

        for (raw, list) in legacy {
            let subject = raw
                .parse::<usize>()
                .ok()
                .and_then(|idx| curriculum.subjects().get(idx));
            match subject {
                Some(subject) if !by_key.contains_key(subject.key()) => {
                    adjustments.push(ProgressAdjustment::LegacyIndex {
                        raw,
                        key: subject.key().clone(),
                    });
                    by_key.insert(subject.key().clone(), list);
                }
                _ => adjustments.push(ProgressAdjustment::Dropped { raw }),
            }
        }

        let mut flags = BTreeMap::new();
        for subject in curriculum.subjects() {
            let expected = subject.task_count();
            let list = match by_key.remove(subject.key()) {
                Some(mut list) => {
                    if list.len() != expected {
                        adjustments.push(ProgressAdjustment::Resized {
                            key: subject.key().clone(),
                            stored: list.len(),
                            expected,
                        });
                        list.resize(expected, false);
                    }
                    list
                }
                None => {
                    adjustments.push(ProgressAdjustment::Synthesized {
                        key: subject.key().clone(),
                    });
                    vec![false; expected]
                }
            };
            flags.insert(subject.key().clone(), list);
        }

        (Self { flags }, adjustments)
    }

    #[must_use]
    pub fn flags(&self, key: &SubjectKey) -> Option<&[bool]> {
        self.flags.get(key).map(Vec::as_slice)
    }

    /// Whether a single task is marked done. Unknown positions read as `false`.
    #[must_use]
    pub fn is_done(&self, key: &SubjectKey, index: usize) -> bool {
        self.flags
            .get(key)
            .and_then(|list| list.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// Number of completed tasks for a subject, 0 for unknown subjects.
    #[must_use]
    pub fn completed(&self, key: &SubjectKey) -> usize {
        self.flags
            .get(key)
            .map_or(0, |list| list.iter().filter(|done| **done).count())
    }

    /// Flip one task and return its new value.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the subject is unknown or the index is out
    /// of range; the progress is left untouched in that case.
    pub fn toggle(&mut self, key: &SubjectKey, index: usize) -> Result<bool, ProgressError> {
        let list = self
            .flags
            .get_mut(key)
            .ok_or_else(|| ProgressError::UnknownSubject(key.clone()))?;
        let len = list.len();
        let flag = list.get_mut(index).ok_or_else(|| ProgressError::TaskOutOfRange {
            key: key.clone(),
            index,
            len,
        })?;
        *flag = !*flag;
        Ok(*flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SubjectKey, &[bool])> {
        self.flags.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
