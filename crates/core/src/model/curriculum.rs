use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::SubjectKey;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("subject name cannot be empty")]
    EmptySubjectName,

    #[error("cannot derive a key for subject {0:?}")]
    UnkeyableSubject(String),

    #[error("invalid subject key: {0:?}")]
    InvalidKey(String),

    #[error("duplicate subject key: {0}")]
    DuplicateKey(SubjectKey),

    #[error("subject {key} ends before it starts")]
    InvertedDates { key: SubjectKey },
}

//
// ─── TASK ──────────────────────────────────────────────────────────────────────
//

/// One scheduled block of study inside a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub week: u32,
    pub day: String,
    pub topic: String,
}

impl Task {
    #[must_use]
    pub fn new(week: u32, day: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            week,
            day: day.into(),
            topic: topic.into(),
        }
    }
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// Deserializable shape of a subject as written in a curriculum file.
///
/// `key` is optional; when absent it is derived from `subject`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDraft {
    #[serde(default)]
    pub key: Option<String>,
    pub subject: String,
    pub duration: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl SubjectDraft {
    /// Validate the draft into a `Subject`.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` if the name is blank, the key is invalid or
    /// cannot be derived, or the end date precedes the start date.
    pub fn validate(self) -> Result<Subject, CurriculumError> {
        let name = self.subject.trim().to_owned();
        if name.is_empty() {
            return Err(CurriculumError::EmptySubjectName);
        }

        let key = match self.key {
            Some(raw) => SubjectKey::new(raw.clone()).map_err(|_| CurriculumError::InvalidKey(raw))?,
            None => SubjectKey::from_name(&name)
                .ok_or_else(|| CurriculumError::UnkeyableSubject(name.clone()))?,
        };

        if self.end_date < self.start_date {
            return Err(CurriculumError::InvertedDates { key });
        }

        Ok(Subject {
            key,
            name,
            duration: self.duration,
            start_date: self.start_date,
            end_date: self.end_date,
            tasks: self.tasks,
        })
    }
}

/// A subject of the study plan with its date window and ordered tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    key: SubjectKey,
    name: String,
    duration: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    tasks: Vec<Task>,
}

impl Subject {
    #[must_use]
    pub fn key(&self) -> &SubjectKey {
        &self.key
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Planned length of the subject in days.
    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// True when `day` lies within `[start_date, end_date]`, both ends inclusive.
    #[must_use]
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

//
// ─── CURRICULUM ────────────────────────────────────────────────────────────────
//

/// Deserializable curriculum file: `{ "subjects": [ ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumDraft {
    #[serde(default)]
    pub subjects: Vec<SubjectDraft>,
}

impl CurriculumDraft {
    /// Validate every subject and check key uniqueness.
    ///
    /// # Errors
    ///
    /// Returns the first `CurriculumError` encountered.
    pub fn validate(self) -> Result<Curriculum, CurriculumError> {
        let subjects = self
            .subjects
            .into_iter()
            .map(SubjectDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Curriculum::new(subjects)
    }
}

/// The static, ordered study plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Curriculum {
    subjects: Vec<Subject>,
}

impl Curriculum {
    /// Build a curriculum from validated subjects.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::DuplicateKey` if two subjects share a key.
    pub fn new(subjects: Vec<Subject>) -> Result<Self, CurriculumError> {
        let mut seen = HashSet::with_capacity(subjects.len());
        for subject in &subjects {
            if !seen.insert(subject.key()) {
                return Err(CurriculumError::DuplicateKey(subject.key().clone()));
            }
        }
        Ok(Self { subjects })
    }

    /// The plan shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        let subjects = vec![
            builtin_subject(
                "Discrete Mathematics",
                14,
                (2025, 7, 25),
                (2025, 8, 7),
                vec![
                    Task::new(1, "Day 1-2", "Mathematical Logic: Propositional Logic"),
                    Task::new(1, "Day 3-5", "Mathematical Logic: First-Order Logic & Inference"),
                    Task::new(2, "Day 6-7", "Set Theory & Functions Fundamentals"),
                    Task::new(2, "Day 8-9", "Combinatorics: Counting Principles, Pigeonhole"),
                    Task::new(2, "Day 10-11", "Graph Theory: Basics, Traversals, Connectivity"),
                    Task::new(3, "Day 12", "Group Theory Basics"),
                    Task::new(3, "Day 13-14", "Full Subject PYQ Marathon & Revision"),
                ],
            ),
            builtin_subject(
                "Digital Logic",
                8,
                (2025, 8, 8),
                (2025, 8, 15),
                vec![
                    Task::new(3, "Day 1-2", "Boolean Algebra & K-Maps"),
                    Task::new(3, "Day 3-4", "Combinational Circuits (Adders, Mux)"),
                    Task::new(4, "Day 5-6", "Sequential Circuits (Latches, Flip-Flops)"),
                    Task::new(4, "Day 7-8", "FSM, Counters, and Registers"),
                ],
            ),
        ];
        Self { subjects }
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    #[must_use]
    pub fn get(&self, key: &SubjectKey) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.key() == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    #[must_use]
    pub fn total_tasks(&self) -> usize {
        self.subjects.iter().map(Subject::task_count).sum()
    }
}

fn builtin_subject(
    name: &str,
    duration: u32,
    start: (i32, u32, u32),
    end: (i32, u32, u32),
    tasks: Vec<Task>,
) -> Subject {
    let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    Subject {
        key: SubjectKey::from_name(name).unwrap_or_else(|| SubjectKey::slug_unchecked("subject")),
        name: name.to_owned(),
        duration,
        start_date: date(start),
        end_date: date(end),
        tasks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(name: &str, key: Option<&str>) -> SubjectDraft {
        SubjectDraft {
            key: key.map(str::to_owned),
            subject: name.to_owned(),
            duration: 3,
            start_date: date(2025, 1, 1),
            end_date: date(2025, 1, 3),
            tasks: vec![Task::new(1, "Day 1", "Intro")],
        }
    }

    #[test]
    fn builtin_plan_has_expected_shape() {
        let plan = Curriculum::builtin();
        let counts: Vec<usize> = plan.subjects().iter().map(Subject::task_count).collect();
        assert_eq!(counts, vec![7, 4]);
        assert_eq!(plan.total_tasks(), 11);
        assert_eq!(plan.subjects()[0].key().as_str(), "discrete-mathematics");
        assert_eq!(plan.subjects()[1].start_date(), date(2025, 8, 8));
    }

    #[test]
    fn draft_derives_key_from_name() {
        let subject = draft("Theory of Computation", None).validate().unwrap();
        assert_eq!(subject.key().as_str(), "theory-of-computation");
    }

    #[test]
    fn draft_rejects_blank_name_and_inverted_dates() {
        assert_eq!(
            draft("   ", None).validate().unwrap_err(),
            CurriculumError::EmptySubjectName
        );

        let mut inverted = draft("Algorithms", None);
        inverted.end_date = date(2024, 12, 31);
        assert!(matches!(
            inverted.validate(),
            Err(CurriculumError::InvertedDates { .. })
        ));
    }

    #[test]
    fn draft_rejects_invalid_explicit_key() {
        let err = draft("Algorithms", Some("Not A Slug")).validate().unwrap_err();
        assert_eq!(err, CurriculumError::InvalidKey("Not A Slug".to_string()));
    }

    #[test]
    fn curriculum_rejects_duplicate_keys() {
        let result = CurriculumDraft {
            subjects: vec![draft("Algorithms", None), draft("Algorithms!", None)],
        }
        .validate();
        assert!(matches!(result, Err(CurriculumError::DuplicateKey(_))));
    }

    #[test]
    fn subject_covers_is_inclusive() {
        let subject = draft("Algorithms", None).validate().unwrap();
        assert!(subject.covers(date(2025, 1, 1)));
        assert!(subject.covers(date(2025, 1, 3)));
        assert!(!subject.covers(date(2025, 1, 4)));
        assert!(!subject.covers(date(2024, 12, 31)));
    }
}
