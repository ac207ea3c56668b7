//! Derived progress figures and current-focus resolution.
//!
//! Everything here is a pure function of the curriculum, the progress flags
//! and (for focus) a calendar date.

use chrono::NaiveDate;

use crate::model::{Curriculum, Progress, SubjectKey};

/// `round(completed / total * 100)`, rounding halves up; 0 when `total` is 0.
#[must_use]
pub fn percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    let rounded = (200 * completed + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(100)
}

/// Completion figures for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectProgress {
    pub key: SubjectKey,
    pub name: String,
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
}

/// Completion figures across the whole curriculum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverallProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
}

/// Per-subject figures in curriculum order.
#[must_use]
pub fn subject_progress(curriculum: &Curriculum, progress: &Progress) -> Vec<SubjectProgress> {
    curriculum
        .subjects()
        .iter()
        .map(|subject| {
            let total = subject.task_count();
            let completed = progress.completed(subject.key()).min(total);
            SubjectProgress {
                key: subject.key().clone(),
                name: subject.name().to_owned(),
                completed,
                total,
                percent: percentage(completed, total),
            }
        })
        .collect()
}

#[must_use]
pub fn overall_progress(curriculum: &Curriculum, progress: &Progress) -> OverallProgress {
    let (completed, total) = subject_progress(curriculum, progress)
        .iter()
        .fold((0, 0), |(c, t), s| (c + s.completed, t + s.total));
    OverallProgress {
        completed,
        total,
        percent: percentage(completed, total),
    }
}

/// What the plan says to study on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    Subject { key: SubjectKey, name: String },
    NotStarted,
    Complete,
}

impl Focus {
    /// Short status line for headers.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Focus::Subject { name, .. } => name,
            Focus::NotStarted => "Prep starts soon!",
            Focus::Complete => "Plan Complete!",
        }
    }
}

/// First subject whose inclusive date window contains `today`.
#[must_use]
pub fn resolve_focus(curriculum: &Curriculum, today: NaiveDate) -> Focus {
    if let Some(subject) = curriculum.subjects().iter().find(|s| s.covers(today)) {
        return Focus::Subject {
            key: subject.key().clone(),
            name: subject.name().to_owned(),
        };
    }
    match curriculum.subjects().first() {
        Some(first) if today < first.start_date() => Focus::NotStarted,
        _ => Focus::Complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurriculumDraft, SubjectDraft, Task};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn subject(name: &str, start: NaiveDate, end: NaiveDate, tasks: usize) -> SubjectDraft {
        SubjectDraft {
            key: None,
            subject: name.to_owned(),
            duration: 1,
            start_date: start,
            end_date: end,
            tasks: (0..tasks)
                .map(|i| Task::new(1, format!("Day {i}"), format!("Topic {i}")))
                .collect(),
        }
    }

    #[test]
    fn percentage_handles_zero_and_rounding() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(percentage(7, 7), 100);
    }

    #[test]
    fn zero_task_subject_reports_zero_percent() {
        let plan = CurriculumDraft {
            subjects: vec![subject("Empty", date(2025, 1, 1), date(2025, 1, 2), 0)],
        }
        .validate()
        .unwrap();
        let rows = subject_progress(&plan, &Progress::empty_for(&plan));
        assert_eq!(rows[0].percent, 0);
        assert_eq!(overall_progress(&plan, &Progress::empty_for(&plan)).percent, 0);
    }

    #[test]
    fn overall_matches_independent_aggregate() {
        let plan = Curriculum::builtin();
        let mut progress = Progress::empty_for(&plan);
        let dm: SubjectKey = "discrete-mathematics".parse().unwrap();
        let dl: SubjectKey = "digital-logic".parse().unwrap();
        for i in [0, 2, 3] {
            progress.toggle(&dm, i).unwrap();
        }
        progress.toggle(&dl, 1).unwrap();

        let rows = subject_progress(&plan, &progress);
        assert_eq!(rows[0].percent, 43);
        assert_eq!(rows[1].percent, 25);

        let completed: usize = rows.iter().map(|r| r.completed).sum();
        let total: usize = rows.iter().map(|r| r.total).sum();
        let expected = ((completed as f64 / total as f64) * 100.0).round() as u32;

        let overall = overall_progress(&plan, &progress);
        assert_eq!((overall.completed, overall.total), (4, 11));
        assert_eq!(overall.percent, expected);
    }

    #[test]
    fn focus_resolves_by_inclusive_date_window() {
        let plan = CurriculumDraft {
            subjects: vec![
                subject("A", date(2025, 7, 25), date(2025, 8, 7), 1),
                subject("B", date(2025, 8, 8), date(2025, 8, 15), 1),
            ],
        }
        .validate()
        .unwrap();
        let name_of = |focus: Focus| match focus {
            Focus::Subject { name, .. } => name,
            other => panic!("expected subject, got {other:?}"),
        };

        assert_eq!(name_of(resolve_focus(&plan, date(2025, 8, 7))), "A");
        assert_eq!(name_of(resolve_focus(&plan, date(2025, 8, 8))), "B");
        assert_eq!(name_of(resolve_focus(&plan, date(2025, 8, 1))), "A");
        assert_eq!(resolve_focus(&plan, date(2025, 7, 24)), Focus::NotStarted);
        assert_eq!(resolve_focus(&plan, date(2025, 8, 16)), Focus::Complete);
    }

    #[test]
    fn focus_on_empty_curriculum_is_complete() {
        assert_eq!(
            resolve_focus(&Curriculum::default(), date(2025, 1, 1)),
            Focus::Complete
        );
    }

    #[test]
    fn focus_labels() {
        assert_eq!(Focus::NotStarted.label(), "Prep starts soon!");
        assert_eq!(Focus::Complete.label(), "Plan Complete!");
    }
}
