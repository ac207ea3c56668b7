use services::AppState;
use tracker_core::metrics::Focus;
use tracker_core::model::SubjectKey;

use crate::vm::time_fmt::format_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRowVm {
    pub index: usize,
    pub week: u32,
    pub day: String,
    pub topic: String,
    pub done: bool,
}

/// Planner card for one curriculum subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectCardVm {
    pub key: SubjectKey,
    pub name: String,
    pub date_range: String,
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
    pub is_focus: bool,
    pub tasks: Vec<TaskRowVm>,
}

#[must_use]
pub fn map_subject_cards(state: &AppState, focus: &Focus) -> Vec<SubjectCardVm> {
    let focus_key = match focus {
        Focus::Subject { key, .. } => Some(key),
        Focus::NotStarted | Focus::Complete => None,
    };

    state
        .curriculum()
        .subjects()
        .iter()
        .zip(state.subject_progress())
        .map(|(subject, figures)| {
            let tasks = subject
                .tasks()
                .iter()
                .enumerate()
                .map(|(index, task)| TaskRowVm {
                    index,
                    week: task.week,
                    day: task.day.clone(),
                    topic: task.topic.clone(),
                    done: state.progress().is_done(subject.key(), index),
                })
                .collect();

            SubjectCardVm {
                key: subject.key().clone(),
                name: subject.name().to_owned(),
                date_range: format!(
                    "{} to {}",
                    format_date(subject.start_date()),
                    format_date(subject.end_date())
                ),
                completed: figures.completed,
                total: figures.total,
                percent: figures.percent,
                is_focus: focus_key == Some(subject.key()),
                tasks,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracker_core::model::Curriculum;

    #[test]
    fn cards_follow_curriculum_order_and_flag_focus() {
        let state = AppState::new(Arc::new(Curriculum::builtin()));
        let focus = Focus::Subject {
            key: "digital-logic".parse().unwrap(),
            name: "Digital Logic".to_string(),
        };

        let cards = map_subject_cards(&state, &focus);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].name, "Discrete Mathematics");
        assert_eq!(cards[0].date_range, "2025-07-25 to 2025-08-07");
        assert_eq!(cards[0].tasks.len(), 7);
        assert!(!cards[0].is_focus);
        assert!(cards[1].is_focus);
        assert_eq!((cards[1].completed, cards[1].total, cards[1].percent), (0, 4, 0));
        assert!(cards[1].tasks.iter().all(|t| !t.done));
    }
}
