use services::AppState;
use tracker_core::model::Mistake;

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MistakeVm {
    pub subject: String,
    pub topic: String,
    pub note: String,
    pub logged_at: String,
}

impl From<&Mistake> for MistakeVm {
    fn from(mistake: &Mistake) -> Self {
        Self {
            subject: mistake.subject.clone(),
            topic: mistake.topic.clone(),
            note: mistake.note.clone(),
            logged_at: format_datetime(mistake.date),
        }
    }
}

/// Mistakes newest first.
#[must_use]
pub fn map_mistakes(state: &AppState) -> Vec<MistakeVm> {
    state.recent_mistakes().map(MistakeVm::from).collect()
}
