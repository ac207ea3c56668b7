use services::AppState;
use tracker_core::model::{HubEntry, HubEntryId};

use crate::vm::markdown_vm::markdown_to_html;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HubCardVm {
    pub id: HubEntryId,
    pub name: String,
    pub note_count_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicNoteVm {
    pub title: String,
    /// Sanitized HTML rendered from the note's markdown body.
    pub html: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HubDetailVm {
    pub id: HubEntryId,
    pub name: String,
    pub notes: Vec<TopicNoteVm>,
}

fn note_count_label(count: usize) -> String {
    match count {
        1 => "1 note".to_string(),
        n => format!("{n} notes"),
    }
}

impl From<&HubEntry> for HubCardVm {
    fn from(entry: &HubEntry) -> Self {
        Self {
            id: entry.id().clone(),
            name: entry.name().to_owned(),
            note_count_label: note_count_label(entry.topics().len()),
        }
    }
}

#[must_use]
pub fn map_hub_cards(state: &AppState) -> Vec<HubCardVm> {
    state.hub().iter().map(HubCardVm::from).collect()
}

#[must_use]
pub fn map_hub_detail(state: &AppState, id: &HubEntryId) -> Option<HubDetailVm> {
    let entry = state.hub_entry(id)?;
    Some(HubDetailVm {
        id: entry.id().clone(),
        name: entry.name().to_owned(),
        notes: entry
            .topics()
            .iter()
            .map(|note| TopicNoteVm {
                title: note.title.clone(),
                html: markdown_to_html(&note.body),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_count_label_pluralizes() {
        assert_eq!(note_count_label(0), "0 notes");
        assert_eq!(note_count_label(1), "1 note");
        assert_eq!(note_count_label(3), "3 notes");
    }
}
