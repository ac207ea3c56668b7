use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracker_core::metrics::{
    Focus, OverallProgress, SubjectProgress, overall_progress, resolve_focus, subject_progress,
};
use tracker_core::model::{
    Curriculum, HubEntry, HubEntryId, HubError, Mistake, MistakeDraft, MistakeError, Progress,
    ProgressError, Strategy, SubjectKey, TopicNote,
};

use crate::error::SliceLoadError;
use crate::gateway::Slice;

/// In-memory mirror of the three stored slices.
///
/// Only `TrackerService` mutates it; views read it through the accessors
/// and the derived-metric helpers.
///
/// A slice whose startup load failed holds a placeholder default and is
/// listed in `unloaded`; it is never written back until a reload succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    curriculum: Arc<Curriculum>,
    progress: Progress,
    hub: Vec<HubEntry>,
    strategy: Strategy,
    unloaded: BTreeSet<Slice>,
}

/// Result of the startup load: the state plus any slices that fell back to defaults.
#[derive(Debug)]
pub struct LoadedState {
    pub state: AppState,
    pub failures: Vec<SliceLoadError>,
}

impl AppState {
    /// Fresh state with every slice at its default.
    #[must_use]
    pub fn new(curriculum: Arc<Curriculum>) -> Self {
        let progress = Progress::empty_for(&curriculum);
        Self {
            curriculum,
            progress,
            hub: Vec::new(),
            strategy: Strategy::default(),
            unloaded: BTreeSet::new(),
        }
    }

    #[must_use]
    pub(crate) fn from_parts(
        curriculum: Arc<Curriculum>,
        progress: Progress,
        hub: Vec<HubEntry>,
        strategy: Strategy,
        unloaded: BTreeSet<Slice>,
    ) -> Self {
        Self {
            curriculum,
            progress,
            hub,
            strategy,
            unloaded,
        }
    }

    #[must_use]
    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[must_use]
    pub fn hub(&self) -> &[HubEntry] {
        &self.hub
    }

    #[must_use]
    pub fn hub_entry(&self, id: &HubEntryId) -> Option<&HubEntry> {
        self.hub.iter().find(|e| e.id() == id)
    }

    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    #[must_use]
    pub fn pyq_count(&self) -> u64 {
        self.strategy.pyq_count()
    }

    pub fn recent_mistakes(&self) -> impl Iterator<Item = &Mistake> {
        self.strategy.recent_mistakes()
    }

    #[must_use]
    pub fn subject_progress(&self) -> Vec<SubjectProgress> {
        subject_progress(&self.curriculum, &self.progress)
    }

    #[must_use]
    pub fn overall_progress(&self) -> OverallProgress {
        overall_progress(&self.curriculum, &self.progress)
    }

    #[must_use]
    pub fn focus(&self, today: NaiveDate) -> Focus {
        resolve_focus(&self.curriculum, today)
    }

    /// True while `slice` shows a placeholder because its load failed.
    #[must_use]
    pub fn is_unloaded(&self, slice: Slice) -> bool {
        self.unloaded.contains(&slice)
    }

    pub fn unloaded_slices(&self) -> impl Iterator<Item = Slice> + '_ {
        self.unloaded.iter().copied()
    }

    // ─── Mutations (crate-private; reached through TrackerService) ──────────────

    pub(crate) fn toggle_task(
        &mut self,
        key: &SubjectKey,
        index: usize,
    ) -> Result<bool, ProgressError> {
        self.progress.toggle(key, index)
    }

    pub(crate) fn add_mistake(
        &mut self,
        draft: MistakeDraft,
        now: DateTime<Utc>,
    ) -> Result<(), MistakeError> {
        let mistake = draft.validate(now)?;
        self.strategy.push_mistake(mistake);
        Ok(())
    }

    pub(crate) fn adjust_pyq(&mut self, delta: i64) -> u64 {
        self.strategy.adjust_pyq(delta)
    }

    pub(crate) fn replace_progress(&mut self, progress: Progress) {
        self.progress = progress;
        self.unloaded.remove(&Slice::Progress);
    }

    pub(crate) fn replace_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
        self.unloaded.remove(&Slice::Strategy);
    }

    pub(crate) fn replace_hub(&mut self, entries: Vec<HubEntry>) {
        self.hub = entries;
        self.unloaded.remove(&Slice::KnowledgeHub);
    }

    pub(crate) fn push_hub_entry(&mut self, entry: HubEntry) {
        self.hub.push(entry);
    }

    pub(crate) fn add_topic(
        &mut self,
        id: &HubEntryId,
        note: TopicNote,
    ) -> Result<&HubEntry, HubError> {
        let entry = self
            .hub
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| HubError::UnknownEntry(id.clone()))?;
        entry.push_topic(note);
        Ok(entry)
    }

    pub(crate) fn remove_hub_entry(&mut self, id: &HubEntryId) -> Result<HubEntry, HubError> {
        let pos = self
            .hub
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| HubError::UnknownEntry(id.clone()))?;
        Ok(self.hub.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::time::fixed_now;

    fn state() -> AppState {
        AppState::new(Arc::new(Curriculum::builtin()))
    }

    #[test]
    fn new_state_defaults_every_slice() {
        let state = state();
        assert_eq!(state.overall_progress().total, 11);
        assert_eq!(state.overall_progress().completed, 0);
        assert!(state.hub().is_empty());
        assert_eq!(state.pyq_count(), 0);
    }

    #[test]
    fn rejected_mistake_leaves_log_unchanged() {
        let mut state = state();
        state
            .add_mistake(MistakeDraft::new("DM", "Logic", "note"), fixed_now())
            .unwrap();
        let before = state.strategy().mistakes().len();

        for draft in [
            MistakeDraft::new("", "Logic", "note"),
            MistakeDraft::new("DM", "", "note"),
            MistakeDraft::new("DM", "Logic", ""),
        ] {
            assert!(state.add_mistake(draft, fixed_now()).is_err());
        }
        assert_eq!(state.strategy().mistakes().len(), before);
    }

    #[test]
    fn add_topic_and_remove_entry_require_known_id() {
        let mut state = state();
        let missing = HubEntryId::new("missing");
        let note = TopicNote::new("Paging", "").unwrap();
        assert_eq!(
            state.add_topic(&missing, note).unwrap_err(),
            HubError::UnknownEntry(missing.clone())
        );
        assert!(state.remove_hub_entry(&missing).is_err());
    }
}
