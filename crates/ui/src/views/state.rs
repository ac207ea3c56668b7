use std::future::Future;
use std::sync::Arc;

use dioxus::prelude::*;
use services::{AppState, TrackerError, TrackerService};

use crate::context::AppContext;
use crate::vm::notice_for;

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
}

impl<T> ViewState<T> {
    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Loading => None,
        }
    }
}

/// Shared UI state: the loaded `AppState` and the current notice line.
///
/// Provided once by the layout; every view reads from it and writes back to
/// it after a handler returns.
#[derive(Clone, Copy, PartialEq)]
pub struct TrackerSignals {
    pub state: Signal<ViewState<AppState>>,
    pub notice: Signal<Option<String>>,
}

impl TrackerSignals {
    #[must_use]
    pub fn new(initial: ViewState<AppState>) -> Self {
        Self {
            state: Signal::new(initial),
            notice: Signal::new(None),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<AppState> {
        self.state.read().ready().cloned()
    }

    pub fn dismiss_notice(mut self) {
        self.notice.set(None);
    }

    /// Store the handler's resulting state and surface its error, if any.
    pub fn commit<T>(mut self, next: AppState, result: Result<T, TrackerError>) -> Option<T> {
        self.state.set(ViewState::Ready(next));
        match result {
            Ok(value) => {
                self.notice.set(None);
                Some(value)
            }
            Err(err) => {
                self.notice.set(Some(notice_for(&err)));
                None
            }
        }
    }

    /// Run one tracker handler against a snapshot of the current state.
    ///
    /// `on_ok` runs after the commit, only when the handler succeeded. A click
    /// that lands while state is still loading is ignored.
    pub fn mutate<T, F, Fut>(self, ctx: &AppContext, op: F, on_ok: impl FnOnce(T) + 'static)
    where
        T: 'static,
        F: FnOnce(Arc<TrackerService>, AppState) -> Fut + 'static,
        Fut: Future<Output = (AppState, Result<T, TrackerError>)> + 'static,
    {
        let tracker = ctx.tracker();
        let lock = ctx.write_lock();
        spawn(async move {
            let _guard = lock.lock().await;
            let Some(state) = self.snapshot() else {
                return;
            };
            let (next, result) = op(tracker, state).await;
            if let Some(value) = self.commit(next, result) {
                on_ok(value);
            }
        });
    }
}
