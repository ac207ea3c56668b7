use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{AppState, Clock, TrackerService};
use storage::repository::InMemoryRepository;
use tracker_core::model::Curriculum;

use crate::context::{UiApp, build_app_context};
use crate::views::{
    AnalyticsView, KnowledgeView, PlannerView, StrategyView, TrackerSignals, ViewState,
};

struct TestApp {
    tracker: Arc<TrackerService>,
}

impl UiApp for TestApp {
    fn tracker(&self) -> Arc<TrackerService> {
        Arc::clone(&self.tracker)
    }

    fn countdown_target(&self) -> DateTime<Utc> {
        self.tracker.clock().now()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Planner,
    Knowledge,
    Strategy,
    Analytics,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    state: Option<AppState>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewHarnessRoot(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    let initial = props.state.clone();
    use_context_provider(|| {
        TrackerSignals::new(initial.map_or(ViewState::Loading, ViewState::Ready))
    });

    match props.view {
        ViewKind::Planner => rsx! { PlannerView {} },
        ViewKind::Knowledge => rsx! { KnowledgeView {} },
        ViewKind::Strategy => rsx! { StrategyView {} },
        ViewKind::Analytics => rsx! { AnalyticsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        self.dom.process_events();
        self.dom.render_immediate(&mut NoOpMutations);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

/// Tracker on an in-memory store, clock fixed inside the Digital Logic window.
pub fn test_tracker() -> Arc<TrackerService> {
    let at = Utc.with_ymd_and_hms(2025, 8, 10, 12, 0, 0).single();
    let clock = at.map_or_else(Clock::default_clock, Clock::fixed);
    Arc::new(TrackerService::new(
        clock,
        Arc::new(Curriculum::builtin()),
        Arc::new(InMemoryRepository::new()),
    ))
}

/// Render `view` with `state` already loaded; `None` leaves it loading.
pub fn setup_view_harness(
    tracker: Arc<TrackerService>,
    state: Option<AppState>,
    view: ViewKind,
) -> ViewHarness {
    let app = Arc::new(TestApp { tracker });
    let mut harness = ViewHarness {
        dom: VirtualDom::new_with_props(ViewHarnessRoot, ViewHarnessProps { app, state, view }),
    };
    harness.rebuild();
    harness
}
