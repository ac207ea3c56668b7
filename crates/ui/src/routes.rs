use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{
    AnalyticsView, CountdownDisplay, KnowledgeView, PlannerView, StrategyView, TrackerSignals,
    ViewState,
};
use crate::vm::{load_notice, map_countdown};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", PlannerView)] Planner {},
        #[route("/knowledge", KnowledgeView)] Knowledge {},
        #[route("/strategy", StrategyView)] Strategy {},
        #[route("/analytics", AnalyticsView)] Analytics {},
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let mut signals = use_context_provider(|| TrackerSignals::new(ViewState::Loading));

    let tracker = ctx.tracker();
    use_future(move || {
        let tracker = tracker.clone();
        async move {
            let loaded = tracker.load_state().await;
            signals.notice.set(load_notice(&loaded.failures));
            signals.state.set(ViewState::Ready(loaded.state));
        }
    });

    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Header {}
                NoticeBar {}
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Header() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<TrackerSignals>();
    let clock = ctx.tracker().clock();
    let target = ctx.countdown_target();
    let mut now = use_signal(|| clock.now());

    use_future(move || async move {
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            now.set(clock.now());
        }
    });

    let countdown = map_countdown(target, now());
    let focus = signals
        .state
        .read()
        .ready()
        .map(|state| state.focus(clock.today()).label().to_owned());

    rsx! {
        header { class: "header",
            div { class: "focus",
                span { class: "muted", "Current focus" }
                match focus {
                    Some(label) => rsx! { strong { "{label}" } },
                    None => rsx! { strong { "..." } },
                }
            }
            CountdownDisplay { countdown }
        }
    }
}

#[component]
fn NoticeBar() -> Element {
    let signals = use_context::<TrackerSignals>();
    let notice = signals.notice.read().clone();

    rsx! {
        if let Some(message) = notice {
            div { class: "notice", role: "alert",
                span { "{message}" }
                button {
                    class: "notice-dismiss",
                    onclick: move |_| signals.dismiss_notice(),
                    "Dismiss"
                }
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Study Tracker" }
            ul {
                li { Link { to: Route::Planner {}, active_class: "active", "Planner" } }
                li { Link { to: Route::Knowledge {}, active_class: "active", "Knowledge Hub" } }
                li { Link { to: Route::Strategy {}, active_class: "active", "Strategy Room" } }
                li { Link { to: Route::Analytics {}, active_class: "active", "Analytics" } }
            }
        }
    }
}
