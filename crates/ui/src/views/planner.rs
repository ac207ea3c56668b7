use dioxus::prelude::*;
use tracker_core::model::SubjectKey;

use crate::context::AppContext;
use crate::views::components::{Placeholder, ProgressBar};
use crate::views::state::TrackerSignals;
use crate::vm::{SubjectCardVm, TaskRowVm, map_subject_cards};

#[component]
pub fn PlannerView() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<TrackerSignals>();
    let today = ctx.tracker().clock().today();

    let cards = signals
        .state
        .read()
        .ready()
        .map(|state| map_subject_cards(state, &state.focus(today)));

    rsx! {
        div { class: "page",
            h2 { "Study Planner" }
            match cards {
                None => rsx! { Placeholder {} },
                Some(cards) => rsx! {
                    div { class: "subject-grid",
                        for card in cards {
                            SubjectCard { key: "{card.key}", card: card.clone() }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn SubjectCard(card: SubjectCardVm) -> Element {
    // The current focus opens expanded.
    let mut expanded = use_signal(|| card.is_focus);

    rsx! {
        section { class: if card.is_focus { "subject-card focus" } else { "subject-card" },
            button {
                class: "subject-head",
                onclick: move |_| expanded.toggle(),
                h3 { "{card.name}" }
                span { class: "muted", "{card.date_range}" }
            }
            div { class: "subject-figures",
                span { "{card.completed}/{card.total} tasks" }
                span { class: "percent", "{card.percent}%" }
            }
            ProgressBar { percent: card.percent }
            if expanded() {
                ul { class: "task-list",
                    for task in card.tasks.iter() {
                        TaskRow { key: "{task.index}", subject: card.key.clone(), task: task.clone() }
                    }
                }
            }
        }
    }
}

#[component]
fn TaskRow(subject: SubjectKey, task: TaskRowVm) -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<TrackerSignals>();
    let index = task.index;

    let on_toggle = move |_: FormEvent| {
        let subject = subject.clone();
        signals.mutate(
            &ctx,
            move |tracker, mut state| async move {
                let result = tracker.toggle_task(&mut state, &subject, index).await;
                (state, result)
            },
            |_| {},
        );
    };

    rsx! {
        li { class: if task.done { "task done" } else { "task" },
            label {
                input { r#type: "checkbox", checked: task.done, onchange: on_toggle }
                span { class: "task-when", "Week {task.week} · {task.day}" }
                span { class: "task-topic", "{task.topic}" }
            }
        }
    }
}
