use dioxus::prelude::*;
use tracker_core::model::MistakeDraft;

use crate::context::AppContext;
use crate::views::components::{MistakeList, Placeholder};
use crate::views::state::TrackerSignals;
use crate::vm::map_mistakes;

const PYQ_STEPS: [i64; 4] = [-10, -1, 1, 10];

#[component]
pub fn StrategyView() -> Element {
    let signals = use_context::<TrackerSignals>();
    let data = signals
        .state
        .read()
        .ready()
        .map(|state| (state.pyq_count(), map_mistakes(state)));

    rsx! {
        div { class: "page",
            h2 { "Strategy Room" }
            match data {
                None => rsx! { Placeholder {} },
                Some((pyq_count, mistakes)) => rsx! {
                    PyqCounter { count: pyq_count }
                    section { class: "card",
                        h3 { "Mistake Log" }
                        MistakeForm {}
                        MistakeList { mistakes }
                    }
                },
            }
        }
    }
}

#[component]
fn PyqCounter(count: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<TrackerSignals>();

    rsx! {
        section { class: "card pyq",
            h3 { "PYQs Solved" }
            span { class: "pyq-count", "{count}" }
            div { class: "pyq-buttons",
                for delta in PYQ_STEPS {
                    button {
                        key: "{delta}",
                        onclick: {
                            let ctx = ctx.clone();
                            move |_: MouseEvent| {
                                signals.mutate(
                                    &ctx,
                                    move |tracker, mut state| async move {
                                        let result = tracker.adjust_pyq(&mut state, delta).await;
                                        (state, result)
                                    },
                                    |_| {},
                                );
                            }
                        },
                        if delta > 0 { "+{delta}" } else { "{delta}" }
                    }
                }
            }
        }
    }
}

#[component]
fn MistakeForm() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<TrackerSignals>();
    let mut subject = use_signal(String::new);
    let mut topic = use_signal(String::new);
    let mut note = use_signal(String::new);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let draft = MistakeDraft::new(subject(), topic(), note());
        signals.mutate(
            &ctx,
            move |tracker, mut state| async move {
                let result = tracker.add_mistake(&mut state, draft).await;
                (state, result)
            },
            move |()| {
                subject.set(String::new());
                topic.set(String::new());
                note.set(String::new());
            },
        );
    };

    rsx! {
        form { class: "mistake-form", onsubmit: on_submit,
            input {
                r#type: "text",
                placeholder: "Subject",
                value: "{subject}",
                oninput: move |evt| subject.set(evt.value()),
            }
            input {
                r#type: "text",
                placeholder: "Topic",
                value: "{topic}",
                oninput: move |evt| topic.set(evt.value()),
            }
            textarea {
                placeholder: "What went wrong?",
                value: "{note}",
                oninput: move |evt| note.set(evt.value()),
            }
            button { r#type: "submit", "Log Mistake" }
        }
    }
}
