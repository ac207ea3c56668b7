use dioxus::prelude::*;
use tracker_core::model::HubEntryId;

use crate::context::AppContext;
use crate::views::components::Placeholder;
use crate::views::state::TrackerSignals;
use crate::vm::{HubCardVm, HubDetailVm, map_hub_cards, map_hub_detail, normalize_markdown};

#[component]
pub fn KnowledgeView() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<TrackerSignals>();
    let mut selected = use_signal(|| None::<HubEntryId>);
    let mut name = use_signal(String::new);

    let data = signals.state.read().ready().map(|state| {
        let detail = selected
            .read()
            .as_ref()
            .and_then(|id| map_hub_detail(state, id));
        let current = selected.read().clone();
        let cards: Vec<(HubCardVm, bool)> = map_hub_cards(state)
            .into_iter()
            .map(|card| {
                let is_selected = current.as_ref() == Some(&card.id);
                (card, is_selected)
            })
            .collect();
        (cards, detail)
    });

    let on_add = move |evt: FormEvent| {
        evt.prevent_default();
        let value = name();
        signals.mutate(
            &ctx,
            move |tracker, mut state| async move {
                let result = tracker.add_hub_subject(&mut state, &value).await;
                (state, result)
            },
            move |id| {
                name.set(String::new());
                selected.set(Some(id));
            },
        );
    };

    rsx! {
        div { class: "page",
            h2 { "Knowledge Hub" }
            form { class: "inline-form", onsubmit: on_add,
                input {
                    r#type: "text",
                    placeholder: "New subject name",
                    value: "{name}",
                    oninput: move |evt| name.set(evt.value()),
                }
                button { r#type: "submit", "Add Subject" }
            }
            match data {
                None => rsx! { Placeholder {} },
                Some((cards, detail)) => rsx! {
                    if cards.is_empty() {
                        p { class: "muted", "No subjects yet. Add one above." }
                    }
                    div { class: "hub-grid",
                        for (card, is_selected) in cards {
                            HubCard {
                                key: "{card.id}",
                                selected: is_selected,
                                card: card.clone(),
                                on_select: move |id| selected.set(Some(id)),
                            }
                        }
                    }
                    if let Some(detail) = detail {
                        HubDetail { key: "{detail.id}", detail: detail.clone(), on_deleted: move |_| selected.set(None) }
                    }
                },
            }
        }
    }
}

#[component]
fn HubCard(card: HubCardVm, selected: bool, on_select: EventHandler<HubEntryId>) -> Element {
    let id = card.id.clone();
    rsx! {
        button {
            class: if selected { "hub-card selected" } else { "hub-card" },
            onclick: move |_| on_select.call(id.clone()),
            h3 { "{card.name}" }
            span { class: "muted", "{card.note_count_label}" }
        }
    }
}

#[component]
fn HubDetail(detail: HubDetailVm, on_deleted: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<TrackerSignals>();
    let mut title = use_signal(String::new);
    let mut body = use_signal(String::new);
    let mut confirming = use_signal(|| false);

    let add_id = detail.id.clone();
    let add_ctx = ctx.clone();
    let on_add_topic = move |evt: FormEvent| {
        evt.prevent_default();
        let id = add_id.clone();
        let (t, b) = (title(), normalize_markdown(&body()));
        signals.mutate(
            &add_ctx,
            move |tracker, mut state| async move {
                let result = tracker.add_hub_topic(&mut state, &id, &t, &b).await;
                (state, result)
            },
            move |()| {
                title.set(String::new());
                body.set(String::new());
            },
        );
    };

    let delete_id = detail.id.clone();
    let on_delete = move |_: MouseEvent| {
        if !confirming() {
            confirming.set(true);
            return;
        }
        confirming.set(false);
        let id = delete_id.clone();
        signals.mutate(
            &ctx,
            move |tracker, mut state| async move {
                let result = tracker.delete_hub_subject(&mut state, &id).await;
                (state, result)
            },
            move |()| on_deleted.call(()),
        );
    };

    rsx! {
        section { class: "hub-detail",
            div { class: "hub-detail-head",
                h3 { "{detail.name}" }
                button {
                    class: "danger",
                    onclick: on_delete,
                    if confirming() { "Confirm delete" } else { "Delete subject" }
                }
            }
            if detail.notes.is_empty() {
                p { class: "muted", "No notes yet." }
            }
            for (i, note) in detail.notes.iter().enumerate() {
                article { key: "{i}", class: "note",
                    h4 { "{note.title}" }
                    div { class: "note-body", dangerous_inner_html: "{note.html}" }
                }
            }
            form { class: "note-form", onsubmit: on_add_topic,
                input {
                    r#type: "text",
                    placeholder: "Topic title",
                    value: "{title}",
                    oninput: move |evt| title.set(evt.value()),
                }
                textarea {
                    placeholder: "Notes (markdown)",
                    value: "{body}",
                    oninput: move |evt| body.set(evt.value()),
                }
                button { r#type: "submit", "Add Note" }
            }
        }
    }
}
