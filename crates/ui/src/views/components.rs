use dioxus::prelude::*;

use crate::vm::{CountdownVm, DoughnutVm, MistakeVm, RING_RADIUS, ring_dasharray};

#[component]
pub fn ProgressBar(percent: u32) -> Element {
    let width = percent.min(100);
    rsx! {
        div { class: "progress-track",
            div { class: "progress-fill", style: "width: {width}%;" }
        }
    }
}

/// Overall completion drawn as a single SVG arc.
#[component]
pub fn ProgressRing(percent: u32) -> Element {
    let dasharray = ring_dasharray(percent);
    rsx! {
        div { class: "ring",
            svg { view_box: "0 0 36 36", class: "ring-svg",
                circle {
                    class: "ring-bg",
                    cx: "18",
                    cy: "18",
                    r: RING_RADIUS,
                    fill: "none",
                    stroke_width: "3",
                }
                circle {
                    class: "ring-fg",
                    cx: "18",
                    cy: "18",
                    r: RING_RADIUS,
                    fill: "none",
                    stroke_width: "3",
                    stroke_dasharray: "{dasharray}",
                    stroke_dashoffset: "25",
                }
            }
            span { class: "ring-label", "{percent}%" }
        }
    }
}

#[component]
pub fn DoughnutChart(chart: DoughnutVm) -> Element {
    rsx! {
        div { class: "doughnut",
            svg { view_box: "0 0 36 36", class: "doughnut-svg",
                for segment in chart.segments.iter() {
                    circle {
                        key: "{segment.label}",
                        cx: "18",
                        cy: "18",
                        r: RING_RADIUS,
                        fill: "none",
                        stroke: segment.color,
                        stroke_width: "5",
                        stroke_dasharray: "{segment.dasharray}",
                        stroke_dashoffset: "{segment.dashoffset}",
                    }
                }
            }
            ul { class: "legend",
                for segment in chart.segments.iter() {
                    li { key: "{segment.label}",
                        span { class: "swatch", style: "background: {segment.color};" }
                        "{segment.label}: {segment.value}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn CountdownDisplay(countdown: CountdownVm) -> Element {
    rsx! {
        div { class: if countdown.elapsed { "countdown elapsed" } else { "countdown" },
            div { class: "unit", span { class: "value", "{countdown.days}" } span { "Days" } }
            div { class: "unit", span { class: "value", "{countdown.hours}" } span { "Hours" } }
            div { class: "unit", span { class: "value", "{countdown.minutes}" } span { "Minutes" } }
            div { class: "unit", span { class: "value", "{countdown.seconds}" } span { "Seconds" } }
        }
    }
}

#[component]
pub fn MistakeList(mistakes: Vec<MistakeVm>) -> Element {
    if mistakes.is_empty() {
        return rsx! {
            p { class: "muted", "No mistakes logged yet." }
        };
    }

    rsx! {
        ul { class: "mistake-list",
            for (i, mistake) in mistakes.into_iter().enumerate() {
                li { key: "{i}", class: "mistake",
                    div { class: "mistake-head",
                        strong { "{mistake.subject}" }
                        span { " / {mistake.topic}" }
                        span { class: "mistake-date", "{mistake.logged_at}" }
                    }
                    p { "{mistake.note}" }
                }
            }
        }
    }
}

#[component]
pub fn Placeholder() -> Element {
    rsx! {
        p { class: "muted", "Loading..." }
    }
}
