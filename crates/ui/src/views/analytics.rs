use dioxus::prelude::*;
use tracker_core::metrics::{OverallProgress, SubjectProgress};

use crate::views::components::{DoughnutChart, Placeholder, ProgressBar, ProgressRing};
use crate::views::state::TrackerSignals;
use crate::vm::{DoughnutVm, map_doughnut};

#[derive(Clone, Debug, PartialEq)]
struct AnalyticsData {
    overall: OverallProgress,
    subjects: Vec<SubjectProgress>,
    chart: DoughnutVm,
}

#[component]
pub fn AnalyticsView() -> Element {
    let signals = use_context::<TrackerSignals>();
    let data = signals.state.read().ready().map(|state| AnalyticsData {
        overall: state.overall_progress(),
        subjects: state.subject_progress(),
        chart: map_doughnut(state),
    });

    rsx! {
        div { class: "page",
            h2 { "Analytics" }
            match data {
                None => rsx! { Placeholder {} },
                Some(data) => rsx! {
                    div { class: "analytics-grid",
                        section { class: "card",
                            h3 { "Overall Progress" }
                            ProgressRing { percent: data.overall.percent }
                            p { class: "muted",
                                "{data.overall.completed} of {data.overall.total} tasks completed"
                            }
                        }
                        section { class: "card",
                            h3 { "Completed Tasks by Subject" }
                            if data.chart.total == 0 {
                                p { class: "muted", "Complete a task to see the breakdown." }
                            }
                            DoughnutChart { chart: data.chart.clone() }
                        }
                    }
                    section { class: "card",
                        h3 { "Subjects" }
                        ul { class: "subject-progress",
                            for figures in data.subjects.iter() {
                                li { key: "{figures.key}",
                                    div { class: "subject-figures",
                                        span { "{figures.name}" }
                                        span { "{figures.completed}/{figures.total} · {figures.percent}%" }
                                    }
                                    ProgressBar { percent: figures.percent }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
