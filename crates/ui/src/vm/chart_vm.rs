//! Geometry for the SVG doughnut chart and the overall progress ring.
//!
//! Both are drawn on a circle of circumference 100 (r = 15.9155), so a
//! percentage maps directly onto `stroke-dasharray`.

use services::AppState;

pub const RING_RADIUS: &str = "15.9155";

const PALETTE: [&str; 10] = [
    "#8b5cf6", "#a855f7", "#d946ef", "#ec4899", "#f472b6", "#ef4444", "#f97316", "#f59e0b",
    "#eab308", "#84cc16",
];

/// Start segments at twelve o'clock instead of three.
const TOP_OFFSET: f64 = 25.0;

#[derive(Clone, Debug, PartialEq)]
pub struct DoughnutSegmentVm {
    pub label: String,
    pub value: usize,
    pub color: &'static str,
    pub dasharray: String,
    pub dashoffset: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DoughnutVm {
    pub segments: Vec<DoughnutSegmentVm>,
    pub total: usize,
}

/// Per-subject completed-task counts as doughnut segments.
///
/// Subjects with nothing completed keep their legend entry but draw no arc.
#[must_use]
pub fn map_doughnut(state: &AppState) -> DoughnutVm {
    let figures = state.subject_progress();
    let total: usize = figures.iter().map(|f| f.completed).sum();

    let mut cursor = 0.0_f64;
    let segments = figures
        .iter()
        .enumerate()
        .map(|(i, f)| {
            #[allow(clippy::cast_precision_loss)]
            let share = if total == 0 {
                0.0
            } else {
                f.completed as f64 / total as f64 * 100.0
            };
            let segment = DoughnutSegmentVm {
                label: f.name.clone(),
                value: f.completed,
                color: PALETTE[i % PALETTE.len()],
                dasharray: format!("{share:.2} {:.2}", 100.0 - share),
                dashoffset: format!("{:.2}", TOP_OFFSET - cursor),
            };
            cursor += share;
            segment
        })
        .collect();

    DoughnutVm { segments, total }
}

/// `stroke-dasharray` for the overall ring.
#[must_use]
pub fn ring_dasharray(percent: u32) -> String {
    format!("{}, 100", percent.min(100))
}
