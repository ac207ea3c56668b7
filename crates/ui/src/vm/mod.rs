mod chart_vm;
mod countdown_vm;
mod hub_vm;
mod markdown_vm;
mod mistake_vm;
mod notice_vm;
mod subject_vm;
mod time_fmt;

pub use chart_vm::{DoughnutSegmentVm, DoughnutVm, RING_RADIUS, map_doughnut, ring_dasharray};
pub use countdown_vm::{CountdownVm, map_countdown};
pub use hub_vm::{HubCardVm, HubDetailVm, TopicNoteVm, map_hub_cards, map_hub_detail};
pub use markdown_vm::{markdown_to_html, normalize_markdown};
pub use mistake_vm::{MistakeVm, map_mistakes};
pub use notice_vm::{load_notice, notice_for};
pub use subject_vm::{SubjectCardVm, TaskRowVm, map_subject_cards};
