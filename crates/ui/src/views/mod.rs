mod analytics;
mod components;
mod knowledge;
mod planner;
mod state;
mod strategy;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use analytics::AnalyticsView;
pub use components::{
    CountdownDisplay, DoughnutChart, MistakeList, Placeholder, ProgressBar, ProgressRing,
};
pub use knowledge::KnowledgeView;
pub use planner::PlannerView;
pub use state::{TrackerSignals, ViewState};
pub use strategy::StrategyView;
