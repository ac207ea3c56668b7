use std::sync::Arc;

use chrono::{DateTime, Utc};
use services::TrackerService;
use tokio::sync::Mutex;

pub trait UiApp: Send + Sync {
    fn tracker(&self) -> Arc<TrackerService>;

    /// Instant the header countdown runs towards.
    fn countdown_target(&self) -> DateTime<Utc>;
}

#[derive(Clone)]
pub struct AppContext {
    tracker: Arc<TrackerService>,
    countdown_target: DateTime<Utc>,
    write_lock: Arc<Mutex<()>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            tracker: app.tracker(),
            countdown_target: app.countdown_target(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn tracker(&self) -> Arc<TrackerService> {
        Arc::clone(&self.tracker)
    }

    #[must_use]
    pub fn countdown_target(&self) -> DateTime<Utc> {
        self.countdown_target
    }

    /// Held for the whole snapshot, handle, commit cycle of a mutation so two
    /// quick clicks never start from the same snapshot.
    #[must_use]
    pub fn write_lock(&self) -> Arc<Mutex<()>> {
        Arc::clone(&self.write_lock)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
