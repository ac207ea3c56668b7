#![forbid(unsafe_code)]

pub mod curriculum;
pub mod error;
pub mod gateway;
pub mod state;
pub mod tracker_service;

pub use tracker_core::Clock;

pub use curriculum::{load_curriculum, parse_curriculum};
pub use error::{SliceLoadError, TrackerError};
pub use gateway::{PersistenceGateway, Slice};
pub use state::{AppState, LoadedState};
pub use tracker_service::TrackerService;
