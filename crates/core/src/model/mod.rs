mod curriculum;
mod ids;
mod knowledge;
mod progress;
mod strategy;

pub use ids::{HubEntryId, ParseIdError, SubjectKey};

pub use curriculum::{Curriculum, CurriculumDraft, CurriculumError, Subject, SubjectDraft, Task};
pub use knowledge::{HubEntry, HubEntryDoc, HubError, TopicNote};
pub use progress::{Progress, ProgressAdjustment, ProgressError};
pub use strategy::{Mistake, MistakeDraft, MistakeError, Strategy};
