use services::{SliceLoadError, TrackerError};

/// User-facing text for a failed mutation.
#[must_use]
pub fn notice_for(err: &TrackerError) -> String {
    match err {
        TrackerError::Mistake(_) => "Please fill all fields for the mistake.".to_string(),
        err if err.is_validation() => err.to_string(),
        TrackerError::Unloaded { slice, .. } => {
            format!("Could not reach the store for {slice}; nothing was changed.")
        }
        err => format!("Change kept on this device, but saving failed: {err}"),
    }
}

/// User-facing text for slices that fell back to defaults at startup.
#[must_use]
pub fn load_notice(failures: &[SliceLoadError]) -> Option<String> {
    if failures.is_empty() {
        return None;
    }
    let slices: Vec<String> = failures.iter().map(|f| f.slice.to_string()).collect();
    Some(format!(
        "Could not load {}; showing defaults.",
        slices.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::Slice;
    use storage::repository::StorageError;
    use tracker_core::model::{HubError, MistakeError};

    #[test]
    fn empty_mistake_fields_share_one_message() {
        let msg = notice_for(&TrackerError::Mistake(MistakeError::EmptyTopic));
        assert_eq!(msg, "Please fill all fields for the mistake.");
    }

    #[test]
    fn other_validation_errors_use_their_display() {
        let msg = notice_for(&TrackerError::Hub(HubError::EmptyName));
        assert_eq!(msg, "subject name cannot be empty");
    }

    #[test]
    fn storage_errors_mention_the_kept_change() {
        let msg = notice_for(&TrackerError::Storage(StorageError::Connection(
            "offline".to_string(),
        )));
        assert!(msg.starts_with("Change kept on this device"));
        assert!(msg.contains("offline"));
    }

    #[test]
    fn unloaded_slice_reports_that_nothing_changed() {
        let msg = notice_for(&TrackerError::Unloaded {
            slice: Slice::Progress,
            source: Box::new(TrackerError::Storage(StorageError::Connection(
                "offline".to_string(),
            ))),
        });
        assert_eq!(
            msg,
            "Could not reach the store for progress; nothing was changed."
        );
    }

    #[test]
    fn load_notice_lists_failed_slices() {
        assert_eq!(load_notice(&[]), None);
        let failures = vec![SliceLoadError {
            slice: Slice::Strategy,
            source: TrackerError::Storage(StorageError::NotFound),
        }];
        assert_eq!(
            load_notice(&failures).as_deref(),
            Some("Could not load strategy; showing defaults.")
        );
    }
}
