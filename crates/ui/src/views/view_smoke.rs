use tracker_core::model::{MistakeDraft, SubjectKey};

use super::test_harness::{ViewKind, setup_view_harness, test_tracker};

#[tokio::test(flavor = "current_thread")]
async fn planner_view_expands_current_focus() {
    let tracker = test_tracker();
    let mut state = tracker.load_state().await.state;
    let dl: SubjectKey = "digital-logic".parse().unwrap();
    tracker.toggle_task(&mut state, &dl, 1).await.unwrap();

    let harness = setup_view_harness(tracker, Some(state), ViewKind::Planner);
    let html = harness.render();
    assert!(html.contains("Discrete Mathematics"), "{html}");
    assert!(html.contains("subject-card focus"), "{html}");
    assert!(html.contains("Combinational Circuits (Adders, Mux)"), "{html}");
    assert!(html.contains("1/4 tasks"), "{html}");
    assert!(html.contains("width: 25%;"), "{html}");
    // Discrete Mathematics is collapsed.
    assert!(!html.contains("Group Theory Basics"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn views_show_placeholder_while_loading() {
    for view in [
        ViewKind::Planner,
        ViewKind::Knowledge,
        ViewKind::Strategy,
        ViewKind::Analytics,
    ] {
        let harness = setup_view_harness(test_tracker(), None, view);
        let html = harness.render();
        assert!(html.contains("Loading..."), "{html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn knowledge_view_lists_entries_with_note_counts() {
    let tracker = test_tracker();
    let mut state = tracker.load_state().await.state;
    let id = tracker
        .add_hub_subject(&mut state, "Theory of Computation")
        .await
        .unwrap();
    tracker
        .add_hub_topic(&mut state, &id, "Pumping lemma", "Use it for **non-regular** languages")
        .await
        .unwrap();
    tracker.add_hub_subject(&mut state, "Compilers").await.unwrap();

    let harness = setup_view_harness(tracker, Some(state), ViewKind::Knowledge);
    let html = harness.render();
    assert!(html.contains("Theory of Computation"), "{html}");
    assert!(html.contains("1 note"), "{html}");
    assert!(html.contains("0 notes"), "{html}");
    assert!(!html.contains("No subjects yet."), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn strategy_view_shows_counter_and_newest_mistake_first() {
    let tracker = test_tracker();
    let mut state = tracker.load_state().await.state;
    tracker.adjust_pyq(&mut state, 12).await.unwrap();
    for note in ["first slip", "second slip"] {
        tracker
            .add_mistake(&mut state, MistakeDraft::new("DL", "K-Maps", note))
            .await
            .unwrap();
    }

    let harness = setup_view_harness(tracker, Some(state), ViewKind::Strategy);
    let html = harness.render();
    assert!(html.contains(">12<"), "{html}");
    let second = html.find("second slip").expect("second mistake rendered");
    let first = html.find("first slip").expect("first mistake rendered");
    assert!(second < first, "newest mistake should come first: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn analytics_view_reports_overall_counts() {
    let tracker = test_tracker();
    let mut state = tracker.load_state().await.state;
    let dm: SubjectKey = "discrete-mathematics".parse().unwrap();
    for index in 0..4 {
        tracker.toggle_task(&mut state, &dm, index).await.unwrap();
    }

    let harness = setup_view_harness(tracker, Some(state), ViewKind::Analytics);
    let html = harness.render();
    assert!(html.contains("4 of 11 tasks completed"), "{html}");
    assert!(html.contains("36%"), "{html}");
    assert!(html.contains("Discrete Mathematics: 4"), "{html}");
    assert!(html.contains("Digital Logic: 0"), "{html}");
}
