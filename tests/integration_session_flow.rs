use trialog::clock::FixedClock;
use trialog::{
    finalize, performance_level, ActiveSession, Client, CueLevel, Goal, PerformanceLevel,
    SessionOrigin, SessionStore, SqliteSessionStore,
};

use chrono::{TimeZone, Utc};

fn four_goals() -> Vec<Goal> {
    vec![
        Goal::new("Produce /r/ in initial position"),
        Goal::new("Answer wh-questions"),
        Goal::new("Use two-word phrases"),
        Goal::new("Follow one-step directions"),
    ]
}

#[test]
fn full_session_flow_from_trials_to_storage() {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let clock = FixedClock::new(start);
    let mut session =
        ActiveSession::with_clock(Client::new("Alex P."), four_goals(), Box::new(clock))
            .unwrap();

    // Two hits on the first goal, one miss on the second.
    session.add_trial(true, CueLevel::Independent);
    session.add_trial(true, CueLevel::Minimal);
    session.move_to_next_goal();
    session.add_trial(false, CueLevel::Moderate);

    assert_eq!(session.total_trials(), 3);
    assert_eq!(session.success_count(), 2);
    assert_eq!(session.failure_count(), 1);
    assert!((session.success_rate() - 2.0 / 3.0).abs() < 1e-9);

    let stats = session.all_goal_statistics();
    assert_eq!(stats.len(), 4);
    assert_eq!(stats[0].success_count, 2);
    assert_eq!(stats[0].success_rate, 1.0);
    assert_eq!(stats[1].total_count, 1);
    assert_eq!(stats[1].success_rate, 0.0);

    let breakdown = session.cue_level_breakdown();
    assert_eq!(breakdown.independent, 1);
    assert_eq!(breakdown.minimal, 1);
    assert_eq!(breakdown.moderate, 1);
    assert_eq!(breakdown.maximal, 0);

    // Freeze and store.
    let bundle = finalize(&session, SessionOrigin::Watch);
    assert_eq!(bundle.logs.len(), 3);
    assert_ne!(bundle.id, session.id);
    assert!(bundle.logs.iter().all(|l| l.session_id == bundle.id));

    let mut store = SqliteSessionStore::open_in_memory().unwrap();
    store.save_session(&bundle).unwrap();

    let loaded = store.load_session(bundle.id).unwrap().unwrap();
    assert_eq!(loaded, bundle);

    let listed = store.list_sessions().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].client_name, "Alex P.");
    assert_eq!(listed[0].log_count, 3);
    assert_eq!(listed[0].origin, SessionOrigin::Watch);
}

#[test]
fn undo_heavy_session_keeps_counts_consistent() {
    let mut session = ActiveSession::new(Client::new("c"), four_goals()).unwrap();

    for i in 0..10 {
        session.add_trial(i % 2 == 0, CueLevel::Minimal);
    }
    let mut undone = 0;
    while session.remove_last_trial().is_some() {
        undone += 1;
        if undone == 4 {
            break;
        }
    }

    assert_eq!(undone, 4);
    assert_eq!(session.total_trials(), 6);
    assert_eq!(
        session.success_count() + session.failure_count(),
        session.total_trials()
    );
    // Undo past empty signals absence, not an error.
    for _ in 0..10 {
        session.remove_last_trial();
    }
    assert_eq!(session.remove_last_trial(), None);
    assert_eq!(session.total_trials(), 0);
}

#[test]
fn goal_navigation_is_clamped_both_ways() {
    let mut session = ActiveSession::new(Client::new("c"), four_goals()).unwrap();

    for _ in 0..4 {
        session.move_to_next_goal();
    }
    assert_eq!(session.current_goal_index(), 3);

    for _ in 0..10 {
        session.move_to_previous_goal();
    }
    assert_eq!(session.current_goal_index(), 0);

    session.set_goal_index(99);
    assert_eq!(session.current_goal_index(), 0);
}

#[test]
fn session_metrics_map_to_performance_bands() {
    let mut session = ActiveSession::new(Client::new("c"), four_goals()).unwrap();

    // 17 of 20 = 85%.
    for i in 0..20 {
        session.add_trial(i < 17, CueLevel::Independent);
    }
    assert_eq!(session.success_rate_percent(), 85);
    assert_eq!(
        performance_level(session.success_rate_percent()),
        PerformanceLevel::Excellent
    );

    session.remove_last_trial();
    session.remove_last_trial();
    // 15 of 18 = 83.3%, floors to 83.
    assert_eq!(session.success_rate_percent(), 83);
    assert_eq!(
        performance_level(session.success_rate_percent()),
        PerformanceLevel::Good
    );
}
