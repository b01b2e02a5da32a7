use std::sync::{Arc, Mutex};

use sync_engine::{
    FrameOutcome, JointPair, Landmark, PerformanceReport, PlaybackListener, SyncConfig,
    SyncController, SyncState, Transition,
};

#[derive(Debug, Default)]
struct Signals {
    pauses: usize,
    resumes: usize,
    reports: Vec<PerformanceReport>,
}

#[derive(Clone, Default)]
struct RecordingListener(Arc<Mutex<Signals>>);

impl PlaybackListener for RecordingListener {
    fn on_pause_requested(&mut self) {
        self.0.lock().unwrap().pauses += 1;
    }

    fn on_resume_requested(&mut self) {
        self.0.lock().unwrap().resumes += 1;
    }

    fn on_session_finished(&mut self, report: &PerformanceReport) {
        self.0.lock().unwrap().reports.push(report.clone());
    }
}

/// Frame whose landmark 1 sits on the unit circle at `degrees` around landmark 0
fn frame(degrees: f32) -> Vec<Landmark> {
    let radians = degrees.to_radians();
    vec![
        Landmark::new(0.0, 0.0, 0.0),
        Landmark::new(radians.cos(), radians.sin(), 0.0),
    ]
}

fn setup() -> (SyncController, Arc<Mutex<Signals>>) {
    let listener = RecordingListener::default();
    let signals = listener.0.clone();
    let mut controller = SyncController::new(SyncConfig::default(), listener);
    controller.start_session(vec![JointPair::new(1, 0)], 0).unwrap();
    (controller, signals)
}

/// Feed `count` live frames deviating `deviation` degrees from a 10° reference
fn feed(
    controller: &mut SyncController,
    deviation: f32,
    timestamp_ms: u64,
    count: usize,
) -> Vec<Transition> {
    let reference = frame(10.0);
    let live = frame(10.0 + deviation);
    controller.on_reference_frame(&reference, timestamp_ms);
    (0..count)
        .filter_map(|_| controller.on_live_frame(&live, timestamp_ms).transition())
        .collect()
}

#[test]
fn test_sustained_fault_pauses_exactly_once() {
    let (mut controller, signals) = setup();

    let transitions = feed(&mut controller, 70.0, 1_000, 12);

    assert_eq!(transitions, vec![Transition::Paused]);
    assert_eq!(controller.state(), SyncState::Paused);
    assert_eq!(controller.mistakes(), 1);
    assert_eq!(signals.lock().unwrap().pauses, 1);
    assert_eq!(signals.lock().unwrap().resumes, 0);
}

#[test]
fn test_recovery_resumes_exactly_once() {
    let (mut controller, signals) = setup();
    feed(&mut controller, 70.0, 1_000, 12);

    let transitions = feed(&mut controller, 10.0, 5_000, 20);

    assert_eq!(transitions, vec![Transition::Resumed]);
    assert_eq!(controller.state(), SyncState::Running);
    assert_eq!(controller.mistakes(), 1);
    assert_eq!(signals.lock().unwrap().pauses, 1);
    assert_eq!(signals.lock().unwrap().resumes, 1);

    let session = controller.session().unwrap();
    assert_eq!(session.paused_total_ms, 4_000);
    let smoothed = session.windows.get(0).unwrap().mean().unwrap();
    assert!((smoothed - 10.0).abs() < 0.05);
}

#[test]
fn test_caution_tier_does_not_pause() {
    let (mut controller, signals) = setup();

    let transitions = feed(&mut controller, 45.0, 1_000, 20);

    assert!(transitions.is_empty());
    assert_eq!(controller.state(), SyncState::Running);
    assert_eq!(signals.lock().unwrap().pauses, 0);
}

#[test]
fn test_mistakes_per_minute_excludes_paused_time() {
    let (mut controller, signals) = setup();
    feed(&mut controller, 0.0, 0, 8);

    assert_eq!(feed(&mut controller, 70.0, 10_000, 10), vec![Transition::Paused]);
    assert_eq!(feed(&mut controller, 0.0, 40_000, 10), vec![Transition::Resumed]);
    assert_eq!(feed(&mut controller, 70.0, 50_000, 10), vec![Transition::Paused]);
    assert_eq!(feed(&mut controller, 0.0, 80_000, 10), vec![Transition::Resumed]);

    let report = controller.end_session(120_000).unwrap();

    assert_eq!(report.mistakes, 2);
    assert_eq!(report.exercise_duration_ms, 120_000);
    assert_eq!(report.active_duration_ms, 60_000);
    assert_eq!(report.mistakes_per_minute, 2.0);
    assert_eq!(report.rating.stars(), 5);
    assert_eq!(controller.state(), SyncState::Idle);
    assert_eq!(signals.lock().unwrap().reports, vec![report]);
}

#[test]
fn test_instant_end_reports_zero_rate() {
    let (mut controller, _signals) = setup();
    let report = controller.end_session(0).unwrap();
    assert_eq!(report.mistakes_per_minute, 0.0);
    assert_eq!(report.exercise_duration_ms, 0);
}

#[test]
fn test_degenerate_live_segment_counts_as_fault() {
    let (mut controller, _signals) = setup();
    controller.on_reference_frame(&frame(10.0), 0);

    let collapsed = vec![Landmark::new(0.5, 0.5, 0.5), Landmark::new(0.5, 0.5, 0.5)];
    let outcome = controller.on_live_frame(&collapsed, 10);

    match outcome {
        FrameOutcome::Evaluated { smoothed, transition, .. } => {
            assert!((smoothed[0] - 90.0).abs() < 0.05);
            assert_eq!(transition, Some(Transition::Paused));
        }
        other => panic!("expected evaluation, got {:?}", other),
    }
}

#[test]
fn test_session_can_restart_after_finish() {
    let (mut controller, _signals) = setup();
    let first = controller.session_id().unwrap();
    controller.end_session(1_000).unwrap();

    let second = controller
        .start_session(vec![JointPair::new(12, 14), JointPair::new(11, 13)], 2_000)
        .unwrap();
    assert_ne!(first, second);
    assert_eq!(controller.state(), SyncState::Armed);
}
