use std::cell::RefCell;
use std::rc::Rc;

use lighthouse_nav::{
    AlignmentBand, Coordinate, Permission, RawFix, RawHeadingSample, SensorHub, SessionState,
    SnapshotListener, SpatialSnapshot, Subscription, TrackingError, TrackingSession,
    TrackingSettings, INVALID_TRUE_HEADING,
};

const EPSILON: f64 = 1e-9;

/// Counters shared between a test and its sensor hub
#[derive(Debug, Default)]
struct HubLog {
    position_watches: u32,
    heading_watches: u32,
    removals: u32,
}

struct RecordingSubscription {
    log: Rc<RefCell<HubLog>>,
    removed: bool,
}

impl Subscription for RecordingSubscription {
    fn remove(&mut self) {
        if !self.removed {
            self.removed = true;
            self.log.borrow_mut().removals += 1;
        }
    }
}

#[derive(Default)]
struct RecordingHub {
    log: Rc<RefCell<HubLog>>,
}

impl RecordingHub {
    fn subscription(&self) -> Box<dyn Subscription> {
        Box::new(RecordingSubscription {
            log: Rc::clone(&self.log),
            removed: false,
        })
    }
}

impl SensorHub for RecordingHub {
    fn watch_position(&mut self) -> Box<dyn Subscription> {
        self.log.borrow_mut().position_watches += 1;
        self.subscription()
    }

    fn watch_heading(&mut self) -> Box<dyn Subscription> {
        self.log.borrow_mut().heading_watches += 1;
        self.subscription()
    }
}

/// Listener that records everything it is told
#[derive(Clone, Default)]
struct Recorder {
    snapshots: Rc<RefCell<Vec<SpatialSnapshot>>>,
    failures: Rc<RefCell<Vec<TrackingError>>>,
}

impl SnapshotListener for Recorder {
    fn on_snapshot(&mut self, snapshot: &SpatialSnapshot) {
        self.snapshots.borrow_mut().push(*snapshot);
    }

    fn on_failure(&mut self, error: &TrackingError) {
        self.failures.borrow_mut().push(error.clone());
    }
}

fn fix_at(latitude: f64, longitude: f64, accuracy: Option<f64>) -> RawFix {
    RawFix::new(Coordinate::new(latitude, longitude), accuracy, 0)
}

fn started_session() -> (TrackingSession, RecordingHub, Recorder) {
    let mut hub = RecordingHub::default();
    let recorder = Recorder::default();
    let mut session = TrackingSession::new();
    session.add_listener(Box::new(recorder.clone()));
    session.start(Permission::Granted, &mut hub).unwrap();
    (session, hub, recorder)
}

#[test]
fn test_start_subscribes_both_streams() {
    let (session, hub, recorder) = started_session();

    assert_eq!(session.state(), SessionState::Active);
    let log = hub.log.borrow();
    assert_eq!(log.position_watches, 1);
    assert_eq!(log.heading_watches, 1);
    assert_eq!(log.removals, 0);
    assert!(recorder.snapshots.borrow().is_empty());
}

#[test]
fn test_permission_denied_is_terminal() {
    let mut hub = RecordingHub::default();
    let recorder = Recorder::default();
    let mut session = TrackingSession::new();
    session.add_listener(Box::new(recorder.clone()));

    let result = session.start(Permission::Denied, &mut hub);
    assert_eq!(result, Err(TrackingError::PermissionDenied));
    assert_eq!(session.state(), SessionState::Failed);

    // No retry, and no second failure signal
    let retry = session.start(Permission::Granted, &mut hub);
    assert!(matches!(
        retry,
        Err(TrackingError::InvalidTransition {
            from: SessionState::Failed,
            ..
        })
    ));
    session.teardown();
    assert_eq!(session.state(), SessionState::Failed);

    let log = hub.log.borrow();
    assert_eq!(log.position_watches, 0);
    assert_eq!(log.heading_watches, 0);
    assert_eq!(recorder.failures.borrow().as_slice(), &[TrackingError::PermissionDenied]);
    assert!(recorder.snapshots.borrow().is_empty());

    // Sensor events never reach a failed session
    assert!(session.on_fix(fix_at(1.0, 1.0, None)).is_none());
}

#[test]
fn test_double_start_rejected() {
    let (mut session, mut hub, _recorder) = started_session();
    let again = session.start(Permission::Granted, &mut hub);
    assert!(matches!(
        again,
        Err(TrackingError::InvalidTransition {
            from: SessionState::Active,
            action: "start"
        })
    ));
    assert_eq!(hub.log.borrow().position_watches, 1);
}

#[test]
fn test_every_event_emits_snapshot() {
    let (mut session, _hub, recorder) = started_session();

    session.on_fix(fix_at(0.0, 0.0, Some(5.0)));
    session.on_heading(RawHeadingSample::true_north(0.0, 3.0));
    session.set_target(Some(Coordinate::new(0.0, 0.01)));
    session.on_heading(RawHeadingSample::true_north(10.0, 3.0));

    let snapshots = recorder.snapshots.borrow();
    assert_eq!(snapshots.len(), 4);
    assert_eq!(snapshots.last().copied(), Some(session.snapshot()));
}

#[test]
fn test_arrival_order_does_not_matter() {
    let target = Coordinate::new(0.001, 0.001);
    let fix = fix_at(0.0, 0.0, Some(5.0));
    let sample = RawHeadingSample::true_north(30.0, 2.0);

    let (mut position_first, _hub_a, _rec_a) = started_session();
    position_first.set_target(Some(target));
    position_first.on_fix(fix);
    let a = position_first.on_heading(sample).unwrap();

    let (mut heading_first, _hub_b, _rec_b) = started_session();
    heading_first.set_target(Some(target));
    heading_first.on_heading(sample);
    let b = heading_first.on_fix(fix).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_retarget_recomputes_without_sensor_event() {
    let (mut session, _hub, recorder) = started_session();

    session.on_fix(fix_at(0.0, 0.0, Some(5.0)));
    session.on_heading(RawHeadingSample::true_north(0.0, 3.0));

    let north = session.set_target(Some(Coordinate::new(0.01, 0.0))).unwrap();
    assert!(north.bearing.unwrap().abs() < EPSILON);
    assert_eq!(north.alignment.unwrap().band, AlignmentBand::Aligned);

    let east = session.set_target(Some(Coordinate::new(0.0, 0.01))).unwrap();
    assert!((east.bearing.unwrap() - 90.0).abs() < EPSILON);
    assert!((east.relative_angle.unwrap() - 90.0).abs() < EPSILON);
    assert_eq!(east.alignment.unwrap().band, AlignmentBand::OffCourse);
    assert!(east.distance_meters.unwrap() > 1_000.0);

    // Two sensor events plus two target changes
    assert_eq!(recorder.snapshots.borrow().len(), 4);
}

#[test]
fn test_clearing_target_removes_navigation_fields() {
    let (mut session, _hub, _recorder) = started_session();
    session.set_target(Some(Coordinate::new(1.0, 1.0)));
    session.on_fix(fix_at(0.0, 0.0, Some(5.0)));
    session.on_heading(RawHeadingSample::true_north(45.0, 3.0));
    assert!(session.snapshot().bearing.is_some());

    let cleared = session.set_target(None).unwrap();
    assert!(cleared.bearing.is_none());
    assert!(cleared.distance_meters.is_none());
    assert!(cleared.relative_angle.is_none());
    assert!(cleared.alignment.is_none());
    assert!(cleared.location.is_some());
    assert!(cleared.heading.is_some());

    // Stays cleared across later events
    let later = session.on_fix(fix_at(0.0, 0.0, Some(5.0))).unwrap();
    assert!(later.bearing.is_none());
}

#[test]
fn test_arrival_is_not_sticky() {
    let settings = TrackingSettings {
        gps_sample_size: 1,
        ..Default::default()
    };
    let mut session = TrackingSession::with_settings(settings).unwrap();
    session.start(Permission::Granted, &mut RecordingHub::default()).unwrap();

    // ~1.1 m north of the target with 5 m accuracy
    session.set_target(Some(Coordinate::new(0.0, 0.0)));
    let near = session.on_fix(fix_at(0.00001, 0.0, Some(5.0))).unwrap();
    assert!(near.is_arrived());
    assert_eq!(near.distance_meters, Some(0.0));

    // ~111 m away: distance reported again
    let away = session.on_fix(fix_at(0.001, 0.0, Some(5.0))).unwrap();
    assert!(!away.is_arrived());
    assert!(away.distance_meters.unwrap() > 100.0);

    // Back close but accuracy unknown: no deadzone
    let unknown = session.on_fix(fix_at(0.00001, 0.0, None)).unwrap();
    assert!(!unknown.is_arrived());
    assert!(unknown.distance_meters.unwrap() > 1.0);
}

#[test]
fn test_magnetic_fallback_through_session() {
    let (mut session, _hub, _recorder) = started_session();
    let snapshot = session
        .on_heading(RawHeadingSample::new(INVALID_TRUE_HEADING, 200.0, 15.0))
        .unwrap();
    let heading = snapshot.heading.unwrap();
    assert_eq!(heading.degrees, 200.0);
    assert_eq!(heading.accuracy_degrees, 15.0);
}

#[test]
fn test_teardown_releases_subscriptions_once() {
    let (mut session, hub, _recorder) = started_session();
    session.on_fix(fix_at(1.0, 1.0, Some(3.0)));

    session.teardown();
    session.teardown();
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(hub.log.borrow().removals, 2);

    // Late events are dropped
    assert!(session.on_fix(fix_at(1.0, 1.0, Some(3.0))).is_none());
    assert!(session.on_heading(RawHeadingSample::true_north(1.0, 1.0)).is_none());
    assert!(session.location().is_none());

    drop(session);
    assert_eq!(hub.log.borrow().removals, 2);
}

#[test]
fn test_teardown_clears_last_snapshot() {
    let (mut session, _hub, _recorder) = started_session();
    let target = Coordinate::new(0.01, 0.0);
    session.set_target(Some(target));
    session.on_fix(fix_at(0.0, 0.0, Some(5.0)));
    session.on_heading(RawHeadingSample::true_north(0.0, 3.0));
    assert!(session.snapshot().bearing.is_some());

    session.teardown();

    let snapshot = session.snapshot();
    assert!(snapshot.location.is_none());
    assert!(snapshot.heading.is_none());
    assert!(snapshot.bearing.is_none());
    assert!(snapshot.distance_meters.is_none());
    assert!(snapshot.alignment.is_none());
    assert_eq!(snapshot.target, Some(target));
    assert_eq!(snapshot.location, session.location());
}

#[test]
fn test_drop_releases_subscriptions() {
    let (session, hub, _recorder) = started_session();
    drop(session);
    assert_eq!(hub.log.borrow().removals, 2);
}

#[test]
fn test_teardown_before_start() {
    let mut hub = RecordingHub::default();
    let mut session = TrackingSession::new();
    session.teardown();
    assert_eq!(session.state(), SessionState::Stopped);

    assert!(session.start(Permission::Granted, &mut hub).is_err());
    assert_eq!(hub.log.borrow().position_watches, 0);
}

#[test]
fn test_target_set_before_start_is_used() {
    let mut hub = RecordingHub::default();
    let mut session = TrackingSession::new();
    assert!(session.set_target(Some(Coordinate::new(0.0, 1.0))).is_none());

    session.start(Permission::Granted, &mut hub).unwrap();
    let snapshot = session.on_fix(fix_at(0.0, 0.0, Some(10.0))).unwrap();
    assert!((snapshot.bearing.unwrap() - 90.0).abs() < EPSILON);
    assert_eq!(snapshot.target, Some(Coordinate::new(0.0, 1.0)));
}

#[test]
fn test_haptic_cue_narrower_than_aligned() {
    let (mut session, _hub, _recorder) = started_session();
    session.set_target(Some(Coordinate::new(0.01, 0.0)));
    session.on_fix(fix_at(0.0, 0.0, Some(5.0)));

    let on_target = session.on_heading(RawHeadingSample::true_north(5.0, 1.0)).unwrap();
    let alignment = on_target.alignment.unwrap();
    assert_eq!(alignment.band, AlignmentBand::Aligned);
    assert!(alignment.haptic_cue);

    // Smoothed heading drifts to ~12°: still aligned, no pulse
    for _ in 0..7 {
        session.on_heading(RawHeadingSample::true_north(13.0, 1.0));
    }
    let drifting = session.snapshot().alignment.unwrap();
    assert_eq!(drifting.band, AlignmentBand::Aligned);
    assert!(!drifting.haptic_cue);
}
