//! End-to-end tests for the surveillance session over the public API.

use focus_watchdog::alert::{AlertDetails, AlertType};
use focus_watchdog::capture::simulated::SimulatedScreenRecorder;
use focus_watchdog::capture::{CaptureError, FrameScorer, ProcessLister, RunningProcess};
use focus_watchdog::config::DetectionSettings;
use focus_watchdog::controller::{CooldownJitter, Phase, RunState, SurveillanceController};
use focus_watchdog::detect::activity::ActivityDetector;
use focus_watchdog::detect::aggregator::DetectionAggregator;
use focus_watchdog::detect::phone::PhoneDetector;
use focus_watchdog::detect::process::ProcessDetector;
use focus_watchdog::detect::sleep::SleepDetector;
use focus_watchdog::input::InputEvent;
use focus_watchdog::notify::{build_payload, Notify, NotifyError};
use focus_watchdog::stats::{create_shared_stats, SharedStats};
use crossbeam_channel::{unbounded, Sender};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct ConstScorer(f64);

impl FrameScorer for ConstScorer {
    fn start(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }
    fn score_frame(&mut self) -> Result<f64, CaptureError> {
        Ok(self.0)
    }
    fn stop(&mut self) {}
}

struct EmptyLister;

impl ProcessLister for EmptyLister {
    fn list(&mut self) -> Result<Vec<RunningProcess>, CaptureError> {
        Ok(Vec::new())
    }
}

struct RecordingNotifier {
    sent: Rc<RefCell<Vec<AlertDetails>>>,
    accept: bool,
}

impl Notify for RecordingNotifier {
    fn send_alert(&mut self, alert: &AlertDetails) -> Result<bool, NotifyError> {
        self.sent.borrow_mut().push(alert.clone());
        if self.accept {
            Ok(true)
        } else {
            Err(NotifyError::Network("scripted failure".into()))
        }
    }
}

struct Harness {
    controller: SurveillanceController,
    sent: Rc<RefCell<Vec<AlertDetails>>>,
    stats: SharedStats,
    input_tx: Sender<InputEvent>,
}

fn build_harness(phone_score: f64, settings: DetectionSettings, now: Instant) -> Harness {
    build_harness_with(phone_score, settings, now, true)
}

fn build_harness_with(
    phone_score: f64,
    settings: DetectionSettings,
    now: Instant,
    notifier_accepts: bool,
) -> Harness {
    let (input_tx, input_rx) = unbounded();
    let aggregator = DetectionAggregator::new(
        PhoneDetector::new(&settings, Box::new(ConstScorer(phone_score))),
        SleepDetector::new(&settings, Box::new(ConstScorer(0.9))),
        ActivityDetector::new(&settings, input_rx, now),
        ProcessDetector::new(Box::new(EmptyLister)),
    );
    let sent = Rc::new(RefCell::new(Vec::new()));
    let notifier = RecordingNotifier {
        sent: sent.clone(),
        accept: notifier_accepts,
    };
    let stats = create_shared_stats();
    let mut controller = SurveillanceController::new(
        settings,
        aggregator,
        Box::new(SimulatedScreenRecorder::new()),
        Some(Box::new(notifier)),
        stats.clone(),
        Arc::new(AtomicBool::new(false)),
    )
    .expect("valid settings");
    controller.set_jitter(CooldownJitter::with_seed(99));

    Harness {
        controller,
        sent,
        stats,
        input_tx,
    }
}

/// Settings tuned so a single confident frame trips the phone check.
fn sensitive_settings() -> DetectionSettings {
    DetectionSettings {
        check_interval_min: Duration::from_millis(1000),
        check_interval_max: Duration::from_millis(1000),
        phone_detection_threshold: 0.1,
        distraction_cooldown: Duration::from_secs(60),
        ..DetectionSettings::default()
    }
}

#[test]
fn test_session_surfaces_alert_then_respects_cooldown() {
    let start = Instant::now();
    let mut harness = build_harness(0.9, sensitive_settings(), start);

    harness.controller.start(start);
    assert_eq!(
        harness.controller.state(),
        RunState::Running(Phase::Active)
    );
    assert!(harness.controller.current_alert().is_some());
    harness.controller.dismiss_alert();

    // first window closes, cooldown is the fixed 1s draw
    harness.controller.on_window_ended(start + Duration::from_secs(10));
    assert_eq!(
        harness.controller.state(),
        RunState::Running(Phase::Cooldown)
    );

    // the next pass is still distracted but within the 60s alert cooldown
    harness.controller.poll(start + Duration::from_secs(12));
    assert_eq!(
        harness.controller.state(),
        RunState::Running(Phase::Active)
    );
    assert!(harness.controller.current_alert().is_none());

    // a pass past the alert cooldown surfaces again
    harness
        .controller
        .on_window_ended(start + Duration::from_secs(22));
    harness.controller.poll(start + Duration::from_secs(61));
    assert!(harness.controller.current_alert().is_some());
}

#[test]
fn test_stats_count_cycles_checks_and_alerts() {
    let start = Instant::now();
    let mut harness = build_harness(0.9, sensitive_settings(), start);

    harness.controller.start(start);
    harness.controller.on_window_ended(start + Duration::from_secs(10));
    harness.controller.poll(start + Duration::from_secs(12));

    let snapshot = harness.stats.snapshot();
    // start pass plus the post-cooldown pass
    assert_eq!(snapshot.checks_run, 2);
    assert_eq!(snapshot.cycles_completed, 1);
    assert_eq!(snapshot.alerts_surfaced, 1);
    // start notification plus one alert delivery
    assert_eq!(snapshot.notifications_delivered, 2);
}

#[test]
fn test_notification_failure_does_not_abort_the_session() {
    let start = Instant::now();
    let mut harness = build_harness_with(0.9, sensitive_settings(), start, false);

    harness.controller.start(start);
    assert!(harness.controller.is_running());
    assert!(harness.controller.current_alert().is_some());

    let snapshot = harness.stats.snapshot();
    assert_eq!(snapshot.alerts_surfaced, 1);
    assert_eq!(snapshot.notifications_delivered, 0);
    // delivery was attempted for both the start and alert notifications
    assert_eq!(harness.sent.borrow().len(), 2);
}

#[test]
fn test_lifecycle_notifications_carry_session_duration() {
    let start = Instant::now();
    let mut harness = build_harness(0.0, sensitive_settings(), start);

    harness.controller.start(start);
    harness.controller.stop(false, start + Duration::from_secs(90));

    let sent = harness.sent.borrow();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].alert_type, AlertType::Start);
    assert_eq!(sent[0].message, "Surveillance monitoring has started");
    assert_eq!(sent[1].alert_type, AlertType::Stop);
    assert_eq!(sent[1].message, "Surveillance stopped after 90 seconds");
}

#[test]
fn test_forced_stop_uses_forced_wording() {
    let start = Instant::now();
    let mut harness = build_harness(0.0, sensitive_settings(), start);

    harness.controller.start(start);
    harness.controller.stop(true, start + Duration::from_secs(5));

    let sent = harness.sent.borrow();
    assert_eq!(sent[1].alert_type, AlertType::ForcedStop);
    assert_eq!(
        sent[1].message,
        "Surveillance was forcefully terminated after 5 seconds"
    );
}

#[test]
fn test_inactivity_joins_the_composite_alert() {
    let start = Instant::now();
    let settings = DetectionSettings {
        inactivity_threshold: Duration::from_secs(5),
        ..sensitive_settings()
    };
    let mut harness = build_harness(0.9, settings, start);

    harness.controller.start(start);
    harness.controller.dismiss_alert();

    // no input for 61s: past both inactivity threshold and alert cooldown
    harness.controller.on_window_ended(start + Duration::from_secs(10));
    harness.controller.poll(start + Duration::from_secs(61));

    let alert = harness.controller.current_alert().expect("alert surfaced");
    assert_eq!(alert.message, "Phone detected in view, No activity detected");
}

#[test]
fn test_input_events_keep_activity_fresh() {
    let start = Instant::now();
    let settings = DetectionSettings {
        inactivity_threshold: Duration::from_secs(5),
        phone_detection_threshold: 0.9,
        ..sensitive_settings()
    };
    let mut harness = build_harness(0.0, settings, start);

    harness.controller.start(start);

    // a queued key press resets the inactivity clock when drained
    harness.input_tx.send(InputEvent::key_down()).unwrap();
    harness.controller.on_window_ended(start + Duration::from_secs(10));
    harness.controller.poll(start + Duration::from_secs(61));

    assert!(harness.controller.current_alert().is_none());
}

#[test]
fn test_snooze_suppresses_surfacing_for_the_window() {
    let start = Instant::now();
    let mut harness = build_harness(0.9, sensitive_settings(), start);

    harness.controller.start(start);
    harness.controller.dismiss_alert();
    harness.controller.snooze(start + Duration::from_secs(1));

    // distracted pass past the alert cooldown, but inside the 300s snooze
    harness.controller.on_window_ended(start + Duration::from_secs(10));
    harness.controller.poll(start + Duration::from_secs(61));
    assert!(harness.controller.current_alert().is_none());
    assert_eq!(harness.stats.snapshot().alerts_surfaced, 1);

    // past the snooze and the cooldown of the snoozed verdict
    harness.controller.on_window_ended(start + Duration::from_secs(70));
    harness.controller.poll(start + Duration::from_secs(302));
    assert!(harness.controller.current_alert().is_some());
}

#[test]
fn test_cooldown_draws_respect_configured_range() {
    let mut jitter = CooldownJitter::with_seed(3);
    let min = Duration::from_millis(5000);
    let max = Duration::from_millis(15000);

    let mut seen_below_mid = false;
    let mut seen_above_mid = false;
    for _ in 0..500 {
        let wait = jitter.draw(min, max);
        assert!(wait >= min && wait <= max);
        if wait < Duration::from_millis(10000) {
            seen_below_mid = true;
        } else {
            seen_above_mid = true;
        }
    }
    // draws spread across the range rather than pinning to one end
    assert!(seen_below_mid && seen_above_mid);
}

#[test]
fn test_default_phone_threshold_needs_seven_consecutive_hits() {
    use focus_watchdog::detect::Detector;

    let settings = DetectionSettings::default();
    let mut detector = PhoneDetector::new(&settings, Box::new(ConstScorer(0.9)));
    detector.activate().expect("activation succeeds");

    let now = Instant::now();
    for _ in 0..5 {
        assert!(!detector.check(now).phone_detected);
    }
    assert!(!detector.check(now).phone_detected);
    assert!(detector.check(now).phone_detected);
}

#[test]
fn test_webhook_payload_reflects_alert_content() {
    let alert = AlertDetails::new(AlertType::Phone, "Phone detected in view");
    let payload = build_payload(&alert, "watchdog-host-12345678");

    assert_eq!(payload.embeds.len(), 1);
    let embed = &payload.embeds[0];
    assert_eq!(embed.title, "Phone Detected!");
    assert_eq!(embed.description, "Phone detected in view");
    assert_eq!(embed.color, 0xFF6B6B);
    assert_eq!(embed.fields.len(), 3);
    assert_eq!(embed.fields[0].name, "Time");
    assert_eq!(embed.fields[1].value, "Phone Detection");
    assert_eq!(embed.fields[2].value, "watchdog-host-12345678");

    let json = serde_json::to_value(&payload).expect("payload serializes");
    assert!(json["embeds"][0]["timestamp"].is_string());
}
