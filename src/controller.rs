//! Session lifecycle and the capture/cooldown cycle.
//!
//! The controller owns the run state machine. Hosts drive it with a
//! coarse clock: `poll` once per loop iteration, `on_window_ended` when
//! a capture window closes, `stop` on shutdown.

use crate::alert::{AlertDetails, AlertOutcome, AlertPolicy, AlertType};
use crate::capture::simulated::Xorshift64;
use crate::capture::ScreenRecorder;
use crate::config::{DetectionSettings, SettingsError};
use crate::detect::aggregator::DetectionAggregator;
use crate::notify::Notify;
use crate::stats::SharedStats;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Sub-state while a session is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A capture window is open and detection passes run.
    Active,
    /// Waiting out the randomized pause before the next window.
    Cooldown,
}

/// Top-level run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running(Phase),
}

/// Whether screen recording is live or degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingState {
    pub is_recording: bool,
    /// Recording failed to start; the session continues without it.
    pub fallback_mode: bool,
}

/// Draws the randomized cooldown between capture windows.
pub struct CooldownJitter {
    rng: Xorshift64,
}

impl CooldownJitter {
    pub fn new() -> Self {
        Self {
            rng: Xorshift64::from_clock(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xorshift64::new(seed),
        }
    }

    /// Uniform draw in `[min, max]`, inclusive on both ends.
    pub fn draw(&mut self, min: Duration, max: Duration) -> Duration {
        let min_ms = min.as_millis() as u64;
        let max_ms = max.as_millis() as u64;
        if max_ms <= min_ms {
            return min;
        }
        let span = max_ms - min_ms + 1;
        Duration::from_millis(min_ms + self.rng.next_u64() % span)
    }
}

impl Default for CooldownJitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format an elapsed duration as `hh:mm:ss`, flooring each unit.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Coordinates detectors, recording, alerting, and notification for one
/// surveillance session.
pub struct SurveillanceController {
    settings: DetectionSettings,
    aggregator: DetectionAggregator,
    recorder: Box<dyn ScreenRecorder>,
    notifier: Option<Box<dyn Notify>>,
    policy: AlertPolicy,
    jitter: CooldownJitter,
    stats: SharedStats,
    state: RunState,
    started_at: Option<Instant>,
    cooldown_deadline: Option<Instant>,
    next_tick: Option<Instant>,
    recording: RecordingState,
    interrupt: Arc<AtomicBool>,
    current_alert: Option<AlertDetails>,
}

impl SurveillanceController {
    pub fn new(
        settings: DetectionSettings,
        aggregator: DetectionAggregator,
        recorder: Box<dyn ScreenRecorder>,
        notifier: Option<Box<dyn Notify>>,
        stats: SharedStats,
        interrupt: Arc<AtomicBool>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let policy = AlertPolicy::new(settings.distraction_cooldown);
        Ok(Self {
            settings,
            aggregator,
            recorder,
            notifier,
            policy,
            jitter: CooldownJitter::new(),
            stats,
            state: RunState::Idle,
            started_at: None,
            cooldown_deadline: None,
            next_tick: None,
            recording: RecordingState {
                is_recording: false,
                fallback_mode: false,
            },
            interrupt,
            current_alert: None,
        })
    }

    /// Replace the jitter source, for deterministic cooldown draws.
    pub fn set_jitter(&mut self, jitter: CooldownJitter) {
        self.jitter = jitter;
    }

    /// Begin a session. Starting while already running is a no-op.
    pub fn start(&mut self, now: Instant) {
        if self.state != RunState::Idle {
            debug!("start ignored, session already running");
            return;
        }

        self.state = RunState::Running(Phase::Active);
        self.started_at = Some(now);
        self.policy.reset();
        self.current_alert = None;
        self.aggregator.activate_all();

        self.recording = match self.recorder.start() {
            Ok(()) => RecordingState {
                is_recording: true,
                fallback_mode: false,
            },
            Err(e) => {
                warn!(error = %e, "screen recording unavailable, continuing without it");
                RecordingState {
                    is_recording: false,
                    fallback_mode: true,
                }
            }
        };

        info!("surveillance started");
        self.emit(AlertType::Start, "Surveillance monitoring has started");

        self.next_tick = Some(now + Duration::from_secs(1));
        self.run_detection_pass(now);
    }

    /// A capture window closed; enter the randomized cooldown.
    pub fn on_window_ended(&mut self, now: Instant) {
        if self.state != RunState::Running(Phase::Active) {
            return;
        }
        let wait = self.jitter.draw(
            self.settings.check_interval_min,
            self.settings.check_interval_max,
        );
        debug!(cooldown_ms = wait.as_millis() as u64, "capture window ended");
        self.cooldown_deadline = Some(now + wait);
        self.state = RunState::Running(Phase::Cooldown);
    }

    /// Advance clocks; returns the elapsed display string on tick.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.state == RunState::Idle {
            return None;
        }

        if let Some(deadline) = self.cooldown_deadline {
            if now >= deadline {
                self.cooldown_deadline = None;
                self.state = RunState::Running(Phase::Active);
                self.stats.record_cycle_completed();
                debug!("cooldown elapsed, next capture window");
                self.run_detection_pass(now);
            }
        }

        if let Some(tick) = self.next_tick {
            if now >= tick {
                self.aggregator.tick_activity(now);
                // schedule from now, not from the missed deadline
                self.next_tick = Some(now + Duration::from_secs(1));
                return Some(self.elapsed_display(now));
            }
        }

        None
    }

    fn run_detection_pass(&mut self, now: Instant) {
        self.stats.record_check_run();
        let result = self.aggregator.run_checks(now);

        if self.interrupt.load(Ordering::SeqCst) {
            debug!("shutdown requested, detection result discarded");
            return;
        }

        match self.policy.evaluate(&result, now) {
            AlertOutcome::Surfaced(message) => {
                info!(message = %message, "distraction alert");
                let alert = AlertDetails::new(AlertType::General, message);
                self.stats.record_alert_surfaced();
                self.deliver(&alert);
                self.current_alert = Some(alert);
            }
            AlertOutcome::CoolingDown => debug!("distracted, within alert cooldown"),
            AlertOutcome::Snoozed => debug!("distracted, alerts snoozed"),
            AlertOutcome::NotDistracted => {}
        }
    }

    fn emit(&mut self, alert_type: AlertType, message: &str) {
        let alert = AlertDetails::new(alert_type, message);
        self.deliver(&alert);
    }

    fn deliver(&mut self, alert: &AlertDetails) {
        let Some(notifier) = self.notifier.as_mut() else {
            return;
        };
        match notifier.send_alert(alert) {
            Ok(true) => self.stats.record_notification_delivered(),
            Ok(false) => warn!("webhook did not accept the notification"),
            Err(e) => warn!(error = %e, "notification delivery failed"),
        }
    }

    /// Suppress alert surfacing for the snooze window.
    pub fn snooze(&mut self, now: Instant) {
        self.policy.snooze(now);
        self.current_alert = None;
    }

    /// Clear the currently surfaced alert without snoozing.
    pub fn dismiss_alert(&mut self) {
        self.current_alert = None;
    }

    pub fn current_alert(&self) -> Option<&AlertDetails> {
        self.current_alert.as_ref()
    }

    /// End the session. Stopping while idle is a no-op.
    pub fn stop(&mut self, forced: bool, now: Instant) {
        if self.state == RunState::Idle {
            debug!("stop ignored, no session running");
            return;
        }

        self.state = RunState::Idle;
        self.cooldown_deadline = None;
        self.next_tick = None;
        self.current_alert = None;

        self.recorder.stop();
        self.recording.is_recording = false;
        self.aggregator.deactivate_all();

        let secs = self
            .started_at
            .map(|start| now.saturating_duration_since(start).as_secs())
            .unwrap_or(0);
        self.started_at = None;

        if forced {
            info!(duration_secs = secs, "surveillance forcefully terminated");
            self.emit(
                AlertType::ForcedStop,
                &format!("Surveillance was forcefully terminated after {secs} seconds"),
            );
        } else {
            info!(duration_secs = secs, "surveillance stopped");
            self.emit(
                AlertType::Stop,
                &format!("Surveillance stopped after {secs} seconds"),
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.state != RunState::Idle
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn recording_state(&self) -> RecordingState {
        self.recording
    }

    /// Elapsed session time as `hh:mm:ss`.
    pub fn elapsed_display(&self, now: Instant) -> String {
        match self.started_at {
            Some(start) => format_elapsed(now.saturating_duration_since(start)),
            None => format_elapsed(Duration::ZERO),
        }
    }
}
