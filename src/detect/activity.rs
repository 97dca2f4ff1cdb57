//! Input inactivity tracking.

use crate::capture::CaptureError;
use crate::config::DetectionSettings;
use crate::detect::{DetectionResult, Detector};
use crate::input::InputEvent;
use crossbeam_channel::Receiver;
use std::time::{Duration, Instant};

/// Snapshot of the user's interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserActivity {
    pub last_activity: Instant,
    pub is_inactive: bool,
    pub inactive_duration: Duration,
}

/// Tracks the time since the last user interaction.
///
/// Interaction events arrive over a channel and reset the clock when
/// drained; the inactivity level is recomputed against the threshold on
/// every tick so it stays current between events.
pub struct ActivityTracker {
    receiver: Receiver<InputEvent>,
    inactivity_threshold: Duration,
    info: UserActivity,
}

impl ActivityTracker {
    pub fn new(receiver: Receiver<InputEvent>, inactivity_threshold: Duration, now: Instant) -> Self {
        Self {
            receiver,
            inactivity_threshold,
            info: UserActivity {
                last_activity: now,
                is_inactive: false,
                inactive_duration: Duration::ZERO,
            },
        }
    }

    /// Drain pending interaction events; any event resets the clock.
    pub fn drain_events(&mut self, now: Instant) -> usize {
        let mut drained = 0;
        while self.receiver.try_recv().is_ok() {
            drained += 1;
        }
        if drained > 0 {
            self.info.last_activity = now;
            self.info.is_inactive = false;
        }
        drained
    }

    /// Recompute the inactivity level from the clock.
    pub fn recompute(&mut self, now: Instant) -> UserActivity {
        let inactive_time = now.saturating_duration_since(self.info.last_activity);
        self.info.inactive_duration = inactive_time;
        self.info.is_inactive = inactive_time > self.inactivity_threshold;
        self.info
    }

    pub fn info(&self) -> UserActivity {
        self.info
    }
}

/// Detection check over the activity tracker.
pub struct ActivityDetector {
    tracker: ActivityTracker,
    active: bool,
}

impl ActivityDetector {
    pub fn new(
        settings: &DetectionSettings,
        receiver: Receiver<InputEvent>,
        now: Instant,
    ) -> Self {
        Self {
            tracker: ActivityTracker::new(receiver, settings.inactivity_threshold, now),
            active: false,
        }
    }

    /// One-second tick: drain pending events, then recompute the level.
    pub fn tick(&mut self, now: Instant) {
        if !self.active {
            return;
        }
        self.tracker.drain_events(now);
        self.tracker.recompute(now);
    }

    pub fn activity_info(&self) -> UserActivity {
        self.tracker.info()
    }
}

impl Detector for ActivityDetector {
    fn name(&self) -> &'static str {
        "activity"
    }

    fn activate(&mut self) -> Result<(), CaptureError> {
        self.active = true;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn check(&mut self, now: Instant) -> DetectionResult {
        if !self.active {
            return DetectionResult::default();
        }

        self.tracker.drain_events(now);
        let info = self.tracker.recompute(now);

        DetectionResult {
            inactive: info.is_inactive,
            ..DetectionResult::default()
        }
    }
}
