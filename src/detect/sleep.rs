//! Sleep detection from eye-openness scores.

use crate::capture::{CaptureError, FrameScorer};
use crate::config::DetectionSettings;
use crate::detect::hysteresis::{HysteresisTracker, ScoreWindow};
use crate::detect::{DetectionResult, Detector};
use std::time::Instant;
use tracing::warn;

/// Window averages below this eye openness count as a drowsy frame.
pub const SLEEP_OPENNESS_CUTOFF: f64 = 0.3;

/// How many recent openness scores the sliding window keeps.
pub const SLEEP_HISTORY_CAPACITY: usize = 30;

/// Detects a sleeping user from sustained low eye openness.
///
/// Each frame's openness score joins a sliding window; the window mean is
/// compared against the cutoff and that verdict is debounced the same way
/// as phone detection. Scorer failures report the last stable verdict.
pub struct SleepDetector {
    scorer: Box<dyn FrameScorer>,
    window: ScoreWindow,
    hysteresis: HysteresisTracker,
    last_stable: bool,
    active: bool,
}

impl SleepDetector {
    pub fn new(settings: &DetectionSettings, scorer: Box<dyn FrameScorer>) -> Self {
        Self {
            scorer,
            window: ScoreWindow::new(SLEEP_HISTORY_CAPACITY),
            hysteresis: HysteresisTracker::new(settings.sleep_detection_threshold),
            last_stable: false,
            active: false,
        }
    }
}

impl Detector for SleepDetector {
    fn name(&self) -> &'static str {
        "sleep"
    }

    fn activate(&mut self) -> Result<(), CaptureError> {
        self.scorer.start()?;
        self.window = ScoreWindow::new(SLEEP_HISTORY_CAPACITY);
        self.hysteresis.reset();
        self.last_stable = false;
        self.active = true;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.scorer.stop();
        self.window = ScoreWindow::new(SLEEP_HISTORY_CAPACITY);
        self.hysteresis.reset();
        self.last_stable = false;
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn check(&mut self, _now: Instant) -> DetectionResult {
        if !self.active {
            return DetectionResult::default();
        }

        let detected = match self.scorer.score_frame() {
            Ok(openness) => {
                self.window.push(openness);
                let drowsy = self.window.mean() < SLEEP_OPENNESS_CUTOFF;
                let stable = self.hysteresis.update(drowsy);
                self.last_stable = stable;
                stable
            }
            Err(e) => {
                warn!(error = %e, "sleep frame scoring failed, reporting last stable verdict");
                self.last_stable
            }
        };

        DetectionResult {
            sleep_detected: detected,
            ..DetectionResult::default()
        }
    }
}
