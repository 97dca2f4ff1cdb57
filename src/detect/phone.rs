//! Phone-in-view detection.

use crate::capture::{CaptureError, FrameScorer};
use crate::config::DetectionSettings;
use crate::detect::hysteresis::HysteresisTracker;
use crate::detect::{DetectionResult, Detector};
use std::time::Instant;
use tracing::warn;

/// Frame scores at or above this count as a phone sighting.
pub const PHONE_SCORE_CUTOFF: f64 = 0.5;

/// Detects a phone held in front of the camera.
///
/// Raw frame scores are debounced through a consecutive-hit tracker; when
/// the scorer fails mid-run the last stable verdict is reported instead.
pub struct PhoneDetector {
    scorer: Box<dyn FrameScorer>,
    hysteresis: HysteresisTracker,
    last_stable: bool,
    active: bool,
}

impl PhoneDetector {
    pub fn new(settings: &DetectionSettings, scorer: Box<dyn FrameScorer>) -> Self {
        Self {
            scorer,
            hysteresis: HysteresisTracker::new(settings.phone_detection_threshold),
            last_stable: false,
            active: false,
        }
    }
}

impl Detector for PhoneDetector {
    fn name(&self) -> &'static str {
        "phone"
    }

    fn activate(&mut self) -> Result<(), CaptureError> {
        self.scorer.start()?;
        self.hysteresis.reset();
        self.last_stable = false;
        self.active = true;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.scorer.stop();
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
            Ok(score) => {
                let stable = self.hysteresis.update(score >= PHONE_SCORE_CUTOFF);
                self.last_stable = stable;
                stable
            }
            Err(e) => {
                warn!(error = %e, "phone frame scoring failed, reporting last stable verdict");
                self.last_stable
            }
        };

        DetectionResult {
            phone_detected: detected,
            ..DetectionResult::default()
        }
    }
}
