//! Fan-out over the detection checks.

use crate::detect::activity::{ActivityDetector, UserActivity};
use crate::detect::phone::PhoneDetector;
use crate::detect::process::{ProcessDetector, ProcessInfo};
use crate::detect::sleep::SleepDetector;
use crate::detect::{DetectionResult, Detector};
use std::time::Instant;
use tracing::{debug, warn};

/// Runs every detection check in a fixed order and merges the results.
///
/// Activation failures degrade the failing detector only; the remaining
/// checks keep running.
pub struct DetectionAggregator {
    phone: PhoneDetector,
    sleep: SleepDetector,
    activity: ActivityDetector,
    process: ProcessDetector,
}

impl DetectionAggregator {
    pub fn new(
        phone: PhoneDetector,
        sleep: SleepDetector,
        activity: ActivityDetector,
        process: ProcessDetector,
    ) -> Self {
        Self {
            phone,
            sleep,
            activity,
            process,
        }
    }

    fn detectors_mut(&mut self) -> [&mut dyn Detector; 4] {
        [
            &mut self.phone,
            &mut self.sleep,
            &mut self.activity,
            &mut self.process,
        ]
    }

    /// Activate every detector, logging and skipping the ones that fail.
    pub fn activate_all(&mut self) {
        for detector in self.detectors_mut() {
            let name = detector.name();
            if let Err(e) = detector.activate() {
                warn!(detector = name, error = %e, "detector activation failed, check disabled");
            }
        }
    }

    /// Deactivate every detector.
    pub fn deactivate_all(&mut self) {
        for detector in self.detectors_mut() {
            detector.deactivate();
        }
    }

    /// Run the checks sequentially and OR-merge their results.
    pub fn run_checks(&mut self, now: Instant) -> DetectionResult {
        let mut merged = DetectionResult::default();
        for detector in self.detectors_mut() {
            let result = detector.check(now);
            debug!(detector = detector.name(), ?result, "detection check");
            merged = merged.merge(result);
        }
        merged
    }

    /// One-second activity tick between detection passes.
    pub fn tick_activity(&mut self, now: Instant) {
        self.activity.tick(now);
    }

    pub fn activity_info(&self) -> UserActivity {
        self.activity.activity_info()
    }

    pub fn suspicious_processes(&self) -> Vec<ProcessInfo> {
        self.process.suspicious_processes()
    }
}
