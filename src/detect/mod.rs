//! Detection checks and their aggregation.

pub mod activity;
pub mod aggregator;
pub mod hysteresis;
pub mod phone;
pub mod process;
pub mod sleep;

pub use activity::{ActivityDetector, ActivityTracker, UserActivity};
pub use aggregator::DetectionAggregator;
pub use hysteresis::{HysteresisTracker, ScoreWindow};
pub use phone::PhoneDetector;
pub use process::{PatternMatcher, ProcessDetector, ProcessInfo, SUSPICIOUS_PATTERNS};
pub use sleep::SleepDetector;

use crate::capture::CaptureError;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Outcome of one detection check.
///
/// Each detector fills in only its own field; the aggregator OR-merges
/// the per-detector results into the verdict for the pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub phone_detected: bool,
    pub sleep_detected: bool,
    pub inactive: bool,
    pub suspicious_processes: bool,
}

impl DetectionResult {
    /// Field-wise OR of two results.
    pub fn merge(self, other: DetectionResult) -> DetectionResult {
        DetectionResult {
            phone_detected: self.phone_detected || other.phone_detected,
            sleep_detected: self.sleep_detected || other.sleep_detected,
            inactive: self.inactive || other.inactive,
            suspicious_processes: self.suspicious_processes || other.suspicious_processes,
        }
    }

    /// Whether this result counts as a distraction.
    ///
    /// Suspicious processes are reported but never trip the verdict.
    pub fn is_distracted(&self) -> bool {
        self.phone_detected || self.sleep_detected || self.inactive
    }
}

/// Common surface of every detection check.
pub trait Detector {
    fn name(&self) -> &'static str;

    /// Acquire whatever the check needs. A failure leaves the detector
    /// inactive; other detectors are unaffected.
    fn activate(&mut self) -> Result<(), CaptureError>;

    /// Release resources and go inactive.
    fn deactivate(&mut self);

    fn is_active(&self) -> bool;

    /// Run one check. An inactive detector reports an empty result.
    fn check(&mut self, now: Instant) -> DetectionResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_is_field_wise_or() {
        let a = DetectionResult {
            phone_detected: true,
            ..DetectionResult::default()
        };
        let b = DetectionResult {
            inactive: true,
            ..DetectionResult::default()
        };
        let merged = a.merge(b);
        assert_eq!(
            merged,
            DetectionResult {
                phone_detected: true,
                sleep_detected: false,
                inactive: true,
                suspicious_processes: false,
            }
        );
    }

    #[test]
    fn test_suspicious_processes_alone_are_not_a_distraction() {
        let result = DetectionResult {
            suspicious_processes: true,
            ..DetectionResult::default()
        };
        assert!(!result.is_distracted());

        let result = DetectionResult {
            sleep_detected: true,
            suspicious_processes: true,
            ..DetectionResult::default()
        };
        assert!(result.is_distracted());
    }
}
