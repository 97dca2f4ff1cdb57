//! Suspicious process reporting.

use crate::capture::{CaptureError, ProcessLister, RunningProcess};
use crate::detect::{DetectionResult, Detector};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

/// Process name fragments that indicate capture or bypass tooling.
pub const SUSPICIOUS_PATTERNS: &[&str] = &[
    "screen recording",
    "screen recorder",
    "obs",
    "bandicam",
    "camtasia",
    "virtual camera",
    "camera bypass",
    "screenshot",
];

/// A running process with its suspicion verdict.
///
/// Classification happens once when the list is acquired; consumers only
/// ever see the classified form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub name: String,
    pub pid: u32,
    pub suspicious: bool,
}

/// Lowercase substring matcher over the suspicious pattern set.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: &'static [&'static str],
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self {
            patterns: SUSPICIOUS_PATTERNS,
        }
    }

    pub fn is_suspicious(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.patterns.iter().any(|pattern| lower.contains(pattern))
    }

    /// Classify a raw process list at acquisition time.
    pub fn classify(&self, processes: Vec<RunningProcess>) -> Vec<ProcessInfo> {
        processes
            .into_iter()
            .map(|p| ProcessInfo {
                suspicious: self.is_suspicious(&p.name),
                name: p.name,
                pid: p.pid,
            })
            .collect()
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Reports suspicious background processes.
///
/// Suspicion is surfaced in the detection result but never counts as a
/// distraction on its own.
pub struct ProcessDetector {
    lister: Box<dyn ProcessLister>,
    matcher: PatternMatcher,
    processes: Vec<ProcessInfo>,
    active: bool,
}

impl ProcessDetector {
    pub fn new(lister: Box<dyn ProcessLister>) -> Self {
        Self {
            lister,
            matcher: PatternMatcher::new(),
            processes: Vec::new(),
            active: false,
        }
    }

    pub fn processes(&self) -> &[ProcessInfo] {
        &self.processes
    }

    pub fn suspicious_processes(&self) -> Vec<ProcessInfo> {
        self.processes
            .iter()
            .filter(|p| p.suspicious)
            .cloned()
            .collect()
    }
}

impl Detector for ProcessDetector {
    fn name(&self) -> &'static str {
        "process"
    }

    fn activate(&mut self) -> Result<(), CaptureError> {
        self.active = true;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.processes.clear();
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn check(&mut self, _now: Instant) -> DetectionResult {
        if !self.active {
            return DetectionResult::default();
        }

        self.processes = match self.lister.list() {
            Ok(raw) => self.matcher.classify(raw),
            Err(e) => {
                warn!(error = %e, "process listing failed");
                Vec::new()
            }
        };

        DetectionResult {
            suspicious_processes: self.processes.iter().any(|p| p.suspicious),
            ..DetectionResult::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLister {
        names: Vec<&'static str>,
        fail: bool,
    }

    impl ProcessLister for FixedLister {
        fn list(&mut self) -> Result<Vec<RunningProcess>, CaptureError> {
            if self.fail {
                return Err(CaptureError::ProcessList("scripted failure".into()));
            }
            Ok(self
                .names
                .iter()
                .enumerate()
                .map(|(i, name)| RunningProcess {
                    name: name.to_string(),
                    pid: 100 + i as u32,
                })
                .collect())
        }
    }

    #[test]
    fn test_matching_is_case_insensitive_substring() {
        let matcher = PatternMatcher::new();
        assert!(matcher.is_suspicious("OBS Studio"));
        assert!(matcher.is_suspicious("My Screen Recorder Pro"));
        assert!(matcher.is_suspicious("ScreenShot-helper"));
        assert!(!matcher.is_suspicious("chrome"));
        // substring semantics: "observer" contains "obs"
        assert!(matcher.is_suspicious("observer"));
    }

    #[test]
    fn test_classification_happens_at_acquisition() {
        let lister = FixedLister {
            names: vec!["chrome", "obs", "slack"],
            fail: false,
        };
        let mut detector = ProcessDetector::new(Box::new(lister));
        detector.activate().unwrap();

        let result = detector.check(Instant::now());
        assert!(result.suspicious_processes);
        assert!(!result.is_distracted());

        let suspicious = detector.suspicious_processes();
        assert_eq!(suspicious.len(), 1);
        assert_eq!(suspicious[0].name, "obs");
        assert!(suspicious[0].suspicious);
    }

    #[test]
    fn test_listing_failure_reports_empty() {
        let lister = FixedLister {
            names: vec![],
            fail: true,
        };
        let mut detector = ProcessDetector::new(Box::new(lister));
        detector.activate().unwrap();

        let result = detector.check(Instant::now());
        assert!(!result.suspicious_processes);
        assert!(detector.processes().is_empty());
    }

    #[test]
    fn test_benign_list_is_not_suspicious() {
        let lister = FixedLister {
            names: vec!["chrome", "spotify", "terminal"],
            fail: false,
        };
        let mut detector = ProcessDetector::new(Box::new(lister));
        detector.activate().unwrap();

        let result = detector.check(Instant::now());
        assert!(!result.suspicious_processes);
        assert_eq!(detector.processes().len(), 3);
    }
}
