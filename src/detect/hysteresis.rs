//! Debounce primitives shared by the frame-based detectors.
//!
//! A single noisy frame must not flip a verdict. Hits have to accumulate
//! before a detection goes stable, and misses walk the counter back down
//! instead of clearing it.

use statrs::statistics::Statistics;
use std::collections::VecDeque;

/// Consecutive-hit counter with a saturating decrement.
///
/// The threshold is derived from a [0, 1] sensitivity setting: a setting
/// of 0.7 means seven stable frames before the detection fires.
#[derive(Debug, Clone)]
pub struct HysteresisTracker {
    consecutive: u32,
    threshold: u32,
}

impl HysteresisTracker {
    pub fn new(sensitivity: f64) -> Self {
        Self {
            consecutive: 0,
            threshold: (sensitivity * 10.0).round() as u32,
        }
    }

    /// Feed one frame verdict; returns whether the detection is stable.
    pub fn update(&mut self, hit: bool) -> bool {
        if hit {
            self.consecutive += 1;
        } else {
            self.consecutive = self.consecutive.saturating_sub(1);
        }
        self.is_stable()
    }

    pub fn is_stable(&self) -> bool {
        self.consecutive >= self.threshold
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn reset(&mut self) {
        self.consecutive = 0;
    }
}

/// Fixed-capacity sliding window over recent frame scores.
#[derive(Debug, Clone)]
pub struct ScoreWindow {
    scores: VecDeque<f64>,
    capacity: usize,
}

impl ScoreWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            scores: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a score, evicting the oldest when full.
    pub fn push(&mut self, score: f64) {
        if self.scores.len() == self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    /// Mean of the window; 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().mean()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
