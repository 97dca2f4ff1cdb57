//! Simulated capture backends.
//!
//! These reproduce the score distributions the agent expects from real
//! camera and process sources, so a full run works without hardware:
//! phone scores land in the hit range (>= 0.7) roughly 10% of the time,
//! eye openness dips into the sleepy range (< 0.3) roughly 8% of the
//! time, and the process list is a shuffled pick of benign names.

use crate::capture::{CaptureError, FrameScorer, ProcessLister, RunningProcess, ScreenRecorder};
use std::time::{SystemTime, UNIX_EPOCH};

/// Small xorshift generator; the retrieval surface has no RNG dependency
/// and the simulation only needs uniform draws.
#[derive(Debug, Clone)]
pub(crate) struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    pub(crate) fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64 ^ d.as_secs())
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::new(nanos)
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform draw in [0, 1).
    pub(crate) fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Simulated phone scorer: occasional confident hits, otherwise low noise.
pub struct SimulatedPhoneScorer {
    rng: Xorshift64,
    started: bool,
}

impl SimulatedPhoneScorer {
    pub fn new() -> Self {
        Self {
            rng: Xorshift64::from_clock(),
            started: false,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xorshift64::new(seed),
            started: false,
        }
    }
}

impl Default for SimulatedPhoneScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScorer for SimulatedPhoneScorer {
    fn start(&mut self) -> Result<(), CaptureError> {
        self.started = true;
        Ok(())
    }

    fn score_frame(&mut self) -> Result<f64, CaptureError> {
        if !self.started {
            return Err(CaptureError::Unavailable("phone scorer not started".into()));
        }
        let random = self.rng.next_f64();
        // 10% of frames score as a detection (>= 0.7), the rest as noise (<= 0.2)
        let score = if random < 0.1 {
            random + 0.7
        } else {
            random * 0.2
        };
        Ok(score)
    }

    fn stop(&mut self) {
        self.started = false;
    }
}

/// Simulated sleep scorer: reports eye openness, occasionally sleepy.
pub struct SimulatedSleepScorer {
    rng: Xorshift64,
    started: bool,
}

impl SimulatedSleepScorer {
    pub fn new() -> Self {
        Self {
            rng: Xorshift64::from_clock(),
            started: false,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xorshift64::new(seed),
            started: false,
        }
    }
}

impl Default for SimulatedSleepScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScorer for SimulatedSleepScorer {
    fn start(&mut self) -> Result<(), CaptureError> {
        self.started = true;
        Ok(())
    }

    fn score_frame(&mut self) -> Result<f64, CaptureError> {
        if !self.started {
            return Err(CaptureError::Unavailable("sleep scorer not started".into()));
        }
        let random = self.rng.next_f64();
        // 8% of frames read as drowsy (< 0.32), the rest as open eyes (>= 0.3)
        let openness = if random < 0.08 {
            random * 0.4
        } else {
            random * 0.6 + 0.3
        };
        Ok(openness)
    }

    fn stop(&mut self) {
        self.started = false;
    }
}

const SIMULATED_PROCESS_POOL: &[(&str, u32)] = &[
    ("chrome", 1000),
    ("safari", 2000),
    ("firefox", 3000),
    ("spotify", 4000),
    ("slack", 5000),
    ("discord", 6000),
    ("zoom", 7000),
    ("teams", 8000),
    ("terminal", 9000),
    ("vscode", 10000),
];

/// Simulated process lister: a random pick of benign process names.
pub struct SimulatedProcessLister {
    rng: Xorshift64,
}

impl SimulatedProcessLister {
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
}

impl Default for SimulatedProcessLister {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLister for SimulatedProcessLister {
    fn list(&mut self) -> Result<Vec<RunningProcess>, CaptureError> {
        let count = 3 + (self.rng.next_u64() % 5) as usize;
        let mut selected: Vec<RunningProcess> = Vec::with_capacity(count);

        for _ in 0..count {
            let idx = (self.rng.next_u64() % SIMULATED_PROCESS_POOL.len() as u64) as usize;
            let (name, pid_base) = SIMULATED_PROCESS_POOL[idx];
            if selected.iter().any(|p| p.name == name) {
                continue;
            }
            let pid = pid_base + (self.rng.next_u64() % 1000) as u32;
            selected.push(RunningProcess {
                name: name.to_string(),
                pid,
            });
        }

        Ok(selected)
    }
}

/// Simulated screen recorder: tracks state, buffers nothing real.
pub struct SimulatedScreenRecorder {
    recording: bool,
    chunks: Vec<Vec<u8>>,
}

impl SimulatedScreenRecorder {
    pub fn new() -> Self {
        Self {
            recording: false,
            chunks: Vec::new(),
        }
    }

    /// Number of buffered chunks; exposed for tests.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

impl Default for SimulatedScreenRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenRecorder for SimulatedScreenRecorder {
    fn start(&mut self) -> Result<(), CaptureError> {
        self.chunks.clear();
        self.recording = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.recording = false;
        self.chunks.clear();
    }

    fn is_recording(&self) -> bool {
        self.recording
    }
}
