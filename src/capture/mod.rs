//! Capture collaborators for the detection checks.
//!
//! Detectors never talk to hardware directly; they hold one of these
//! interfaces so real capture backends and simulated ones are
//! interchangeable.

pub mod simulated;

pub use simulated::{
    SimulatedPhoneScorer, SimulatedProcessLister, SimulatedScreenRecorder, SimulatedSleepScorer,
};

use thiserror::Error;

/// Errors raised by capture backends.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture source unavailable: {0}")]
    Unavailable(String),

    #[error("frame acquisition failed: {0}")]
    Frame(String),

    #[error("process listing failed: {0}")]
    ProcessList(String),
}

/// A process as reported by the platform, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningProcess {
    pub name: String,
    pub pid: u32,
}

/// Produces a score in [0, 1] from the current camera frame.
///
/// For phone detection the score is detection confidence; for sleep
/// detection it is eye openness.
pub trait FrameScorer {
    /// Open the underlying capture source.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Score the current frame.
    fn score_frame(&mut self) -> Result<f64, CaptureError>;

    /// Release the capture source.
    fn stop(&mut self);
}

/// Lists currently running processes.
pub trait ProcessLister {
    fn list(&mut self) -> Result<Vec<RunningProcess>, CaptureError>;
}

/// Records the screen during active windows.
///
/// Chunks accumulated during a recording are discarded when the
/// recording stops; nothing is persisted across a run.
pub trait ScreenRecorder {
    /// Begin recording.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Stop recording and drop any buffered chunks.
    fn stop(&mut self);

    fn is_recording(&self) -> bool;
}
