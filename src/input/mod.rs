//! User interaction events consumed by the activity tracker.

pub mod simulated;
pub mod types;

pub use simulated::{InputSourceError, SimulatedInputSource};
pub use types::{InputEvent, InputEventKind};
