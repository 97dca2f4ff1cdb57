//! Interaction event types for the focus watchdog.
//!
//! These types capture ONLY timing and event kind - never content or coordinates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of user interaction that resets the inactivity clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEventKind {
    /// Pointer button pressed
    PointerDown,
    /// Key pressed
    KeyDown,
    /// Scroll wheel or gesture
    Scroll,
    /// Touch contact started
    TouchStart,
    /// Pointer moved
    PointerMove,
}

/// A user interaction event capturing only timing information.
///
/// Privacy guarantee: no key codes, characters, or coordinates are captured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEvent {
    /// Timestamp when the event occurred
    pub timestamp: DateTime<Utc>,
    /// What kind of interaction happened
    pub kind: InputEventKind,
}

impl InputEvent {
    pub fn new(kind: InputEventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
        }
    }

    pub fn pointer_down() -> Self {
        Self::new(InputEventKind::PointerDown)
    }

    pub fn key_down() -> Self {
        Self::new(InputEventKind::KeyDown)
    }

    pub fn scroll() -> Self {
        Self::new(InputEventKind::Scroll)
    }

    pub fn touch_start() -> Self {
        Self::new(InputEventKind::TouchStart)
    }

    pub fn pointer_move() -> Self {
        Self::new(InputEventKind::PointerMove)
    }
}
