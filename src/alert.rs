//! Alert types and the surfacing policy.

use crate::detect::DetectionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

/// How long a snooze suppresses alert surfacing.
pub const SNOOZE_DURATION: Duration = Duration::from_secs(300);

/// Category of a notification or surfaced alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Phone,
    Sleep,
    Inactive,
    Process,
    General,
    Start,
    Stop,
    ForcedStop,
}

/// A concrete alert ready for display or delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertDetails {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl AlertDetails {
    pub fn new(alert_type: AlertType, message: impl Into<String>) -> Self {
        Self {
            alert_type,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of feeding one detection verdict through the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// Surface the alert with this composite message.
    Surfaced(String),
    /// Distracted, but within the cooldown since the last alert.
    CoolingDown,
    /// Distracted, but the user snoozed alerts.
    Snoozed,
    /// Nothing to report.
    NotDistracted,
}

/// Rate-limits and gates distraction alerts.
///
/// A positive verdict first passes the cooldown gate; only then is the
/// distraction time recorded. A snooze suppresses surfacing but leaves
/// the cooldown bookkeeping in place, so alerts resume on the normal
/// cadence once the snooze lapses.
pub struct AlertPolicy {
    cooldown: Duration,
    last_distraction_time: Option<Instant>,
    snooze_until: Option<Instant>,
}

impl AlertPolicy {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_distraction_time: None,
            snooze_until: None,
        }
    }

    /// Evaluate one detection verdict.
    pub fn evaluate(&mut self, result: &DetectionResult, now: Instant) -> AlertOutcome {
        if !result.is_distracted() {
            return AlertOutcome::NotDistracted;
        }

        if let Some(last) = self.last_distraction_time {
            if now.saturating_duration_since(last) < self.cooldown {
                return AlertOutcome::CoolingDown;
            }
        }

        self.last_distraction_time = Some(now);

        if self.is_snoozed(now) {
            return AlertOutcome::Snoozed;
        }

        AlertOutcome::Surfaced(compose_message(result))
    }

    /// Suppress surfacing for the snooze window.
    pub fn snooze(&mut self, now: Instant) {
        self.snooze_until = Some(now + SNOOZE_DURATION);
        info!("alerts snoozed for {} seconds", SNOOZE_DURATION.as_secs());
    }

    pub fn is_snoozed(&self, now: Instant) -> bool {
        self.snooze_until.is_some_and(|until| now < until)
    }

    /// Clear all gating state for a fresh run.
    pub fn reset(&mut self) {
        self.last_distraction_time = None;
        self.snooze_until = None;
    }
}

/// Composite alert message, clauses in fixed order.
pub fn compose_message(result: &DetectionResult) -> String {
    let mut clauses = Vec::new();
    if result.phone_detected {
        clauses.push("Phone detected in view");
    }
    if result.sleep_detected {
        clauses.push("User appears to be sleeping");
    }
    if result.inactive {
        clauses.push("No activity detected");
    }
    clauses.join(", ")
}
