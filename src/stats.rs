//! In-memory session statistics.
//!
//! Counters live for one run only; detection history is never persisted
//! across restarts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for the current session.
#[derive(Debug)]
pub struct SessionStats {
    /// Number of capture/cooldown cycles completed
    cycles_completed: AtomicU64,
    /// Number of detection passes run
    checks_run: AtomicU64,
    /// Number of alerts surfaced to the user
    alerts_surfaced: AtomicU64,
    /// Number of webhook notifications accepted
    notifications_delivered: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            cycles_completed: AtomicU64::new(0),
            checks_run: AtomicU64::new(0),
            alerts_surfaced: AtomicU64::new(0),
            notifications_delivered: AtomicU64::new(0),
            session_start: Utc::now(),
        }
    }

    pub fn record_cycle_completed(&self) {
        self.cycles_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_check_run(&self) {
        self.checks_run.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_alert_surfaced(&self) {
        self.alerts_surfaced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notification_delivered(&self) {
        self.notifications_delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cycles_completed: self.cycles_completed.load(Ordering::Relaxed),
            checks_run: self.checks_run.load(Ordering::Relaxed),
            alerts_surfaced: self.alerts_surfaced.load(Ordering::Relaxed),
            notifications_delivered: self.notifications_delivered.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.snapshot();
        format!(
            "Session Statistics:\n\
             - Cycles completed: {}\n\
             - Detection passes run: {}\n\
             - Alerts surfaced: {}\n\
             - Notifications delivered: {}\n\
             - Session duration: {} seconds",
            stats.cycles_completed,
            stats.checks_run,
            stats.alerts_surfaced,
            stats.notifications_delivered,
            stats.session_duration_secs
        )
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the session counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub cycles_completed: u64,
    pub checks_run: u64,
    pub alerts_surfaced: u64,
    pub notifications_delivered: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Thread-safe shared statistics handle.
pub type SharedStats = Arc<SessionStats>;

/// Create a new shared statistics handle.
pub fn create_shared_stats() -> SharedStats {
    Arc::new(SessionStats::new())
}
