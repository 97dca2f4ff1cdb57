//! Focus Watchdog - camera-and-input distraction monitor.
//!
//! This library implements a surveillance session that periodically runs
//! detection checks (phone in view, closed eyes, input inactivity,
//! suspicious background processes), gates alerts through a cooldown and
//! snooze policy, and delivers notifications to a Discord webhook.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Focus Watchdog                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌─────────────┐   ┌────────────┐             │
//! │  │ Capture  │──▶│  Detectors  │──▶│   Alert    │             │
//! │  │ (scorers)│   │ (aggregate) │   │  (policy)  │             │
//! │  └──────────┘   └─────────────┘   └────────────┘             │
//! │       │                │                 │                   │
//! │       ▼                ▼                 ▼                   │
//! │  ┌──────────┐   ┌─────────────┐   ┌────────────┐             │
//! │  │  Input   │   │ Controller  │   │   Notify   │             │
//! │  │ (events) │   │ (lifecycle) │   │ (webhook)  │             │
//! │  └──────────┘   └─────────────┘   └────────────┘             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use focus_watchdog::capture::simulated::{
//!     SimulatedPhoneScorer, SimulatedProcessLister, SimulatedScreenRecorder,
//!     SimulatedSleepScorer,
//! };
//! use focus_watchdog::config::DetectionSettings;
//! use focus_watchdog::controller::SurveillanceController;
//! use focus_watchdog::detect::activity::ActivityDetector;
//! use focus_watchdog::detect::aggregator::DetectionAggregator;
//! use focus_watchdog::detect::phone::PhoneDetector;
//! use focus_watchdog::detect::process::ProcessDetector;
//! use focus_watchdog::detect::sleep::SleepDetector;
//! use focus_watchdog::input::SimulatedInputSource;
//! use focus_watchdog::stats::create_shared_stats;
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//! use std::time::{Duration, Instant};
//!
//! let settings = DetectionSettings::default();
//! let mut input = SimulatedInputSource::new(Duration::from_millis(750));
//! input.start().expect("input source");
//!
//! let now = Instant::now();
//! let aggregator = DetectionAggregator::new(
//!     PhoneDetector::new(&settings, Box::new(SimulatedPhoneScorer::new())),
//!     SleepDetector::new(&settings, Box::new(SimulatedSleepScorer::new())),
//!     ActivityDetector::new(&settings, input.receiver().clone(), now),
//!     ProcessDetector::new(Box::new(SimulatedProcessLister::new())),
//! );
//!
//! let mut controller = SurveillanceController::new(
//!     settings,
//!     aggregator,
//!     Box::new(SimulatedScreenRecorder::new()),
//!     None,
//!     create_shared_stats(),
//!     Arc::new(AtomicBool::new(false)),
//! )
//! .expect("valid settings");
//! controller.start(Instant::now());
//! ```

pub mod alert;
pub mod capture;
pub mod config;
pub mod controller;
pub mod detect;
pub mod input;
pub mod notify;
pub mod stats;

// Re-export key types at crate root for convenience
pub use alert::{AlertDetails, AlertOutcome, AlertPolicy, AlertType};
pub use config::{Config, ConfigError, DetectionSettings, SettingsError};
pub use controller::{Phase, RecordingState, RunState, SurveillanceController};
pub use detect::{DetectionResult, Detector};
pub use notify::{BlockingNotifier, Notify, NotifyError, WebhookNotifier};
pub use stats::{create_shared_stats, SessionStats, SharedStats, StatsSnapshot};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
