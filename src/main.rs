//! Focus Watchdog CLI
//!
//! Camera-and-input distraction monitor with webhook notifications.

use clap::{Parser, Subcommand};
use focus_watchdog::{
    capture::simulated::{
        SimulatedPhoneScorer, SimulatedProcessLister, SimulatedScreenRecorder, SimulatedSleepScorer,
    },
    config::Config,
    controller::{Phase, RunState, SurveillanceController},
    detect::{
        activity::ActivityDetector, aggregator::DetectionAggregator, phone::PhoneDetector,
        process::ProcessDetector, sleep::SleepDetector,
    },
    input::SimulatedInputSource,
    notify::{BlockingNotifier, Notify},
    stats::create_shared_stats,
    VERSION,
};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "focus-watchdog")]
#[command(version = VERSION)]
#[command(about = "Camera-and-input distraction monitor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a surveillance session
    Start {
        /// Webhook URL for notifications (overrides config and environment)
        #[arg(long)]
        webhook: Option<String>,

        /// Period between simulated input events, in milliseconds
        #[arg(long, default_value = "750")]
        input_period_ms: u64,

        /// Seed for the simulated capture backends (random if not set)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Send a test notification to the configured webhook
    TestWebhook {
        /// Webhook URL to test (overrides config and environment)
        #[arg(long)]
        webhook: Option<String>,
    },

    /// Show configuration
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            webhook,
            input_period_ms,
            seed,
        } => {
            cmd_start(webhook, input_period_ms, seed);
        }
        Commands::TestWebhook { webhook } => {
            cmd_test_webhook(webhook);
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_start(webhook: Option<String>, input_period_ms: u64, seed: Option<u64>) {
    println!("Focus Watchdog v{VERSION}");
    println!();

    let config = Config::load().unwrap_or_default();
    let settings = config.settings.clone();
    if let Err(e) = settings.validate() {
        eprintln!("Error: invalid settings: {e}");
        std::process::exit(1);
    }

    let webhook_url = webhook.or_else(|| config.effective_webhook_url());
    let notifier: Option<Box<dyn Notify>> = match webhook_url {
        Some(url) => match BlockingNotifier::new(url) {
            Ok(client) => {
                println!("  Notifications: enabled (source: {})", client.source_id());
                Some(Box::new(client))
            }
            Err(e) => {
                eprintln!("Warning: webhook client unavailable: {e}");
                eprintln!("Continuing without notifications.");
                None
            }
        },
        None => {
            println!("  Notifications: disabled (no webhook configured)");
            None
        }
    };

    println!(
        "  Capture window: {}s, cooldown: {}-{}s",
        config.window_duration.as_secs(),
        settings.check_interval_min.as_secs(),
        settings.check_interval_max.as_secs()
    );
    println!(
        "  Inactivity threshold: {}s, alert cooldown: {}s",
        settings.inactivity_threshold.as_secs(),
        settings.distraction_cooldown.as_secs()
    );
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let mut input = SimulatedInputSource::new(Duration::from_millis(input_period_ms));
    if let Err(e) = input.start() {
        eprintln!("Error starting input source: {e}");
        std::process::exit(1);
    }

    let now = Instant::now();
    let aggregator = match seed {
        Some(seed) => DetectionAggregator::new(
            PhoneDetector::new(&settings, Box::new(SimulatedPhoneScorer::with_seed(seed))),
            SleepDetector::new(
                &settings,
                Box::new(SimulatedSleepScorer::with_seed(seed.wrapping_add(1))),
            ),
            ActivityDetector::new(&settings, input.receiver().clone(), now),
            ProcessDetector::new(Box::new(SimulatedProcessLister::with_seed(
                seed.wrapping_add(2),
            ))),
        ),
        None => DetectionAggregator::new(
            PhoneDetector::new(&settings, Box::new(SimulatedPhoneScorer::new())),
            SleepDetector::new(&settings, Box::new(SimulatedSleepScorer::new())),
            ActivityDetector::new(&settings, input.receiver().clone(), now),
            ProcessDetector::new(Box::new(SimulatedProcessLister::new())),
        ),
    };

    let stats = create_shared_stats();
    let interrupt = Arc::new(AtomicBool::new(false));
    ctrlc_handler(interrupt.clone());

    let mut controller = match SurveillanceController::new(
        settings,
        aggregator,
        Box::new(SimulatedScreenRecorder::new()),
        notifier,
        stats.clone(),
        interrupt.clone(),
    ) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    controller.start(Instant::now());
    if controller.recording_state().fallback_mode {
        println!("Warning: screen recording unavailable, running without it.");
    }

    // The capture window closes window_duration after each Active entry.
    let mut window_deadline: Option<Instant> = None;

    while !interrupt.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(100));
        let now = Instant::now();

        match controller.state() {
            RunState::Running(Phase::Active) => {
                let deadline = *window_deadline.get_or_insert(now + config.window_duration);
                if now >= deadline {
                    window_deadline = None;
                    controller.on_window_ended(now);
                }
            }
            RunState::Running(Phase::Cooldown) | RunState::Idle => {
                window_deadline = None;
            }
        }

        if let Some(elapsed) = controller.poll(now) {
            print!("\r  Monitoring... {elapsed}");
            let _ = std::io::stdout().flush();
        }

        if let Some(alert) = controller.current_alert().cloned() {
            println!();
            println!("[ALERT] {}", alert.message);
            controller.dismiss_alert();
        }
    }

    println!();
    println!("Stopping surveillance...");
    controller.stop(true, Instant::now());
    input.stop();

    println!();
    println!("{}", stats.summary());
}

fn cmd_test_webhook(webhook: Option<String>) {
    let config = Config::load().unwrap_or_default();
    let url = match webhook.or_else(|| config.effective_webhook_url()) {
        Some(url) => url,
        None => {
            eprintln!("Error: no webhook configured.");
            eprintln!("Set DISCORD_WEBHOOK_URL or add webhook_url to the config file.");
            std::process::exit(1);
        }
    };

    let client = match BlockingNotifier::new(url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Sending test notification (source: {})...", client.source_id());
    match client.test_connection() {
        Ok(true) => println!("Webhook accepted the test notification."),
        Ok(false) => {
            eprintln!("Webhook did not accept the test notification.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
    println!();
    println!(
        "Effective webhook: {}",
        match config.effective_webhook_url() {
            Some(url) => url,
            None => "not configured".to_string(),
        }
    );
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(interrupt: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        interrupt.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}
