//! Simulated interaction source for demo mode.
//!
//! Emits synthetic input events on a fixed period so the agent can run
//! end-to-end without platform input hooks.

use crate::input::types::{InputEvent, InputEventKind};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while driving the input source.
#[derive(Debug, Error)]
pub enum InputSourceError {
    #[error("Input source is already running")]
    AlreadyRunning,
}

/// A synthetic input source that cycles through event kinds on a timer.
pub struct SimulatedInputSource {
    period: Duration,
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SimulatedInputSource {
    /// Create a new simulated source emitting one event per `period`.
    pub fn new(period: Duration) -> Self {
        let (sender, receiver) = bounded(10_000);
        Self {
            period,
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Start emitting events.
    pub fn start(&mut self) -> Result<(), InputSourceError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(InputSourceError::AlreadyRunning);
        }
        self.running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.running);
        let sender = self.sender.clone();
        let period = self.period;

        self.worker = Some(std::thread::spawn(move || {
            let kinds = [
                InputEventKind::PointerMove,
                InputEventKind::KeyDown,
                InputEventKind::Scroll,
                InputEventKind::PointerDown,
                InputEventKind::TouchStart,
            ];
            let mut next = 0usize;
            while running.load(Ordering::SeqCst) {
                std::thread::sleep(period);
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                let event = InputEvent::new(kinds[next % kinds.len()]);
                next = next.wrapping_add(1);
                if sender.try_send(event).is_err() {
                    // Receiver gone or backed up; drop the event.
                    continue;
                }
            }
        }));

        Ok(())
    }

    /// Stop emitting events and join the worker.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    /// Check if the source is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for interaction events.
    pub fn receiver(&self) -> &Receiver<InputEvent> {
        &self.receiver
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&self) -> Option<InputEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for SimulatedInputSource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_start_rejected() {
        let mut source = SimulatedInputSource::new(Duration::from_secs(60));
        source.start().unwrap();
        assert!(matches!(
            source.start(),
            Err(InputSourceError::AlreadyRunning)
        ));
        source.stop();
        assert!(!source.is_running());
    }

    #[test]
    fn test_emits_events_while_running() {
        let mut source = SimulatedInputSource::new(Duration::from_millis(5));
        source.start().unwrap();
        let event = source
            .receiver()
            .recv_timeout(Duration::from_secs(2))
            .unwrap();
        assert_eq!(event.kind, InputEventKind::PointerMove);
        source.stop();
    }
}
