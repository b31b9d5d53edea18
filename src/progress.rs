// src/progress.rs

//! Progress reporting for conversion runs
//!
//! The pipeline announces each phase with a message and the mapper advances
//! the position once per library entry. Implementations:
//! - `LogProgress`: logs to tracing, the default for the binary
//! - `SilentProgress`: discards everything
//! - `CallbackProgress`: forwards events to a closure

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info};

/// Receiver of pipeline progress
pub trait ProgressTracker: Send + Sync {
    /// Announce the current phase
    fn set_message(&self, message: &str);

    /// Advance by `amount` entries
    fn increment(&self, amount: u64);

    /// Number of entries the current phase will process
    fn set_length(&self, length: u64);

    fn finish_with_message(&self, message: &str);

    fn finish_with_error(&self, message: &str);
}

/// Discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl SilentProgress {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressTracker for SilentProgress {
    fn set_message(&self, _message: &str) {}
    fn increment(&self, _amount: u64) {}
    fn set_length(&self, _length: u64) {}
    fn finish_with_message(&self, _message: &str) {}
    fn finish_with_error(&self, _message: &str) {}
}

/// Logs phases at info level and the entry count at every tenth of the run
#[derive(Debug)]
pub struct LogProgress {
    name: String,
    position: AtomicU64,
    length: AtomicU64,
}

impl LogProgress {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: AtomicU64::new(0),
            length: AtomicU64::new(0),
        }
    }
}

/// Whether moving from `old` to `new` out of `length` crosses a tenth
fn crosses_step(old: u64, new: u64, length: u64) -> bool {
    if length == 0 {
        return false;
    }
    let step = std::cmp::max(1, length / 10);
    new / step > old / step || new == length
}

impl ProgressTracker for LogProgress {
    fn set_message(&self, message: &str) {
        info!("{}: {}", self.name, message);
    }

    fn increment(&self, amount: u64) {
        let old = self.position.fetch_add(amount, Ordering::Relaxed);
        let new = old + amount;
        let length = self.length.load(Ordering::Relaxed);

        if crosses_step(old, new, length) {
            info!("{}: {}/{} entries ({}%)", self.name, new, length, new * 100 / length);
        }
    }

    fn set_length(&self, length: u64) {
        self.position.store(0, Ordering::Relaxed);
        self.length.store(length, Ordering::Relaxed);
    }

    fn finish_with_message(&self, message: &str) {
        info!("{}: {}", self.name, message);
    }

    fn finish_with_error(&self, message: &str) {
        error!("{}: {}", self.name, message);
    }
}

/// Events emitted by [`CallbackProgress`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Phase announced
    Message(String),
    /// Entry processed
    Position { current: u64, total: u64 },
    /// Run succeeded
    Finished(String),
    /// Run failed
    Error(String),
}

/// Forwards every event to a closure
pub struct CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    callback: F,
    position: AtomicU64,
    length: AtomicU64,
}

impl<F> CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            position: AtomicU64::new(0),
            length: AtomicU64::new(0),
        }
    }
}

impl<F> ProgressTracker for CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn set_message(&self, message: &str) {
        (self.callback)(ProgressEvent::Message(message.to_string()));
    }

    fn increment(&self, amount: u64) {
        let current = self.position.fetch_add(amount, Ordering::Relaxed) + amount;
        (self.callback)(ProgressEvent::Position {
            current,
            total: self.length.load(Ordering::Relaxed),
        });
    }

    fn set_length(&self, length: u64) {
        self.position.store(0, Ordering::Relaxed);
        self.length.store(length, Ordering::Relaxed);
    }

    fn finish_with_message(&self, message: &str) {
        (self.callback)(ProgressEvent::Finished(message.to_string()));
    }

    fn finish_with_error(&self, message: &str) {
        (self.callback)(ProgressEvent::Error(message.to_string()));
    }
}
