//! The shared canvas, projection rasterization and painting lifecycle

/// The output canvas state machine and spine rendering
pub mod canvas;
/// Per-projection construction from providers, pallette and queries
pub mod generator;
/// A placed, transformed, colorized stamp instance
pub mod projection;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation signal shared between the orchestrator, workers
/// and the painting
///
/// Cancellation is a request, not an interrupt: workers observe the flag
/// between units of work and the canvas rejects writes after it is raised.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the cancellation signal; idempotent, callable from any thread
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True once the signal has been raised
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
