//! Progress reporting for generation runs
//!
//! The core only sees the listener trait; terminal rendering stays out here.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::sync::{Mutex, PoisonError};

/// Receives total-expected and increment-on-completion signals from a run
pub trait ProgressListener: Send + Sync {
    /// A run is starting with the given expected projection count
    fn begin(&self, total: u64);

    /// One projection has been committed
    fn increment(&self);

    /// The run ended without completing; discard any partial display
    fn clear(&self);
}

/// Listener that ignores all signals, for tests and quiet mode
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentListener;

impl ProgressListener for SilentListener {
    fn begin(&self, _total: u64) {}

    fn increment(&self) {}

    fn clear(&self) {}
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Terminal progress bar listener
#[derive(Default)]
pub struct ProgressBarListener {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressBarListener {
    /// Create an idle listener; the bar appears on the first `begin`
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressListener for ProgressBarListener {
    fn begin(&self, total: u64) {
        let bar = ProgressBar::new(total);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_message("painting");
        let mut slot = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.finish_and_clear();
        }
        *slot = Some(bar);
    }

    fn increment(&self) {
        let slot = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bar) = slot.as_ref() {
            bar.inc(1);
        }
    }

    fn clear(&self) {
        let mut slot = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bar) = slot.take() {
            bar.finish_and_clear();
        }
    }
}
