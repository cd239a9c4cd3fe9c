//! Validates progress listener behavior

use stampede::io::progress::{ProgressBarListener, ProgressListener, SilentListener};

#[test]
fn test_silent_listener_accepts_all_signals() {
    let listener = SilentListener;
    listener.begin(10);
    listener.increment();
    listener.clear();
}

#[test]
fn test_bar_listener_survives_the_full_protocol() {
    let listener = ProgressBarListener::new();
    listener.begin(5);
    for _ in 0..5 {
        listener.increment();
    }
    listener.clear();
}

#[test]
fn test_bar_listener_increment_before_begin_is_harmless() {
    let listener = ProgressBarListener::new();
    listener.increment();
    listener.clear();
}

#[test]
fn test_bar_listener_begin_replaces_a_previous_bar() {
    let listener = ProgressBarListener::new();
    listener.begin(3);
    listener.increment();
    listener.begin(8);
    listener.increment();
    listener.clear();
}
