//! Validates run orchestration, density adaptation and state retention

use image::{Rgba, RgbaImage};
use stampede::generate::controller::{GenerationController, adapt_projection_count};
use stampede::io::configuration::{Preferences, SPINE_ONE_COLOR, SPINE_ZERO_COLOR};
use stampede::io::progress::SilentListener;
use stampede::paint::CancellationToken;
use stampede::stamp::{Stamp, StampMetadata, Stamps};
use std::sync::Arc;

fn stamp(side: u32, shade: u8) -> Stamp {
    Stamp::new(
        RgbaImage::from_pixel(side, side, Rgba([shade, shade, shade, 255])),
        StampMetadata::default(),
    )
}

fn loaded_pool() -> Stamps {
    Stamps::new(vec![
        vec![stamp(8, 40), stamp(8, 90)],
        vec![stamp(6, 140), stamp(10, 200)],
    ])
}

fn small_preferences() -> Preferences {
    Preferences {
        width: 64,
        height: 48,
        color_model_count: 3,
        stamp_group_count: 2,
        stamps_per_group: 2,
        stamp_count_demultiplier: 100,
        spine_mode: false,
    }
}

#[test]
fn test_reference_sized_stamps_keep_the_base_count() {
    let stamps = vec![stamp(150, 10), stamp(150, 20)];
    assert_eq!(adapt_projection_count(120, &stamps), 120);
}

#[test]
fn test_tiny_stamps_are_capped_at_the_factor() {
    let stamps = vec![stamp(1, 10), stamp(1, 20)];
    assert_eq!(adapt_projection_count(120, &stamps), 360);
}

#[test]
fn test_large_stamps_lower_the_count() {
    let stamps = vec![stamp(300, 10)];
    let adapted = adapt_projection_count(120, &stamps);
    assert!(adapted < 120, "adapted to {adapted}");
}

#[test]
fn test_empty_pool_keeps_the_base_count() {
    assert_eq!(adapt_projection_count(120, &[]), 120);
    assert_eq!(adapt_projection_count(0, &[stamp(10, 10)]), 0);
}

#[test]
fn test_default_preferences_base_projection_count() {
    let preferences = Preferences::default();
    assert_eq!(preferences.base_projection_count(), 400);
    let custom = Preferences {
        width: 800,
        height: 600,
        stamp_count_demultiplier: 4000,
        ..Preferences::default()
    };
    assert_eq!(custom.base_projection_count(), 120);
}

#[test]
fn test_generate_image_produces_a_canvas_and_retains_state() {
    let mut controller = GenerationController::new(loaded_pool(), small_preferences(), Some(7));
    assert!(controller.retained_state().is_none());

    let image = controller
        .generate_image(&SilentListener, &CancellationToken::new())
        .expect("generation succeeds")
        .expect("no cancellation requested");

    assert_eq!(image.dimensions(), (64, 48));
    assert!(controller.retained_state().is_some());
}

#[test]
fn test_seeded_controllers_generate_identical_images() {
    // A single reference-sized projection keeps the run on one worker, so
    // the whole pipeline is deterministic for a fixed seed
    let preferences = Preferences {
        stamp_count_demultiplier: 64 * 48,
        ..small_preferences()
    };
    let pool = || Stamps::new(vec![vec![stamp(150, 60), stamp(150, 190)]]);
    let single = |seed| {
        let mut controller = GenerationController::new(pool(), preferences, seed);
        controller
            .generate_image(&SilentListener, &CancellationToken::new())
            .expect("generation succeeds")
            .expect("no cancellation requested")
    };
    assert_eq!(single(Some(99)).as_raw(), single(Some(99)).as_raw());
}

#[test]
fn test_cancellation_before_painting_keeps_previous_state() {
    let mut controller = GenerationController::new(loaded_pool(), small_preferences(), Some(21));
    controller.set_retain_colors(true);
    controller.set_retain_stamps(true);
    controller.set_retain_spine(true);

    controller
        .generate_image(&SilentListener, &CancellationToken::new())
        .expect("first generation succeeds")
        .expect("no cancellation requested");
    let before = controller.retained_state().expect("state committed").clone();

    let token = CancellationToken::new();
    token.cancel();
    let outcome = controller
        .generate_image(&SilentListener, &token)
        .expect("cancellation is not a fault");
    assert!(outcome.is_none());

    let after = controller.retained_state().expect("state kept");
    assert!(Arc::ptr_eq(&before.pallette, &after.pallette));
    assert!(Arc::ptr_eq(&before.stamps, &after.stamps));
    assert!(Arc::ptr_eq(&before.stamp_query, &after.stamp_query));
    assert!(Arc::ptr_eq(&before.color_model_query, &after.color_model_query));
    assert!(Arc::ptr_eq(&before.color_query, &after.color_query));
}

#[test]
fn test_retain_flags_reuse_state_across_runs() {
    let mut controller = GenerationController::new(loaded_pool(), small_preferences(), Some(33));
    controller.set_retain_colors(true);
    controller.set_retain_stamps(true);
    controller.set_retain_spine(true);

    controller
        .generate_image(&SilentListener, &CancellationToken::new())
        .expect("first generation succeeds")
        .expect("no cancellation requested");
    let first = controller.retained_state().expect("state committed").clone();

    controller
        .generate_image(&SilentListener, &CancellationToken::new())
        .expect("second generation succeeds")
        .expect("no cancellation requested");
    let second = controller.retained_state().expect("state committed");

    assert!(Arc::ptr_eq(&first.pallette, &second.pallette));
    assert!(Arc::ptr_eq(&first.stamps, &second.stamps));
    assert!(Arc::ptr_eq(&first.stamp_query, &second.stamp_query));
}

#[test]
fn test_unretained_runs_rebuild_state() {
    let mut controller = GenerationController::new(loaded_pool(), small_preferences(), Some(33));
    controller
        .generate_image(&SilentListener, &CancellationToken::new())
        .expect("first generation succeeds")
        .expect("no cancellation requested");
    let first = controller.retained_state().expect("state committed").clone();

    controller
        .generate_image(&SilentListener, &CancellationToken::new())
        .expect("second generation succeeds")
        .expect("no cancellation requested");
    let second = controller.retained_state().expect("state committed");

    assert!(!Arc::ptr_eq(&first.pallette, &second.pallette));
    assert!(!Arc::ptr_eq(&first.stamps, &second.stamps));
    assert!(!Arc::ptr_eq(&first.stamp_query, &second.stamp_query));
}

#[test]
fn test_spine_mode_renders_only_the_two_tones() {
    let preferences = Preferences {
        spine_mode: true,
        ..small_preferences()
    };
    let mut controller = GenerationController::new(loaded_pool(), preferences, Some(5));
    let image = controller
        .generate_image(&SilentListener, &CancellationToken::new())
        .expect("spine generation succeeds")
        .expect("no cancellation requested");

    assert_eq!(image.dimensions(), (64, 48));
    assert!(
        image
            .pixels()
            .all(|pixel| *pixel == Rgba(SPINE_ONE_COLOR) || *pixel == Rgba(SPINE_ZERO_COLOR))
    );
    assert!(controller.retained_state().is_some());
}

#[test]
fn test_clear_caches_is_allowed_between_runs() {
    let mut controller = GenerationController::new(loaded_pool(), small_preferences(), Some(3));
    controller.clear_caches().expect("nothing retained yet");
    controller
        .generate_image(&SilentListener, &CancellationToken::new())
        .expect("generation succeeds")
        .expect("no cancellation requested");
    controller.clear_caches().expect("no run in flight");
}
