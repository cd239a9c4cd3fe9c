//! Validates the projection factory shared by the worker threads

use image::{Rgba, RgbaImage};
use stampede::GenerationError;
use stampede::color::{ColorModel, Pallette};
use stampede::io::configuration::{MAX_PROJECTION_SCALE, MIN_PROJECTION_SCALE};
use stampede::paint::generator::ProjectionGenerator;
use stampede::query::select::{Query, RandomQuery};
use stampede::stamp::{Stamp, StampMetadata};
use std::sync::Arc;

fn pool() -> Vec<Stamp> {
    vec![
        Stamp::new(
            RgbaImage::from_pixel(10, 10, Rgba([200, 40, 40, 255])),
            StampMetadata::default(),
        ),
        Stamp::new(
            RgbaImage::from_pixel(14, 8, Rgba([40, 200, 40, 255])),
            StampMetadata::default(),
        ),
    ]
}

fn pallette() -> Arc<Pallette> {
    Arc::new(Pallette::new(vec![ColorModel::Plain(Rgba([
        120, 130, 140, 255,
    ]))]))
}

#[test]
fn test_generated_projection_stays_within_documented_ranges() {
    let generator = ProjectionGenerator::new(200, 150, pool(), pallette(), 11);
    let stamp_query = Query::Random(RandomQuery::new(1));
    let color_model_query = Query::Random(RandomQuery::new(2));
    let color_query = Query::Random(RandomQuery::new(3));

    for _ in 0..100 {
        let projection = generator
            .generate(&stamp_query, &color_model_query, &color_query)
            .expect("non-empty pool and pallette");
        assert!(projection.scale() >= MIN_PROJECTION_SCALE);
        assert!(projection.scale() < MAX_PROJECTION_SCALE);
        assert!(projection.rotation() >= 0.0);
        assert!(projection.rotation() < 360.0);
        // The anchor is inside the canvas, so a centered stamp at maximum
        // scale cannot drift further than its own scaled extent
        assert!(projection.x() > -30);
        assert!(projection.x() < 200);
        assert!(projection.y() > -30);
        assert!(projection.y() < 150);
    }
}

#[test]
fn test_same_seed_generates_same_projection() {
    let first = ProjectionGenerator::new(100, 100, pool(), pallette(), 42);
    let second = ProjectionGenerator::new(100, 100, pool(), pallette(), 42);
    let stamp_query = Query::Random(RandomQuery::new(5));
    let color_model_query = Query::Random(RandomQuery::new(5));
    let color_query = Query::Random(RandomQuery::new(5));

    let a = first
        .generate(&stamp_query, &color_model_query, &color_query)
        .expect("non-empty pool");
    let stamp_query = Query::Random(RandomQuery::new(5));
    let color_model_query = Query::Random(RandomQuery::new(5));
    let color_query = Query::Random(RandomQuery::new(5));
    let b = second
        .generate(&stamp_query, &color_model_query, &color_query)
        .expect("non-empty pool");

    assert_eq!(a.x(), b.x());
    assert_eq!(a.y(), b.y());
    assert!((a.scale() - b.scale()).abs() < f64::EPSILON);
    assert!((a.rotation() - b.rotation()).abs() < f64::EPSILON);
}

#[test]
fn test_empty_stamp_pool_fails() {
    let generator = ProjectionGenerator::new(100, 100, vec![], pallette(), 1);
    let query = Query::Random(RandomQuery::new(1));
    assert!(matches!(
        generator.generate(&query, &query, &query),
        Err(GenerationError::EmptyInput)
    ));
}

#[test]
fn test_zero_area_stamp_is_rejected() {
    let degenerate = vec![Stamp::new(
        RgbaImage::new(0, 10),
        StampMetadata::default(),
    )];
    let generator = ProjectionGenerator::new(100, 100, degenerate, pallette(), 1);
    let query = Query::Random(RandomQuery::new(1));
    assert!(matches!(
        generator.generate(&query, &query, &query),
        Err(GenerationError::Composition { .. })
    ));
}

#[test]
fn test_tint_comes_from_the_selected_model_candidates() {
    let base = Rgba([120, 130, 140, 255]);
    let generator = ProjectionGenerator::new(100, 100, pool(), pallette(), 9);
    let query = Query::Random(RandomQuery::new(9));
    let projection = generator
        .generate(&query, &query, &query)
        .expect("non-empty pool");
    let candidates = ColorModel::Plain(base).tint_candidates(projection.x(), projection.y());
    assert!(candidates.contains(&projection.tint()));
}
