//! Validates color models, tint candidates and pallette selection

use image::Rgba;
use rand::SeedableRng;
use rand::rngs::StdRng;
use stampede::color::{ColorModel, Pallette};
use stampede::query::select::{Query, RandomQuery};

#[test]
fn test_plain_model_ignores_position() {
    let model = ColorModel::Plain(Rgba([12, 34, 56, 255]));
    assert_eq!(model.color_at(0, 0), model.color_at(500, 900));
}

#[test]
fn test_gradient_model_hits_endpoints() {
    let from = Rgba([0, 0, 0, 255]);
    let to = Rgba([200, 100, 50, 255]);
    let model = ColorModel::Gradient {
        from,
        to,
        height: 100,
    };
    assert_eq!(model.color_at(10, 0), from);
    assert_eq!(model.color_at(10, 100), to);
}

#[test]
fn test_gradient_model_clamps_outside_canvas() {
    let from = Rgba([10, 20, 30, 255]);
    let to = Rgba([200, 100, 50, 255]);
    let model = ColorModel::Gradient {
        from,
        to,
        height: 100,
    };
    assert_eq!(model.color_at(0, -50), from);
    assert_eq!(model.color_at(0, 900), to);
}

#[test]
fn test_tint_candidates_start_from_base_color() {
    let base = Rgba([100, 150, 200, 255]);
    let model = ColorModel::Plain(base);
    let candidates = model.tint_candidates(5, 5);
    assert_eq!(candidates[0], base);
    assert_eq!(candidates.len(), 3);
    // The lightened variant moves toward white, the darkened toward black
    assert!(candidates[1].0[0] > base.0[0]);
    assert!(candidates[2].0[0] < base.0[0]);
}

#[test]
fn test_generated_pallette_has_requested_size() {
    let mut rng = StdRng::seed_from_u64(21);
    let pallette = Pallette::generate(&mut rng, 6, 400);
    assert_eq!(pallette.len(), 6);
    assert!(!pallette.is_empty());
}

#[test]
fn test_pick_returns_a_model_from_the_pallette() {
    let mut rng = StdRng::seed_from_u64(3);
    let pallette = Pallette::generate(&mut rng, 4, 300);
    let query = Query::Random(RandomQuery::new(8));
    for _ in 0..50 {
        let model = pallette.pick(&query, 10, 20).expect("pallette is non-empty");
        assert!(pallette.models().contains(model));
    }
}

#[test]
fn test_empty_pallette_pick_fails() {
    let pallette = Pallette::new(vec![]);
    let query = Query::Random(RandomQuery::new(8));
    assert!(pallette.pick(&query, 0, 0).is_err());
}
