//! Builds one projection from the stamp pool, pallette and selection queries

use crate::color::Pallette;
use crate::io::configuration::{MAX_PROJECTION_SCALE, MIN_PROJECTION_SCALE};
use crate::io::error::{Result, composition_error};
use crate::paint::projection::Projection;
use crate::query::select::Query;
use crate::stamp::Stamp;
use image::Rgba;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::sync::{Mutex, PoisonError};

/// Stateless-per-call projection factory shared by all worker threads
///
/// The stamp pool and pallette are materialized once per run; only the
/// position/transform randomness lives here, behind a mutex so concurrent
/// callers stay safe.
pub struct ProjectionGenerator {
    width: u32,
    height: u32,
    stamps: Vec<Stamp>,
    pallette: Arc<Pallette>,
    rng: Mutex<StdRng>,
}

impl ProjectionGenerator {
    /// Create a generator for a canvas of the given dimensions
    pub fn new(
        width: u32,
        height: u32,
        stamps: Vec<Stamp>,
        pallette: Arc<Pallette>,
        seed: u64,
    ) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            stamps,
            pallette,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// The stamp pool this generator draws from
    pub fn stamps(&self) -> &[Stamp] {
        &self.stamps
    }

    /// Build one projection
    ///
    /// The position is randomized uniformly within canvas bounds,
    /// independently of the queries' formulas; scale and rotation come from
    /// the documented [`MIN_PROJECTION_SCALE`]..[`MAX_PROJECTION_SCALE`] and
    /// 0..360 degree ranges.
    ///
    /// # Errors
    ///
    /// Returns an error when a query has no candidates or the selected stamp
    /// has zero area.
    pub fn generate(
        &self,
        stamp_query: &Query,
        color_model_query: &Query,
        color_query: &Query,
    ) -> Result<Projection> {
        let (anchor_x, anchor_y, scale, rotation) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            (
                i64::from(rng.random_range(0..self.width)),
                i64::from(rng.random_range(0..self.height)),
                rng.random_range(MIN_PROJECTION_SCALE..MAX_PROJECTION_SCALE),
                rng.random_range(0.0..360.0),
            )
        };

        let stamp = stamp_query.select(anchor_x, anchor_y, &self.stamps)?;
        if stamp.area() == 0 {
            return Err(composition_error(
                "projection",
                &"selected stamp has zero area",
            ));
        }

        let model = color_model_query.select(anchor_x, anchor_y, self.pallette.models())?;
        let candidates = model.tint_candidates(anchor_x, anchor_y);
        let tint: Rgba<u8> = *color_query.select(anchor_x, anchor_y, &candidates)?;

        // Center the scaled stamp on the sampled anchor point
        let x = anchor_x - (scale * f64::from(stamp.width()) / 2.0).round() as i64;
        let y = anchor_y - (scale * f64::from(stamp.height()) / 2.0).round() as i64;

        Ok(Projection::new(
            Arc::clone(stamp.image()),
            x,
            y,
            scale,
            rotation,
            tint,
        ))
    }
}
