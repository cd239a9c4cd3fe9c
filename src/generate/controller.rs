//! Orchestrates one full image-generation run
//!
//! The controller keeps the retained pieces of a run (pallette, stamp
//! provider, selection queries) as an explicit [`RunState`] value. A run
//! builds a candidate state, paints with it, and commits it only on success;
//! a cancelled run discards the candidate and keeps the previous state, so
//! retained fields never reflect a half-completed run.

use crate::color::{ColorModel, Pallette};
use crate::io::configuration::{
    DEFAULT_STAMP_SIZE, MAX_COMPOSITE_ITERATIONS, PROJECTION_CAP_FACTOR, Preferences,
};
use crate::io::error::{GenerationError, Result, invalid_parameter};
use crate::io::progress::ProgressListener;
use crate::paint::CancellationToken;
use crate::paint::canvas::{Painting, render_spine};
use crate::paint::generator::ProjectionGenerator;
use crate::query::formula::BinaryFormula;
use crate::query::select::{BinaryQuery, Query, RandomQuery, XYFormulaQuery};
use crate::stamp::composer::ComposerStrategy;
use crate::stamp::provider::{CompositeStamps, StampProvider};
use crate::stamp::{Stamp, Stamps};
use image::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// The retained state of a generation run
///
/// Every field is independently reusable across runs via the controller's
/// retain flags. Cloning is cheap; the heavy pieces sit behind [`Arc`]s.
#[derive(Clone)]
pub struct RunState {
    /// Color models projections draw tints from
    pub pallette: Arc<Pallette>,
    /// Background fill of the canvas
    pub background: ColorModel,
    /// Composite stamp provider feeding the projection generator
    pub stamps: Arc<CompositeStamps>,
    /// Selects which stamp to project at a coordinate
    pub stamp_query: Arc<Query>,
    /// Selects which color model tints a projection
    pub color_model_query: Arc<Query>,
    /// Selects the tint color within the chosen model
    pub color_query: Arc<Query>,
}

/// Orchestrates generation runs and the state retained between them
pub struct GenerationController {
    preferences: Preferences,
    loaded: Stamps,
    retain_colors: bool,
    retain_stamps: bool,
    retain_spine: bool,
    rng: StdRng,
    retained: Option<RunState>,
}

impl GenerationController {
    /// Create a controller over a loaded stamp pool
    ///
    /// Without an explicit seed the run sequence is randomized from entropy;
    /// with one, the full sequence of generated images is reproducible.
    pub fn new(loaded: Stamps, preferences: Preferences, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            preferences,
            loaded,
            retain_colors: false,
            retain_stamps: false,
            retain_spine: false,
            rng: StdRng::seed_from_u64(seed),
            retained: None,
        }
    }

    /// Reuse the pallette and background across subsequent runs
    pub fn set_retain_colors(&mut self, retain: bool) {
        self.retain_colors = retain;
    }

    /// Reuse the composite stamp provider across subsequent runs
    pub fn set_retain_stamps(&mut self, retain: bool) {
        self.retain_stamps = retain;
    }

    /// Reuse the three selection queries across subsequent runs
    pub fn set_retain_spine(&mut self, retain: bool) {
        self.retain_spine = retain;
    }

    /// The preference snapshot this controller runs with
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// The state retained from the last successful run, if any
    pub fn retained_state(&self) -> Option<&RunState> {
        self.retained.as_ref()
    }

    /// Drop memoized composite stamps
    ///
    /// # Errors
    ///
    /// Returns an error when a generation run is in flight.
    pub fn clear_caches(&self) -> Result<()> {
        info!("clearing caches");
        if let Some(state) = &self.retained {
            state.stamps.clear_caches()?;
        }
        Ok(())
    }

    /// Generate one image, or `None` when the run was cancelled
    ///
    /// On cancellation the retained state is left exactly as it was before
    /// the run started and no partial canvas is exposed.
    ///
    /// # Errors
    ///
    /// Returns an error when stamp selection, composition or painting fails
    /// for a non-cancellation reason.
    pub fn generate_image(
        &mut self,
        listener: &dyn ProgressListener,
        token: &CancellationToken,
    ) -> Result<Option<RgbaImage>> {
        let start = Instant::now();
        info!("starting image generation");
        let preferences = self.preferences;

        let state = self.prepare_state()?;
        if token.is_cancelled() {
            info!("cancelled before painting; previous state kept");
            return Ok(None);
        }

        if preferences.spine_mode {
            warn!("spine mode: rendering formula visualization");
            let Some(formula) = state.color_model_query.formula() else {
                return Err(invalid_parameter(
                    "color_model_query",
                    &"non-formula query",
                    &"spine mode requires a formula-backed query",
                ));
            };
            let image = render_spine(formula, preferences.width, preferences.height);
            self.retained = Some(state);
            return Ok(Some(image));
        }

        state.stamps.mark_in_flight(true);
        let outcome = self.paint_projections(&state, listener, token);
        state.stamps.mark_in_flight(false);

        match outcome? {
            Some(image) => {
                info!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "image generation completed"
                );
                self.retained = Some(state);
                Ok(Some(image))
            }
            None => {
                listener.clear();
                info!("painting cancelled; previous state kept");
                Ok(None)
            }
        }
    }

    fn paint_projections(
        &mut self,
        state: &RunState,
        listener: &dyn ProgressListener,
        token: &CancellationToken,
    ) -> Result<Option<RgbaImage>> {
        let preferences = self.preferences;
        let stamps = state.stamps.stamps()?;
        let projections =
            adapt_projection_count(preferences.base_projection_count(), &stamps);
        info!(projections, stamps = stamps.len(), "starting painting");
        listener.begin(projections as u64);

        let generator = ProjectionGenerator::new(
            preferences.width,
            preferences.height,
            stamps,
            Arc::clone(&state.pallette),
            self.rng.random(),
        );
        let painting = Painting::new(
            preferences.width,
            preferences.height,
            &state.background,
            token.clone(),
        );
        painting.start_painting()?;
        dispatch_projections(&generator, &painting, state, projections, listener, token);

        match painting.stop_painting() {
            Ok(()) => {}
            Err(GenerationError::Cancelled) => return Ok(None),
            Err(error) => return Err(error),
        }
        match painting.get_image() {
            Ok(image) => Ok(Some(image)),
            Err(GenerationError::Cancelled) => Ok(None),
            Err(error) => Err(error),
        }
    }

    // Builds the candidate state for one run, reusing retained pieces per the
    // retain flags. Never mutates `self.retained`.
    fn prepare_state(&mut self) -> Result<RunState> {
        let retained = self.retained.clone();

        let stamps = match &retained {
            Some(state) if self.retain_stamps => {
                debug!("skip generating stamps");
                Arc::clone(&state.stamps)
            }
            _ => self.build_provider()?,
        };

        let (pallette, background) = match &retained {
            Some(state) if self.retain_colors => {
                debug!("skip generating color models");
                (Arc::clone(&state.pallette), state.background.clone())
            }
            _ => self.build_pallette()?,
        };

        let (stamp_query, color_model_query, color_query) = match &retained {
            Some(state) if self.retain_spine => {
                debug!("skip generating selection queries");
                (
                    Arc::clone(&state.stamp_query),
                    Arc::clone(&state.color_model_query),
                    Arc::clone(&state.color_query),
                )
            }
            _ => (
                Arc::new(self.build_query()?),
                Arc::new(self.build_query()?),
                Arc::new(self.build_query()?),
            ),
        };

        Ok(RunState {
            pallette,
            background,
            stamps,
            stamp_query,
            color_model_query,
            color_query,
        })
    }

    fn build_provider(&mut self) -> Result<Arc<CompositeStamps>> {
        info!("generating stamps");
        let preferences = self.preferences;
        let group_query = Query::Random(RandomQuery::new(self.rng.random()));
        let stamp_query = Query::Random(RandomQuery::new(self.rng.random()));
        let selected = self.loaded.select(
            preferences.stamp_group_count,
            preferences.stamps_per_group,
            &group_query,
            &stamp_query,
        )?;

        let intersection = CompositeStamps::new(
            selected,
            ComposerStrategy::Intersection {
                iterations: self.rng.random_range(0..MAX_COMPOSITE_ITERATIONS),
            },
            self.rng.random(),
        );
        let merged = CompositeStamps::new(
            intersection,
            ComposerStrategy::Merge {
                iterations: self.rng.random_range(0..MAX_COMPOSITE_ITERATIONS),
            },
            self.rng.random(),
        );
        Ok(Arc::new(merged))
    }

    fn build_pallette(&mut self) -> Result<(Arc<Pallette>, ColorModel)> {
        info!("generating color models");
        let preferences = self.preferences;
        let pallette = Pallette::generate(
            &mut self.rng,
            preferences.color_model_count,
            preferences.height,
        );
        let chooser = Query::Random(RandomQuery::new(self.rng.random()));
        let background = pallette.pick(&chooser, 0, 0)?.clone();
        Ok((Arc::new(pallette), background))
    }

    fn build_query(&mut self) -> Result<Query> {
        let formula = BinaryFormula::random_compound(&mut self.rng, self.preferences.height)?;
        Ok(Query::XYFormula(XYFormulaQuery::new(
            RandomQuery::new(self.rng.random()),
            BinaryQuery::new(self.rng.random::<f64>(), self.rng.random()),
            formula,
        )))
    }
}

/// Adjust the base projection estimate for the actual stamp sizes
///
/// Smaller-than-reference stamps push the count up proportionally to their
/// rarity weight; the result is capped at [`PROJECTION_CAP_FACTOR`] times the
/// base estimate so tiny stamps cannot cause runaway projection counts.
pub fn adapt_projection_count(base: usize, stamps: &[Stamp]) -> usize {
    if base == 0 || stamps.is_empty() {
        return base;
    }
    let reference_area = f64::from(DEFAULT_STAMP_SIZE * DEFAULT_STAMP_SIZE);
    let affection = base as f64 / stamps.len() as f64;
    let mut adjusted = base as f64;
    for stamp in stamps {
        let area = stamp.area() as f64;
        if area <= 0.0 {
            continue;
        }
        let multiplier = reference_area / area;
        adjusted += (multiplier - 1.0) * affection * stamp.metadata().rarity;
    }
    let cap = (base * PROJECTION_CAP_FACTOR) as f64;
    adjusted.clamp(0.0, cap) as usize
}

// Fixed worker pool sized to hardware parallelism. The scope join is the
// completion barrier; the shared countdown hands out units of work. Workers
// observe the token between units, so cancellation stops not-yet-started work
// best-effort while the canvas drops anything already submitted.
fn dispatch_projections(
    generator: &ProjectionGenerator,
    painting: &Painting,
    state: &RunState,
    total: usize,
    listener: &dyn ProgressListener,
    token: &CancellationToken,
) {
    let workers = std::thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(total.max(1));
    let remaining = AtomicUsize::new(total);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                loop {
                    if token.is_cancelled() {
                        break;
                    }
                    let claimed = remaining
                        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                            count.checked_sub(1)
                        });
                    if claimed.is_err() {
                        break;
                    }
                    match generator.generate(
                        &state.stamp_query,
                        &state.color_model_query,
                        &state.color_query,
                    ) {
                        Ok(projection) => match painting.add_projection(&projection) {
                            Ok(()) => listener.increment(),
                            Err(error) => {
                                warn!(%error, "projection submission failed");
                                break;
                            }
                        },
                        Err(GenerationError::Cancelled) => break,
                        // Transient per-projection failures skip the
                        // projection rather than aborting the run
                        Err(error) => warn!(%error, "projection generation failed, skipping"),
                    }
                }
            });
        }
    });
}
