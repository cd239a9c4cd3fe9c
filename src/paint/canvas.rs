//! The shared output canvas and its accept/seal protocol

use crate::color::ColorModel;
use crate::io::configuration::{SPINE_ONE_COLOR, SPINE_ZERO_COLOR};
use crate::io::error::{GenerationError, Result, invalid_parameter};
use crate::paint::CancellationToken;
use crate::paint::projection::Projection;
use crate::query::formula::BinaryFormula;
use image::{Rgba, RgbaImage};
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Lifecycle states of a painting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PaintingState {
    Created,
    Painting,
    Stopped,
    Cancelled,
}

/// The shared output canvas
///
/// Lifecycle: CREATED → PAINTING → STOPPED (success) or CANCELLED (failure).
/// Projection computation stays parallel; the canvas mutation itself is
/// serialized behind a single writer lock, so every successful
/// [`Painting::add_projection`] leaves the canvas fully applied and
/// consistent.
pub struct Painting {
    canvas: Mutex<RgbaImage>,
    state: Mutex<PaintingState>,
    token: CancellationToken,
}

impl Painting {
    /// Create a canvas of the given dimensions, filled from the background
    /// color model
    pub fn new(
        width: u32,
        height: u32,
        background: &ColorModel,
        token: CancellationToken,
    ) -> Self {
        let canvas = RgbaImage::from_fn(width, height, |x, y| {
            background.color_at(i64::from(x), i64::from(y))
        });
        Self {
            canvas: Mutex::new(canvas),
            state: Mutex::new(PaintingState::Created),
            token,
        }
    }

    /// Open the canvas for concurrent projection submission
    ///
    /// # Errors
    ///
    /// Returns an error unless the painting is freshly created.
    pub fn start_painting(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != PaintingState::Created {
            return Err(invalid_parameter(
                "painting_state",
                &format!("{state:?}"),
                &"start_painting requires a freshly created painting",
            ));
        }
        *state = PaintingState::Painting;
        Ok(())
    }

    /// Paint one projection onto the canvas
    ///
    /// Safe to call concurrently from many worker threads. Calls made after
    /// cancellation are silently dropped without touching the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error when called before [`Painting::start_painting`] or
    /// after [`Painting::stop_painting`].
    pub fn add_projection(&self, projection: &Projection) -> Result<()> {
        if self.token.is_cancelled() {
            return Ok(());
        }
        {
            let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            match *state {
                PaintingState::Painting => {}
                PaintingState::Cancelled => return Ok(()),
                other => {
                    return Err(invalid_parameter(
                        "painting_state",
                        &format!("{other:?}"),
                        &"add_projection requires an open painting",
                    ));
                }
            }
        }
        let mut canvas = self.canvas.lock().unwrap_or_else(PoisonError::into_inner);
        // Re-check under the writer lock so no write lands after cancellation
        if self.token.is_cancelled() {
            return Ok(());
        }
        projection.paint_to(&mut canvas);
        Ok(())
    }

    /// Seal the canvas after all submissions have completed
    ///
    /// The orchestrator joins its workers before calling this, so waiting for
    /// the writer lock is what remains of "block until in-flight projections
    /// commit".
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Cancelled`] when the run was cancelled
    /// first.
    pub fn stop_painting(&self) -> Result<()> {
        let canvas = self.canvas.lock().unwrap_or_else(PoisonError::into_inner);
        drop(canvas);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if self.token.is_cancelled() || *state == PaintingState::Cancelled {
            *state = PaintingState::Cancelled;
            return Err(GenerationError::Cancelled);
        }
        if *state != PaintingState::Painting {
            return Err(invalid_parameter(
                "painting_state",
                &format!("{state:?}"),
                &"stop_painting requires an open painting",
            ));
        }
        *state = PaintingState::Stopped;
        Ok(())
    }

    /// Reject all further canvas writes; idempotent, callable from any thread
    pub fn cancel(&self) {
        self.token.cancel();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != PaintingState::Cancelled {
            info!("painting cancelled");
        }
        *state = PaintingState::Cancelled;
    }

    /// Take the finished canvas; terminal read
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Cancelled`] when the painting was
    /// cancelled, or an error when it was never sealed.
    pub fn get_image(self) -> Result<RgbaImage> {
        let state = *self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match state {
            PaintingState::Stopped => Ok(self
                .canvas
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner)),
            PaintingState::Cancelled => Err(GenerationError::Cancelled),
            other => Err(invalid_parameter(
                "painting_state",
                &format!("{other:?}"),
                &"get_image requires a stopped painting",
            )),
        }
    }
}

/// Render a formula directly as a two-tone diagnostic image
///
/// Spine mode bypasses projection painting entirely; this is the alternate
/// terminal behavior of a generation run.
pub fn render_spine(formula: &BinaryFormula, width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if formula.evaluate(i64::from(x), i64::from(y)).is_one() {
            Rgba(SPINE_ONE_COLOR)
        } else {
            Rgba(SPINE_ZERO_COLOR)
        }
    })
}
