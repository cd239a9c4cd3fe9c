//! Generation constants and the per-run preference snapshot

// Canvas defaults
/// Default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 1600;
/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 1000;

// Projection density
/// Canvas area is divided by this to get the base projection count
pub const DEFAULT_STAMP_COUNT_DEMULTIPLIER: u32 = 4000;
/// Reference stamp side length the density adjustment is normalized against
pub const DEFAULT_STAMP_SIZE: u32 = 150;
/// The adjusted projection count never exceeds this multiple of the base count
pub const PROJECTION_CAP_FACTOR: usize = 3;

// Stamp selection and composition
/// Default number of stamp groups drawn per run
pub const DEFAULT_STAMP_GROUP_COUNT: usize = 4;
/// Default number of stamps drawn from each group
pub const DEFAULT_STAMPS_PER_GROUP: usize = 6;
/// Upper bound (exclusive) for the randomized composite pass count
pub const MAX_COMPOSITE_ITERATIONS: usize = 10;

// Color models
/// Default number of color models in a generated pallette
pub const DEFAULT_COLOR_MODEL_COUNT: usize = 5;
/// Probability that a generated color model is a gradient rather than plain
pub const CHANCE_OF_GRADIENT_COLOR: f64 = 0.7;
/// Relative lightness shift of the tint candidates handed to the color query
pub const TINT_VARIANCE: f64 = 0.15;

// Projection transforms
/// Minimum uniform scale applied to a projected stamp
pub const MIN_PROJECTION_SCALE: f64 = 0.5;
/// Maximum uniform scale applied to a projected stamp
pub const MAX_PROJECTION_SCALE: f64 = 1.5;

// Sine formula parameter ranges
/// Minimum wavelength divisor of a generated sine formula
pub const SINE_MIN_WAVELENGTH: f64 = 5.0;
/// Maximum wavelength divisor of a generated sine formula
pub const SINE_MAX_WAVELENGTH: f64 = 50.0;
/// Amplitude lower bound as a fraction of canvas height
pub const SINE_MIN_AMPLITUDE_FRACTION: f64 = 0.125;
/// Amplitude upper bound as a fraction of canvas height
pub const SINE_MAX_AMPLITUDE_FRACTION: f64 = 0.5;
/// Maximum number of sine waves folded into one compound formula
pub const MAX_FORMULA_WAVES: usize = 4;

// Spine mode rendering
/// Color painted where the formula evaluates to one
pub const SPINE_ONE_COLOR: [u8; 4] = [128, 128, 128, 255];
/// Color painted where the formula evaluates to zero
pub const SPINE_ZERO_COLOR: [u8; 4] = [64, 64, 64, 255];

/// Immutable per-run preference snapshot
///
/// Captured once before a generation run starts; the core never observes
/// preference changes mid-run.
#[derive(Clone, Copy, Debug)]
pub struct Preferences {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Number of color models generated into the pallette
    pub color_model_count: usize,
    /// Number of stamp groups drawn from the loaded pool
    pub stamp_group_count: usize,
    /// Number of stamps drawn from each selected group
    pub stamps_per_group: usize,
    /// Projection density divisor applied to the canvas area
    pub stamp_count_demultiplier: u32,
    /// Render the selection formula instead of painting projections
    pub spine_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            color_model_count: DEFAULT_COLOR_MODEL_COUNT,
            stamp_group_count: DEFAULT_STAMP_GROUP_COUNT,
            stamps_per_group: DEFAULT_STAMPS_PER_GROUP,
            stamp_count_demultiplier: DEFAULT_STAMP_COUNT_DEMULTIPLIER,
            spine_mode: false,
        }
    }
}

impl Preferences {
    /// Base projection estimate before stamp-size adjustment
    ///
    /// The area math is done in u64 so large canvases cannot overflow, and a
    /// zero demultiplier is treated as one rather than dividing by zero.
    pub const fn base_projection_count(&self) -> usize {
        let demultiplier = if self.stamp_count_demultiplier == 0 {
            1
        } else {
            self.stamp_count_demultiplier
        };
        (self.width as u64 * self.height as u64 / demultiplier as u64) as usize
    }
}
