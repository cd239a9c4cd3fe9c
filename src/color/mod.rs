//! Color models and the pallette a run draws projection tints from

use crate::io::configuration::{CHANCE_OF_GRADIENT_COLOR, TINT_VARIANCE};
use crate::io::error::Result;
use crate::query::select::Query;
use image::Rgba;
use rand::Rng;
use rand::rngs::StdRng;

/// A color source, either flat or varying with canvas position
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColorModel {
    /// Single fixed color
    Plain(Rgba<u8>),
    /// Vertical gradient across the canvas height
    Gradient {
        /// Color at the top edge
        from: Rgba<u8>,
        /// Color at the bottom edge
        to: Rgba<u8>,
        /// Canvas height the gradient spans
        height: u32,
    },
}

impl ColorModel {
    /// The model's color at a canvas coordinate
    pub fn color_at(&self, _x: i64, y: i64) -> Rgba<u8> {
        match self {
            Self::Plain(color) => *color,
            Self::Gradient { from, to, height } => {
                let span = f64::from((*height).max(1));
                let t = (y as f64 / span).clamp(0.0, 1.0);
                Rgba([
                    lerp_channel(from.0[0], to.0[0], t),
                    lerp_channel(from.0[1], to.0[1], t),
                    lerp_channel(from.0[2], to.0[2], t),
                    lerp_channel(from.0[3], to.0[3], t),
                ])
            }
        }
    }

    /// Tint candidates handed to the color query at a projection's position
    ///
    /// The base color plus a lightened and a darkened variant, so the color
    /// query still has a spatially biased choice to make for plain models.
    pub fn tint_candidates(&self, x: i64, y: i64) -> [Rgba<u8>; 3] {
        let base = self.color_at(x, y);
        [
            base,
            shift_lightness(base, TINT_VARIANCE),
            shift_lightness(base, -TINT_VARIANCE),
        ]
    }

    /// Generate a random model, gradient-weighted per
    /// [`CHANCE_OF_GRADIENT_COLOR`]
    pub fn random(rng: &mut StdRng, canvas_height: u32) -> Self {
        if rng.random::<f64>() < CHANCE_OF_GRADIENT_COLOR {
            Self::Gradient {
                from: random_color(rng),
                to: random_color(rng),
                height: canvas_height,
            }
        } else {
            Self::Plain(random_color(rng))
        }
    }
}

fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as u8
}

fn shift_lightness(color: Rgba<u8>, amount: f64) -> Rgba<u8> {
    let shift = |channel: u8| -> u8 {
        let value = f64::from(channel);
        let shifted = if amount >= 0.0 {
            value + (255.0 - value) * amount
        } else {
            value * (1.0 + amount)
        };
        shifted.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        shift(color.0[0]),
        shift(color.0[1]),
        shift(color.0[2]),
        color.0[3],
    ])
}

fn random_color(rng: &mut StdRng) -> Rgba<u8> {
    Rgba([
        rng.random::<u8>(),
        rng.random::<u8>(),
        rng.random::<u8>(),
        255,
    ])
}

/// Ordered sequence of color models queried once per projection
#[derive(Clone, Debug, Default)]
pub struct Pallette {
    models: Vec<ColorModel>,
}

impl Pallette {
    /// Create a pallette from explicit models
    pub const fn new(models: Vec<ColorModel>) -> Self {
        Self { models }
    }

    /// Generate `count` random models for the given canvas height
    pub fn generate(rng: &mut StdRng, count: usize, canvas_height: u32) -> Self {
        let models = (0..count)
            .map(|_| ColorModel::random(rng, canvas_height))
            .collect();
        Self { models }
    }

    /// The ordered model sequence
    pub fn models(&self) -> &[ColorModel] {
        &self.models
    }

    /// Pick one model for the given coordinate
    ///
    /// # Errors
    ///
    /// Returns an error when the pallette is empty.
    pub fn pick(&self, query: &Query, x: i64, y: i64) -> Result<&ColorModel> {
        query.select(x, y, &self.models)
    }

    /// Number of models in the pallette
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// True when the pallette holds no models
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
