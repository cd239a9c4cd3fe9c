//! Spatial two-valued formulas that bias selection across the canvas
//!
//! A formula maps a canvas coordinate to one of two values. Leaf formulas are
//! sampled sine waves with parameters fixed at construction, so repeated
//! evaluation over a run stays spatially coherent. Compound formulas fold
//! several waves with an inverting rule, producing interference bands rather
//! than a plain override.

use crate::io::configuration::{
    MAX_FORMULA_WAVES, SINE_MAX_AMPLITUDE_FRACTION, SINE_MAX_WAVELENGTH,
    SINE_MIN_AMPLITUDE_FRACTION, SINE_MIN_WAVELENGTH,
};
use crate::io::error::{Result, invalid_parameter};
use rand::Rng;
use rand::rngs::StdRng;

/// One of the two values a formula can take at a coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryValue {
    /// The zero side of the formula's curve
    Zero,
    /// The one side of the formula's curve
    One,
}

impl BinaryValue {
    /// Flip to the opposite value
    pub const fn invert(self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
        }
    }

    /// True when the value is [`BinaryValue::One`]
    pub const fn is_one(self) -> bool {
        matches!(self, Self::One)
    }
}

/// Sampled sine wave separating the canvas into two regions
///
/// Evaluates to one exactly when
/// `y > sin(radians(x / wavelength) + phase) * amplitude + offset`.
#[derive(Clone, Debug)]
pub struct SineWave {
    wavelength: f64,
    phase: f64,
    amplitude: f64,
    offset: f64,
}

impl SineWave {
    /// Create a wave with explicit parameters
    pub const fn new(wavelength: f64, phase: f64, amplitude: f64, offset: f64) -> Self {
        Self {
            wavelength,
            phase,
            amplitude,
            offset,
        }
    }

    /// Create a wave with randomized parameters scaled to the canvas height
    pub fn random(rng: &mut StdRng, canvas_height: u32) -> Self {
        let height = f64::from(canvas_height.max(1));
        Self {
            wavelength: rng.random_range(SINE_MIN_WAVELENGTH..SINE_MAX_WAVELENGTH),
            phase: rng.random_range(0.0..std::f64::consts::TAU),
            amplitude: rng.random_range(
                height * SINE_MIN_AMPLITUDE_FRACTION..height * SINE_MAX_AMPLITUDE_FRACTION,
            ),
            offset: rng.random_range(0.0..height),
        }
    }

    fn evaluate(&self, x: i64, y: i64) -> BinaryValue {
        let angle = (x as f64 / self.wavelength).to_radians() + self.phase;
        let threshold = angle.sin() * self.amplitude + self.offset;
        if (y as f64) > threshold {
            BinaryValue::One
        } else {
            BinaryValue::Zero
        }
    }
}

/// Closed set of spatial formulas
#[derive(Clone, Debug)]
pub enum BinaryFormula {
    /// A single sine wave
    Sine(SineWave),
    /// Several formulas folded with the reversing rule
    Compound(ReversingCompound),
}

impl BinaryFormula {
    /// Evaluate the formula at a canvas coordinate
    ///
    /// Pure and side-effect free; safe to call concurrently on a shared
    /// instance.
    pub fn evaluate(&self, x: i64, y: i64) -> BinaryValue {
        match self {
            Self::Sine(wave) => wave.evaluate(x, y),
            Self::Compound(compound) => compound.evaluate(x, y),
        }
    }

    /// Build a compound of 1..=[`MAX_FORMULA_WAVES`] random sine waves
    ///
    /// # Errors
    ///
    /// Does not fail in practice; the error path exists because the compound
    /// constructor rejects empty input.
    pub fn random_compound(rng: &mut StdRng, canvas_height: u32) -> Result<Self> {
        let count = rng.random_range(1..=MAX_FORMULA_WAVES);
        let waves = (0..count)
            .map(|_| Self::Sine(SineWave::random(rng, canvas_height)))
            .collect();
        Ok(Self::Compound(ReversingCompound::new(waves)?))
    }
}

/// Left-to-right fold of formulas where each subsequent one-valued formula
/// inverts the running result
///
/// The fold is an exclusive-or, not an override: stacking waves produces
/// interference bands, and composition order matters.
#[derive(Clone, Debug)]
pub struct ReversingCompound {
    formulas: Vec<BinaryFormula>,
}

impl ReversingCompound {
    /// Create a compound from the given sub-formulas
    ///
    /// # Errors
    ///
    /// Returns an error if `formulas` is empty. A single formula behaves
    /// identically to that formula alone.
    pub fn new(formulas: Vec<BinaryFormula>) -> Result<Self> {
        if formulas.is_empty() {
            return Err(invalid_parameter(
                "formulas",
                &"[]",
                &"a compound formula requires at least one sub-formula",
            ));
        }
        Ok(Self { formulas })
    }

    fn evaluate(&self, x: i64, y: i64) -> BinaryValue {
        let mut iter = self.formulas.iter();
        let mut accumulated = iter
            .next()
            .map_or(BinaryValue::Zero, |formula| formula.evaluate(x, y));
        for formula in iter {
            if formula.evaluate(x, y).is_one() {
                accumulated = accumulated.invert();
            }
        }
        accumulated
    }
}
