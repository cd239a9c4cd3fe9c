//! Randomized selection queries over candidate sequences
//!
//! A query instance is created once per generation run and shared across all
//! worker threads; internal randomness sits behind a mutex so shared
//! references stay usable concurrently. Recreating queries per projection
//! would destroy the spatial coherence the formula side provides.

use crate::io::error::{GenerationError, Result};
use crate::query::formula::{BinaryFormula, BinaryValue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Uniform pick from a candidate sequence, ignoring coordinates
#[derive(Debug)]
pub struct RandomQuery {
    rng: Mutex<StdRng>,
}

impl RandomQuery {
    /// Create a query seeded for reproducible picks
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Pick one candidate uniformly at random
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::EmptyInput`] when `candidates` is empty.
    pub fn select<'a, T>(&self, candidates: &'a [T]) -> Result<&'a T> {
        if candidates.is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        let index = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_range(0..candidates.len());
        candidates.get(index).ok_or(GenerationError::EmptyInput)
    }
}

/// Biased coin returning one with a fixed probability
///
/// Callers branch on the sampled value rather than receiving a candidate
/// directly.
#[derive(Debug)]
pub struct BinaryQuery {
    probability: f64,
    rng: Mutex<StdRng>,
}

impl BinaryQuery {
    /// Create a coin with the given probability of one, clamped to [0, 1]
    pub fn new(probability: f64, seed: u64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Sample the coin
    pub fn sample(&self) -> BinaryValue {
        let roll = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random::<f64>();
        if roll < self.probability {
            BinaryValue::One
        } else {
            BinaryValue::Zero
        }
    }
}

/// Coordinate-dependent selection partitioned by a spatial formula
///
/// The formula splits the canvas into two regions. When the internal coin
/// fires, picks on the one side are biased toward the front half of the
/// candidate sequence and picks on the zero side toward the back half;
/// otherwise the pick is uniform. Nearby coordinates on the same side of the
/// curve therefore share a statistical bias, which is what produces visually
/// coherent regions instead of uniform noise.
#[derive(Debug)]
pub struct XYFormulaQuery {
    random: RandomQuery,
    binary: BinaryQuery,
    formula: BinaryFormula,
}

impl XYFormulaQuery {
    /// Create a formula-partitioned query
    pub const fn new(random: RandomQuery, binary: BinaryQuery, formula: BinaryFormula) -> Self {
        Self {
            random,
            binary,
            formula,
        }
    }

    /// Pick one candidate, biased by the formula's value at (x, y)
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::EmptyInput`] when `candidates` is empty.
    pub fn select<'a, T>(&self, x: i64, y: i64, candidates: &'a [T]) -> Result<&'a T> {
        if candidates.is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        if candidates.len() < 2 || !self.binary.sample().is_one() {
            return self.random.select(candidates);
        }
        let half = candidates.len().div_ceil(2);
        let biased = match self.formula.evaluate(x, y) {
            BinaryValue::One => candidates.get(..half),
            BinaryValue::Zero => candidates.get(half..),
        };
        self.random.select(biased.unwrap_or(candidates))
    }

    /// The underlying spatial formula, exposed for spine rendering
    pub const fn formula(&self) -> &BinaryFormula {
        &self.formula
    }
}

/// Closed set of selection queries
#[derive(Debug)]
pub enum Query {
    /// Coordinate-ignoring uniform pick
    Random(RandomQuery),
    /// Coordinate-ignoring biased coin; picks the first candidate on one and
    /// the last on zero
    Binary(BinaryQuery),
    /// Formula-partitioned coordinate-dependent pick
    XYFormula(XYFormulaQuery),
}

impl Query {
    /// Pick one candidate for the given canvas coordinate
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::EmptyInput`] when `candidates` is empty.
    pub fn select<'a, T>(&self, x: i64, y: i64, candidates: &'a [T]) -> Result<&'a T> {
        match self {
            Self::Random(query) => query.select(candidates),
            Self::Binary(query) => {
                let picked = if query.sample().is_one() {
                    candidates.first()
                } else {
                    candidates.last()
                };
                picked.ok_or(GenerationError::EmptyInput)
            }
            Self::XYFormula(query) => query.select(x, y, candidates),
        }
    }

    /// The spatial formula backing this query, if any
    pub const fn formula(&self) -> Option<&BinaryFormula> {
        match self {
            Self::XYFormula(query) => Some(query.formula()),
            Self::Random(_) | Self::Binary(_) => None,
        }
    }
}
