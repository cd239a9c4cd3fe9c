//! Queryable, cache-backed stamp collections

use crate::io::error::{GenerationError, Result};
use crate::stamp::composer::ComposerStrategy;
use crate::stamp::{Stamp, Stamps};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// A queryable collection of stamps backing projection generation
pub trait StampProvider: Send + Sync {
    /// All stamps the provider currently offers
    ///
    /// # Errors
    ///
    /// Returns an error when materializing the collection fails.
    fn stamps(&self) -> Result<Vec<Stamp>>;

    /// Number of stamps the provider offers
    fn size(&self) -> usize {
        self.stamps().map_or(0, |stamps| stamps.len())
    }

    /// Drop any memoized composites
    ///
    /// Only valid while no generation run is in flight; callers must
    /// serialize against running generations.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::CacheState`] when a run is active.
    fn clear_caches(&self) -> Result<()>;
}

impl StampProvider for Stamps {
    fn stamps(&self) -> Result<Vec<Stamp>> {
        Ok(self.flatten())
    }

    fn size(&self) -> usize {
        self.total()
    }

    fn clear_caches(&self) -> Result<()> {
        Ok(())
    }
}

/// Provider wrapping a base collection with a composer strategy
///
/// Composites are materialized lazily on first access and memoized, so
/// repeated runs with `retain_stamps` reuse the same expansion. Pair
/// selection is seeded at construction, which keeps the expansion
/// reproducible across cache clears.
pub struct CompositeStamps {
    base: Box<dyn StampProvider>,
    strategy: ComposerStrategy,
    seed: u64,
    cache: Mutex<Option<Vec<Stamp>>>,
    in_flight: AtomicBool,
}

impl CompositeStamps {
    /// Wrap a provider with a composition strategy
    pub fn new(base: impl StampProvider + 'static, strategy: ComposerStrategy, seed: u64) -> Self {
        Self {
            base: Box::new(base),
            strategy,
            seed,
            cache: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Mark whether a generation run currently uses this provider
    ///
    /// While marked, [`StampProvider::clear_caches`] fails defensively
    /// instead of pulling stamps out from under the workers.
    pub fn mark_in_flight(&self, active: bool) {
        self.in_flight.store(active, Ordering::SeqCst);
    }
}

impl StampProvider for CompositeStamps {
    fn stamps(&self) -> Result<Vec<Stamp>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(stamps) = cache.as_ref() {
            return Ok(stamps.clone());
        }
        let base = self.base.stamps()?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let combined = self.strategy.apply(base, &mut rng);
        debug!(
            strategy = ?self.strategy,
            total = combined.len(),
            "materialized composite stamps"
        );
        *cache = Some(combined.clone());
        Ok(combined)
    }

    fn clear_caches(&self) -> Result<()> {
        if self.in_flight.load(Ordering::SeqCst) {
            return Err(GenerationError::CacheState {
                reason: "clear_caches called while a generation run is in flight".to_string(),
            });
        }
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        *cache = None;
        drop(cache);
        self.base.clear_caches()
    }
}
