//! Stamp bitmaps, grouping, composition strategies and providers

/// Pixel-level strategies combining two stamps into a new one
pub mod composer;
/// Cache-backed providers materializing composite stamp collections
pub mod provider;

use crate::io::error::Result;
use crate::query::select::Query;
use image::RgbaImage;
use std::sync::Arc;

/// Descriptive metadata attached to a stamp
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StampMetadata {
    /// Rarity weight influencing composition odds and projection density
    pub rarity: f64,
}

impl Default for StampMetadata {
    fn default() -> Self {
        Self { rarity: 1.0 }
    }
}

/// An immutable source bitmap plus metadata, the unit of composition
///
/// The pixel data is shared behind an [`Arc`], so cloning a stamp or reusing
/// an identical source bitmap never duplicates storage.
#[derive(Clone, Debug)]
pub struct Stamp {
    image: Arc<RgbaImage>,
    metadata: StampMetadata,
}

impl Stamp {
    /// Create a stamp owning a fresh bitmap
    pub fn new(image: RgbaImage, metadata: StampMetadata) -> Self {
        Self {
            image: Arc::new(image),
            metadata,
        }
    }

    /// Create a stamp over an already shared bitmap
    pub const fn from_shared(image: Arc<RgbaImage>, metadata: StampMetadata) -> Self {
        Self { image, metadata }
    }

    /// The shared pixel data
    pub const fn image(&self) -> &Arc<RgbaImage> {
        &self.image
    }

    /// Stamp width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Stamp height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel area of the stamp
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// The stamp's metadata
    pub const fn metadata(&self) -> &StampMetadata {
        &self.metadata
    }
}

/// Grouped stamp collection
///
/// Insertion order within a group is irrelevant; group boundaries matter to
/// composition, which pairs stamps drawn from the selected groups.
#[derive(Clone, Debug, Default)]
pub struct Stamps {
    groups: Vec<Vec<Stamp>>,
}

impl Stamps {
    /// Create a collection from explicit groups
    pub const fn new(groups: Vec<Vec<Stamp>>) -> Self {
        Self { groups }
    }

    /// Append one group
    pub fn push_group(&mut self, group: Vec<Stamp>) {
        self.groups.push(group);
    }

    /// Number of groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of stamps across all groups
    pub fn total(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// All stamps in a single flat sequence
    pub fn flatten(&self) -> Vec<Stamp> {
        self.groups.iter().flatten().cloned().collect()
    }

    /// Draw a sub-collection of `group_count` groups with `stamps_per_group`
    /// stamps each, picked (with replacement) by the supplied queries
    ///
    /// # Errors
    ///
    /// Returns an error when the collection has no groups or a selected group
    /// is empty.
    pub fn select(
        &self,
        group_count: usize,
        stamps_per_group: usize,
        group_query: &Query,
        stamp_query: &Query,
    ) -> Result<Self> {
        let mut groups = Vec::with_capacity(group_count);
        for _ in 0..group_count {
            let group = group_query.select(0, 0, &self.groups)?;
            let take = stamps_per_group.min(group.len());
            let mut selected = Vec::with_capacity(take);
            for _ in 0..take {
                selected.push(stamp_query.select(0, 0, group)?.clone());
            }
            groups.push(selected);
        }
        Ok(Self { groups })
    }
}
