//! Loads grouped stamp bitmaps from a directory tree
//!
//! Each subdirectory of the stamp root is one group; PNG files directly in
//! the root form a group of their own. A group may carry a `meta.json` with a
//! rarity weight applied to every stamp in it. Identical source bitmaps are
//! deduplicated so they share pixel storage.

use crate::io::error::{GenerationError, Result};
use crate::stamp::{Stamp, StampMetadata, Stamps};
use image::RgbaImage;
use serde::Deserialize;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-group metadata sidecar file name
const GROUP_META_FILE: &str = "meta.json";

#[derive(Debug, Deserialize)]
struct GroupMeta {
    #[serde(default = "default_rarity")]
    rarity: f64,
}

const fn default_rarity() -> f64 {
    1.0
}

/// Loads stamps from a directory of group subdirectories
pub struct StampLoader {
    root: PathBuf,
}

impl StampLoader {
    /// Create a loader rooted at the given stamp directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load all groups under the root
    ///
    /// Zero-area images are skipped with a warning. File order within a group
    /// is sorted, so repeated loads produce the same collection.
    ///
    /// # Errors
    ///
    /// Returns an error when the root cannot be read, an image fails to
    /// decode, or no stamps are found at all.
    pub fn load(&self) -> Result<Stamps> {
        let mut shared: HashMap<u64, Arc<RgbaImage>> = HashMap::new();
        let mut stamps = Stamps::default();

        let mut group_dirs = Vec::new();
        let mut root_files = Vec::new();
        let entries = std::fs::read_dir(&self.root).map_err(|e| GenerationError::FileSystem {
            path: self.root.clone(),
            operation: "read stamp directory",
            source: e,
        })?;
        for entry in entries {
            let path = entry
                .map_err(|e| GenerationError::FileSystem {
                    path: self.root.clone(),
                    operation: "read stamp directory",
                    source: e,
                })?
                .path();
            if path.is_dir() {
                group_dirs.push(path);
            } else if is_png(&path) {
                root_files.push(path);
            }
        }
        group_dirs.sort();
        root_files.sort();

        if !root_files.is_empty() {
            let group = load_group(&root_files, StampMetadata::default(), &mut shared)?;
            if !group.is_empty() {
                stamps.push_group(group);
            }
        }

        for dir in &group_dirs {
            let metadata = read_group_meta(dir);
            let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
                .map_err(|e| GenerationError::FileSystem {
                    path: dir.clone(),
                    operation: "read stamp group",
                    source: e,
                })?
                .filter_map(std::result::Result::ok)
                .map(|entry| entry.path())
                .filter(|path| is_png(path))
                .collect();
            files.sort();

            let group = load_group(&files, metadata, &mut shared)?;
            if group.is_empty() {
                debug!(group = %dir.display(), "empty stamp group skipped");
            } else {
                stamps.push_group(group);
            }
        }

        if stamps.group_count() == 0 {
            return Err(GenerationError::InvalidParameter {
                parameter: "stamp_directory",
                value: self.root.display().to_string(),
                reason: "no PNG stamps found".to_string(),
            });
        }
        info!(
            groups = stamps.group_count(),
            total = stamps.total(),
            "loaded stamp pool"
        );
        Ok(stamps)
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("png")
}

fn read_group_meta(dir: &Path) -> StampMetadata {
    let meta_path = dir.join(GROUP_META_FILE);
    if !meta_path.exists() {
        return StampMetadata::default();
    }
    match std::fs::read_to_string(&meta_path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str::<GroupMeta>(&text).map_err(|e| e.to_string()))
    {
        Ok(meta) => StampMetadata {
            rarity: meta.rarity.max(0.0),
        },
        Err(error) => {
            warn!(path = %meta_path.display(), error, "unreadable group metadata, using defaults");
            StampMetadata::default()
        }
    }
}

fn load_group(
    files: &[PathBuf],
    metadata: StampMetadata,
    shared: &mut HashMap<u64, Arc<RgbaImage>>,
) -> Result<Vec<Stamp>> {
    let mut group = Vec::with_capacity(files.len());
    for path in files {
        let image = image::open(path)
            .map_err(|e| GenerationError::ImageLoad {
                path: path.clone(),
                source: e,
            })?
            .to_rgba8();
        if image.width() == 0 || image.height() == 0 {
            warn!(path = %path.display(), "zero-area stamp skipped");
            continue;
        }
        let key = content_key(&image);
        let bitmap = match shared.get(&key) {
            Some(existing) if **existing == image => Arc::clone(existing),
            _ => {
                let bitmap = Arc::new(image);
                shared.insert(key, Arc::clone(&bitmap));
                bitmap
            }
        };
        group.push(Stamp::from_shared(bitmap, metadata));
    }
    Ok(group)
}

// Content-addressable key so identical bitmaps share one allocation.
fn content_key(image: &RgbaImage) -> u64 {
    let mut hasher = DefaultHasher::new();
    image.width().hash(&mut hasher);
    image.height().hash(&mut hasher);
    image.as_raw().hash(&mut hasher);
    hasher.finish()
}
