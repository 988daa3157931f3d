//! Texture bindings and on-disk bitmap resolution.
//!
//! ASE materials name a texture (`*MAP_NAME`) and a bitmap path (`*BITMAP`).
//! Bitmaps are only read for their dimensions here; decoding pixels is the
//! host's business.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Width and height of generated placeholder images.
pub const PLACEHOLDER_SIZE: u32 = 16;

/// Errors that can occur while reading a bitmap header.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Bitmap not found: {0}")]
    NotFound(String),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Where the image behind a texture comes from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ImageSource {
    /// A bitmap found on disk
    File {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    /// An image the registry already knew about
    Existing(String),

    /// A generated solid-colour stand-in
    Placeholder {
        name: String,
        width: u32,
        height: u32,
        color: [f32; 4],
    },
}

impl ImageSource {
    /// Create a 16x16 white placeholder.
    pub fn placeholder(name: impl Into<String>) -> Self {
        ImageSource::Placeholder {
            name: name.into(),
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Check if the image was resolved on disk.
    pub fn is_file(&self) -> bool {
        matches!(self, ImageSource::File { .. })
    }
}

/// A texture attached to a material.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextureBinding {
    /// Texture name as registered with the host
    pub texture: String,

    /// Image backing the texture
    pub image: ImageSource,
}

/// Cache of bitmap lookups for one import.
///
/// The same bitmap is commonly referenced by several materials, so each
/// resolved path is read once.
pub struct BitmapCache {
    /// Dimensions by resolved path
    sizes: HashMap<PathBuf, Option<(u32, u32)>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl BitmapCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            sizes: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            sizes: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Resolve a bitmap path and read its dimensions.
    ///
    /// Returns `None` if the bitmap cannot be found or read; the failure is
    /// logged at debug level since a missing bitmap just falls back to a
    /// placeholder.
    pub fn resolve(&mut self, path: &str) -> Option<ImageSource> {
        let full_path = self.resolve_path(path)?;

        let size = match self.sizes.get(&full_path) {
            Some(size) => *size,
            None => {
                let size = match bitmap_dimensions(&full_path) {
                    Ok(size) => Some(size),
                    Err(e) => {
                        log::debug!("Could not read bitmap {}: {}", full_path.display(), e);
                        None
                    }
                };
                self.sizes.insert(full_path.clone(), size);
                size
            }
        };

        size.map(|(width, height)| ImageSource::File {
            path: full_path,
            width,
            height,
        })
    }

    /// Get the number of cached paths.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Check if nothing has been looked up yet.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Resolve a path as given, then relative to the base directory.
    fn resolve_path(&self, path: &str) -> Option<PathBuf> {
        let path = Path::new(path);

        if path.is_file() {
            return Some(path.to_path_buf());
        }

        if path.is_absolute() {
            return None;
        }

        self.base_dir
            .as_ref()
            .map(|base| base.join(path))
            .filter(|joined| joined.is_file())
    }
}

impl Default for BitmapCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a bitmap header and return its dimensions.
fn bitmap_dimensions(path: &Path) -> TextureResult<(u32, u32)> {
    if !path.is_file() {
        return Err(TextureError::NotFound(path.display().to_string()));
    }
    let size = image::image_dimensions(path)?;
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_white_16() {
        let source = ImageSource::placeholder("textures/wall.tga");
        assert_eq!(
            source,
            ImageSource::Placeholder {
                name: "textures/wall.tga".to_string(),
                width: 16,
                height: 16,
                color: [1.0, 1.0, 1.0, 1.0],
            }
        );
        assert!(!source.is_file());
    }

    #[test]
    fn test_missing_bitmap_is_unresolved() {
        let mut cache = BitmapCache::new();
        assert!(cache.resolve("definitely/not/here.tga").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_resolve_relative_to_base_dir() {
        let dir = std::env::temp_dir().join("ase_core_bitmap_cache");
        std::fs::create_dir_all(&dir).unwrap();
        let image = image::RgbImage::new(4, 2);
        image.save(dir.join("wall.png")).unwrap();

        let mut cache = BitmapCache::with_base_dir(&dir);
        let source = cache.resolve("wall.png").expect("bitmap should resolve");
        assert_eq!(
            source,
            ImageSource::File {
                path: dir.join("wall.png"),
                width: 4,
                height: 2,
            }
        );
        assert_eq!(cache.len(), 1);

        // Second lookup is served from the cache
        assert!(cache.resolve("wall.png").is_some());
        assert_eq!(cache.len(), 1);
    }
}
