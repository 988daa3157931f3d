//! Import options.
//!
//! Options are plain data so hosts can persist them; every field falls back
//! to its default when missing from a serialized form.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options controlling a single ASE import.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Convert smoothing groups to sharp edges
    pub convert_smoothgroups_to_sharp_edges: bool,

    /// Import split vertex-per-face normals
    pub import_split_normals: bool,

    /// Ask the registry for existing materials/textures/images before creating new ones
    pub reuse_existing_materials_and_textures: bool,

    /// Try to resolve `*BITMAP` paths on disk (slow)
    pub resolve_bitmap_files_on_disk: bool,

    /// Abort on the first malformed numeric field instead of reporting it
    pub strict: bool,

    /// Extra directory for relative bitmap paths
    pub bitmap_search_dir: Option<PathBuf>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            convert_smoothgroups_to_sharp_edges: true,
            import_split_normals: false,
            reuse_existing_materials_and_textures: true,
            resolve_bitmap_files_on_disk: false,
            strict: false,
            bitmap_search_dir: None,
        }
    }
}

impl ImportOptions {
    /// Set the bitmap search directory.
    pub fn with_bitmap_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bitmap_search_dir = Some(dir.into());
        self
    }
}
