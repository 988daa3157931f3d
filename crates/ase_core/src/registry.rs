//! Host-owned registry of named materials, textures and images.
//!
//! The parser never creates host objects itself. It asks the registry
//! whether a name already exists (when reuse is enabled) and otherwise
//! requests a new entry, keeping whatever name the registry assigns.

use std::collections::HashSet;

/// Lookup/creation capability supplied by the host.
pub trait AssetRegistry {
    /// Find an existing material, returning its name.
    fn find_material(&self, name: &str) -> Option<String>;

    /// Create a new material and return the name it was registered under.
    fn create_material(&mut self, name: &str) -> String;

    /// Find an existing texture, returning its name.
    fn find_texture(&self, name: &str) -> Option<String>;

    /// Create a new texture and return the name it was registered under.
    fn create_texture(&mut self, name: &str) -> String;

    /// Find an existing image, returning its name.
    fn find_image(&self, name: &str) -> Option<String>;

    /// Create a new image and return the name it was registered under.
    fn create_image(&mut self, name: &str) -> String;
}

/// Set of names where clashes get a `.001`, `.002`, ... suffix.
#[derive(Clone, Debug, Default)]
struct NameTable {
    names: HashSet<String>,
}

impl NameTable {
    fn find(&self, name: &str) -> Option<String> {
        self.names.get(name).cloned()
    }

    fn insert_unique(&mut self, name: &str) -> String {
        let mut candidate = name.to_string();
        let mut suffix = 1;
        while self.names.contains(&candidate) {
            candidate = format!("{}.{:03}", name, suffix);
            suffix += 1;
        }
        self.names.insert(candidate.clone());
        candidate
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

/// Registry kept entirely in memory.
///
/// Used when the host has no registry of its own; one instance per import
/// gives fully independent, repeatable results.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRegistry {
    materials: NameTable,
    textures: NameTable,
    images: NameTable,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

impl AssetRegistry for InMemoryRegistry {
    fn find_material(&self, name: &str) -> Option<String> {
        self.materials.find(name)
    }

    fn create_material(&mut self, name: &str) -> String {
        self.materials.insert_unique(name)
    }

    fn find_texture(&self, name: &str) -> Option<String> {
        self.textures.find(name)
    }

    fn create_texture(&mut self, name: &str) -> String {
        self.textures.insert_unique(name)
    }

    fn find_image(&self, name: &str) -> Option<String> {
        self.images.find(name)
    }

    fn create_image(&mut self, name: &str) -> String {
        self.images.insert_unique(name)
    }
}
