//! Scene types produced by an ASE import.
//!
//! A `Scene` is the complete, read-only result of one parse pass: the
//! material slot table in file order, the materials this import created,
//! the derived meshes and every diagnostic reported along the way.

use glam::{Vec3, Vec4};
use serde::Serialize;

use crate::diagnostics::Diagnostics;
use crate::mesh::{Bounds, Mesh};
use crate::texture::TextureBinding;

/// One entry of the file's material table.
///
/// A slot starts out as a single material and becomes a palette on the
/// first `*SUBMATERIAL` of its block. Palette index 0 holds the parent
/// material's name as a placeholder; indices 1.. are the real sub-materials.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum MaterialSlot {
    Single(String),
    Palette(Vec<String>),
}

impl MaterialSlot {
    /// Turn a single material into a palette, keeping its name at index 0.
    ///
    /// Palettes are left untouched.
    pub fn make_palette(&mut self) {
        if let MaterialSlot::Single(name) = self {
            let placeholder = std::mem::take(name);
            *self = MaterialSlot::Palette(vec![placeholder]);
        }
    }

    /// Append a sub-material name. Single slots are converted first.
    pub fn push_submaterial(&mut self, name: String) {
        self.make_palette();
        if let MaterialSlot::Palette(names) = self {
            names.push(name);
        }
    }

    pub fn is_palette(&self) -> bool {
        matches!(self, MaterialSlot::Palette(_))
    }

    /// Names a mesh referencing this slot gets attached, in order.
    pub fn attached_names(&self) -> &[String] {
        match self {
            MaterialSlot::Single(name) => std::slice::from_ref(name),
            MaterialSlot::Palette(names) => names.get(1..).unwrap_or(&[]),
        }
    }
}

/// A material created by this import.
///
/// Only materials that did not already exist in the registry get a
/// definition; reused ones are referenced by name alone.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Material {
    /// Material name as registered with the host
    pub name: String,

    /// Diffuse color (RGB from the file, alpha always 1)
    pub diffuse_color: Vec4,

    /// Specular color (RGB)
    pub specular_color: Vec3,

    /// Texture bindings in file order
    pub textures: Vec<TextureBinding>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse_color: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular_color: Vec3::ONE,
            textures: Vec::new(),
        }
    }
}

impl Material {
    /// Create a new material with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Check if this material has any textures.
    pub fn has_textures(&self) -> bool {
        !self.textures.is_empty()
    }
}

/// The result of importing one ASE file.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,

    /// Material table in file order, indexed by `*MATERIAL_REF`
    pub material_slots: Vec<MaterialSlot>,

    /// Materials created during this import
    pub materials: Vec<Material>,

    /// Valid meshes in file order
    pub meshes: Vec<Mesh>,

    /// Everything reported during the import
    pub diagnostics: Diagnostics,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Get a created material by name.
    pub fn get_material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Get a mesh by name (first match).
    pub fn get_mesh(&self, name: &str) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.name == name)
    }

    /// Get mesh count.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Get material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Get total triangle count across all meshes.
    pub fn total_triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    /// Compute the world-space bounding box of all meshes.
    pub fn world_bounds(&self) -> Bounds {
        self.meshes
            .iter()
            .map(|mesh| mesh.bounds.transformed(&mesh.transform))
            .fold(Bounds::empty(), |acc, b| acc.union(&b))
    }
}
