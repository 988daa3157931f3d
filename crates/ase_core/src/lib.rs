//! ASE Core - ASCII Scene Export parsing and mesh derivation.
//!
//! This crate provides:
//!
//! - **ASE support**: a line-oriented tokenizer and a streaming parser for
//!   `.ase` files (materials, sub-materials, geometry objects)
//! - **Mesh derivation**: validated meshes with sharp edges from smoothing
//!   groups, UV layers, split normals and sub-material assignment
//! - **Scene types**: `Scene`, `Mesh`, `MaterialSlot`, `Material`
//!
//! Creating host-native objects from the derived meshes is left to the
//! caller; the `AssetRegistry` trait is the only seam the parser reaches
//! through for material/texture/image deduplication.
//!
//! # Example
//!
//! ```ignore
//! use ase_core::{load_ase, ImportOptions};
//!
//! let scene = load_ase("model.ase", &ImportOptions::default())?;
//! println!("Loaded {} meshes, {} diagnostics",
//!     scene.mesh_count(),
//!     scene.diagnostics.len());
//! ```

pub mod ase;
pub mod config;
pub mod diagnostics;
pub mod mesh;
pub mod registry;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use ase::{
    load_ase, load_ase_from_reader, load_ase_from_string, load_ase_with_registry, LoadError,
    LoadResult, ParseError,
};
pub use config::ImportOptions;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use mesh::{Bounds, Mesh, MeshEdge, UvLayer};
pub use registry::{AssetRegistry, InMemoryRegistry};
pub use scene::{Material, MaterialSlot, Scene};
