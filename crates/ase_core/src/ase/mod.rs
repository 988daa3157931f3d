//! ASE (ASCII Scene Export) support.
//!
//! Parses `.ase` text into a [`Scene`](crate::scene::Scene) and derives a
//! final mesh for every valid geometry object.
//!
//! ## Recognized Tags
//!
//! - Materials: `*MATERIAL`, `*SUBMATERIAL`, `*MATERIAL_NAME`,
//!   `*MATERIAL_DIFFUSE`, `*MATERIAL_SPECULAR`, `*MAP_NAME`, `*BITMAP`
//! - Objects: `*GEOMOBJECT`, `*NODE_NAME`, `*TM_ROW0..3`, `*MATERIAL_REF`,
//!   `*WIREFRAME_COLOR`
//! - Geometry: `*MESH_NUMVERTEX`, `*MESH_NUMFACES`, `*MESH_VERTEX`,
//!   `*MESH_FACE` (with `*MESH_SMOOTHING` and `*MESH_MTLID`)
//! - Mapping: `*MESH_MAPPINGCHANNEL`, `*MESH_TVERT`, `*MESH_TFACE`
//! - Colors and normals: `*MESH_VERTCOL`, `*MESH_CFACE`,
//!   `*MESH_VERTEXNORMAL`
//!
//! Every other tag is skipped, as are blank lines and braces.
//!
//! # Example
//!
//! ```ignore
//! use ase_core::ase::load_ase_from_string;
//! use ase_core::ImportOptions;
//!
//! let scene = load_ase_from_string(content, "inline", &ImportOptions::default())?;
//! for mesh in &scene.meshes {
//!     println!("{}: {} triangles", mesh.name, mesh.triangle_count());
//! }
//! ```

mod derive;
mod loader;
mod materials;
mod parser;
mod smoothing;
mod tokenizer;
mod types;
mod uv;
mod validate;

pub use loader::*;
pub use materials::{resolve_materials, MaterialAssignment, MaterialRefError};
pub use parser::{AseParser, ParseError, ParseResult};
pub use smoothing::{apply_smoothing_groups, resolve_sharp_edges, SmoothingMismatch};
pub use tokenizer::{tokenize, LineReader, Tokens};
pub use types::{CloseReason, FaceRecord, GeomObject, SmoothingGroups, UvChannel, UNNAMED_MESH};
pub use uv::{build_uv_layer, uv_layer_name, UvSkip};
pub use validate::{validate_geometry, GeometryError};
