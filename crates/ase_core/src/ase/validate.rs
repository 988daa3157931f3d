//! Geometry validation run before a mesh is built.

use thiserror::Error;

use super::types::GeomObject;

/// Why an object's geometry was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("declared {declared} vertices, found {found}")]
    VertexCount { declared: usize, found: usize },

    #[error("declared {declared} faces, found {found}")]
    FaceCount { declared: usize, found: usize },

    #[error("face {face} references vertex {index}, but only {count} vertices exist")]
    IndexOutOfRange { face: usize, index: u32, count: usize },
}

/// Check declared counts and face indices.
///
/// An object with no geometry at all is valid (0 declared, 0 found).
pub fn validate_geometry(object: &GeomObject) -> Result<(), GeometryError> {
    if object.declared_vertex_count != object.vertices.len() {
        return Err(GeometryError::VertexCount {
            declared: object.declared_vertex_count,
            found: object.vertices.len(),
        });
    }

    if object.declared_face_count != object.faces.len() {
        return Err(GeometryError::FaceCount {
            declared: object.declared_face_count,
            found: object.faces.len(),
        });
    }

    let count = object.vertices.len();
    for (face, indices) in object.faces.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= count) {
            return Err(GeometryError::IndexOutOfRange { face, index, count });
        }
    }

    Ok(())
}
