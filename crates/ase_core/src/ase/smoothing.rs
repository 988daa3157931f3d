//! Smoothing groups to sharp edges.
//!
//! An edge shared by exactly two faces is sharp when the faces have no
//! smoothing group in common. Boundary edges and edges shared by three or
//! more faces keep their default.

use thiserror::Error;

use super::types::SmoothingGroups;
use crate::mesh::Mesh;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{groups} smoothing records for {faces} faces")]
pub struct SmoothingMismatch {
    pub groups: usize,
    pub faces: usize,
}

/// Sharpness per edge, given the faces each edge touches.
pub fn resolve_sharp_edges(edge_faces: &[Vec<usize>], groups: &[SmoothingGroups]) -> Vec<bool> {
    edge_faces
        .iter()
        .map(|faces| match faces.as_slice() {
            [a, b] => match (groups.get(*a), groups.get(*b)) {
                (Some(ga), Some(gb)) => ga.is_disjoint(gb),
                _ => false,
            },
            _ => false,
        })
        .collect()
}

/// Mark sharp edges on `mesh`. Returns the number of sharp edges.
///
/// Needs exactly one smoothing record per face; otherwise the mesh is left
/// unchanged.
pub fn apply_smoothing_groups(
    mesh: &mut Mesh,
    groups: &[SmoothingGroups],
) -> Result<usize, SmoothingMismatch> {
    if groups.len() != mesh.triangle_count() {
        return Err(SmoothingMismatch {
            groups: groups.len(),
            faces: mesh.triangle_count(),
        });
    }

    let sharp = resolve_sharp_edges(&mesh.edge_faces(), groups);
    for (edge, is_sharp) in mesh.edges.iter_mut().zip(sharp) {
        edge.sharp = is_sharp;
    }
    Ok(mesh.sharp_edge_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    fn quad() -> Mesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        Mesh::new("quad", positions, vec![[0, 1, 2], [1, 3, 2]], Mat4::IDENTITY)
    }

    fn groups(ids: &[u32]) -> SmoothingGroups {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_disjoint_groups_make_shared_edge_sharp() {
        let mut mesh = quad();
        let sharp = apply_smoothing_groups(&mut mesh, &[groups(&[1]), groups(&[2])]).unwrap();
        assert_eq!(sharp, 1);
        // Only the shared 1-2 diagonal
        assert!(mesh.edges[1].sharp);
        assert_eq!(mesh.edges[1].vertices, [1, 2]);
    }

    #[test]
    fn test_common_group_stays_smooth() {
        let mut mesh = quad();
        let sharp =
            apply_smoothing_groups(&mut mesh, &[groups(&[1, 3]), groups(&[3, 4])]).unwrap();
        assert_eq!(sharp, 0);
    }

    #[test]
    fn test_count_mismatch_leaves_mesh_untouched() {
        let mut mesh = quad();
        let err = apply_smoothing_groups(&mut mesh, &[groups(&[1])]).unwrap_err();
        assert_eq!(err, SmoothingMismatch { groups: 1, faces: 2 });
        assert_eq!(mesh.sharp_edge_count(), 0);
    }

    #[test]
    fn test_non_manifold_edges_are_left_alone() {
        let edge_faces = vec![vec![0], vec![0, 1, 2]];
        let sharp = resolve_sharp_edges(&edge_faces, &[groups(&[1]), groups(&[2]), groups(&[3])]);
        assert_eq!(sharp, vec![false, false]);
    }
}
