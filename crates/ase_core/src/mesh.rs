//! Final mesh representation handed to the host.
//!
//! A `Mesh` is derived from a validated ASE geometry object. It is a plain
//! triangle list with per-edge sharpness, per-loop UV layers and normals,
//! and material assignment; turning it into a renderable object is the
//! host's job.
//!
//! Loops are face corners: loop `f * 3 + c` is corner `c` of triangle `f`.

use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3};
use serde::Serialize;

/// Auto-smooth angle in radians applied to every imported mesh.
///
/// Larger than pi, so it never splits on its own; sharp edges from
/// smoothing groups do the real work.
pub const AUTO_SMOOTH_ANGLE: f32 = 4.0;

/// An undirected edge between two vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MeshEdge {
    /// Vertex indices, smaller first
    pub vertices: [u32; 2],

    /// Whether shading is split across this edge
    pub sharp: bool,
}

/// One named UV layer with a coordinate per loop.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UvLayer {
    pub name: String,
    pub uvs: Vec<Vec2>,
}

/// Axis-aligned bounds of a point set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Bounds containing nothing.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Compute bounds from a list of points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        points.into_iter().fold(Self::empty(), |acc, p| Self {
            min: acc.min.min(*p),
            max: acc.max.max(*p),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Smallest bounds containing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Transform all 8 corners and bound the result.
    pub fn transformed(&self, matrix: &Mat4) -> Bounds {
        if self.is_empty() {
            return *self;
        }
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let world: Vec<Vec3> = corners.iter().map(|c| matrix.transform_point3(*c)).collect();
        Bounds::from_points(&world)
    }
}

/// A renderer-ready mesh built from one ASE geometry object.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Mesh {
    /// Object name (`*NODE_NAME`)
    pub name: String,

    /// Vertex positions
    pub positions: Vec<Vec3>,

    /// Triangles as vertex index triples
    pub triangles: Vec<[u32; 3]>,

    /// Object transform from `*TM_ROW0..3`
    pub transform: Mat4,

    /// Unique edges in first-seen order
    pub edges: Vec<MeshEdge>,

    /// All faces are shaded smooth; sharp edges cut the shading
    pub smooth_shading: bool,

    /// Secondary, angle-based shading split
    pub auto_smooth_angle: f32,

    /// UV layers, one coordinate per loop
    pub uv_layers: Vec<UvLayer>,

    /// Custom split normals, one per loop
    pub custom_normals: Option<Vec<Vec3>>,

    /// Attached material names
    pub materials: Vec<String>,

    /// Per-face index into `materials` (palette slots only)
    pub face_material_indices: Option<Vec<u32>>,

    /// Axis-aligned bounding box of `positions`
    pub bounds: Bounds,
}

impl Mesh {
    /// Create a mesh from positions and triangles.
    ///
    /// Edges are built from the triangles; every edge starts out smooth.
    /// Triangle indices must be in range for `positions`.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
        transform: Mat4,
    ) -> Self {
        let bounds = Bounds::from_points(&positions);
        let edges = Self::build_edges(&triangles);
        Self {
            name: name.into(),
            positions,
            triangles,
            transform,
            edges,
            smooth_shading: true,
            auto_smooth_angle: AUTO_SMOOTH_ANGLE,
            uv_layers: Vec::new(),
            custom_normals: None,
            materials: Vec::new(),
            face_material_indices: None,
            bounds,
        }
    }

    /// Collect unique undirected edges in the order triangles introduce them.
    fn build_edges(triangles: &[[u32; 3]]) -> Vec<MeshEdge> {
        let mut seen: HashMap<(u32, u32), usize> = HashMap::with_capacity(triangles.len() * 2);
        let mut edges = Vec::with_capacity(triangles.len() * 2);

        for tri in triangles {
            for (a, b) in triangle_edges(tri) {
                let key = (a.min(b), a.max(b));
                if !seen.contains_key(&key) {
                    seen.insert(key, edges.len());
                    edges.push(MeshEdge {
                        vertices: [key.0, key.1],
                        sharp: false,
                    });
                }
            }
        }

        edges
    }

    /// For each edge (parallel to `edges`), the faces that use it.
    pub fn edge_faces(&self) -> Vec<Vec<usize>> {
        let lookup: HashMap<(u32, u32), usize> = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, e)| ((e.vertices[0], e.vertices[1]), i))
            .collect();

        let mut faces = vec![Vec::new(); self.edges.len()];
        for (face, tri) in self.triangles.iter().enumerate() {
            for (a, b) in triangle_edges(tri) {
                if let Some(&edge) = lookup.get(&(a.min(b), a.max(b))) {
                    // A degenerate triangle can hit the same edge twice
                    if faces[edge].last() != Some(&face) {
                        faces[edge].push(face);
                    }
                }
            }
        }
        faces
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of loops (face corners).
    pub fn loop_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Get the number of edges flagged sharp.
    pub fn sharp_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.sharp).count()
    }

    /// Find a UV layer by name.
    pub fn uv_layer(&self, name: &str) -> Option<&UvLayer> {
        self.uv_layers.iter().find(|l| l.name == name)
    }

    /// Check if the mesh has custom normals.
    pub fn has_custom_normals(&self) -> bool {
        self.custom_normals.is_some()
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vec3 {
        self.bounds.centroid()
    }
}

fn triangle_edges(tri: &[u32; 3]) -> [(u32, u32); 3] {
    [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        // Two triangles sharing the 1-2 diagonal
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        Mesh::new("quad", positions, vec![[0, 1, 2], [1, 3, 2]], Mat4::IDENTITY)
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.loop_count(), 6);
        assert!(mesh.smooth_shading);
        assert_eq!(mesh.auto_smooth_angle, AUTO_SMOOTH_ANGLE);
        assert!(!mesh.has_custom_normals());
    }

    #[test]
    fn test_edges_are_unique_and_ordered() {
        let mesh = quad();
        let vertices: Vec<[u32; 2]> = mesh.edges.iter().map(|e| e.vertices).collect();
        assert_eq!(vertices, vec![[0, 1], [1, 2], [0, 2], [1, 3], [2, 3]]);
        assert_eq!(mesh.sharp_edge_count(), 0);
    }

    #[test]
    fn test_edge_faces() {
        let mesh = quad();
        let faces = mesh.edge_faces();
        // The shared diagonal is the second edge
        assert_eq!(faces[1], vec![0, 1]);
        assert_eq!(faces[0], vec![0]);
        assert_eq!(faces[4], vec![1]);
    }

    #[test]
    fn test_bounds_computation() {
        let positions = vec![
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];
        let mesh = Mesh::new("tri", positions, vec![[0, 1, 2]], Mat4::IDENTITY);

        assert_eq!(mesh.bounds.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(mesh.bounds.max, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(mesh.center(), Vec3::new(1.5, 1.5, 1.5));
    }

    #[test]
    fn test_empty_bounds() {
        let bounds = Bounds::from_points(&Vec::<Vec3>::new());
        assert!(bounds.is_empty());
        assert!(bounds.transformed(&Mat4::from_scale(Vec3::splat(2.0))).is_empty());
    }
}
