//! Raw geometry records, exactly as read from the file.
//!
//! Nothing in here is validated. Derivation into a [`Mesh`](crate::mesh::Mesh)
//! happens once the object is closed.

use std::collections::BTreeSet;
use std::num::ParseIntError;

use glam::{Mat4, Vec2, Vec3};

/// Name given to objects that never saw a `*NODE_NAME`.
pub const UNNAMED_MESH: &str = "unnamed mesh";

/// Set of smoothing group ids attached to one face.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmoothingGroups(BTreeSet<u32>);

impl SmoothingGroups {
    /// Parse a comma-separated smoothing field such as `1,4`.
    ///
    /// Empty entries stand for group 0, so a field of `","` is `{0}`.
    pub fn parse_field(field: &str) -> Result<Self, ParseIntError> {
        field
            .split(',')
            .map(|entry| if entry.is_empty() { Ok(0) } else { entry.parse() })
            .collect::<Result<BTreeSet<u32>, _>>()
            .map(SmoothingGroups)
    }

    /// Two faces share a smooth edge if they have a group in common.
    pub fn is_disjoint(&self, other: &SmoothingGroups) -> bool {
        self.0.is_disjoint(&other.0)
    }

    pub fn contains(&self, group: u32) -> bool {
        self.0.contains(&group)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl Default for SmoothingGroups {
    /// Faces without smoothing information belong to group 0.
    fn default() -> Self {
        SmoothingGroups(BTreeSet::from([0]))
    }
}

impl FromIterator<u32> for SmoothingGroups {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        SmoothingGroups(iter.into_iter().collect())
    }
}

/// One UV mapping channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UvChannel {
    /// `*MESH_TVERT` coordinates
    pub uv_vertices: Vec<Vec2>,

    /// `*MESH_TFACE` index triples into `uv_vertices`
    pub uv_faces: Vec<[u32; 3]>,
}

/// Everything from one `*MESH_FACE` line.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceRecord {
    pub vertices: [u32; 3],

    /// `*MESH_MTLID`, 0 when absent
    pub submaterial_id: u32,

    /// `None` when the smoothing field could not be located
    pub smoothing: Option<SmoothingGroups>,
}

/// Why an open geometry object was closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseReason {
    /// `*MATERIAL_REF` was read
    MaterialRef,

    /// `*WIREFRAME_COLOR` arrived without a material reference
    BlankMaterial,

    /// A new `*GEOMOBJECT` or end of input arrived first
    UndefinedMaterial,
}

/// A `*GEOMOBJECT` under construction.
#[derive(Clone, Debug, PartialEq)]
pub struct GeomObject {
    /// First `*NODE_NAME` seen, later ones are ignored
    pub name: Option<String>,

    /// `*TM_ROW0..3`, row-major
    pub tm_rows: [[f32; 4]; 4],

    pub declared_vertex_count: usize,
    pub declared_face_count: usize,

    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,

    /// Parallel to `faces` unless a face had an unreadable smoothing field
    pub smoothing_groups: Vec<SmoothingGroups>,

    /// Parallel to `faces`
    pub submaterial_ids: Vec<u32>,

    /// Always holds at least one channel
    pub uv_channels: Vec<UvChannel>,

    /// Vertex colors are read but not applied to the mesh
    pub vertex_colors: Vec<Vec3>,
    pub color_faces: Vec<[u32; 3]>,

    /// One per loop when split normals are imported
    pub vertex_normals: Vec<Vec3>,

    /// Index into the material slot table
    pub material_ref: Option<usize>,
}

impl Default for GeomObject {
    fn default() -> Self {
        Self {
            name: None,
            tm_rows: Mat4::IDENTITY.to_cols_array_2d(),
            declared_vertex_count: 0,
            declared_face_count: 0,
            vertices: Vec::new(),
            faces: Vec::new(),
            smoothing_groups: Vec::new(),
            submaterial_ids: Vec::new(),
            uv_channels: vec![UvChannel::default()],
            vertex_colors: Vec::new(),
            color_faces: Vec::new(),
            vertex_normals: Vec::new(),
            material_ref: None,
        }
    }
}

impl GeomObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// The object's name, or [`UNNAMED_MESH`].
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_MESH)
    }

    /// Set the name unless one was already set. Returns whether it took.
    pub fn set_name(&mut self, name: String) -> bool {
        if self.name.is_some() {
            return false;
        }
        self.name = Some(name);
        true
    }

    /// Overwrite the leading values of a transform row.
    pub fn set_transform_row(&mut self, row: usize, values: &[f32]) {
        if let Some(target) = self.tm_rows.get_mut(row) {
            for (dst, src) in target.iter_mut().zip(values) {
                *dst = *src;
            }
        }
    }

    /// The object transform as a glam matrix.
    ///
    /// ASE rows 0..2 are the basis vectors and row 3 the translation, which
    /// is exactly glam's column layout.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.tm_rows)
    }

    pub fn push_face(&mut self, face: FaceRecord) {
        self.faces.push(face.vertices);
        self.submaterial_ids.push(face.submaterial_id);
        if let Some(groups) = face.smoothing {
            self.smoothing_groups.push(groups);
        }
    }

    /// Channel that `*MESH_TVERT` and `*MESH_TFACE` currently write to.
    pub fn current_channel_mut(&mut self) -> &mut UvChannel {
        if self.uv_channels.is_empty() {
            self.uv_channels.push(UvChannel::default());
        }
        let last = self.uv_channels.len() - 1;
        &mut self.uv_channels[last]
    }

    /// Open a new UV channel (`*MESH_MAPPINGCHANNEL`).
    pub fn start_mapping_channel(&mut self) {
        self.uv_channels.push(UvChannel::default());
    }
}
