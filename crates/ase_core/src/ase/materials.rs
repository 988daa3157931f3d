//! Material assignment for a finished geometry object.

use thiserror::Error;

use crate::scene::MaterialSlot;

/// Materials attached to one mesh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialAssignment {
    /// Attached material names in order
    pub materials: Vec<String>,

    /// Per-face index into `materials`, only for palette slots
    pub face_indices: Option<Vec<u32>>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("material reference {index} out of range ({count} materials)")]
pub struct MaterialRefError {
    pub index: usize,
    pub count: usize,
}

/// Resolve a `*MATERIAL_REF` against the slot table.
///
/// A single slot attaches its material; a palette attaches its sub-materials
/// and keeps the per-face `*MESH_MTLID` values as indices, without
/// remapping.
pub fn resolve_materials(
    material_ref: Option<usize>,
    slots: &[MaterialSlot],
    submaterial_ids: &[u32],
) -> Result<MaterialAssignment, MaterialRefError> {
    let Some(index) = material_ref else {
        return Ok(MaterialAssignment::default());
    };

    let slot = slots.get(index).ok_or(MaterialRefError {
        index,
        count: slots.len(),
    })?;

    Ok(MaterialAssignment {
        materials: slot.attached_names().to_vec(),
        face_indices: slot.is_palette().then(|| submaterial_ids.to_vec()),
    })
}

impl MaterialAssignment {
    /// Faces whose index points past the attached list.
    pub fn dangling_faces(&self) -> usize {
        let count = self.materials.len();
        self.face_indices
            .as_ref()
            .map(|ids| ids.iter().filter(|&&id| id as usize >= count).count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> Vec<MaterialSlot> {
        vec![
            MaterialSlot::Single("Stone".to_string()),
            MaterialSlot::Palette(vec!["Multi".to_string(), "A".to_string(), "B".to_string()]),
        ]
    }

    #[test]
    fn test_no_reference() {
        let assignment = resolve_materials(None, &slots(), &[0]).unwrap();
        assert_eq!(assignment, MaterialAssignment::default());
    }

    #[test]
    fn test_single_slot() {
        let assignment = resolve_materials(Some(0), &slots(), &[3, 3]).unwrap();
        assert_eq!(assignment.materials, vec!["Stone".to_string()]);
        assert_eq!(assignment.face_indices, None);
    }

    #[test]
    fn test_palette_slot_keeps_ids() {
        let assignment = resolve_materials(Some(1), &slots(), &[0, 1, 0]).unwrap();
        assert_eq!(assignment.materials, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(assignment.face_indices, Some(vec![0, 1, 0]));
        assert_eq!(assignment.dangling_faces(), 0);

        let assignment = resolve_materials(Some(1), &slots(), &[0, 5]).unwrap();
        assert_eq!(assignment.dangling_faces(), 1);
    }

    #[test]
    fn test_one_based_ids_are_not_remapped() {
        let assignment = resolve_materials(Some(1), &slots(), &[1, 2, 1]).unwrap();
        assert_eq!(assignment.face_indices, Some(vec![1, 2, 1]));
        assert_eq!(assignment.dangling_faces(), 1);
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            resolve_materials(Some(2), &slots(), &[]),
            Err(MaterialRefError { index: 2, count: 2 })
        );
    }
}
