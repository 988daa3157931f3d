//! Turn a closed geometry object into a final mesh.
//!
//! Order matters: validate, build the base mesh, then layer on smoothing,
//! split normals, UVs and materials. Only validation can drop the object;
//! every later step just skips its own feature.

use super::materials::resolve_materials;
use super::smoothing::apply_smoothing_groups;
use super::types::GeomObject;
use super::uv::build_uv_layers;
use super::validate::validate_geometry;
use crate::config::ImportOptions;
use crate::diagnostics::Diagnostics;
use crate::mesh::Mesh;
use crate::scene::MaterialSlot;

/// Build the final mesh for `object`, or `None` if its geometry is invalid.
pub fn build_mesh(
    object: GeomObject,
    slots: &[MaterialSlot],
    options: &ImportOptions,
    label: &str,
    diagnostics: &mut Diagnostics,
) -> Option<Mesh> {
    let name = object.name().to_string();

    if let Err(e) = validate_geometry(&object) {
        diagnostics.error(format!("{}: bad geometry, skipping mesh {} ({})", label, name, e));
        return None;
    }

    let transform = object.transform();
    let GeomObject {
        vertices,
        faces,
        smoothing_groups,
        submaterial_ids,
        uv_channels,
        vertex_normals,
        material_ref,
        ..
    } = object;

    let mut mesh = Mesh::new(name, vertices, faces, transform);

    if options.convert_smoothgroups_to_sharp_edges {
        match apply_smoothing_groups(&mut mesh, &smoothing_groups) {
            Ok(sharp) => log::trace!("{}: {} sharp edges", mesh.name, sharp),
            Err(e) => diagnostics.warning(format!(
                "{}: skipped smoothgroups in {} ({})",
                label, mesh.name, e
            )),
        }
    }

    if options.import_split_normals && !vertex_normals.is_empty() {
        if vertex_normals.len() == mesh.loop_count() {
            mesh.custom_normals = Some(vertex_normals);
        } else {
            diagnostics.warning(format!(
                "{}: skipped vertex normals in {} ({} normals for {} loops)",
                label,
                mesh.name,
                vertex_normals.len(),
                mesh.loop_count()
            ));
        }
    }

    mesh.uv_layers = build_uv_layers(&uv_channels, mesh.triangle_count(), label, diagnostics);

    match resolve_materials(material_ref, slots, &submaterial_ids) {
        Ok(assignment) => {
            let dangling = assignment.dangling_faces();
            if dangling > 0 {
                diagnostics.warning(format!(
                    "{}: {} faces of {} use sub-material ids beyond its {} materials",
                    label,
                    dangling,
                    mesh.name,
                    assignment.materials.len()
                ));
            }
            mesh.materials = assignment.materials;
            mesh.face_material_indices = assignment.face_indices;
        }
        Err(e) => diagnostics.error(format!(
            "{}: bad materials, skipping on {} ({})",
            label, mesh.name, e
        )),
    }

    Some(mesh)
}
