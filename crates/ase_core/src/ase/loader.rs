//! High-level ASE scene loading.
//!
//! Entry points for loading ASE content from a file, any buffered reader or
//! an in-memory string. Each load owns its own parser state; only the asset
//! registry may be shared with the host.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use thiserror::Error;

use super::parser::{AseParser, ParseError};
use super::tokenizer::{tokenize, LineReader};
use crate::config::ImportOptions;
use crate::registry::{AssetRegistry, InMemoryRegistry};
use crate::scene::Scene;

/// Errors that abort an ASE import.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load an ASE file with a fresh in-memory registry.
///
/// Relative bitmap paths are resolved against the file's directory unless
/// `options.bitmap_search_dir` says otherwise.
///
/// # Example
///
/// ```ignore
/// use ase_core::{load_ase, ImportOptions};
///
/// let scene = load_ase("ship.ase", &ImportOptions::default())?;
/// ```
pub fn load_ase<P: AsRef<Path>>(path: P, options: &ImportOptions) -> LoadResult<Scene> {
    let mut registry = InMemoryRegistry::new();
    load_ase_with_registry(path, options, &mut registry)
}

/// Load an ASE file, looking up and creating assets through `registry`.
pub fn load_ase_with_registry<P: AsRef<Path>>(
    path: P,
    options: &ImportOptions,
    registry: &mut dyn AssetRegistry,
) -> LoadResult<Scene> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");
    let label = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());

    let mut options = options.clone();
    if options.bitmap_search_dir.is_none() {
        options.bitmap_search_dir = path.parent().map(|p| p.to_path_buf());
    }

    let file = File::open(path)?;
    let parser = AseParser::new(name, &options, registry).with_label(label);
    run(parser, BufReader::new(file))
}

/// Load ASE content from any buffered reader.
pub fn load_ase_from_reader<R: BufRead>(
    reader: R,
    name: &str,
    options: &ImportOptions,
    registry: &mut dyn AssetRegistry,
) -> LoadResult<Scene> {
    run(AseParser::new(name, options, registry), reader)
}

/// Load ASE from a string (useful for testing).
pub fn load_ase_from_string(content: &str, name: &str, options: &ImportOptions) -> LoadResult<Scene> {
    let start = Instant::now();
    let mut registry = InMemoryRegistry::new();
    let mut parser = AseParser::new(name, options, &mut registry);

    for tokens in tokenize(content) {
        parser.feed(&tokens)?;
    }

    let scene = parser.finish();
    log_summary(&scene, start);
    Ok(scene)
}

fn run<R: BufRead>(mut parser: AseParser<'_>, reader: R) -> LoadResult<Scene> {
    let start = Instant::now();
    let mut lines = LineReader::new(reader);

    while let Some(tokens) = lines.next_line()? {
        parser.feed(&tokens)?;
    }

    let scene = parser.finish();
    log::debug!("Read {} lines", lines.lines_read());
    log_summary(&scene, start);
    Ok(scene)
}

fn log_summary(scene: &Scene, start: Instant) {
    log::info!(
        "Imported {} in {:.2?}: {} meshes, {} materials, {} diagnostics",
        scene.name,
        start.elapsed(),
        scene.mesh_count(),
        scene.material_count(),
        scene.diagnostics.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::texture::ImageSource;

    fn load(content: &str) -> Scene {
        load_ase_from_string(content, "test", &ImportOptions::default()).unwrap()
    }

    /// Two triangles sharing the 1-2 edge.
    fn quad(groups_a: &str, groups_b: &str) -> String {
        format!(
            r#"*GEOMOBJECT {{
    *NODE_NAME "Quad"
    *MESH {{
        *MESH_NUMVERTEX 4
        *MESH_NUMFACES 2
        *MESH_VERTEX_LIST {{
            *MESH_VERTEX 0 0.0 0.0 0.0
            *MESH_VERTEX 1 1.0 0.0 0.0
            *MESH_VERTEX 2 0.0 1.0 0.0
            *MESH_VERTEX 3 1.0 1.0 0.0
        }}
        *MESH_FACE_LIST {{
            *MESH_FACE 0: A: 0 B: 1 C: 2 AB: 1 BC: 1 CA: 1 *MESH_SMOOTHING {} *MESH_MTLID 0
            *MESH_FACE 1: A: 1 B: 3 C: 2 AB: 1 BC: 1 CA: 1 *MESH_SMOOTHING {} *MESH_MTLID 0
        }}
    }}
    *MATERIAL_REF 0
}}
"#,
            groups_a, groups_b
        )
    }

    const MATERIALS: &str = r#"*MATERIAL_LIST {
    *MATERIAL_COUNT 1
    *MATERIAL 0 {
        *MATERIAL_NAME "Paint"
        *MATERIAL_DIFFUSE 0.2 0.4 0.6
    }
}
"#;

    #[test]
    fn test_meshes_in_file_order() {
        let content = format!(
            "{}{}{}{}",
            MATERIALS,
            quad("1", "1").replace("Quad", "First"),
            quad("1", "1").replace("Quad", "Broken").replace("*MESH_NUMFACES 2", "*MESH_NUMFACES 3"),
            quad("1", "1").replace("Quad", "Third"),
        );
        let scene = load(&content);

        let names: Vec<&str> = scene.meshes.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Third"]);
        assert_eq!(scene.diagnostics.count(Severity::Error), 1);
        assert!(scene.meshes.iter().all(|m| m.materials == vec!["Paint".to_string()]));
    }

    #[test]
    fn test_smoothing_groups_to_sharp_edges() {
        let disjoint = load(&quad("0", "1"));
        assert_eq!(disjoint.meshes[0].sharp_edge_count(), 1);

        let same = load(&quad("0", "0"));
        assert_eq!(same.meshes[0].sharp_edge_count(), 0);

        let overlapping = load(&quad("0,1", "0,1"));
        assert_eq!(overlapping.meshes[0].sharp_edge_count(), 0);
    }

    #[test]
    fn test_uv_channel_mismatch_keeps_mesh() {
        let uv = r#"
        *MESH_NUMTVERTEX 3
        *MESH_TVERT 0 0.0 0.0 0.0
        *MESH_TVERT 1 1.0 0.0 0.0
        *MESH_TVERT 2 0.0 1.0 0.0
        *MESH_TFACE 0 0 1 2
        *MESH_MAPPINGCHANNEL 2 {
            *MESH_TVERT 0 0.0 0.0 0.0
            *MESH_TVERT 1 1.0 0.0 0.0
            *MESH_TVERT 2 0.0 1.0 0.0
            *MESH_TFACE 0 0 1 2
            *MESH_TFACE 1 1 2 0
        }
    }
    *MATERIAL_REF 0"#;
        let content = format!("{}{}", MATERIALS, quad("1", "1").replace("\n    }\n    *MATERIAL_REF 0", uv));
        let scene = load(&content);

        assert_eq!(scene.mesh_count(), 1);
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.uv_layers.len(), 1);
        assert_eq!(mesh.uv_layers[0].name, "UV channel 2");
        assert_eq!(mesh.uv_layers[0].uvs.len(), 6);
        assert_eq!(scene.diagnostics.count(Severity::Warning), 1);
    }

    #[test]
    fn test_idempotent() {
        let content = format!("{}{}{}", MATERIALS, quad("1", "2"), quad("1", "1"));
        let first = load(&content);
        let second = load(&content);
        assert_eq!(first, second);
    }

    #[test]
    fn test_reader_matches_string() {
        let content = format!("{}{}", MATERIALS, quad("1", "2"));
        let mut registry = InMemoryRegistry::new();
        let from_reader =
            load_ase_from_reader(content.as_bytes(), "test", &ImportOptions::default(), &mut registry)
                .unwrap();
        assert_eq!(from_reader, load(&content));
        assert_eq!(registry.material_count(), 1);
    }

    #[test]
    fn test_shared_registry_reuses_materials() {
        let content = format!("{}{}", MATERIALS, quad("1", "1"));
        let mut registry = InMemoryRegistry::new();
        let options = ImportOptions::default();

        let first = load_ase_from_reader(content.as_bytes(), "a", &options, &mut registry).unwrap();
        let second = load_ase_from_reader(content.as_bytes(), "b", &options, &mut registry).unwrap();

        assert_eq!(first.material_count(), 1);
        assert_eq!(second.material_count(), 0);
        assert_eq!(second.meshes[0].materials, vec!["Paint".to_string()]);
        assert_eq!(registry.material_count(), 1);
    }

    #[test]
    fn test_load_file() {
        let dir = std::env::temp_dir().join("ase_core_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("quad.ase");
        std::fs::write(&path, format!("{}{}", MATERIALS, quad("1", "1"))).unwrap();

        let scene = load_ase(&path, &ImportOptions::default()).unwrap();
        assert_eq!(scene.name, "quad");
        assert_eq!(scene.mesh_count(), 1);
        assert_eq!(scene.total_triangle_count(), 2);
    }

    #[test]
    fn test_diagnostics_use_file_name() {
        let dir = std::env::temp_dir().join("ase_core_loader_label");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("loose.ase");
        std::fs::write(&path, "*GEOMOBJECT {\n*NODE_NAME \"Loose\"\n}\n").unwrap();

        let scene = load_ase(&path, &ImportOptions::default()).unwrap();
        assert_eq!(
            scene.diagnostics.iter().next().unwrap().message,
            "loose.ase: undefined material on Loose"
        );
    }

    #[test]
    fn test_missing_file() {
        let result = load_ase("does/not/exist.ase", &ImportOptions::default());
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_invalid_utf8_is_io_error() {
        let bytes: &[u8] = b"*GEOMOBJECT {\n*NODE_NAME \"\xff\xfe\"\n";
        let mut registry = InMemoryRegistry::new();
        let result = load_ase_from_reader(bytes, "bad", &ImportOptions::default(), &mut registry);
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_strict_mode_surfaces_parse_error() {
        let content = quad("1", "1").replace("*MESH_VERTEX 2 0.0", "*MESH_VERTEX 2 zero");
        let options = ImportOptions {
            strict: true,
            ..ImportOptions::default()
        };
        let result = load_ase_from_string(&content, "test", &options);
        assert!(matches!(result, Err(LoadError::Parse(ParseError::InvalidNumber { line: 9, .. }))));
    }

    #[test]
    fn test_bitmap_resolved_next_to_file() {
        let dir = std::env::temp_dir().join("ase_core_loader_bitmap");
        std::fs::create_dir_all(&dir).unwrap();
        image::RgbImage::new(8, 4).save(dir.join("paint.png")).unwrap();
        let path = dir.join("textured.ase");
        let content = MATERIALS.replace(
            "*MATERIAL_DIFFUSE 0.2 0.4 0.6",
            "*MAP_DIFFUSE {\n            *MAP_NAME \"Map #1\"\n            *BITMAP \"paint.png\"\n        }",
        );
        std::fs::write(&path, content).unwrap();

        let options = ImportOptions {
            resolve_bitmap_files_on_disk: true,
            ..ImportOptions::default()
        };
        let scene = load_ase(&path, &options).unwrap();
        let paint = scene.get_material("Paint").unwrap();
        assert_eq!(
            paint.textures[0].image,
            ImageSource::File {
                path: dir.join("paint.png"),
                width: 8,
                height: 4,
            }
        );

        // Without probing, a placeholder stands in
        let scene = load_ase(&path, &ImportOptions::default()).unwrap();
        let paint = scene.get_material("Paint").unwrap();
        assert_eq!(paint.textures[0].image, ImageSource::placeholder("paint.png"));
    }
}
