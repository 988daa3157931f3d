//! ase_info - import ASE files and print what came out.
//!
//! Run with: cargo run --release --bin ase_info -- [OPTIONS] <FILES>...

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ase_core::{load_ase, Diagnostic, ImportOptions, Scene, Severity};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

/// Import ASE files and print what came out.
#[derive(Parser, Debug)]
#[command(name = "ase_info")]
#[command(about = "Import ASE files and summarize meshes, materials and diagnostics", long_about = None)]
struct Args {
    /// Read import options from a JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not convert smoothing groups to sharp edges
    #[arg(long)]
    no_smoothgroups: bool,

    /// Import per-loop vertex normals
    #[arg(long)]
    split_normals: bool,

    /// Always create new materials, textures and images
    #[arg(long)]
    no_reuse: bool,

    /// Look up *BITMAP paths on disk
    #[arg(long)]
    resolve_bitmaps: bool,

    /// Fail on malformed numbers instead of reporting them
    #[arg(long)]
    strict: bool,

    /// Print a JSON summary
    #[arg(long)]
    json: bool,

    /// ASE files to import
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

impl Args {
    /// Options from the config file (or defaults), with flags applied on top.
    fn import_options(&self) -> Result<ImportOptions> {
        let mut options = match &self.config {
            Some(path) => read_config(path)?,
            None => ImportOptions::default(),
        };

        if self.no_smoothgroups {
            options.convert_smoothgroups_to_sharp_edges = false;
        }
        if self.split_normals {
            options.import_split_normals = true;
        }
        if self.no_reuse {
            options.reuse_existing_materials_and_textures = false;
        }
        if self.resolve_bitmaps {
            options.resolve_bitmap_files_on_disk = true;
        }
        if self.strict {
            options.strict = true;
        }

        Ok(options)
    }
}

fn read_config(path: &Path) -> Result<ImportOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}

#[derive(Serialize)]
struct MeshSummary<'a> {
    name: &'a str,
    vertices: usize,
    triangles: usize,
    sharp_edges: usize,
    uv_layers: Vec<&'a str>,
    custom_normals: bool,
    materials: &'a [String],
}

#[derive(Serialize)]
struct FileSummary<'a> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    scene: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    meshes: Vec<MeshSummary<'a>>,
    materials_created: usize,
    diagnostics: &'a [Diagnostic],
}

fn summarize<'a>(path: &'a Path, result: &'a Result<Scene>) -> FileSummary<'a> {
    match result {
        Ok(scene) => FileSummary {
            path,
            scene: Some(scene.name.clone()),
            error: None,
            meshes: scene
                .meshes
                .iter()
                .map(|mesh| MeshSummary {
                    name: &mesh.name,
                    vertices: mesh.vertex_count(),
                    triangles: mesh.triangle_count(),
                    sharp_edges: mesh.sharp_edge_count(),
                    uv_layers: mesh.uv_layers.iter().map(|l| l.name.as_str()).collect(),
                    custom_normals: mesh.has_custom_normals(),
                    materials: &mesh.materials,
                })
                .collect(),
            materials_created: scene.material_count(),
            diagnostics: scene.diagnostics.as_slice(),
        },
        Err(e) => FileSummary {
            path,
            scene: None,
            error: Some(format!("{:#}", e)),
            meshes: Vec::new(),
            materials_created: 0,
            diagnostics: &[],
        },
    }
}

fn print_text(path: &Path, result: &Result<Scene>) {
    println!("=== {} ===", path.display());

    let scene = match result {
        Ok(scene) => scene,
        Err(e) => {
            println!("  FAILED: {:#}", e);
            return;
        }
    };

    println!(
        "  {} meshes, {} triangles, {} materials created",
        scene.mesh_count(),
        scene.total_triangle_count(),
        scene.material_count()
    );

    for mesh in &scene.meshes {
        println!(
            "  {} - {} vertices, {} triangles, {} sharp edges, {} UV layers{}",
            mesh.name,
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.sharp_edge_count(),
            mesh.uv_layers.len(),
            if mesh.has_custom_normals() { ", custom normals" } else { "" }
        );
        if !mesh.materials.is_empty() {
            println!("       materials: {}", mesh.materials.join(", "));
        }
    }

    if !scene.diagnostics.is_empty() {
        println!(
            "  {} warnings, {} errors",
            scene.diagnostics.count(Severity::Warning),
            scene.diagnostics.count(Severity::Error)
        );
        for diagnostic in &scene.diagnostics {
            println!("    {}", diagnostic);
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let options = args.import_options()?;
    log::debug!("Import options: {:?}", options);

    // Each file gets its own parser and registry
    let results: Vec<(&PathBuf, Result<Scene>)> = args
        .files
        .par_iter()
        .map(|path| {
            let result = load_ase(path, &options)
                .with_context(|| format!("Failed to load {}", path.display()));
            (path, result)
        })
        .collect();

    if args.json {
        let summaries: Vec<FileSummary> = results
            .iter()
            .map(|(path, result)| summarize(path, result))
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for (path, result) in &results {
            print_text(path, result);
        }
    }

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    if failed > 0 {
        bail!("{} of {} files failed to load", failed, results.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("ase_info").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_flags_and_files() {
        let parsed = args(&["--json", "--split-normals", "a.ase", "--no-reuse", "b.ase"]).unwrap();
        assert!(parsed.json);
        assert!(parsed.split_normals);
        assert!(parsed.no_reuse);
        assert!(!parsed.strict);
        assert_eq!(parsed.config, None);
        assert_eq!(parsed.files, vec![PathBuf::from("a.ase"), PathBuf::from("b.ase")]);
    }

    #[test]
    fn test_unknown_option() {
        assert!(args(&["--frobnicate", "a.ase"]).is_err());
        assert!(args(&["a.ase", "--config"]).is_err());
    }

    #[test]
    fn test_files_required() {
        assert!(args(&[]).is_err());
        assert!(args(&["--json"]).is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let parsed = args(&["--no-smoothgroups", "--resolve-bitmaps", "--strict", "x.ase"]).unwrap();
        let options = parsed.import_options().unwrap();
        assert!(!options.convert_smoothgroups_to_sharp_edges);
        assert!(options.resolve_bitmap_files_on_disk);
        assert!(options.strict);
        assert!(options.reuse_existing_materials_and_textures);
        assert!(!options.import_split_normals);
    }

    #[test]
    fn test_config_file() {
        let dir = std::env::temp_dir().join("ase_cli_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("options.json");
        std::fs::write(&path, r#"{ "import_split_normals": true, "strict": true }"#).unwrap();
        let path = path.to_str().unwrap().to_string();

        let parsed = args(&["--config", &path, "--no-reuse", "x.ase"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from(&path)));
        let options = parsed.import_options().unwrap();
        assert!(options.import_split_normals);
        assert!(options.strict);
        assert!(!options.reuse_existing_materials_and_textures);
        assert!(options.convert_smoothgroups_to_sharp_edges);
    }

    #[test]
    fn test_missing_config() {
        let parsed = args(&["--config", "no/such/options.json", "x.ase"]).unwrap();
        assert!(parsed.import_options().is_err());
    }
}
