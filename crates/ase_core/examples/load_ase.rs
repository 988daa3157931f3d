//! Example: Load and inspect an ASE file.
//!
//! Run with: cargo run --example load_ase -- assets/crate.ase

use std::env;

use ase_core::{load_ase, ImportOptions, MaterialSlot};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_ase <path-to-ase-file> [--split-normals]");
        println!("\nExamples:");
        println!("  cargo run --example load_ase -- assets/crate.ase");
        println!("  cargo run --example load_ase -- assets/crate.ase --split-normals");
        return;
    }

    let path = &args[1];
    let options = ImportOptions {
        import_split_normals: args.iter().any(|a| a == "--split-normals"),
        ..ImportOptions::default()
    };
    println!("Loading ASE file: {}", path);

    match load_ase(path, &options) {
        Ok(scene) => {
            println!("\n=== Scene: {} ===", scene.name);
            println!("Meshes: {}", scene.mesh_count());
            println!("Materials created: {}", scene.material_count());
            println!("Total triangles: {}", scene.total_triangle_count());

            println!("\n--- Material Slots ---");
            for (i, slot) in scene.material_slots.iter().enumerate() {
                match slot {
                    MaterialSlot::Single(name) => println!("  [{}] {}", i, name),
                    MaterialSlot::Palette(names) => {
                        println!("  [{}] {} (multi)", i, names[0]);
                        for (j, sub) in slot.attached_names().iter().enumerate() {
                            println!("       {}: {}", j, sub);
                        }
                    }
                }
            }

            println!("\n--- Meshes ---");
            for mesh in &scene.meshes {
                println!(
                    "  {} - {} vertices, {} triangles, {} sharp edges",
                    mesh.name,
                    mesh.vertex_count(),
                    mesh.triangle_count(),
                    mesh.sharp_edge_count()
                );
                println!(
                    "       Bounds: ({:.2}, {:.2}, {:.2}) to ({:.2}, {:.2}, {:.2})",
                    mesh.bounds.min.x,
                    mesh.bounds.min.y,
                    mesh.bounds.min.z,
                    mesh.bounds.max.x,
                    mesh.bounds.max.y,
                    mesh.bounds.max.z
                );
                for layer in &mesh.uv_layers {
                    println!("       {}: {} loops", layer.name, layer.uvs.len());
                }
                if !mesh.materials.is_empty() {
                    println!("       Materials: {}", mesh.materials.join(", "));
                }
                println!("       Custom normals: {}", mesh.has_custom_normals());
            }

            let world_bounds = scene.world_bounds();
            if !world_bounds.is_empty() {
                println!("\n--- World Bounds ---");
                println!(
                    "  Min: ({:.2}, {:.2}, {:.2})",
                    world_bounds.min.x, world_bounds.min.y, world_bounds.min.z
                );
                println!(
                    "  Max: ({:.2}, {:.2}, {:.2})",
                    world_bounds.max.x, world_bounds.max.y, world_bounds.max.z
                );
            }

            if !scene.diagnostics.is_empty() {
                println!("\n--- Diagnostics ---");
                for diagnostic in &scene.diagnostics {
                    println!("  {}", diagnostic);
                }
            }
        }
        Err(e) => {
            eprintln!("Error loading ASE file: {}", e);
        }
    }
}
