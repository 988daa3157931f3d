//! ASE scene parser.
//!
//! A single-pass state machine fed one tokenized line at a time. It keeps
//! the material slot table for the whole file, at most one open geometry
//! object, and the cursors that material property tags write through.
//! Objects are closed by `*MATERIAL_REF`, `*WIREFRAME_COLOR`, the next
//! `*GEOMOBJECT` or end of input, and are derived into meshes on close.

use glam::{Vec2, Vec3, Vec4};
use thiserror::Error;

use super::derive::build_mesh;
use super::tokenizer::Tokens;
use super::types::{CloseReason, FaceRecord, GeomObject, SmoothingGroups};
use crate::config::ImportOptions;
use crate::registry::AssetRegistry;
use crate::scene::{Material, MaterialSlot, Scene};
use crate::texture::{BitmapCache, ImageSource, TextureBinding};

const MESH_SMOOTHING: &str = "*MESH_SMOOTHING";
const MESH_MTLID: &str = "*MESH_MTLID";

/// Errors that can occur during ASE parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid number at line {line}: '{token}' in {tag}")]
    InvalidNumber {
        line: usize,
        tag: String,
        token: String,
    },

    #[error("Missing field {index} at line {line} in {tag}")]
    MissingField {
        line: usize,
        tag: String,
        index: usize,
    },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Streaming ASE parser.
pub struct AseParser<'r> {
    options: ImportOptions,
    registry: &'r mut dyn AssetRegistry,
    bitmaps: BitmapCache,

    /// Prefix for diagnostic messages, usually the file name
    label: String,

    /// Accumulated result
    scene: Scene,

    /// True outside sub-material lists, false once a material's
    /// `*SUBMATERIAL`s start
    materials_mode: bool,

    /// Index into `scene.materials` receiving property tags
    current_material: Option<usize>,

    /// Texture bound by the last `*MAP_NAME`
    current_texture: Option<String>,

    current: Option<GeomObject>,
}

impl<'r> AseParser<'r> {
    /// Create a parser producing a scene called `name`.
    pub fn new(
        name: impl Into<String>,
        options: &ImportOptions,
        registry: &'r mut dyn AssetRegistry,
    ) -> Self {
        let name = name.into();
        let bitmaps = match &options.bitmap_search_dir {
            Some(dir) => BitmapCache::with_base_dir(dir),
            None => BitmapCache::new(),
        };
        Self {
            options: options.clone(),
            registry,
            bitmaps,
            label: name.clone(),
            scene: Scene::new(name),
            materials_mode: true,
            current_material: None,
            current_texture: None,
            current: None,
        }
    }

    /// Use a different prefix for diagnostic messages.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Process one line.
    ///
    /// Malformed numeric fields become error diagnostics unless the parser
    /// is strict, in which case they are returned.
    pub fn feed(&mut self, tokens: &Tokens) -> ParseResult<()> {
        match self.handle(tokens) {
            Ok(()) => Ok(()),
            Err(e) if self.options.strict => Err(e),
            Err(e) => {
                self.scene.diagnostics.error(format!("{}: {}", self.label, e));
                Ok(())
            }
        }
    }

    /// Close any open object and return the scene.
    pub fn finish(mut self) -> Scene {
        self.close_object(CloseReason::UndefinedMaterial);
        self.scene
    }

    fn handle(&mut self, tokens: &Tokens) -> ParseResult<()> {
        let Some(keyword) = tokens.keyword() else {
            return Ok(());
        };

        match keyword {
            "*MATERIAL" => self.materials_mode = true,
            "*SUBMATERIAL" if self.materials_mode => self.begin_submaterials(tokens.line()),
            "*MATERIAL_NAME" => self.add_material(&tokens.quoted_rest()),
            "*MATERIAL_DIFFUSE" => {
                if let Some(index) = self.current_material {
                    let [r, g, b] = tokens.parse_run::<f32, 3>(1)?;
                    self.scene.materials[index].diffuse_color = Vec4::new(r, g, b, 1.0);
                }
            }
            "*MATERIAL_SPECULAR" => {
                if let Some(index) = self.current_material {
                    let rgb = tokens.parse_run::<f32, 3>(1)?;
                    self.scene.materials[index].specular_color = Vec3::from(rgb);
                }
            }
            "*MAP_NAME" => {
                if self.current_material.is_some() {
                    self.bind_texture(&tokens.quoted_rest());
                }
            }
            "*BITMAP" => self.bind_bitmap(&tokens.quoted_rest()),
            "*GEOMOBJECT" => {
                self.close_object(CloseReason::UndefinedMaterial);
                log::debug!("Opening geometry object at line {}", tokens.line());
                self.current = Some(GeomObject::new());
            }
            _ => self.handle_object_tag(keyword, tokens)?,
        }

        Ok(())
    }

    /// Tags that only mean something inside an open geometry object.
    fn handle_object_tag(&mut self, keyword: &str, tokens: &Tokens) -> ParseResult<()> {
        let Some(object) = self.current.as_mut() else {
            return Ok(());
        };

        let close = match keyword {
            "*NODE_NAME" => {
                object.set_name(tokens.quoted_rest());
                None
            }
            "*TM_ROW0" | "*TM_ROW1" | "*TM_ROW2" | "*TM_ROW3" => {
                let row = match keyword {
                    "*TM_ROW0" => 0,
                    "*TM_ROW1" => 1,
                    "*TM_ROW2" => 2,
                    _ => 3,
                };
                let values = tokens.parse_rest::<f32>(1)?;
                object.set_transform_row(row, &values);
                None
            }
            "*MESH_NUMVERTEX" => {
                object.declared_vertex_count = tokens.parse_at(1)?;
                None
            }
            "*MESH_NUMFACES" => {
                object.declared_face_count = tokens.parse_at(1)?;
                None
            }
            "*MESH_VERTEX" => {
                object.vertices.push(Vec3::from(tokens.parse_run::<f32, 3>(2)?));
                None
            }
            "*MESH_FACE" => {
                let face = parse_face(tokens)?;
                if face.smoothing.is_none() {
                    self.scene.diagnostics.warning(format!(
                        "{}: unrecognized {} layout at line {}",
                        self.label,
                        MESH_SMOOTHING,
                        tokens.line()
                    ));
                }
                object.push_face(face);
                None
            }
            "*MESH_MAPPINGCHANNEL" => {
                object.start_mapping_channel();
                None
            }
            "*MESH_TVERT" => {
                let uv = Vec2::from(tokens.parse_run::<f32, 2>(2)?);
                object.current_channel_mut().uv_vertices.push(uv);
                None
            }
            "*MESH_TFACE" => {
                let indices = tokens.parse_run::<u32, 3>(2)?;
                object.current_channel_mut().uv_faces.push(indices);
                None
            }
            "*MESH_VERTCOL" => {
                object.vertex_colors.push(Vec3::from(tokens.parse_run::<f32, 3>(2)?));
                None
            }
            "*MESH_CFACE" => {
                object.color_faces.push(tokens.parse_run::<u32, 3>(2)?);
                None
            }
            "*MESH_VERTEXNORMAL" if self.options.import_split_normals => {
                // Garbled normals are kept as NaN so loop counts still line up
                let normal = tokens
                    .parse_run::<f32, 3>(2)
                    .map(Vec3::from)
                    .unwrap_or(Vec3::NAN);
                object.vertex_normals.push(normal);
                None
            }
            "*MATERIAL_REF" => {
                object.material_ref = Some(tokens.parse_at(1)?);
                Some(CloseReason::MaterialRef)
            }
            "*WIREFRAME_COLOR" => Some(CloseReason::BlankMaterial),
            _ => None,
        };

        if let Some(reason) = close {
            self.close_object(reason);
        }
        Ok(())
    }

    /// Finalize the open object, if any.
    fn close_object(&mut self, reason: CloseReason) {
        let Some(object) = self.current.take() else {
            return;
        };

        match reason {
            CloseReason::MaterialRef => {}
            CloseReason::BlankMaterial => self
                .scene
                .diagnostics
                .warning(format!("{}: blank material on {}", self.label, object.name())),
            CloseReason::UndefinedMaterial => self
                .scene
                .diagnostics
                .warning(format!("{}: undefined material on {}", self.label, object.name())),
        }

        log::debug!(
            "Closing {} ({} vertices, {} faces, {:?})",
            object.name(),
            object.vertices.len(),
            object.faces.len(),
            reason
        );

        if let Some(mesh) = build_mesh(
            object,
            &self.scene.material_slots,
            &self.options,
            &self.label,
            &mut self.scene.diagnostics,
        ) {
            self.scene.meshes.push(mesh);
        }
    }

    /// First `*SUBMATERIAL` of a material block: the last slot becomes a
    /// palette.
    fn begin_submaterials(&mut self, line: usize) {
        self.materials_mode = false;
        match self.scene.material_slots.last_mut() {
            Some(slot) => slot.make_palette(),
            None => {
                self.scene.diagnostics.warning(format!(
                    "{}: *SUBMATERIAL before any material at line {}",
                    self.label, line
                ));
                self.scene
                    .material_slots
                    .push(MaterialSlot::Palette(vec![String::new()]));
            }
        }
    }

    fn add_material(&mut self, name: &str) {
        let existing = if self.options.reuse_existing_materials_and_textures {
            self.registry.find_material(name)
        } else {
            None
        };

        let registered = match existing {
            Some(existing) => {
                log::trace!("Reusing material {}", existing);
                self.current_material = None;
                existing
            }
            None => {
                let created = self.registry.create_material(name);
                self.scene.materials.push(Material::new(created.clone()));
                self.current_material = Some(self.scene.materials.len() - 1);
                created
            }
        };

        let palette = if self.materials_mode {
            None
        } else {
            self.scene.material_slots.last_mut()
        };
        match palette {
            Some(slot) => slot.push_submaterial(registered),
            None => self
                .scene
                .material_slots
                .push(MaterialSlot::Single(registered)),
        }
    }

    fn bind_texture(&mut self, name: &str) {
        let existing = if self.options.reuse_existing_materials_and_textures {
            self.registry.find_texture(name)
        } else {
            None
        };
        let texture = existing.unwrap_or_else(|| self.registry.create_texture(name));
        self.current_texture = Some(texture);
    }

    fn bind_bitmap(&mut self, path: &str) {
        let Some(material) = self.current_material else {
            return;
        };
        let Some(texture) = self.current_texture.take() else {
            return;
        };

        let image = self.resolve_image(path);
        self.scene.materials[material]
            .textures
            .push(TextureBinding { texture, image });
        self.current_material = None;
    }

    /// On-disk file, then an existing registry image, then a placeholder.
    fn resolve_image(&mut self, path: &str) -> ImageSource {
        if self.options.resolve_bitmap_files_on_disk {
            if let Some(source) = self.bitmaps.resolve(path) {
                return source;
            }
        }

        if self.options.reuse_existing_materials_and_textures {
            if let Some(existing) = self.registry.find_image(path) {
                return ImageSource::Existing(existing);
            }
        }

        ImageSource::placeholder(self.registry.create_image(path))
    }
}

/// Parse a `*MESH_FACE` line.
///
/// ```text
/// *MESH_FACE 0:  A: 0 B: 2 C: 3 AB: 1 BC: 1 CA: 0 *MESH_SMOOTHING 1 *MESH_MTLID 0
/// ```
///
/// Vertex indices sit at fixed positions 3, 5 and 7.
fn parse_face(tokens: &Tokens) -> ParseResult<FaceRecord> {
    let vertices = [
        tokens.parse_at(3)?,
        tokens.parse_at(5)?,
        tokens.parse_at(7)?,
    ];

    let submaterial_id = match tokens.position(MESH_MTLID) {
        Some(i) => tokens.parse_at(i + 1)?,
        None => 0,
    };

    Ok(FaceRecord {
        vertices,
        submaterial_id,
        smoothing: parse_smoothing(tokens)?,
    })
}

/// Locate the smoothing field of a face line.
///
/// Two layouts are understood, both anchored on the end of the line:
///
/// - `... *MESH_SMOOTHING 1,2 *MESH_MTLID 0`: the field is third from last.
/// - `... *MESH_SMOOTHING *MESH_MTLID 0`: no field, the face gets `{0}`.
///
/// A line with no smoothing tag at all also gets `{0}`. Anything else
/// returns `None` and the face has no smoothing record.
fn parse_smoothing(tokens: &Tokens) -> ParseResult<Option<SmoothingGroups>> {
    if !tokens.contains(MESH_SMOOTHING) {
        return Ok(Some(SmoothingGroups::default()));
    }

    if tokens.from_end(4) == Some(MESH_SMOOTHING) {
        let field = tokens.from_end(3).unwrap_or_default();
        return SmoothingGroups::parse_field(field)
            .map(Some)
            .map_err(|_| tokens.invalid(field));
    }

    if tokens.from_end(3) == Some(MESH_SMOOTHING) {
        return Ok(Some(SmoothingGroups::default()));
    }

    Ok(None)
}
