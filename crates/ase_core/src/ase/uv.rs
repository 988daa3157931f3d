//! UV layer construction.

use glam::Vec2;
use thiserror::Error;

use super::types::UvChannel;
use crate::diagnostics::Diagnostics;
use crate::mesh::UvLayer;

/// Why a UV channel was not turned into a layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UvSkip {
    #[error("size mismatch in UV {channel} [{uv_faces} tfaces for {faces} faces]")]
    SizeMismatch {
        channel: usize,
        uv_faces: usize,
        faces: usize,
    },

    #[error("UV {channel} face {face} references tvert {index} of {count}")]
    IndexOutOfRange {
        channel: usize,
        face: usize,
        index: u32,
        count: usize,
    },
}

/// Layer name for the 0-based channel index.
pub fn uv_layer_name(channel: usize) -> String {
    format!("UV channel {}", channel + 1)
}

/// Build the layer for one channel.
///
/// Channels without UV vertices produce no layer and no complaint.
pub fn build_uv_layer(
    channel_index: usize,
    channel: &UvChannel,
    face_count: usize,
) -> Result<Option<UvLayer>, UvSkip> {
    if channel.uv_vertices.is_empty() {
        return Ok(None);
    }

    if channel.uv_faces.len() != face_count {
        return Err(UvSkip::SizeMismatch {
            channel: channel_index,
            uv_faces: channel.uv_faces.len(),
            faces: face_count,
        });
    }

    let mut uvs: Vec<Vec2> = Vec::with_capacity(face_count * 3);
    for (face, indices) in channel.uv_faces.iter().enumerate() {
        for &index in indices {
            let uv = channel
                .uv_vertices
                .get(index as usize)
                .ok_or(UvSkip::IndexOutOfRange {
                    channel: channel_index,
                    face,
                    index,
                    count: channel.uv_vertices.len(),
                })?;
            uvs.push(*uv);
        }
    }

    Ok(Some(UvLayer {
        name: uv_layer_name(channel_index),
        uvs,
    }))
}

/// Build every usable layer, reporting skipped channels as warnings.
pub fn build_uv_layers(
    channels: &[UvChannel],
    face_count: usize,
    label: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<UvLayer> {
    channels
        .iter()
        .enumerate()
        .filter_map(|(i, channel)| match build_uv_layer(i, channel, face_count) {
            Ok(layer) => layer,
            Err(skip) => {
                diagnostics.warning(format!("{}: {}", label, skip));
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> UvChannel {
        UvChannel {
            uv_vertices: vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
            uv_faces: vec![[0, 1, 2]],
        }
    }

    #[test]
    fn test_per_loop_uvs() {
        let layer = build_uv_layer(0, &channel(), 1).unwrap().unwrap();
        assert_eq!(layer.name, "UV channel 1");
        assert_eq!(layer.uvs, vec![Vec2::ZERO, Vec2::X, Vec2::Y]);
    }

    #[test]
    fn test_empty_channel_is_silent() {
        assert_eq!(build_uv_layer(0, &UvChannel::default(), 4), Ok(None));
    }

    #[test]
    fn test_mismatch_skips_only_that_channel() {
        let mut broken = channel();
        broken.uv_faces.clear();

        let mut diagnostics = Diagnostics::new();
        let layers = build_uv_layers(&[broken, channel()], 1, "box.ase", &mut diagnostics);

        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].name, "UV channel 2");
        assert_eq!(diagnostics.len(), 1);
        let message = &diagnostics.iter().next().unwrap().message;
        assert_eq!(message, "box.ase: size mismatch in UV 0 [0 tfaces for 1 faces]");
    }

    #[test]
    fn test_bad_tvert_index() {
        let mut broken = channel();
        broken.uv_faces = vec![[0, 1, 7]];
        assert_eq!(
            build_uv_layer(2, &broken, 1),
            Err(UvSkip::IndexOutOfRange { channel: 2, face: 0, index: 7, count: 3 })
        );
    }
}
