//! CPU-side quad accumulation.
//!
//! The scene pushes axis-aligned textured quads in screen pixels; the batch
//! lays out vertices and indices, and merges consecutive quads that share a
//! texture into one draw span so the render pass switches bind groups as
//! rarely as possible.

use std::sync::Arc;

use crate::vertex::SpriteVertex;

pub const WHITE_TINT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Full-texture UV rect.
pub const FULL_UV: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// A contiguous run of indices sharing one texture binding.
#[derive(Debug, Clone)]
pub struct DrawSpan {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Default)]
pub struct QuadBatch {
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    spans: Vec<DrawSpan>,
}

impl QuadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.spans.clear();
    }

    /// Append one quad. `x`/`y` are the top-left corner in screen pixels;
    /// `uv` is `[u0, v0, u1, v1]` into the named texture.
    pub fn push(
        &mut self,
        texture_key: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        uv: [f32; 4],
        tint: [f32; 4],
    ) {
        let [u0, v0, u1, v1] = uv;
        let base_index = self.vertices.len() as u32;

        self.vertices.push(SpriteVertex {
            position: [x, y],
            tex_coords: [u0, v0],
            color: tint,
        });
        self.vertices.push(SpriteVertex {
            position: [x + width, y],
            tex_coords: [u1, v0],
            color: tint,
        });
        self.vertices.push(SpriteVertex {
            position: [x + width, y + height],
            tex_coords: [u1, v1],
            color: tint,
        });
        self.vertices.push(SpriteVertex {
            position: [x, y + height],
            tex_coords: [u0, v1],
            color: tint,
        });

        let index_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        // Merge with the previous span when the texture matches; quads are
        // always appended, so spans are contiguous by construction.
        if let Some(last) = self.spans.last_mut() {
            if *last.texture_key == *texture_key {
                last.index_count += 6;
                return;
            }
        }
        self.spans.push(DrawSpan {
            texture_key: Arc::from(texture_key),
            index_start,
            index_count: 6,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn spans(&self) -> &[DrawSpan] {
        &self.spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_lays_out_four_vertices_six_indices() {
        let mut batch = QuadBatch::new();
        batch.push("tiles", 10.0, 20.0, 48.0, 48.0, FULL_UV, WHITE_TINT);
        assert_eq!(batch.vertices().len(), 4);
        assert_eq!(batch.indices(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(batch.quad_count(), 1);

        let corners: Vec<[f32; 2]> = batch.vertices().iter().map(|v| v.position).collect();
        assert_eq!(
            corners,
            vec![[10.0, 20.0], [58.0, 20.0], [58.0, 68.0], [10.0, 68.0]]
        );
    }

    #[test]
    fn same_texture_quads_merge_into_one_span() {
        let mut batch = QuadBatch::new();
        batch.push("tiles", 0.0, 0.0, 48.0, 48.0, FULL_UV, WHITE_TINT);
        batch.push("tiles", 48.0, 0.0, 48.0, 48.0, FULL_UV, WHITE_TINT);
        batch.push("tiles", 96.0, 0.0, 48.0, 48.0, FULL_UV, WHITE_TINT);

        assert_eq!(batch.spans().len(), 1);
        assert_eq!(batch.spans()[0].index_start, 0);
        assert_eq!(batch.spans()[0].index_count, 18);
    }

    #[test]
    fn texture_change_starts_a_new_span() {
        let mut batch = QuadBatch::new();
        batch.push("tiles", 0.0, 0.0, 48.0, 48.0, FULL_UV, WHITE_TINT);
        batch.push("player", 0.0, 0.0, 48.0, 48.0, FULL_UV, WHITE_TINT);
        batch.push("tiles", 48.0, 0.0, 48.0, 48.0, FULL_UV, WHITE_TINT);

        let spans = batch.spans();
        assert_eq!(spans.len(), 3);
        assert_eq!(&*spans[0].texture_key, "tiles");
        assert_eq!(&*spans[1].texture_key, "player");
        assert_eq!(&*spans[2].texture_key, "tiles");
        assert_eq!(spans[1].index_start, 6);
        assert_eq!(spans[2].index_start, 12);
    }

    #[test]
    fn clear_resets_everything() {
        let mut batch = QuadBatch::new();
        batch.push("tiles", 0.0, 0.0, 48.0, 48.0, FULL_UV, WHITE_TINT);
        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.quad_count(), 0);
        assert!(batch.spans().is_empty());
    }
}
