use crate::api::types::TextureHandle;
use crate::renderer::geometry::{SpriteDraw, SpriteVertex};

/// A run of consecutive vertices sampling the same texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBatch {
    pub texture: TextureHandle,
    /// First vertex of the batch.
    pub start: u32,
    /// Number of vertices (always a multiple of 6).
    pub count: u32,
}

/// Flat triangle-list vertex stream for one frame, split into texture batches.
///
/// Draws are appended in submission order; a new batch starts whenever the
/// texture differs from the previous draw, so painter's order is preserved.
pub struct GeometryBuffer {
    pub vertices: Vec<SpriteVertex>,
    pub batches: Vec<DrawBatch>,
}

impl GeometryBuffer {
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(6 * 256),
            batches: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.batches.clear();
    }

    pub fn push(&mut self, draw: &SpriteDraw) {
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&draw.geometry.vertices());

        match self.batches.last_mut() {
            Some(batch) if batch.texture == draw.texture => batch.count += 6,
            _ => self.batches.push(DrawBatch {
                texture: draw.texture,
                start,
                count: 6,
            }),
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Vertex data as raw floats, ready for upload.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl Default for GeometryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::geometry::whole_texture;
    use glam::Vec2;

    fn draw(texture: u32) -> SpriteDraw {
        SpriteDraw {
            texture: TextureHandle(texture),
            geometry: whole_texture(Vec2::new(4.0, 4.0)),
        }
    }

    #[test]
    fn batches_consecutive_textures() {
        let mut buf = GeometryBuffer::new();
        buf.push(&draw(1));
        buf.push(&draw(1));
        buf.push(&draw(2));
        buf.push(&draw(1));

        assert_eq!(buf.vertex_count(), 24);
        assert_eq!(
            buf.batches,
            [
                DrawBatch { texture: TextureHandle(1), start: 0, count: 12 },
                DrawBatch { texture: TextureHandle(2), start: 12, count: 6 },
                DrawBatch { texture: TextureHandle(1), start: 18, count: 6 },
            ]
        );
    }

    #[test]
    fn floats_view_and_clear() {
        let mut buf = GeometryBuffer::new();
        buf.push(&draw(1));
        assert_eq!(buf.as_floats().len(), 6 * SpriteVertex::FLOATS);
        // bottom-right corner of the last triangle
        assert_eq!(&buf.as_floats()[20..24], &[4.0, 4.0, 1.0, 1.0]);

        buf.clear();
        assert_eq!(buf.vertex_count(), 0);
        assert!(buf.batches.is_empty());
    }
}
