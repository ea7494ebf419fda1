//! Drawable geometry for one sprite frame.
//!
//! Three modes:
//! - whole texture: no state selected, the full sheet at the origin;
//! - fullscreen: the sheet aspect-fitted into the viewport, showing the current cell;
//! - windowed: the current cell placed at the sprite's position, scaled and
//!   rotated, emitted as two triangles.
//!
//! UVs are normalized by the texture size passed in on every call, so a
//! texture that changes size between frames is always mapped correctly.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::api::types::TextureHandle;
use crate::components::atlas::Cell;
use crate::renderer::viewport::Viewport;

/// Screen-space position plus texture coordinate. 4 floats = 16 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

impl SpriteVertex {
    pub const FLOATS: usize = 4;

    pub fn new(pos: Vec2, uv: Vec2) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            u: uv.x,
            v: uv.y,
        }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::new(self.u, self.v)
    }
}

/// Axis-aligned textured rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedQuad {
    pub min: Vec2,
    pub max: Vec2,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

impl TexturedQuad {
    /// Two triangles: (tl, bl, tr) and (tr, bl, br).
    pub fn vertices(&self) -> [SpriteVertex; 6] {
        let corners = Corners {
            tl: self.min,
            tr: Vec2::new(self.max.x, self.min.y),
            bl: Vec2::new(self.min.x, self.max.y),
            br: self.max,
        };
        corners.triangles(self.uv_min, self.uv_max)
    }
}

/// Geometry of one sprite for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteGeometry {
    Quad(TexturedQuad),
    Triangles([SpriteVertex; 6]),
}

impl SpriteGeometry {
    pub fn vertices(&self) -> [SpriteVertex; 6] {
        match self {
            SpriteGeometry::Quad(quad) => quad.vertices(),
            SpriteGeometry::Triangles(vertices) => *vertices,
        }
    }
}

/// Geometry plus the texture it samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub texture: TextureHandle,
    pub geometry: SpriteGeometry,
}

/// World placement of a windowed sprite. Rotation is in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

struct Corners {
    tl: Vec2,
    tr: Vec2,
    bl: Vec2,
    br: Vec2,
}

impl Corners {
    fn triangles(&self, uv_min: Vec2, uv_max: Vec2) -> [SpriteVertex; 6] {
        let tl = SpriteVertex::new(self.tl, uv_min);
        let bl = SpriteVertex::new(self.bl, Vec2::new(uv_min.x, uv_max.y));
        let tr = SpriteVertex::new(self.tr, Vec2::new(uv_max.x, uv_min.y));
        let br = SpriteVertex::new(self.br, uv_max);
        [tl, bl, tr, tr, bl, br]
    }
}

/// Normalized UV rectangle of `cell`, shifted by `scroll`.
pub fn cell_uv(cell: &Cell, texture_size: Vec2, scroll: Vec2) -> (Vec2, Vec2) {
    let uv_min = cell.offset.as_vec2() / texture_size + scroll;
    let uv_max = uv_min + cell.size.as_vec2() / texture_size;
    (uv_min, uv_max)
}

/// The full texture at the origin with UV `[0,0]-[1,1]`.
pub fn whole_texture(texture_size: Vec2) -> SpriteGeometry {
    SpriteGeometry::Quad(TexturedQuad {
        min: Vec2::ZERO,
        max: texture_size,
        uv_min: Vec2::ZERO,
        uv_max: Vec2::ONE,
    })
}

/// The texture aspect-fitted into `viewport`, sampling `cell`.
///
/// The sprite position pans the UV window by `position / texture_size`.
/// Returns `None` when the texture has no area.
pub fn fullscreen(
    cell: &Cell,
    texture_size: Vec2,
    scroll: Vec2,
    position: Vec2,
    viewport: &Viewport,
) -> Option<SpriteGeometry> {
    let fit = viewport.fit(texture_size)?;
    let pan = position / texture_size;
    let (uv_min, uv_max) = cell_uv(cell, texture_size, scroll);
    Some(SpriteGeometry::Quad(TexturedQuad {
        min: fit.min,
        max: fit.max,
        uv_min: uv_min + pan,
        uv_max: uv_max + pan,
    }))
}

/// `cell` placed in world space with its size scaled.
///
/// Unrotated, the top-left corner sits at `position + pivot`. With a rotation
/// the local corners `pivot ± half` turn about the local origin and are then
/// moved by `position + half`, so the pivot offset turns with the sprite.
pub fn windowed(
    cell: &Cell,
    texture_size: Vec2,
    scroll: Vec2,
    placement: &Placement,
) -> SpriteGeometry {
    let (uv_min, uv_max) = cell_uv(cell, texture_size, scroll);
    let size = cell.size.as_vec2() * placement.scale;
    let top_left = placement.position + cell.pivot;

    let corners = if placement.rotation == 0.0 {
        let br = top_left + size;
        Corners {
            tl: top_left,
            tr: Vec2::new(br.x, top_left.y),
            bl: Vec2::new(top_left.x, br.y),
            br,
        }
    } else {
        let half = size * 0.5;
        let origin = placement.position + half;
        let rotation = Vec2::from_angle(placement.rotation);
        let place = |corner: Vec2| rotation.rotate(cell.pivot + corner) + origin;
        Corners {
            tl: place(-half),
            tr: place(Vec2::new(half.x, -half.y)),
            bl: place(Vec2::new(-half.x, half.y)),
            br: place(half),
        }
    };

    SpriteGeometry::Triangles(corners.triangles(uv_min, uv_max))
}
