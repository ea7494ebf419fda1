use glam::{BVec2, Vec2};

/// Continuous UV scroll driven by a constant velocity (UV units per second).
///
/// An axis with non-zero velocity wraps back into `[0, 1)` when it crosses
/// the boundary it is moving toward. An axis with zero velocity is never
/// touched, so a manually set static offset survives.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollAccumulator {
    pub velocity: Vec2,
    offset: Vec2,
}

impl ScrollAccumulator {
    pub fn new(velocity: Vec2) -> Self {
        Self {
            velocity,
            offset: Vec2::ZERO,
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Move by `velocity * dt`. Returns which axes wrapped.
    pub fn advance(&mut self, dt: f32) -> BVec2 {
        self.offset += self.velocity * dt;
        BVec2::new(
            wrap_axis(&mut self.offset.x, self.velocity.x),
            wrap_axis(&mut self.offset.y, self.velocity.y),
        )
    }
}

fn wrap_axis(offset: &mut f32, velocity: f32) -> bool {
    if !offset.is_finite() {
        return false;
    }
    let mut wrapped = false;
    if velocity > 0.0 {
        while *offset >= 1.0 {
            *offset -= 1.0;
            wrapped = true;
        }
    } else if velocity < 0.0 {
        while *offset < 0.0 {
            *offset += 1.0;
            wrapped = true;
        }
        // -tiny + 1.0 rounds to exactly 1.0
        if wrapped && *offset >= 1.0 {
            *offset = 0.0;
        }
    }
    wrapped
}
