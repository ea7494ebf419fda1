use glam::Vec2;

/// Screen rectangle a fullscreen sprite is fitted into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Result of fitting a texture into a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    /// Top-left corner in screen space.
    pub min: Vec2,
    /// Bottom-right corner in screen space.
    pub max: Vec2,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport anchored at the origin.
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Largest rectangle with the texture's aspect ratio that fits inside the
    /// viewport, centered on it.
    ///
    /// The axis whose growth ratio (`viewport / texture`) is smaller is matched
    /// exactly; the other is scaled by the same ratio and letterboxed.
    /// Returns `None` for an empty texture.
    pub fn fit(&self, texture: Vec2) -> Option<Fit> {
        if texture.x <= 0.0 || texture.y <= 0.0 {
            return None;
        }
        let horiz_ratio = self.width / texture.x;
        let vert_ratio = self.height / texture.y;

        let size = if horiz_ratio <= vert_ratio {
            Vec2::new(self.width, texture.y * horiz_ratio)
        } else {
            Vec2::new(texture.x * vert_ratio, self.height)
        };

        let min = self.origin() + (self.size() - size) * 0.5;
        Some(Fit {
            min,
            max: min + size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    #[test]
    fn wide_viewport_fits_height() {
        // 1920/800 = 2.4, 1080/600 = 1.8: height is the limiting axis.
        let fit = Viewport::sized(1920.0, 1080.0)
            .fit(Vec2::new(800.0, 600.0))
            .unwrap();
        assert!(close(fit.max - fit.min, Vec2::new(1440.0, 1080.0)));
        assert!(close(fit.min, Vec2::new(240.0, 0.0)));
        assert!(close(fit.max, Vec2::new(1680.0, 1080.0)));
    }

    #[test]
    fn tall_viewport_fits_width() {
        let fit = Viewport::sized(600.0, 1000.0)
            .fit(Vec2::new(300.0, 200.0))
            .unwrap();
        assert!(close(fit.max - fit.min, Vec2::new(600.0, 400.0)));
        assert!(close(fit.min, Vec2::new(0.0, 300.0)));
    }

    #[test]
    fn preserves_aspect_and_respects_origin() {
        let viewport = Viewport::new(100.0, 50.0, 1024.0, 768.0);
        let texture = Vec2::new(640.0, 360.0);
        let fit = viewport.fit(texture).unwrap();
        let size = fit.max - fit.min;
        assert!((size.x / size.y - texture.x / texture.y).abs() < 1e-4);
        assert!(size.x <= viewport.width + 1e-3 && size.y <= viewport.height + 1e-3);
        // Centered: equal margins on both sides.
        let right_margin = viewport.x + viewport.width - fit.max.x;
        assert!((fit.min.x - viewport.x - right_margin).abs() < 1e-3);
    }

    #[test]
    fn empty_texture_has_no_fit() {
        assert!(Viewport::sized(10.0, 10.0).fit(Vec2::new(0.0, 5.0)).is_none());
    }
}
