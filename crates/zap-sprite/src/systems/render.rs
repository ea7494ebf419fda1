use crate::core::scene::SpriteScene;
use crate::renderer::instance::GeometryBuffer;
use crate::renderer::traits::TextureProvider;
use crate::renderer::viewport::Viewport;

/// Rebuild `buffer` from every visible sprite in the scene, in draw order.
pub fn build_geometry_buffer(
    scene: &SpriteScene,
    provider: &dyn TextureProvider,
    viewport: &Viewport,
    buffer: &mut GeometryBuffer,
) {
    buffer.clear();

    for (_, sprite) in scene.iter() {
        if !sprite.visible {
            continue;
        }
        if let Some(draw) = sprite.generate_geometry(provider, viewport) {
            buffer.push(&draw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::sprite::SpriteComponent;
    use crate::renderer::traits::mock::MockTextures;
    use glam::Vec2;

    #[test]
    fn collects_visible_sprites_in_order() {
        let mut provider = MockTextures::default()
            .with("a.png", 16, 16)
            .with("b.png", 32, 32);
        let mut scene = SpriteScene::new();

        for (path, x) in [("a.png", 0.0), ("a.png", 50.0), ("b.png", 100.0)] {
            let mut sprite = SpriteComponent::new().with_position(Vec2::new(x, 0.0));
            sprite.load_sheet(&mut provider, path, None);
            scene.spawn(sprite);
        }
        let mut hidden = SpriteComponent::new();
        hidden.load_sheet(&mut provider, "a.png", None);
        hidden.visible = false;
        scene.spawn(hidden);
        // No texture: contributes nothing.
        scene.spawn(SpriteComponent::new());

        let mut buffer = GeometryBuffer::new();
        build_geometry_buffer(&scene, &provider, &Viewport::sized(640.0, 480.0), &mut buffer);

        assert_eq!(buffer.vertex_count(), 18);
        assert_eq!(buffer.batches.len(), 2);
        assert_eq!(buffer.batches[0].count, 12);
        assert_eq!(buffer.vertices[6].pos(), Vec2::new(50.0, 0.0));
        assert_eq!(buffer.vertices[12].pos(), Vec2::new(100.0, 0.0));
    }
}
