//! Animation system — advances every sprite's playback and scroll.

use crate::core::scene::SpriteScene;

/// Advance all sprites by `dt` seconds. Returns how many changed frame.
///
/// Call this once per frame before building geometry.
pub fn tick_sprites(scene: &mut SpriteScene, dt: f32) -> usize {
    let mut changed = 0;
    for (_, sprite) in scene.iter_mut() {
        if sprite.advance(dt) {
            changed += 1;
        }
    }
    changed
}
