use crate::api::types::SpriteId;
use crate::components::sprite::SpriteComponent;

/// The set of live sprites ticked and drawn each frame.
///
/// Owned by whatever drives the frame loop. Code that creates a sprite keeps
/// only its [`SpriteId`] and removes it with [`SpriteScene::despawn`] when it
/// goes away. Designed for small-to-medium sprite counts (hundreds).
pub struct SpriteScene {
    sprites: Vec<(SpriteId, SpriteComponent)>,
    next_id: u32,
}

impl SpriteScene {
    pub fn new() -> Self {
        Self {
            sprites: Vec::with_capacity(256),
            next_id: 1,
        }
    }

    /// Create a scene with a specific sprite capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sprites: Vec::with_capacity(capacity),
            next_id: 1,
        }
    }

    /// Add a sprite and return its handle. Handles are never reused.
    pub fn spawn(&mut self, sprite: SpriteComponent) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        self.sprites.push((id, sprite));
        id
    }

    /// Remove a sprite. Draw order of the others is preserved.
    pub fn despawn(&mut self, id: SpriteId) -> Option<SpriteComponent> {
        let idx = self.sprites.iter().position(|(sid, _)| *sid == id)?;
        Some(self.sprites.remove(idx).1)
    }

    pub fn get(&self, id: SpriteId) -> Option<&SpriteComponent> {
        self.sprites
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| s)
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut SpriteComponent> {
        self.sprites
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| s)
    }

    /// Iterate over sprites in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (SpriteId, &SpriteComponent)> {
        self.sprites.iter().map(|(id, s)| (*id, s))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SpriteId, &mut SpriteComponent)> {
        self.sprites.iter_mut().map(|(id, s)| (*id, s))
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }
}

impl Default for SpriteScene {
    fn default() -> Self {
        Self::new()
    }
}
