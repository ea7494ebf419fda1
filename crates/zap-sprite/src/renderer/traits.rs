//! Texture collaborator contract.
//!
//! Decoding and GPU residency live outside this crate. The engine only needs
//! to turn a path into a handle with a pixel size, and, for textures that
//! animate on their own (texture-level animation, not atlas states), to ask
//! which handle is on screen right now.

use glam::UVec2;

use crate::api::types::{LoadedTexture, TextureHandle};

pub trait TextureProvider {
    /// Load (or look up) the texture at `path`.
    fn load(&mut self, path: &str) -> Option<LoadedTexture>;

    /// Declared pixel size of `handle`, if it is still alive.
    fn size(&self, handle: TextureHandle) -> Option<UVec2>;

    /// Handle currently displayed for `handle`. Static textures return `handle`
    /// itself; animated ones return the frame the provider is showing.
    fn current_frame_handle(&self, handle: TextureHandle) -> TextureHandle {
        handle
    }
}
