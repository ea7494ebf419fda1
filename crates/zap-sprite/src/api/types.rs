use glam::UVec2;

/// Handle to a sprite instance owned by a [`SpriteScene`](crate::core::scene::SpriteScene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u32);

/// Opaque texture handle handed out by a [`TextureProvider`](crate::renderer::traits::TextureProvider).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct TextureHandle(pub u32);

/// A texture the provider has loaded: where it came from, its handle and its
/// declared pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTexture {
    pub path: String,
    pub handle: TextureHandle,
    pub size: UVec2,
}

impl LoadedTexture {
    pub fn new(path: impl Into<String>, handle: TextureHandle, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            handle,
            size: UVec2::new(width, height),
        }
    }
}
