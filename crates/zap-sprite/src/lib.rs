pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod error;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{AtlasConfig, FrameOrder};
pub use api::types::{LoadedTexture, SpriteId, TextureHandle};
pub use assets::descriptor::{parse_descriptor, write_descriptor, ParsedDescriptor, RawRegion};
pub use assets::manifest::SpriteManifest;
pub use assets::registry::{build_atlas, AtlasCache};
pub use components::animation::{PlaybackMode, PlaybackState};
pub use components::atlas::{split_state_and_frame, Atlas, Cell, FrameToken, State};
pub use components::scroll::ScrollAccumulator;
pub use components::sprite::SpriteComponent;
pub use crate::core::scene::SpriteScene;
pub use error::{DescriptorError, ManifestError};
pub use renderer::{
    DrawBatch, GeometryBuffer, Placement, SpriteDraw, SpriteGeometry, SpriteVertex,
    TextureProvider, TexturedQuad, Viewport,
};
pub use systems::animation::tick_sprites;
pub use systems::render::build_geometry_buffer;
