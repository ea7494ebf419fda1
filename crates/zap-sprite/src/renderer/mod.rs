pub mod geometry;
pub mod instance;
pub mod traits;
pub mod viewport;

pub use geometry::{Placement, SpriteDraw, SpriteGeometry, SpriteVertex, TexturedQuad};
pub use instance::{DrawBatch, GeometryBuffer};
pub use traits::TextureProvider;
pub use viewport::{Fit, Viewport};
