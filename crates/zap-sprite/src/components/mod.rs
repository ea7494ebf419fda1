pub mod animation;
pub mod atlas;
pub mod scroll;
pub mod sprite;
