//! Sprite instance: a shared atlas plus this instance's playback, scroll and
//! placement.

use std::sync::Arc;

use glam::Vec2;

use crate::api::config::AtlasConfig;
use crate::api::types::LoadedTexture;
use crate::assets::registry::{build_atlas, AtlasCache};
use crate::components::animation::{PlaybackMode, PlaybackState};
use crate::components::atlas::{Atlas, Cell, State};
use crate::components::scroll::ScrollAccumulator;
use crate::renderer::geometry::{self, Placement, SpriteDraw};
use crate::renderer::traits::TextureProvider;
use crate::renderer::viewport::Viewport;

#[derive(Debug, Clone, PartialEq)]
struct SheetSource {
    texture_path: String,
    descriptor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SpriteComponent {
    /// World placement used in windowed mode. In fullscreen mode the position
    /// pans the texture instead.
    pub placement: Placement,
    /// Aspect-fit the sheet to the viewport instead of placing it in the world.
    pub fullscreen: bool,
    /// Invisible sprites still animate but produce no geometry.
    pub visible: bool,
    config: AtlasConfig,
    atlas: Arc<Atlas>,
    texture: Option<LoadedTexture>,
    source: Option<SheetSource>,
    playback: PlaybackState,
    scroll: ScrollAccumulator,
}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            fullscreen: false,
            visible: true,
            config: AtlasConfig::default(),
            atlas: Arc::new(Atlas::default()),
            texture: None,
            source: None,
            playback: PlaybackState::new(),
            scroll: ScrollAccumulator::default(),
        }
    }
}

impl SpriteComponent {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_config(mut self, config: AtlasConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.placement.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.placement.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.placement.scale = scale;
        self
    }

    pub fn with_scroll_speed(mut self, speed: Vec2) -> Self {
        self.scroll.velocity = speed;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    // -- Loading --

    /// Build a fresh atlas for `texture` from `descriptor` and show it.
    ///
    /// Fails without a texture, or when the descriptor yields no cell. On
    /// failure the atlas is left empty, so playback calls do nothing and the
    /// sprite renders the whole texture if it has one.
    pub fn load_atlas(&mut self, descriptor: Option<&str>, texture: Option<LoadedTexture>) -> bool {
        self.source = None;
        let Some(texture) = texture else {
            log::warn!("load_atlas called without a texture");
            self.clear();
            return false;
        };
        let atlas = Arc::new(build_atlas(descriptor, &texture, &self.config));
        self.set_atlas(atlas, texture)
    }

    /// Show an already built (typically cached and shared) atlas.
    ///
    /// Any previous playback position refers to the old tables and is reset.
    pub fn set_atlas(&mut self, atlas: Arc<Atlas>, texture: LoadedTexture) -> bool {
        if self.playback.current_state().is_some() {
            log::debug!("atlas replaced, playback of `{}` reset", texture.path);
        }
        self.playback.reset();
        self.scroll.set_offset(Vec2::ZERO);
        self.atlas = atlas;
        self.texture = Some(texture);

        if self.atlas.is_empty() {
            log::warn!("atlas for `{}` has no states", self.texture_path().unwrap_or_default());
            return false;
        }
        if self.config.auto_select_first {
            self.playback.select_index(&self.atlas, 0);
        }
        true
    }

    /// Load `texture_path` through `provider` and build its atlas.
    ///
    /// Calling again with the same path and descriptor after a successful
    /// load is a no-op returning true.
    pub fn load_sheet(
        &mut self,
        provider: &mut dyn TextureProvider,
        texture_path: &str,
        descriptor: Option<&str>,
    ) -> bool {
        let source = SheetSource {
            texture_path: texture_path.to_string(),
            descriptor: descriptor.map(str::to_string),
        };
        if self.source.as_ref() == Some(&source) {
            return true;
        }

        let texture = provider.load(texture_path);
        if texture.is_none() {
            log::warn!("texture `{texture_path}` could not be loaded");
        }
        let loaded = self.load_atlas(descriptor, texture);
        if loaded {
            self.source = Some(source);
        }
        loaded
    }

    /// Like [`load_sheet`](Self::load_sheet), but the atlas comes from `cache`
    /// and is shared with every other sprite showing the same sheet. The
    /// sprite adopts the cache's config so both build with the same rules.
    pub fn load_cached(
        &mut self,
        provider: &mut dyn TextureProvider,
        cache: &mut AtlasCache,
        texture_path: &str,
        descriptor: Option<&str>,
    ) -> bool {
        let source = SheetSource {
            texture_path: texture_path.to_string(),
            descriptor: descriptor.map(str::to_string),
        };
        if self.source.as_ref() == Some(&source) && self.config == *cache.config() {
            return true;
        }

        self.source = None;
        self.config = cache.config().clone();
        let Some(texture) = provider.load(texture_path) else {
            log::warn!("texture `{texture_path}` could not be loaded");
            self.clear();
            return false;
        };
        let atlas = cache.get_or_build(&texture, descriptor);
        let loaded = self.set_atlas(atlas, texture);
        if loaded {
            self.source = Some(source);
        }
        loaded
    }

    /// Drop the atlas and texture.
    pub fn clear(&mut self) {
        self.atlas = Arc::new(Atlas::default());
        self.texture = None;
        self.source = None;
        self.playback.reset();
        self.scroll.set_offset(Vec2::ZERO);
    }

    // -- Queries --

    pub fn atlas(&self) -> &Arc<Atlas> {
        &self.atlas
    }

    pub fn texture(&self) -> Option<&LoadedTexture> {
        self.texture.as_ref()
    }

    pub fn texture_path(&self) -> Option<&str> {
        self.texture.as_ref().map(|t| t.path.as_str())
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn state_names(&self) -> Vec<&str> {
        self.atlas.state_names()
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn mode(&self) -> PlaybackMode {
        self.playback.mode()
    }

    pub fn is_paused(&self) -> bool {
        self.playback.is_paused()
    }

    pub fn current_state(&self) -> Option<&State> {
        self.atlas.state(self.playback.current_state()?)
    }

    pub fn current_state_name(&self) -> Option<&str> {
        self.current_state().map(|s| s.name.as_str())
    }

    /// Frame within the current state, `None` when no state is selected.
    pub fn current_frame_index(&self) -> Option<usize> {
        self.current_state()?;
        Some(self.playback.current_frame())
    }

    pub fn frame_count(&self) -> usize {
        self.current_state().map_or(0, State::frame_count)
    }

    /// Cell on screen, `None` when no state is selected or the playback
    /// position does not fit the atlas.
    pub fn current_cell(&self) -> Option<&Cell> {
        let state = self.playback.current_state()?;
        self.atlas.frame_cell(state, self.playback.current_frame())
    }

    pub fn scroll_speed(&self) -> Vec2 {
        self.scroll.velocity
    }

    pub fn set_scroll_speed(&mut self, speed: Vec2) {
        self.scroll.velocity = speed;
    }

    pub fn scroll_offset(&self) -> Vec2 {
        self.scroll.offset()
    }

    pub fn set_scroll_offset(&mut self, offset: Vec2) {
        self.scroll.set_offset(offset);
    }

    // -- Playback --

    pub fn select_state(&mut self, name: &str) -> bool {
        self.playback.select(&self.atlas, name)
    }

    pub fn play(&mut self) {
        self.playback.play();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn seek_frame(&mut self, frame: i32) {
        self.playback.seek_frame(&self.atlas, frame);
    }

    pub fn seek_percent(&mut self, percent: f32) {
        self.playback.seek_percent(&self.atlas, percent);
    }

    /// Advance playback and scrolling by `dt` seconds. Nothing moves while
    /// stopped or paused. Returns true if the frame changed.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.playback.mode() != PlaybackMode::Playing || !(dt > 0.0 && dt.is_finite()) {
            return false;
        }
        self.scroll.advance(dt);
        self.playback.advance(&self.atlas, dt)
    }

    // -- Rendering --

    /// Geometry for the current frame, or `None` when there is no texture to draw.
    ///
    /// The texture handle and size are queried from `provider` on every call,
    /// so texture-level animation and size changes are picked up immediately.
    pub fn generate_geometry(
        &self,
        provider: &dyn TextureProvider,
        viewport: &Viewport,
    ) -> Option<SpriteDraw> {
        let texture = self.texture.as_ref()?;
        let handle = provider.current_frame_handle(texture.handle);
        let size = provider.size(handle).unwrap_or(texture.size).as_vec2();
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }

        let scroll = self.scroll.offset();
        let geometry = match self.current_cell() {
            None => geometry::whole_texture(size),
            Some(cell) if self.fullscreen => {
                geometry::fullscreen(cell, size, scroll, self.placement.position, viewport)
                    .unwrap_or_else(|| geometry::whole_texture(size))
            }
            Some(cell) => geometry::windowed(cell, size, scroll, &self.placement),
        };

        Some(SpriteDraw {
            texture: handle,
            geometry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::TextureHandle;
    use crate::renderer::geometry::SpriteGeometry;
    use crate::renderer::traits::mock::MockTextures;

    const HERO: &str = r#"<TextureAtlas imagePath="hero.png">
        <SubTexture name="run_0.png" x="0" y="0" width="32" height="32" ox="0" oy="0"/>
        <SubTexture name="run_1.png" x="32" y="0" width="32" height="32" ox="0" oy="0"/>
        <SubTexture name="idle.png" x="64" y="0" width="32" height="32" ox="0" oy="0"/>
    </TextureAtlas>"#;

    fn textures() -> MockTextures {
        MockTextures::default().with("hero.png", 128, 32).with("sky.png", 800, 600)
    }

    fn loaded() -> (SpriteComponent, MockTextures) {
        let mut provider = textures();
        let mut sprite = SpriteComponent::new();
        assert!(sprite.load_sheet(&mut provider, "hero.png", Some(HERO)));
        (sprite, provider)
    }

    #[test]
    fn load_selects_first_state() {
        let (sprite, _) = loaded();
        assert_eq!(sprite.state_names(), ["run", "idle"]);
        assert_eq!(sprite.current_state_name(), Some("run"));
        assert_eq!(sprite.current_frame_index(), Some(0));
        assert_eq!(sprite.mode(), PlaybackMode::Playing);
    }

    #[test]
    fn every_advertised_state_is_selectable() {
        let (mut sprite, _) = loaded();
        let names: Vec<String> = sprite.state_names().iter().map(|s| s.to_string()).collect();
        for name in &names {
            assert!(sprite.select_state(name));
            assert_eq!(sprite.current_state_name(), Some(name.as_str()));
            assert_eq!(sprite.current_frame_index(), Some(0));
        }
    }

    #[test]
    fn without_auto_select_starts_stopped() {
        let mut provider = textures();
        let config = AtlasConfig {
            auto_select_first: false,
            ..Default::default()
        };
        let mut sprite = SpriteComponent::new().with_config(config);
        assert!(sprite.load_sheet(&mut provider, "hero.png", Some(HERO)));
        assert_eq!(sprite.mode(), PlaybackMode::Stopped);
        assert_eq!(sprite.current_frame_index(), None);
        assert!(!sprite.advance(1.0));
    }

    #[test]
    fn missing_texture_fails() {
        let mut sprite = SpriteComponent::new();
        assert!(!sprite.load_atlas(Some(HERO), None));
        assert!(sprite.state_names().is_empty());
        assert!(!sprite.select_state("run"));
        sprite.seek_frame(1);
        assert_eq!(sprite.current_frame_index(), None);

        let mut provider = textures();
        assert!(!sprite.load_sheet(&mut provider, "nope.png", None));
        let viewport = Viewport::sized(100.0, 100.0);
        assert!(sprite.generate_geometry(&provider, &viewport).is_none());
    }

    #[test]
    fn no_descriptor_uses_whole_texture() {
        let mut provider = textures();
        let mut sprite = SpriteComponent::new();
        assert!(sprite.load_sheet(&mut provider, "sky.png", None));
        assert_eq!(sprite.state_names(), ["sky"]);
        assert_eq!(sprite.frame_count(), 1);
        assert_eq!(sprite.current_state().unwrap().frame_rate, 30.0);
    }

    #[test]
    fn malformed_entry_does_not_fail_load() {
        let xml = r#"<TextureAtlas>
            <SubTexture name="a_0" x="0" y="0" height="8"/>
            <SubTexture name="a_1" x="8" y="0" width="8" height="8"/>
        </TextureAtlas>"#;
        let mut provider = textures();
        let mut sprite = SpriteComponent::new();
        assert!(sprite.load_sheet(&mut provider, "hero.png", Some(xml)));
        assert_eq!(sprite.atlas().cells().len(), 1);
        assert_eq!(sprite.atlas().cells()[0].name, "a_1");
    }

    #[test]
    fn all_entries_malformed_fails_but_keeps_texture() {
        let xml = r#"<TextureAtlas><SubTexture name="a" x="0"/></TextureAtlas>"#;
        let mut provider = textures();
        let mut sprite = SpriteComponent::new();
        assert!(!sprite.load_sheet(&mut provider, "hero.png", Some(xml)));
        assert!(sprite.state_names().is_empty());

        let draw = sprite
            .generate_geometry(&provider, &Viewport::sized(10.0, 10.0))
            .unwrap();
        let SpriteGeometry::Quad(quad) = draw.geometry else {
            panic!("expected whole-texture quad");
        };
        assert_eq!(quad.max, Vec2::new(128.0, 32.0));
        assert_eq!(quad.uv_max, Vec2::ONE);
    }

    #[test]
    fn reloading_same_sheet_keeps_playback() {
        let (mut sprite, mut provider) = loaded();
        sprite.seek_frame(1);
        assert!(sprite.load_sheet(&mut provider, "hero.png", Some(HERO)));
        assert_eq!(sprite.current_frame_index(), Some(1));

        // A different descriptor is a real reload.
        assert!(sprite.load_sheet(&mut provider, "hero.png", None));
        assert_eq!(sprite.state_names(), ["hero"]);
        assert_eq!(sprite.current_frame_index(), Some(0));
    }

    #[test]
    fn advance_moves_frames_and_scroll() {
        let (mut sprite, _) = loaded();
        sprite.set_scroll_speed(Vec2::new(0.5, 0.0));
        assert!(sprite.advance(0.1));
        assert_eq!(sprite.current_frame_index(), Some(1));
        assert!((sprite.scroll_offset().x - 0.05).abs() < 1e-6);

        sprite.pause();
        assert!(!sprite.advance(0.5));
        assert!((sprite.scroll_offset().x - 0.05).abs() < 1e-6);
    }

    #[test]
    fn non_finite_delta_leaves_scroll_and_frame() {
        let (mut sprite, _) = loaded();
        sprite.set_scroll_speed(Vec2::new(0.5, 0.0));
        assert!(!sprite.advance(f32::NAN));
        assert!(!sprite.advance(f32::INFINITY));
        assert_eq!(sprite.current_frame_index(), Some(0));
        assert_eq!(sprite.scroll_offset(), Vec2::ZERO);

        assert!(sprite.advance(0.1));
        assert!((sprite.scroll_offset().x - 0.05).abs() < 1e-6);
    }

    #[test]
    fn cached_loads_share_one_atlas() {
        let mut provider = textures();
        let config = AtlasConfig {
            auto_select_first: false,
            ..AtlasConfig::default()
        };
        let mut cache = AtlasCache::new(config.clone());
        let mut a = SpriteComponent::new();
        let mut b = SpriteComponent::new();

        assert!(a.load_cached(&mut provider, &mut cache, "hero.png", Some(HERO)));
        assert!(b.load_cached(&mut provider, &mut cache, "hero.png", Some(HERO)));
        assert!(Arc::ptr_eq(a.atlas(), b.atlas()));
        assert_eq!(cache.len(), 1);
        assert_eq!(a.config(), &config);
        assert_eq!(a.mode(), PlaybackMode::Stopped);

        // Playback stays per instance.
        assert!(a.select_state("idle"));
        assert!(b.select_state("run"));
        assert_eq!(a.current_state_name(), Some("idle"));
        assert_eq!(b.current_state_name(), Some("run"));
    }

    #[test]
    fn cached_load_without_texture_fails() {
        let mut provider = textures();
        let mut cache = AtlasCache::default();
        let mut sprite = SpriteComponent::new();
        assert!(!sprite.load_cached(&mut provider, &mut cache, "missing.png", None));
        assert!(sprite.texture().is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn seek_pauses() {
        let (mut sprite, _) = loaded();
        sprite.seek_percent(1.0);
        assert_eq!(sprite.current_frame_index(), Some(1));
        assert!(sprite.is_paused());
        sprite.play();
        assert!(!sprite.is_paused());
    }

    #[test]
    fn windowed_geometry_uses_current_cell() {
        let (mut sprite, provider) = loaded();
        sprite.placement.position = Vec2::new(10.0, 20.0);
        sprite.seek_frame(1);

        let draw = sprite
            .generate_geometry(&provider, &Viewport::sized(640.0, 480.0))
            .unwrap();
        let v = draw.geometry.vertices();
        assert_eq!(v[0].pos(), Vec2::new(10.0, 20.0));
        assert_eq!(v[5].pos(), Vec2::new(42.0, 52.0));
        assert_eq!(v[0].uv(), Vec2::new(0.25, 0.0));
        assert_eq!(v[5].uv(), Vec2::new(0.5, 1.0));
    }

    #[test]
    fn fullscreen_geometry_fits_viewport() {
        let mut provider = textures();
        let mut sprite = SpriteComponent::new().with_fullscreen(true);
        sprite.load_sheet(&mut provider, "sky.png", None);

        let draw = sprite
            .generate_geometry(&provider, &Viewport::sized(1920.0, 1080.0))
            .unwrap();
        let SpriteGeometry::Quad(quad) = draw.geometry else {
            panic!("expected a quad");
        };
        assert!((quad.min.x - 240.0).abs() < 1e-3);
        assert!((quad.max.x - 1680.0).abs() < 1e-3);
        assert!((quad.max.y - 1080.0).abs() < 1e-3);
    }

    #[test]
    fn texture_level_animation_swaps_handle_and_size() {
        let (sprite, mut provider) = loaded();
        let base = sprite.texture().unwrap().handle;
        let frame = provider.add("hero_frame2.png", 256, 64);
        provider.frames.insert(base, frame);

        let draw = sprite
            .generate_geometry(&provider, &Viewport::sized(10.0, 10.0))
            .unwrap();
        assert_eq!(draw.texture, frame);
        // run_0 is 32x32 of a 256x64 texture now.
        let v = draw.geometry.vertices();
        assert_eq!(v[5].uv(), Vec2::new(0.125, 0.5));
    }

    #[test]
    fn stale_playback_renders_whole_texture() {
        let (mut sprite, provider) = loaded();
        let tiny = Arc::new(Atlas::default());
        sprite.set_atlas(tiny, LoadedTexture::new("hero.png", TextureHandle(1), 128, 32));
        assert_eq!(sprite.current_frame_index(), None);
        let draw = sprite
            .generate_geometry(&provider, &Viewport::sized(10.0, 10.0))
            .unwrap();
        assert!(matches!(draw.geometry, SpriteGeometry::Quad(_)));
    }
}
