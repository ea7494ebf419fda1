use serde::{Deserialize, Serialize};

use crate::components::sprite::SpriteComponent;
use crate::error::ManifestError;

/// Newest manifest layout this crate writes.
pub const CURRENT_MANIFEST_VERSION: u8 = 2;

/// Persisted definition of a sprite: which sheet it shows and how.
/// Loaded from / saved to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteManifest {
    #[serde(default = "current_version")]
    pub version: u8,
    /// Path of the sprite sheet texture (e.g., "sprites/hero.png").
    pub sheet: String,
    /// Path of the atlas descriptor, if the sheet has one.
    #[serde(default)]
    pub descriptor: Option<String>,
    /// Per-axis scale applied in windowed mode.
    #[serde(default = "unit_scale")]
    pub scale: [f32; 2],
    /// UV scroll velocity in texture widths/heights per second.
    #[serde(default)]
    pub scroll_speed: [f32; 2],
    #[serde(default)]
    pub fullscreen: bool,
}

fn current_version() -> u8 {
    CURRENT_MANIFEST_VERSION
}

fn unit_scale() -> [f32; 2] {
    [1.0, 1.0]
}

impl SpriteManifest {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            version: CURRENT_MANIFEST_VERSION,
            sheet: sheet.into(),
            descriptor: None,
            scale: unit_scale(),
            scroll_speed: [0.0, 0.0],
            fullscreen: false,
        }
    }

    /// Capture the persisted settings of `sprite`.
    pub fn capture(
        sprite: &SpriteComponent,
        sheet: impl Into<String>,
        descriptor: Option<String>,
    ) -> Self {
        Self {
            version: CURRENT_MANIFEST_VERSION,
            sheet: sheet.into(),
            descriptor,
            scale: sprite.placement.scale.to_array(),
            scroll_speed: sprite.scroll_speed().to_array(),
            fullscreen: sprite.fullscreen,
        }
    }

    /// Copy the persisted settings onto `sprite`. The sheet itself is loaded
    /// separately, since reading the descriptor file is up to the caller.
    pub fn apply(&self, sprite: &mut SpriteComponent) {
        sprite.placement.scale = self.scale.into();
        sprite.set_scroll_speed(self.scroll_speed.into());
        sprite.fullscreen = self.fullscreen;
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        if manifest.version > CURRENT_MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion {
                found: manifest.version,
                supported: CURRENT_MANIFEST_VERSION,
            });
        }
        Ok(manifest)
    }

    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
