use std::collections::HashMap;
use std::sync::Arc;

use crate::api::config::AtlasConfig;
use crate::api::types::LoadedTexture;
use crate::assets::descriptor::{parse_descriptor, RawRegion};
use crate::components::atlas::Atlas;

/// Build the atlas for a sheet.
///
/// Without a descriptor, or when the descriptor cannot be read as a document
/// at all, the atlas is a single state covering the whole texture. An empty
/// atlas comes back when the descriptor parsed but held no valid entry.
pub fn build_atlas(descriptor: Option<&str>, texture: &LoadedTexture, config: &AtlasConfig) -> Atlas {
    let regions = match descriptor {
        Some(text) => match parse_descriptor(text) {
            Ok(parsed) => parsed.regions,
            Err(e) => {
                log::warn!(
                    "descriptor for `{}` unreadable ({e}), using the whole texture",
                    texture.path
                );
                vec![RawRegion::whole_texture(&texture.path, texture.size)]
            }
        },
        None => vec![RawRegion::whole_texture(&texture.path, texture.size)],
    };
    Atlas::build(&regions, config)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AtlasKey {
    texture_path: String,
    descriptor: Option<String>,
}

/// Shares one built [`Atlas`] among every sprite showing the same sheet and
/// descriptor.
pub struct AtlasCache {
    config: AtlasConfig,
    atlases: HashMap<AtlasKey, Arc<Atlas>>,
}

impl AtlasCache {
    pub fn new(config: AtlasConfig) -> Self {
        Self {
            config,
            atlases: HashMap::new(),
        }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Return the cached atlas for this sheet, building it on first use.
    pub fn get_or_build(&mut self, texture: &LoadedTexture, descriptor: Option<&str>) -> Arc<Atlas> {
        let key = AtlasKey {
            texture_path: texture.path.clone(),
            descriptor: descriptor.map(str::to_string),
        };
        if let Some(atlas) = self.atlases.get(&key) {
            return Arc::clone(atlas);
        }
        let atlas = Arc::new(build_atlas(descriptor, texture, &self.config));
        self.atlases.insert(key, Arc::clone(&atlas));
        atlas
    }

    /// Drop every cached atlas built from `texture_path`. Sprites keep the
    /// copies they already hold until they reload.
    pub fn invalidate(&mut self, texture_path: &str) {
        self.atlases.retain(|key, _| key.texture_path != texture_path);
    }

    pub fn len(&self) -> usize {
        self.atlases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atlases.is_empty()
    }

    pub fn clear(&mut self) {
        self.atlases.clear();
    }
}

impl Default for AtlasCache {
    fn default() -> Self {
        Self::new(AtlasConfig::default())
    }
}
