//! Cell and state tables built from descriptor regions.
//!
//! Region names carry the grouping: `run_3.png` is frame 3 of state `run`,
//! while `idle.png` (no underscore) is a state of its own with one cell.

use std::collections::HashMap;

use glam::{IVec2, UVec2, Vec2};

use crate::api::config::{AtlasConfig, FrameOrder};
use crate::assets::descriptor::RawRegion;

/// One named rectangle of the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub name: String,
    /// Pixel offset of the top-left corner within the sheet.
    pub offset: IVec2,
    /// Pixel-space anchor relative to the cell origin.
    pub pivot: Vec2,
    pub size: UVec2,
    /// Parsed frame index, or -1 when the name carries none.
    pub frame_index: i32,
}

/// An ordered animation clip.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub name: String,
    /// Frames per second, always > 0.
    pub frame_rate: f32,
    /// Indices into [`Atlas::cells`] in playback order. Never empty.
    pub cells: Vec<usize>,
}

impl State {
    pub fn frame_count(&self) -> usize {
        self.cells.len()
    }

    /// Seconds each frame stays on screen.
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.frame_rate
    }
}

/// What the part of a region name after its last underscore says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameToken<'a> {
    /// No underscore: the region is a standalone state.
    Standalone,
    /// `state_N`: frame `N` of a sequence.
    Index(i32),
    /// `state_xyz` where `xyz` is not an integer.
    Invalid(&'a str),
}

/// Split a region name into its state name and frame token.
///
/// The name is split on the last `_`. Everything after it up to the next `.`
/// is the frame index. Without an underscore the state name is the whole
/// name minus its extension.
pub fn split_state_and_frame(name: &str) -> (&str, FrameToken<'_>) {
    match name.rfind('_') {
        None => {
            let state = match name.rfind('.') {
                Some(dot) => &name[..dot],
                None => name,
            };
            (state, FrameToken::Standalone)
        }
        Some(underscore) => {
            let state = &name[..underscore];
            let tail = &name[underscore + 1..];
            let number = match tail.find('.') {
                Some(dot) => &tail[..dot],
                None => tail,
            };
            let token = match number.parse::<i32>() {
                Ok(index) => FrameToken::Index(index),
                Err(_) => FrameToken::Invalid(number),
            };
            (state, token)
        }
    }
}

/// Immutable cell + state tables for one sprite sheet.
///
/// Shared read-only (usually behind an `Arc`) by every sprite showing the sheet.
#[derive(Debug, Clone, Default)]
pub struct Atlas {
    cells: Vec<Cell>,
    states: Vec<State>,
    state_index: HashMap<String, usize>,
}

impl Atlas {
    /// Group regions into cells and states.
    ///
    /// `config` is sanitized first, so every resulting state has a positive
    /// frame rate.
    pub fn build(regions: &[RawRegion], config: &AtlasConfig) -> Self {
        let config = config.sanitized();
        let mut atlas = Atlas::default();

        for region in regions {
            let (Ok(x), Ok(y)) = (i32::try_from(region.x), i32::try_from(region.y)) else {
                log::warn!(
                    "region `{}`: offset ({}, {}) is out of range; skipped",
                    region.name,
                    region.x,
                    region.y
                );
                continue;
            };
            let (state_name, token) = split_state_and_frame(&region.name);

            let frame_index = match token {
                FrameToken::Standalone => {
                    if atlas.state_index.contains_key(state_name) {
                        log::warn!(
                            "region `{}` duplicates state `{state_name}`; skipped",
                            region.name
                        );
                        continue;
                    }
                    -1
                }
                FrameToken::Index(index) => index,
                FrameToken::Invalid(text) => {
                    log::warn!(
                        "region `{}`: frame index {text:?} is not an integer, appending to `{state_name}`",
                        region.name
                    );
                    -1
                }
            };

            let sequenced = !matches!(token, FrameToken::Standalone);
            let state = atlas.state_or_insert(state_name, &config, sequenced);

            let cell = atlas.cells.len();
            atlas.cells.push(Cell {
                name: region.name.clone(),
                offset: IVec2::new(x, y),
                pivot: Vec2::new(region.pivot_x as f32, region.pivot_y as f32),
                size: UVec2::new(region.width, region.height),
                frame_index,
            });
            atlas.states[state].cells.push(cell);
        }

        if config.frame_order == FrameOrder::Index {
            let cells = &atlas.cells;
            for state in &mut atlas.states {
                // Stable: equal keys keep document order, unindexed cells go last.
                state.cells.sort_by_key(|&c| {
                    let index = cells[c].frame_index;
                    (index < 0, index)
                });
            }
        }

        log::debug!(
            "built atlas: {} cells in {} states",
            atlas.cells.len(),
            atlas.states.len()
        );
        atlas
    }

    fn state_or_insert(&mut self, name: &str, config: &AtlasConfig, sequenced: bool) -> usize {
        if let Some(&index) = self.state_index.get(name) {
            return index;
        }
        let index = self.states.len();
        self.states.push(State {
            name: name.to_string(),
            frame_rate: config.rate_for(name, sequenced),
            cells: Vec::new(),
        });
        self.state_index.insert(name.to_string(), index);
        index
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn state(&self, index: usize) -> Option<&State> {
        self.states.get(index)
    }

    /// Index of the state called `name`.
    pub fn find_state(&self, name: &str) -> Option<usize> {
        self.state_index.get(name).copied()
    }

    /// State names in creation order.
    pub fn state_names(&self) -> Vec<&str> {
        self.states.iter().map(|s| s.name.as_str()).collect()
    }

    /// Cell shown at `frame` of state `state`, if both are in range.
    pub fn frame_cell(&self, state: usize, frame: usize) -> Option<&Cell> {
        let cell = *self.states.get(state)?.cells.get(frame)?;
        self.cells.get(cell)
    }
}
