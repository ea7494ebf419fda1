//! Per-instance playback over a shared [`Atlas`].
//!
//! The atlas is borrowed per call; a playback state holds only indices into it.

use crate::components::atlas::Atlas;

/// Coarse playback status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// No state selected.
    Stopped,
    Playing,
    Paused,
}

/// Which frame of which state a sprite is showing, and how long it has shown it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    current_state: Option<usize>,
    current_frame: usize,
    /// Seconds since the last frame advance.
    frame_time: f32,
    paused: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> PlaybackMode {
        match (self.current_state, self.paused) {
            (None, _) => PlaybackMode::Stopped,
            (Some(_), false) => PlaybackMode::Playing,
            (Some(_), true) => PlaybackMode::Paused,
        }
    }

    pub fn current_state(&self) -> Option<usize> {
        self.current_state
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Switch to the state called `name`, rewinding to frame 0.
    ///
    /// Returns false and changes nothing when the atlas has no such state.
    /// The paused flag is left alone.
    pub fn select(&mut self, atlas: &Atlas, name: &str) -> bool {
        match atlas.find_state(name) {
            Some(index) => self.select_index(atlas, index),
            None => false,
        }
    }

    /// Switch to state `index`, rewinding to frame 0.
    pub fn select_index(&mut self, atlas: &Atlas, index: usize) -> bool {
        if atlas.state(index).is_none() {
            return false;
        }
        self.current_state = Some(index);
        self.current_frame = 0;
        self.frame_time = 0.0;
        true
    }

    /// Forget the selected state, e.g. after the atlas was rebuilt.
    pub fn reset(&mut self) {
        self.current_state = None;
        self.current_frame = 0;
        self.frame_time = 0.0;
    }

    pub fn play(&mut self) {
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Advance by `dt` seconds. Returns true if the frame changed.
    ///
    /// At most one frame is stepped per call, and only `dt` (not a whole
    /// frame period) is taken back off the timer. Large deltas therefore
    /// never skip frames; playback falls behind wall-clock time instead.
    pub fn advance(&mut self, atlas: &Atlas, dt: f32) -> bool {
        if self.paused || !(dt > 0.0 && dt.is_finite()) {
            return false;
        }
        let Some(state) = self.current_state.and_then(|s| atlas.state(s)) else {
            return false;
        };
        let frame_count = state.frame_count();
        if frame_count == 0 {
            return false;
        }

        self.frame_time += dt;
        if self.frame_time >= state.frame_duration() {
            self.current_frame = (self.current_frame + 1) % frame_count;
            self.frame_time -= dt;
            return true;
        }
        false
    }

    /// Jump to `frame` (clamped to the state's range) and pause.
    pub fn seek_frame(&mut self, atlas: &Atlas, frame: i32) {
        let Some(count) = self.selected_frame_count(atlas) else {
            return;
        };
        self.paused = true;
        self.current_frame = frame.clamp(0, count as i32 - 1) as usize;
    }

    /// Jump to `percent` (clamped to `[0, 1]`) of the way through the state and pause.
    pub fn seek_percent(&mut self, atlas: &Atlas, percent: f32) {
        let Some(count) = self.selected_frame_count(atlas) else {
            return;
        };
        self.paused = true;
        let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 1.0) };
        let last = (count - 1) as f32;
        self.current_frame = ((percent * last).floor() as usize).min(count - 1);
    }

    fn selected_frame_count(&self, atlas: &Atlas) -> Option<usize> {
        let count = atlas.state(self.current_state?)?.frame_count();
        (count > 0).then_some(count)
    }
}
