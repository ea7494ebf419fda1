use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Frame rate for states built from a single, unsequenced region.
pub const DEFAULT_SINGLE_FRAME_RATE: f32 = 30.0;
/// Frame rate for states built from `name_N` sequences.
pub const DEFAULT_SEQUENCE_FRAME_RATE: f32 = 10.0;

/// How cells are ordered inside a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOrder {
    /// Document order, regardless of the parsed frame index.
    #[default]
    Insertion,
    /// Ascending parsed frame index. Cells without a usable index keep their
    /// document order after all indexed cells.
    Index,
}

/// Configuration for building an atlas from a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub frame_order: FrameOrder,
    /// Frames per second for single-region states (default: 30).
    pub single_frame_rate: f32,
    /// Frames per second for sequenced states (default: 10).
    pub sequence_frame_rate: f32,
    /// Per-state frame rate overrides, keyed by state name.
    pub frame_rates: HashMap<String, f32>,
    /// Select state 0 as soon as an atlas loads.
    pub auto_select_first: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            frame_order: FrameOrder::Insertion,
            single_frame_rate: DEFAULT_SINGLE_FRAME_RATE,
            sequence_frame_rate: DEFAULT_SEQUENCE_FRAME_RATE,
            frame_rates: HashMap::new(),
            auto_select_first: true,
        }
    }
}

impl AtlasConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Copy of this config with every non-positive or non-finite frame rate
    /// replaced by its built-in default.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        out.single_frame_rate =
            sanitize_rate("single_frame_rate", self.single_frame_rate, DEFAULT_SINGLE_FRAME_RATE);
        out.sequence_frame_rate = sanitize_rate(
            "sequence_frame_rate",
            self.sequence_frame_rate,
            DEFAULT_SEQUENCE_FRAME_RATE,
        );
        out.frame_rates.retain(|state, rate| {
            let ok = is_valid_rate(*rate);
            if !ok {
                log::warn!("ignoring frame rate override {rate} for state `{state}`: must be > 0");
            }
            ok
        });
        out
    }

    /// Frame rate a newly created state should use.
    pub(crate) fn rate_for(&self, state: &str, sequenced: bool) -> f32 {
        if let Some(rate) = self.frame_rates.get(state) {
            return *rate;
        }
        if sequenced {
            self.sequence_frame_rate
        } else {
            self.single_frame_rate
        }
    }
}

fn is_valid_rate(rate: f32) -> bool {
    rate.is_finite() && rate > 0.0
}

fn sanitize_rate(field: &str, rate: f32, fallback: f32) -> f32 {
    if is_valid_rate(rate) {
        rate
    } else {
        log::warn!("{field} = {rate} is not a positive frame rate, using {fallback}");
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AtlasConfig::default();
        assert_eq!(cfg.frame_order, FrameOrder::Insertion);
        assert_eq!(cfg.single_frame_rate, 30.0);
        assert_eq!(cfg.sequence_frame_rate, 10.0);
        assert!(cfg.auto_select_first);
    }

    #[test]
    fn sanitize_replaces_bad_rates() {
        let mut cfg = AtlasConfig {
            single_frame_rate: 0.0,
            sequence_frame_rate: f32::NAN,
            ..Default::default()
        };
        cfg.frame_rates.insert("run".into(), -5.0);
        cfg.frame_rates.insert("walk".into(), 12.0);

        let clean = cfg.sanitized();
        assert_eq!(clean.single_frame_rate, DEFAULT_SINGLE_FRAME_RATE);
        assert_eq!(clean.sequence_frame_rate, DEFAULT_SEQUENCE_FRAME_RATE);
        assert!(!clean.frame_rates.contains_key("run"));
        assert_eq!(clean.frame_rates["walk"], 12.0);
    }

    #[test]
    fn override_wins_over_default() {
        let mut cfg = AtlasConfig::default();
        cfg.frame_rates.insert("run".into(), 24.0);
        assert_eq!(cfg.rate_for("run", true), 24.0);
        assert_eq!(cfg.rate_for("jump", true), 10.0);
        assert_eq!(cfg.rate_for("idle", false), 30.0);
    }

    #[test]
    fn parse_partial_json() {
        let cfg = AtlasConfig::from_json(r#"{ "frame_order": "index", "sequence_frame_rate": 12 }"#)
            .unwrap();
        assert_eq!(cfg.frame_order, FrameOrder::Index);
        assert_eq!(cfg.sequence_frame_rate, 12.0);
        assert_eq!(cfg.single_frame_rate, 30.0);
    }
}
