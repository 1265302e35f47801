//! Tunable generation constants.
//!
//! The defaults are the compatibility values: any change alters the random
//! draw sequence and therefore every level produced from an existing seed.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Smallest room span drawn when the region is large enough.
    pub room_min: i32,
    /// Room spans are drawn below this value once a region exceeds it.
    pub room_max: i32,
    /// Regions narrower than this on either axis are not carved.
    pub area_min: i32,
    /// Carving stops once this many rooms exist.
    pub room_cap: usize,
    /// Lowest coordinate a room corner or corridor may occupy.
    pub band_min: i32,
    /// Highest coordinate a room corner or corridor may occupy.
    pub band_max: i32,
    pub hallway: HallwayConfig,
    pub voids: VoidConfig,
    /// Rejected positions tolerated before a mandatory miniset fails.
    pub miniset_tries: u32,
    /// Generation attempts before giving up.
    pub max_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            room_min: 4,
            room_max: 10,
            area_min: 2,
            room_cap: 80,
            band_min: 1,
            band_max: 38,
            hallway: HallwayConfig::default(),
            voids: VoidConfig::default(),
            miniset_tries: 4000,
            max_attempts: 256,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HallwayConfig {
    /// Percent chance per remaining tile to steer horizontally.
    pub horizontal_bias: i32,
    pub horizontal_bias_cap: i32,
    /// Percent chance per remaining tile to steer vertically.
    pub vertical_bias: i32,
    pub vertical_bias_cap: i32,
    /// Below this distance an axis-aligned walk is forced onto the other axis.
    pub redirect_distance: i32,
    /// Widening rolls below this value widen that side of the corridor.
    pub widen_below: i32,
    /// Steps a single corridor may take before the attempt is abandoned.
    pub step_cap: u32,
}

impl Default for HallwayConfig {
    fn default() -> Self {
        Self {
            horizontal_bias: 2,
            horizontal_bias_cap: 30,
            vertical_bias: 5,
            vertical_bias_cap: 80,
            redirect_distance: 10,
            widen_below: 50,
            step_cap: 4000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VoidConfig {
    /// Filling continues while more void cells than this remain.
    pub threshold: usize,
    pub tries: u32,
    pub max_span_x: i32,
    pub max_span_y: i32,
    /// Grown rooms must exceed this span on both axes to be kept.
    pub min_span: i32,
}

impl Default for VoidConfig {
    fn default() -> Self {
        Self { threshold: 700, tries: 100, max_span_x: 12, max_span_y: 14, min_span: 5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_overrides_keep_remaining_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{ "max_attempts": 3, "hallway": { "step_cap": 10 } }"#)
                .expect("config should parse");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.hallway.step_cap, 10);
        assert_eq!(config.hallway.vertical_bias_cap, 80);
        assert_eq!(config.room_cap, 80);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed = serde_json::from_str::<GeneratorConfig>(r#"{ "room_cpa": 3 }"#);
        assert!(parsed.is_err());
    }
}
