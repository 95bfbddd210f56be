//! Built-in game presets for capacity and regeneration rate.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GamePreset {
    pub key: &'static str,
    pub name: &'static str,
    /// What the game calls its stamina.
    pub resource: &'static str,
    pub max_capacity: u32,
    pub minutes_per_unit: u32,
}

pub const PRESETS: &[GamePreset] = &[
    GamePreset {
        key: "hsr",
        name: "Honkai: Star Rail",
        resource: "Trailblaze Power",
        max_capacity: 240,
        minutes_per_unit: 6,
    },
    GamePreset {
        key: "wuwa",
        name: "Wuthering Waves",
        resource: "Waveplates",
        max_capacity: 240,
        minutes_per_unit: 6,
    },
    GamePreset {
        key: "genshin",
        name: "Genshin Impact",
        resource: "Original Resin",
        max_capacity: 200,
        minutes_per_unit: 8,
    },
];

pub fn presets() -> &'static [GamePreset] {
    PRESETS
}

/// Case-insensitive lookup by key.
pub fn find_preset(key: &str) -> Option<&'static GamePreset> {
    PRESETS.iter().find(|p| p.key.eq_ignore_ascii_case(key.trim()))
}
