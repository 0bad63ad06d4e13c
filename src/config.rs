use serde::{Deserialize, Serialize};

use crate::{camera::CameraSettings, world::BoundsCheck};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub dungeon: DungeonConfig,
    pub raycast: RaycastConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DungeonConfig {
    pub room_count: u32,               // Rooms placed before the world is cleaned up
    pub seed: Option<u64>,             // Fixed seed for rooms, loot and noise
    pub default_light_distance: f32,   // Used by lights without their own distance
    pub light_step: f32,               // Lighting ray fidelity in pixels
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            room_count: 25,
            seed: None,
            default_light_distance: 64.0,
            light_step: 4.0,
            screen_width: 128.0,
            screen_height: 128.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RaycastConfig {
    pub grid: f32, // Pixels per level unit
    pub wall_scale: f32,
    pub texture_repeat_factor: f32,
    pub texture_overlap_compensation: f32,
    pub ray_fidelity: f32,
    pub player_speed: f32, // Pixels per second
    pub bounds_check: BoundsCheck,
    pub camera: CameraSettings,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            grid: 48.0,
            wall_scale: 0.25,
            texture_repeat_factor: 5.0,
            texture_overlap_compensation: 1.0,
            ray_fidelity: 3.0,
            player_speed: 200.0,
            bounds_check: BoundsCheck::Transposed,
            camera: CameraSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_config_matches_defaults() {
        let config: Config = toml::from_str(include_str!("../test_data/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_sections_fall_back() {
        let config: Config = toml::from_str("[dungeon]\nroom_count = 3\nseed = 9").unwrap();
        assert_eq!(config.dungeon.room_count, 3);
        assert_eq!(config.dungeon.seed, Some(9));
        assert_eq!(config.raycast, RaycastConfig::default());
    }
}
