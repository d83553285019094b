use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunable constants for the playfield, entities and level progression.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield size in field units (y grows downward)
    pub field_width: f32,
    pub field_height: f32,

    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub player_start_x: f32,
    pub player_start_y: f32,

    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,
    pub enemy_bullet_speed: f32,

    pub enemy_width: f32,
    pub enemy_height: f32,
    /// Top-left corner of the first enemy in the grid
    pub grid_origin_x: f32,
    pub grid_origin_y: f32,
    /// Distance between neighbouring grid cells
    pub grid_pitch_x: f32,
    pub grid_pitch_y: f32,
    /// Vertical drop applied each time the formation reverses
    pub step_down: f32,
    /// An enemy whose bottom edge reaches this line ends the game
    pub loss_threshold: f32,

    pub base_rows: usize,
    pub base_cols: usize,
    pub base_speed: f32,

    /// Enemy fire interval in ticks is `fire_interval_base - level * fire_interval_step`,
    /// never lower than `fire_interval_floor`
    pub fire_interval_base: u32,
    pub fire_interval_step: u32,
    pub fire_interval_floor: u32,

    pub max_level: u32,
    pub points_per_kill: u32,
    pub level_clear_delay_ms: u64,

    /// Target time between frames in the terminal front-end
    pub frame_interval_ms: u64,
    /// How long a key counts as held after its last press on terminals
    /// that never report key releases
    pub key_hold_ms: u64,
    /// Same for the fire key; longer than common OS auto-repeat delays
    pub fire_hold_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,

            player_width: 60.0,
            player_height: 20.0,
            player_speed: 6.0,
            player_start_x: 370.0,
            player_start_y: 560.0,

            bullet_width: 6.0,
            bullet_height: 16.0,
            bullet_speed: 10.0,
            enemy_bullet_speed: 7.0,

            enemy_width: 40.0,
            enemy_height: 28.0,
            grid_origin_x: 80.0,
            grid_origin_y: 50.0,
            grid_pitch_x: 60.0,
            grid_pitch_y: 50.0,
            step_down: 18.0,
            loss_threshold: 580.0,

            base_rows: 4,
            base_cols: 5,
            base_speed: 2.0,

            fire_interval_base: 60,
            fire_interval_step: 8,
            fire_interval_floor: 10,

            max_level: 5,
            points_per_kill: 1,
            level_clear_delay_ms: 1800,

            frame_interval_ms: 16,
            key_hold_ms: 150,
            fire_hold_ms: 600,
        }
    }
}

impl GameConfig {
    /// Reads a JSON config file. Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text).wrap_err_with(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config)
    }

    pub fn level_clear_delay(&self) -> Duration {
        Duration::from_millis(self.level_clear_delay_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }

    pub fn fire_hold(&self) -> Duration {
        Duration::from_millis(self.fire_hold_ms)
    }
}
