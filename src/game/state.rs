use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Waiting for the start command; nothing is simulated
    Ready,
    Playing,
    /// Level cleared. Terminal on the last level, otherwise the next level follows after a delay
    Win,
    GameOver,
}

/// Per-level difficulty, derived deterministically from the level number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelParams {
    pub rows: usize,
    pub cols: usize,
    pub speed: f32,
    /// Ticks between enemy shots
    pub fire_interval: u32,
}

impl LevelParams {
    /// rows grow every other level, columns alternate, speed grows by one per level
    /// and the fire interval shrinks until it hits the configured floor.
    pub fn for_level(level: u32, config: &GameConfig) -> Self {
        let step = level.saturating_sub(1);
        let fire_interval = config
            .fire_interval_base
            .saturating_sub(level.saturating_mul(config.fire_interval_step))
            .max(config.fire_interval_floor)
            .max(1);

        Self {
            rows: config.base_rows + (step / 2) as usize,
            cols: config.base_cols + (step % 2) as usize,
            speed: config.base_speed + step as f32,
            fire_interval,
        }
    }
}
