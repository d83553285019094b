use rand::Rng;

use super::enemy::Enemy;
use super::hitbox::Hitbox;
use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarchDirection {
    Left,
    Right,
}

impl MarchDirection {
    pub fn sign(self) -> f32 {
        match self {
            MarchDirection::Left => -1.0,
            MarchDirection::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            MarchDirection::Left => MarchDirection::Right,
            MarchDirection::Right => MarchDirection::Left,
        }
    }
}

/// The grid of invaders. All active enemies march sideways together and the
/// whole block drops a step whenever one of them crosses a side wall.
#[derive(Debug, Clone)]
pub struct Formation {
    /// Row-major; this is also the order bullets are tested against
    pub enemies: Vec<Enemy>,
    pub direction: MarchDirection,
    /// Horizontal distance per tick
    pub speed: f32,
    /// Vertical drop per reversal
    pub step_down: f32,
    field_width: f32,
    loss_threshold: f32,
}

impl Formation {
    /// Lays out `rows * cols` enemies on the configured grid, marching right.
    pub fn new(rows: usize, cols: usize, speed: f32, config: &GameConfig) -> Self {
        let mut enemies = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                enemies.push(Enemy::new(Hitbox::new(
                    config.grid_origin_x + col as f32 * config.grid_pitch_x,
                    config.grid_origin_y + row as f32 * config.grid_pitch_y,
                    config.enemy_width,
                    config.enemy_height,
                )));
            }
        }
        Self::from_enemies(enemies, speed, config)
    }

    /// Formation over an arbitrary set of enemies
    pub fn from_enemies(enemies: Vec<Enemy>, speed: f32, config: &GameConfig) -> Self {
        Self {
            enemies,
            direction: MarchDirection::Right,
            speed,
            step_down: config.step_down,
            field_width: config.field_width,
            loss_threshold: config.loss_threshold,
        }
    }

    pub fn update(&mut self) {
        let dx = self.speed * self.direction.sign();
        let mut hit_edge = false;

        for enemy in self.enemies.iter_mut().filter(|e| e.active) {
            enemy.hitbox.x += dx;
            // Checked after the move, so the reversal lags the wall by a tick
            if enemy.hitbox.x < 0.0 || enemy.hitbox.right() > self.field_width {
                hit_edge = true;
            }
        }

        if hit_edge {
            self.direction = self.direction.reversed();
            for enemy in self.enemies.iter_mut().filter(|e| e.active) {
                enemy.hitbox.y += self.step_down;
            }
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// True once any active enemy's bottom edge touches the loss line.
    pub fn reached_bottom(&self) -> bool {
        self.active()
            .any(|e| e.hitbox.bottom() >= self.loss_threshold)
    }

    pub fn is_all_defeated(&self) -> bool {
        self.active().next().is_none()
    }

    /// Uniformly random active enemy, or `None` when the formation is wiped out.
    pub fn random_active<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Enemy> {
        let count = self.active_count();
        if count == 0 {
            return None;
        }
        self.active().nth(rng.random_range(0..count))
    }
}
