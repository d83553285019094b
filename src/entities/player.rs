use super::hitbox::Hitbox;
use super::projectile::Projectile;
use crate::config::GameConfig;

#[derive(Debug, Clone)]
pub struct Player {
    pub hitbox: Hitbox,
    pub speed: f32,
    /// Right-most allowed x, `field_width - width`
    max_x: f32,
}

impl Player {
    pub fn new(hitbox: Hitbox, speed: f32, field_width: f32) -> Self {
        Self {
            max_x: (field_width - hitbox.width).max(0.0),
            hitbox,
            speed,
        }
    }

    /// Player at its starting position near the bottom of the field
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            Hitbox::new(
                config.player_start_x,
                config.player_start_y,
                config.player_width,
                config.player_height,
            ),
            config.player_speed,
            config.field_width,
        )
    }

    /// Shifts by `direction * speed` and clamps into `[0, field_width - width]`.
    pub fn move_by(&mut self, direction: f32) {
        self.hitbox.x = (self.hitbox.x + direction * self.speed).clamp(0.0, self.max_x);
    }

    pub fn move_left(&mut self) {
        self.move_by(-1.0);
    }

    pub fn move_right(&mut self) {
        self.move_by(1.0);
    }

    pub fn hitbox(&self) -> Hitbox {
        self.hitbox
    }

    /// A fresh bullet centered on the ship, just above its nose
    pub fn spawn_bullet(&self, config: &GameConfig) -> Projectile {
        let x = self.hitbox.x + self.hitbox.width / 2.0 - config.bullet_width / 2.0;
        let y = self.hitbox.y - config.bullet_height;
        Projectile::player_shot(
            Hitbox::new(x, y, config.bullet_width, config.bullet_height),
            config.bullet_speed,
        )
    }
}
