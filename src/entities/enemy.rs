use super::hitbox::Hitbox;
use super::projectile::Projectile;
use crate::config::GameConfig;

/// A single invader. Enemies never move on their own; the formation shifts them.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub hitbox: Hitbox,
    pub active: bool,
}

impl Enemy {
    pub fn new(hitbox: Hitbox) -> Self {
        Self {
            hitbox,
            active: true,
        }
    }

    pub fn hitbox(&self) -> Hitbox {
        self.hitbox
    }

    /// Shot fired from the middle of the enemy's bottom edge
    pub fn spawn_shot(&self, config: &GameConfig) -> Projectile {
        let x = self.hitbox.x + self.hitbox.width / 2.0 - config.bullet_width / 2.0;
        let y = self.hitbox.bottom();
        Projectile::enemy_shot(
            Hitbox::new(x, y, config.bullet_width, config.bullet_height),
            config.enemy_bullet_speed,
            config.field_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProjectileOwner;

    #[test]
    fn test_enemy_starts_active() {
        let enemy = Enemy::new(Hitbox::new(80.0, 50.0, 40.0, 28.0));
        assert!(enemy.active);
        assert_eq!(enemy.hitbox().bottom(), 78.0);
    }

    #[test]
    fn test_enemy_shot_leaves_from_bottom_center() {
        let config = GameConfig::default();
        let enemy = Enemy::new(Hitbox::new(80.0, 50.0, 40.0, 28.0));
        let shot = enemy.spawn_shot(&config);
        assert_eq!(shot.owner, ProjectileOwner::Enemy);
        assert_eq!(shot.hitbox.x, 97.0);
        assert_eq!(shot.hitbox.y, 78.0);
        assert_eq!(shot.velocity_y, 7.0);
    }
}
