use super::hitbox::Hitbox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileOwner {
    /// Travels up, leaves through the top edge
    Player,
    /// Travels down, leaves through the bottom edge
    Enemy,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub hitbox: Hitbox,
    pub owner: ProjectileOwner,
    /// Signed vertical velocity per tick
    pub velocity_y: f32,
    pub active: bool,
    /// Bottom exit line for enemy shots
    field_height: f32,
}

impl Projectile {
    /// Player shot moving up at `speed` per tick
    pub fn player_shot(hitbox: Hitbox, speed: f32) -> Self {
        Self {
            hitbox,
            owner: ProjectileOwner::Player,
            velocity_y: -speed,
            active: true,
            field_height: f32::INFINITY,
        }
    }

    /// Enemy shot moving down at `speed` per tick, retired once below `field_height`
    pub fn enemy_shot(hitbox: Hitbox, speed: f32, field_height: f32) -> Self {
        Self {
            hitbox,
            owner: ProjectileOwner::Enemy,
            velocity_y: speed,
            active: true,
            field_height,
        }
    }

    pub fn update(&mut self) {
        self.hitbox.y += self.velocity_y;

        if self.is_out_of_bounds() {
            self.active = false;
        }
    }

    pub fn is_out_of_bounds(&self) -> bool {
        match self.owner {
            ProjectileOwner::Player => self.hitbox.bottom() < 0.0,
            ProjectileOwner::Enemy => self.hitbox.y > self.field_height,
        }
    }

    pub fn hitbox(&self) -> Hitbox {
        self.hitbox
    }
}
