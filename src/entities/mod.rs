mod enemy;
mod formation;
mod hitbox;
mod player;
mod projectile;

// Re-export all public types
pub use enemy::Enemy;
pub use formation::{Formation, MarchDirection};
pub use hitbox::Hitbox;
pub use player::Player;
pub use projectile::{Projectile, ProjectileOwner};
