// Library exports for the binary and integration tests
pub use app::App;
pub use config::GameConfig;
pub use entities::{Enemy, Formation, Hitbox, MarchDirection, Player, Projectile, ProjectileOwner};
pub use game::{
    Clock, Game, GameEvent, GameMessage, GameState, InputSnapshot, LevelParams, ManualClock,
    SystemClock, Tick,
};

pub mod app;
pub mod config;
pub mod entities;
pub mod game;
pub mod input;
pub mod renderer;
