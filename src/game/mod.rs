mod events;
mod state;
mod timer;

pub use events::{GameEvent, GameMessage};
pub use state::{GameState, LevelParams};
pub use timer::{Clock, DeferredAdvance, ManualClock, SystemClock};

use log::{debug, info, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::entities::{Formation, Player, Projectile};

/// Input sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Held
    pub left: bool,
    /// Held
    pub right: bool,
    /// True only on the tick the fire key went down
    pub fire: bool,
}

/// Whether the frame loop should keep ticking the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Idle,
}

/// The simulation engine: sole owner of every entity, the score and the level.
pub struct Game {
    config: GameConfig,
    state: GameState,
    score: u32,
    level: u32,
    params: LevelParams,
    player: Player,
    bullets: Vec<Projectile>,
    enemy_bullets: Vec<Projectile>,
    formation: Formation,
    fire_timer: u32,
    /// Bumped by every start/restart
    session: u64,
    pending_advance: Option<DeferredAdvance>,
    events: Vec<GameEvent>,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl Game {
    /// Game on the wall clock with an OS-seeded RNG.
    pub fn new(config: GameConfig) -> Self {
        Self::with_parts(config, Box::new(SystemClock::new()), StdRng::from_os_rng())
    }

    /// Game with an injected clock and RNG. Starts in [`GameState::Ready`]
    /// with the first level's formation on display.
    pub fn with_parts(config: GameConfig, clock: Box<dyn Clock>, rng: StdRng) -> Self {
        let params = LevelParams::for_level(1, &config);
        Self {
            state: GameState::Ready,
            score: 0,
            level: 1,
            params,
            player: Player::from_config(&config),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            formation: Formation::new(params.rows, params.cols, params.speed, &config),
            fire_timer: 0,
            session: 0,
            pending_advance: None,
            events: Vec::new(),
            clock,
            rng,
            config,
        }
    }

    /// Resets score and level and starts level 1. Valid from any state.
    pub fn start(&mut self) {
        self.session += 1;
        self.pending_advance = None;
        self.level = 1;
        self.score = 0;
        self.events.push(GameEvent::ScoreChanged(0));
        info!("starting new game (session {})", self.session);
        self.start_level();
    }

    /// Same as [`Game::start`]; discards everything in flight, including a pending level advance.
    pub fn restart(&mut self) {
        self.start();
    }

    fn start_level(&mut self) {
        self.params = LevelParams::for_level(self.level, &self.config);
        self.player = Player::from_config(&self.config);
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.formation = Formation::new(
            self.params.rows,
            self.params.cols,
            self.params.speed,
            &self.config,
        );
        self.fire_timer = 0;
        info!(
            "level {} started: {}x{} formation, speed {}, enemy fire every {} ticks",
            self.level, self.params.rows, self.params.cols, self.params.speed, self.params.fire_interval
        );
        self.transition(GameState::Playing);
    }

    fn transition(&mut self, to: GameState) {
        if self.state == to {
            return;
        }
        info!("state {:?} -> {:?} at level {}", self.state, to, self.level);
        self.state = to;

        let message = match to {
            GameState::Ready => return,
            GameState::Playing => GameMessage::Cleared,
            GameState::Win if self.level < self.config.max_level => {
                GameMessage::LevelClear { level: self.level }
            }
            GameState::Win => GameMessage::AllClear { level: self.level },
            GameState::GameOver => GameMessage::GameOver,
        };
        self.events.push(GameEvent::Message(message));
    }

    /// Spawns a player bullet unless one is already in flight. Returns whether it fired.
    pub fn fire(&mut self) -> bool {
        if self.state != GameState::Playing {
            debug!("fire ignored in state {:?}", self.state);
            return false;
        }
        if self.bullets.iter().any(|b| b.active) {
            trace!("fire rejected: bullet already in flight");
            return false;
        }
        self.bullets.push(self.player.spawn_bullet(&self.config));
        true
    }

    /// Advances the simulation by one tick. Outside [`GameState::Playing`] this is a no-op.
    pub fn update(&mut self, input: InputSnapshot) -> Tick {
        if self.state != GameState::Playing {
            trace!("tick ignored in state {:?}", self.state);
            return Tick::Idle;
        }

        // Input
        if input.left {
            self.player.move_left();
        }
        if input.right {
            self.player.move_right();
        }
        if input.fire {
            self.fire();
        }

        // Projectiles
        for bullet in &mut self.bullets {
            bullet.update();
        }
        for shot in &mut self.enemy_bullets {
            shot.update();
        }

        self.formation.update();

        // Enemy return fire
        self.fire_timer += 1;
        if self.fire_timer >= self.params.fire_interval {
            let shot = self
                .formation
                .random_active(&mut self.rng)
                .map(|enemy| enemy.spawn_shot(&self.config));
            self.enemy_bullets.extend(shot);
            self.fire_timer = 0;
        }

        self.check_collisions();

        self.bullets.retain(|b| b.active);
        self.enemy_bullets.retain(|b| b.active);

        if self.state == GameState::Playing && self.formation.is_all_defeated() {
            self.level_cleared();
        }
        if self.state == GameState::Playing && self.formation.reached_bottom() {
            info!("formation reached the bottom");
            self.transition(GameState::GameOver);
        }

        if self.state == GameState::Playing {
            Tick::Continue
        } else {
            Tick::Idle
        }
    }

    fn check_collisions(&mut self) {
        // Player bullets hitting enemies; a bullet stops at its first kill
        let mut kills: u32 = 0;
        for bullet in self.bullets.iter_mut().filter(|b| b.active) {
            for enemy in self.formation.enemies.iter_mut().filter(|e| e.active) {
                if bullet.hitbox.overlaps(&enemy.hitbox) {
                    bullet.active = false;
                    enemy.active = false;
                    kills += 1;
                    break;
                }
            }
        }
        if kills > 0 {
            let points = kills.saturating_mul(self.config.points_per_kill);
            self.score = self.score.saturating_add(points);
            self.events.push(GameEvent::ScoreChanged(self.score));
        }

        // Enemy bullets hitting the player
        let player = self.player.hitbox();
        let mut player_hit = false;
        for shot in self.enemy_bullets.iter_mut().filter(|b| b.active) {
            if shot.hitbox.overlaps(&player) {
                shot.active = false;
                player_hit = true;
            }
        }
        if player_hit {
            info!("player destroyed");
            self.transition(GameState::GameOver);
        }
    }

    fn level_cleared(&mut self) {
        self.transition(GameState::Win);
        if self.level < self.config.max_level {
            self.pending_advance = Some(DeferredAdvance::new(
                self.clock.now(),
                self.config.level_clear_delay(),
                self.session,
            ));
        }
    }

    /// Fires the deferred level advance once it is due. Returns true when a new
    /// level started, i.e. the frame loop should resume ticking.
    pub fn poll_timers(&mut self) -> bool {
        let Some(pending) = self.pending_advance else {
            return false;
        };
        if !pending.is_due(self.clock.now()) {
            return false;
        }
        self.pending_advance = None;

        if !pending.is_current(self.session) || self.state != GameState::Win {
            debug!(
                "dropping stale level advance (session {}, now {})",
                pending.generation, self.session
            );
            return false;
        }

        self.level += 1;
        self.start_level();
        true
    }

    /// Takes the notifications produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn bullets(&self) -> &[Projectile] {
        &self.bullets
    }

    pub fn enemy_bullets(&self) -> &[Projectile] {
        &self.enemy_bullets
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Enemy, Hitbox};
    use std::time::Duration;

    fn test_game() -> (Game, ManualClock) {
        let clock = ManualClock::new();
        let game = Game::with_parts(
            GameConfig::default(),
            Box::new(clock.clone()),
            StdRng::seed_from_u64(42),
        );
        (game, clock)
    }

    /// Running game whose formation is a single enemy with a bullet already inside it
    fn game_about_to_clear(level: u32) -> (Game, ManualClock) {
        let (mut game, clock) = test_game();
        game.start();
        game.level = level;
        let enemy = Enemy::new(Hitbox::new(300.0, 200.0, 40.0, 28.0));
        game.formation = Formation::from_enemies(vec![enemy], 2.0, &game.config);
        game.bullets
            .push(Projectile::player_shot(Hitbox::new(310.0, 215.0, 6.0, 16.0), 10.0));
        game.drain_events();
        (game, clock)
    }

    fn positions(game: &Game) -> Vec<(f32, f32)> {
        game.formation
            .enemies
            .iter()
            .map(|e| (e.hitbox.x, e.hitbox.y))
            .collect()
    }

    #[test]
    fn test_new_game_is_ready_with_level_one_formation() {
        let (game, _) = test_game();
        assert_eq!(game.state(), GameState::Ready);
        assert_eq!(game.level(), 1);
        assert_eq!(game.score(), 0);
        assert_eq!(game.formation().enemies.len(), 20);
    }

    #[test]
    fn test_start_enters_playing() {
        let (mut game, _) = test_game();
        game.start();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::ScoreChanged(0),
                GameEvent::Message(GameMessage::Cleared)
            ]
        );
    }

    #[test]
    fn test_update_is_noop_while_ready() {
        let (mut game, _) = test_game();
        let before = positions(&game);
        let input = InputSnapshot {
            left: true,
            right: false,
            fire: true,
        };
        for _ in 0..10 {
            assert_eq!(game.update(input), Tick::Idle);
        }
        assert_eq!(positions(&game), before);
        assert_eq!(game.player().hitbox.x, 370.0);
        assert!(game.bullets().is_empty());
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_fire_rejected_while_bullet_in_flight() {
        let (mut game, _) = test_game();
        game.start();

        assert!(game.fire());
        assert_eq!(game.bullets().len(), 1);
        assert!(!game.fire());
        assert_eq!(game.bullets().len(), 1);

        // An inactive bullet no longer blocks
        game.bullets[0].active = false;
        assert!(game.fire());
        assert_eq!(game.bullets().len(), 2);
    }

    #[test]
    fn test_fire_ignored_outside_playing() {
        let (mut game, _) = test_game();
        assert!(!game.fire());
        assert!(game.bullets().is_empty());
    }

    #[test]
    fn test_held_input_moves_player() {
        let (mut game, _) = test_game();
        game.start();
        game.update(InputSnapshot {
            left: true,
            ..Default::default()
        });
        assert_eq!(game.player().hitbox.x, 364.0);

        // Both held cancel out
        game.update(InputSnapshot {
            left: true,
            right: true,
            fire: false,
        });
        assert_eq!(game.player().hitbox.x, 364.0);
    }

    #[test]
    fn test_enemy_fires_on_interval() {
        let (mut game, _) = test_game();
        game.start();
        let interval = game.params.fire_interval;
        assert_eq!(interval, 52);

        for _ in 0..interval - 1 {
            game.update(InputSnapshot::default());
        }
        assert!(game.enemy_bullets().is_empty());

        game.update(InputSnapshot::default());
        assert_eq!(game.enemy_bullets().len(), 1);
        assert_eq!(game.fire_timer, 0);

        // Shot leaves from the bottom center of some active enemy
        let shot = game.enemy_bullets()[0].hitbox;
        assert!(game.formation().active().any(|e| {
            e.hitbox.x + 17.0 == shot.x && e.hitbox.bottom() == shot.y
        }));
    }

    #[test]
    fn test_bullet_kills_at_most_one_enemy() {
        let (mut game, _) = test_game();
        game.start();
        let first = Enemy::new(Hitbox::new(300.0, 200.0, 40.0, 28.0));
        let second = Enemy::new(Hitbox::new(300.0, 200.0, 40.0, 28.0));
        game.formation = Formation::from_enemies(vec![first, second], 2.0, &game.config);
        game.bullets
            .push(Projectile::player_shot(Hitbox::new(310.0, 215.0, 6.0, 16.0), 10.0));

        game.update(InputSnapshot::default());

        assert!(!game.formation.enemies[0].active);
        assert!(game.formation.enemies[1].active);
        assert_eq!(game.score(), 1);
        assert!(game.bullets().is_empty());
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_clearing_level_advances_after_delay() {
        let (mut game, clock) = game_about_to_clear(1);

        assert_eq!(game.update(InputSnapshot::default()), Tick::Idle);
        assert_eq!(game.state(), GameState::Win);
        assert_eq!(game.score(), 1);
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::ScoreChanged(1),
                GameEvent::Message(GameMessage::LevelClear { level: 1 })
            ]
        );

        clock.advance(Duration::from_millis(1799));
        assert!(!game.poll_timers());
        assert_eq!(game.state(), GameState::Win);

        clock.advance(Duration::from_millis(1));
        assert!(game.poll_timers());
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.level(), 2);
        assert_eq!(game.score(), 1);
        assert_eq!(game.formation().enemies.len(), 24);
        assert!(game.bullets().is_empty());
        assert!(game.enemy_bullets().is_empty());
        assert_eq!(game.player().hitbox.x, 370.0);

        // Fires only once
        clock.advance(Duration::from_secs(5));
        assert!(!game.poll_timers());
        assert_eq!(game.level(), 2);
    }

    #[test]
    fn test_clearing_last_level_is_terminal() {
        let (mut game, clock) = game_about_to_clear(5);

        game.update(InputSnapshot::default());
        assert_eq!(game.state(), GameState::Win);
        assert!(!game.has_pending_advance());
        assert!(
            game.drain_events()
                .contains(&GameEvent::Message(GameMessage::AllClear { level: 5 }))
        );

        clock.advance(Duration::from_secs(60));
        assert!(!game.poll_timers());
        assert_eq!(game.state(), GameState::Win);
        assert_eq!(game.level(), 5);
    }

    #[test]
    fn test_restart_cancels_pending_advance() {
        let (mut game, clock) = game_about_to_clear(1);
        game.update(InputSnapshot::default());
        assert!(game.has_pending_advance());

        game.restart();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);

        clock.advance(Duration::from_secs(2));
        assert!(!game.poll_timers());
        assert_eq!(game.level(), 1);
        assert_eq!(game.formation().enemies.len(), 20);
    }

    #[test]
    fn test_stale_generation_advance_is_dropped() {
        let (mut game, clock) = game_about_to_clear(1);
        game.update(InputSnapshot::default());
        game.session += 1;

        clock.advance(Duration::from_secs(2));
        assert!(!game.poll_timers());
        assert!(!game.has_pending_advance());
        assert_eq!(game.level(), 1);
        assert_eq!(game.state(), GameState::Win);
    }

    #[test]
    fn test_death_on_clearing_tick_is_game_over() {
        let (mut game, clock) = game_about_to_clear(1);
        game.enemy_bullets.push(Projectile::enemy_shot(
            Hitbox::new(380.0, 550.0, 6.0, 16.0),
            7.0,
            600.0,
        ));

        assert_eq!(game.update(InputSnapshot::default()), Tick::Idle);
        assert!(game.formation().is_all_defeated());
        assert_eq!(game.state(), GameState::GameOver);
        assert!(!game.has_pending_advance());
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::ScoreChanged(1),
                GameEvent::Message(GameMessage::GameOver)
            ]
        );

        clock.advance(Duration::from_secs(5));
        assert!(!game.poll_timers());
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn test_huge_kill_value_saturates_score() {
        let (mut game, _) = game_about_to_clear(1);
        game.config.points_per_kill = u32::MAX;
        game.score = 5;

        game.update(InputSnapshot::default());
        assert_eq!(game.score(), u32::MAX);
        assert_eq!(game.state(), GameState::Win);
    }

    #[test]
    fn test_enemy_bullets_end_game_once() {
        let (mut game, _) = test_game();
        game.start();
        game.drain_events();
        for x in [380.0, 400.0] {
            game.enemy_bullets.push(Projectile::enemy_shot(
                Hitbox::new(x, 550.0, 6.0, 16.0),
                7.0,
                600.0,
            ));
        }

        assert_eq!(game.update(InputSnapshot::default()), Tick::Idle);
        assert_eq!(game.state(), GameState::GameOver);
        assert!(game.enemy_bullets().is_empty());
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::Message(GameMessage::GameOver)]
        );
    }

    #[test]
    fn test_game_over_freezes_simulation() {
        let (mut game, _) = test_game();
        game.start();
        game.enemy_bullets.push(Projectile::enemy_shot(
            Hitbox::new(380.0, 550.0, 6.0, 16.0),
            7.0,
            600.0,
        ));
        game.update(InputSnapshot::default());
        assert_eq!(game.state(), GameState::GameOver);

        let before = positions(&game);
        let score = game.score();
        for _ in 0..20 {
            game.update(InputSnapshot {
                left: false,
                right: true,
                fire: true,
            });
        }
        assert_eq!(positions(&game), before);
        assert_eq!(game.score(), score);
        assert_eq!(game.player().hitbox.x, 370.0);
    }

    #[test]
    fn test_formation_reaching_bottom_ends_game() {
        let (mut game, _) = test_game();
        game.start();
        let enemy = Enemy::new(Hitbox::new(300.0, 551.0, 40.0, 28.0));
        game.formation = Formation::from_enemies(vec![enemy], 2.0, &game.config);

        assert_eq!(game.update(InputSnapshot::default()), Tick::Continue);

        // Drop onto the threshold by forcing a reversal
        game.formation.enemies[0].hitbox.x = 759.0;
        game.update(InputSnapshot::default());
        assert_eq!(game.state(), GameState::GameOver);
    }

    #[test]
    fn test_restart_from_game_over_resets_score() {
        let (mut game, _) = test_game();
        game.start();
        game.score = 7;
        game.state = GameState::GameOver;

        game.restart();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
    }
}
