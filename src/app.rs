use color_eyre::Result;
use log::info;
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::game::{Game, GameEvent, GameState, Tick};
use crate::input::{Command, InputManager};
use crate::renderer::{GameRenderer, RenderView};

/// Latest score and message reported by the game
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub message: String,
}

impl Hud {
    pub fn apply(&mut self, event: GameEvent) {
        match event {
            GameEvent::ScoreChanged(score) => self.score = score,
            GameEvent::Message(message) => self.message = message.to_string(),
        }
    }
}

/// The main application: drives the game one tick per frame and draws it.
pub struct App {
    running: bool,
    game: Game,
    /// True while the simulation asks for another tick
    simulating: bool,
    hud: Hud,
    frame_interval: Duration,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: GameConfig, release_events: bool) -> Self {
        let input_manager =
            InputManager::new(release_events, config.key_hold(), config.fire_hold());
        let frame_interval = config.frame_interval();
        Self {
            running: true,
            game: Game::new(config),
            simulating: false,
            hud: Hud::default(),
            frame_interval,
            input_manager,
            renderer: GameRenderer::new(),
        }
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            let frame_start = Instant::now();

            self.input_manager.poll_events()?;
            let commands = self.input_manager.take_commands();
            self.process_commands(&commands);

            self.step(frame_start);

            terminal.draw(|frame| {
                let view = RenderView {
                    game_state: self.game.state(),
                    player: self.game.player(),
                    bullets: self.game.bullets(),
                    enemy_bullets: self.game.enemy_bullets(),
                    enemies: &self.game.formation().enemies,
                    score: self.hud.score,
                    level: self.game.level(),
                    max_level: self.game.config().max_level,
                    message: &self.hud.message,
                    field_width: self.game.config().field_width,
                    field_height: self.game.config().field_height,
                    area: frame.area(),
                };
                self.renderer.render(frame, &view);
            })?;

            // Sleep off the rest of the frame to hold a steady tick rate
            if let Some(rest) = self.frame_interval.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        Ok(())
    }

    /// Process one-shot commands
    fn process_commands(&mut self, commands: &[Command]) {
        for command in commands {
            match command {
                Command::Quit => {
                    info!("quit requested");
                    self.running = false;
                }
                Command::Start if self.game.state() == GameState::Ready => {
                    self.game.start();
                    self.simulating = true;
                }
                Command::Start | Command::Restart => {
                    if self.game.state() != GameState::Playing {
                        self.game.restart();
                        self.simulating = true;
                    }
                }
            }
        }
    }

    /// One frame of simulation: deferred transitions, then a tick if the game is live.
    fn step(&mut self, now: Instant) {
        if self.game.poll_timers() {
            self.simulating = true;
        }

        let input = self.input_manager.snapshot(now);
        if self.simulating {
            self.simulating = self.game.update(input) == Tick::Continue;
        }

        for event in self.game.drain_events() {
            self.hud.apply(event);
        }
    }
}
