use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

use crate::game::InputSnapshot;

/// One-shot commands that act on the game as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
    Quit,
}

/// A key that can be held down.
///
/// Terminals without the keyboard enhancement protocol never report releases,
/// only repeated presses, so in that mode a key counts as held for `hold`
/// after the last press it sent.
#[derive(Debug, Clone, Copy, Default)]
struct HeldKey {
    down: bool,
    last_seen: Option<Instant>,
}

impl HeldKey {
    fn press(&mut self, now: Instant) {
        self.down = true;
        self.last_seen = Some(now);
    }

    fn release(&mut self) {
        self.down = false;
        self.last_seen = None;
    }

    fn is_held(&self, now: Instant, release_events: bool, hold: Duration) -> bool {
        if !self.down {
            return false;
        }
        if release_events {
            return true;
        }
        self.last_seen
            .is_some_and(|seen| now.saturating_duration_since(seen) < hold)
    }
}

/// Turns raw key events into sampled movement, an edge-triggered fire signal
/// and one-shot commands.
pub struct InputManager {
    left: HeldKey,
    right: HeldKey,
    fire: HeldKey,
    /// Set when fire goes from released to pressed, cleared when sampled
    fire_edge: bool,
    commands: Vec<Command>,
    release_events: bool,
    hold: Duration,
    /// Longer window for fire so the first auto-repeat, which arrives after
    /// the OS repeat delay, does not read as a second press
    fire_hold: Duration,
}

impl InputManager {
    /// `release_events` is whether the terminal reports key releases.
    pub fn new(release_events: bool, hold: Duration, fire_hold: Duration) -> Self {
        Self {
            left: HeldKey::default(),
            right: HeldKey::default(),
            fire: HeldKey::default(),
            fire_edge: false,
            commands: Vec::new(),
            release_events,
            hold,
            fire_hold,
        }
    }

    /// Drains every pending terminal event without blocking.
    /// Should be called once per frame before sampling.
    pub fn poll_events(&mut self) -> color_eyre::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, Instant::now());
            }
        }
        Ok(())
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent, now: Instant) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, now, false),
            KeyEventKind::Repeat => self.handle_key_press(key_event, now, true),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, now: Instant, repeat: bool) {
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.commands.push(Command::Quit);
            return;
        }

        match key_event.code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => self.left.press(now),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => self.right.press(now),
            KeyCode::Char(' ') => {
                if !repeat && !self.fire.is_held(now, self.release_events, self.fire_hold) {
                    self.fire_edge = true;
                }
                self.fire.press(now);
            }
            KeyCode::Enter if !repeat => self.commands.push(Command::Start),
            KeyCode::Char('r') | KeyCode::Char('R') if !repeat => {
                self.commands.push(Command::Restart)
            }
            _ => {}
        }
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => self.left.release(),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => self.right.release(),
            KeyCode::Char(' ') => self.fire.release(),
            _ => {}
        }
    }

    /// Samples the held keys and consumes the fire edge.
    pub fn snapshot(&mut self, now: Instant) -> InputSnapshot {
        InputSnapshot {
            left: self.left.is_held(now, self.release_events, self.hold),
            right: self.right.is_held(now, self.release_events, self.hold),
            fire: std::mem::take(&mut self.fire_edge),
        }
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}
