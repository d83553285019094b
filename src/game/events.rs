use std::fmt;

/// Notifications for the HUD. Purely observational; nothing feeds back into the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged(u32),
    Message(GameMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMessage {
    /// Clears whatever message is showing
    Cleared,
    /// A level was cleared and another one follows
    LevelClear { level: u32 },
    /// The last level was cleared
    AllClear { level: u32 },
    GameOver,
}

impl fmt::Display for GameMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMessage::Cleared => Ok(()),
            GameMessage::LevelClear { level } => write!(f, "Level {level} clear! Next level..."),
            GameMessage::AllClear { level } => {
                write!(f, "Level {level} clear! All levels complete! Congratulations!")
            }
            GameMessage::GameOver => write!(f, "Game Over"),
        }
    }
}
