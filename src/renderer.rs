use crate::entities::{Enemy, Hitbox, Player, Projectile};
use crate::game::GameState;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game_state: GameState,
    pub player: &'a Player,
    pub bullets: &'a [Projectile],
    pub enemy_bullets: &'a [Projectile],
    pub enemies: &'a [Enemy],
    pub score: u32,
    pub level: u32,
    pub max_level: u32,
    /// Latest state message, empty when nothing should be shown
    pub message: &'a str,
    pub field_width: f32,
    pub field_height: f32,
    pub area: Rect,
}

/// Maps a rectangle in field units onto terminal cells inside `area`.
///
/// Every visible entity covers at least one cell. Returns `None` when the
/// rectangle lies entirely outside the field.
pub fn project(hitbox: Hitbox, field_width: f32, field_height: f32, area: Rect) -> Option<Rect> {
    let span = |start: f32, end: f32, field: f32, cells: u16| -> Option<(u16, u16)> {
        let cells_f = cells as f32;
        let from = (start / field * cells_f).floor().max(0.0);
        let to = (end / field * cells_f).ceil().min(cells_f);
        if cells == 0 || end <= 0.0 || from >= cells_f {
            return None;
        }
        let from = from as u16;
        let len = (to as u16).saturating_sub(from).max(1);
        Some((from, len))
    };

    let (x, width) = span(hitbox.x, hitbox.right(), field_width, area.width)?;
    let (y, height) = span(hitbox.y, hitbox.bottom(), field_height, area.height)?;
    Some(Rect {
        x: area.x + x,
        y: area.y + y,
        width,
        height,
    })
}

fn fill(buffer: &mut Buffer, cells: Rect, symbol: &str, style: Style) {
    let row: String = symbol.repeat(cells.width as usize);
    for y in cells.y..cells.y + cells.height {
        buffer.set_string(cells.x, y, &row, style);
    }
}

/// Handles all rendering responsibilities for the game
pub struct GameRenderer {}

impl Default for GameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);
        match view.game_state {
            GameState::Ready => self.render_title(frame, view),
            GameState::Playing => {}
            GameState::Win => self.render_win(frame, view),
            GameState::GameOver => self.render_game_over(frame, view),
        }
    }

    /// Renders the playfield with every live entity
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;

        // Leave one row for the HUD and one for the controls hint
        let field_area = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let game_area = block.inner(field_area);
        frame.render_widget(block, field_area);

        let to_cells =
            |hitbox: Hitbox| project(hitbox, view.field_width, view.field_height, game_area);
        let buffer = frame.buffer_mut();

        for enemy in view.enemies.iter().filter(|e| e.active) {
            if let Some(cells) = to_cells(enemy.hitbox) {
                fill(buffer, cells, "█", Style::default().fg(Color::Green));
            }
        }

        for bullet in view.bullets.iter().filter(|b| b.active) {
            if let Some(cells) = to_cells(bullet.hitbox) {
                fill(buffer, cells, "│", Style::default().fg(Color::White));
            }
        }

        for shot in view.enemy_bullets.iter().filter(|b| b.active) {
            if let Some(cells) = to_cells(shot.hitbox) {
                fill(buffer, cells, "!", Style::default().fg(Color::Red));
            }
        }

        // The ship only appears once a game is running
        if view.game_state != GameState::Ready {
            if let Some(cells) = to_cells(view.player.hitbox) {
                fill(
                    buffer,
                    cells,
                    "▀",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                );
            }
        }

        // Stats overlay at the top
        let enemies_left = view.enemies.iter().filter(|e| e.active).count();
        let stats = Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.score),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Level: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}/{}", view.level, view.max_level),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Enemies: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{enemies_left}"),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(stats), stats_area);

        let controls = Line::from(vec![Span::styled(
            "[A/D/Arrows: Move] [Space: Fire] [Enter: Start] [R: Restart] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    fn render_title(&self, frame: &mut Frame, view: &RenderView) {
        let text = vec![
            Line::from(""),
            Line::from("INVADERS").centered().bold().green(),
            Line::from(""),
            Line::from("Press Enter to start").centered().white(),
        ];
        self.render_overlay(frame, view.area, text, Color::Green);
    }

    fn render_win(&self, frame: &mut Frame, view: &RenderView) {
        let mut text = vec![
            Line::from(""),
            Line::from(view.message.to_string())
                .centered()
                .bold()
                .yellow(),
            Line::from(""),
        ];
        if view.level >= view.max_level {
            text.push(Line::from(format!("Final Score: {}", view.score)).centered().cyan());
            text.push(Line::from("Press R to play again").centered().white());
        }
        self.render_overlay(frame, view.area, text, Color::Yellow);
    }

    fn render_game_over(&self, frame: &mut Frame, view: &RenderView) {
        let text = vec![
            Line::from(""),
            Line::from(view.message.to_string()).centered().red().bold(),
            Line::from(""),
            Line::from(format!("Final Score: {}", view.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(""),
            Line::from("Press R to restart").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];
        self.render_overlay(frame, view.area, text, Color::Red);
    }

    /// Boxed message centered over the playfield
    fn render_overlay(&self, frame: &mut Frame, area: Rect, text: Vec<Line>, color: Color) {
        let width = 60.min(area.width);
        let height = (text.len() as u16 + 2).min(area.height);
        let overlay_area = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(
            Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                )
                .alignment(Alignment::Center),
            overlay_area,
        );
    }
}
