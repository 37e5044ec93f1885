use std::fmt::Write;
use std::time::Duration;

use crossterm::style::{Attribute, Color, ContentStyle, StyledContent};
use sweep_core::*;

pub const APP_NAME: &str = "sweep";

pub const LOGO: &str = r" _____      _____  ___ _ __
/ __\ \ /\ / / _ \/ _ \ '_ \
\__ \\ V  V /  __/  __/ |_) |
|___/ \_/\_/ \___|\___| .__/
                      |_|";

/// Formats a duration as `HH:MM:SS,cc`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;
    let centis = elapsed.subsec_millis() / 10;
    format!("{hours:02}:{minutes:02}:{seconds:02},{centis:02}")
}

fn terminal_color(color: TileColor) -> Color {
    match color {
        TileColor::Ansi(index) => Color::AnsiValue(index),
        TileColor::Rgb { r, g, b } => Color::Rgb { r, g, b },
    }
}

/// Draws the field as text using the configured glyphs.
#[derive(Clone, Debug)]
pub struct Renderer {
    glyphs: Glyphs,
    cursor: CursorStyle,
    palette: Option<Palette>,
    fill: bool,
}

impl Renderer {
    /// A renderer without colours.
    pub fn new(glyphs: Glyphs, cursor: CursorStyle) -> Self {
        Self {
            glyphs,
            cursor,
            palette: None,
            fill: false,
        }
    }

    /// Paints tiles with `palette`, as background when `fill` is set.
    pub fn with_colors(mut self, palette: Palette, fill: bool) -> Self {
        self.palette = Some(palette);
        self.fill = fill;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.glyphs(), config.cursor.clone()).with_colors(config.palette(), config.fill)
    }

    fn style(&self, content: TileContent) -> Option<ContentStyle> {
        let color = terminal_color(self.palette.as_ref()?.get(content)?);
        let mut style = ContentStyle::new();
        if self.fill {
            style.background_color = Some(color);
            style.foreground_color = Some(Color::Black);
        } else {
            style.foreground_color = Some(color);
        }
        style.attributes.set(Attribute::Bold);
        Some(style)
    }

    fn cell(&self, out: &mut String, content: TileContent, focused: bool) {
        let glyph = self.glyphs.get(content);
        let text = if focused {
            format!("{}{}{}", self.cursor.left_half, glyph, self.cursor.right_half)
        } else {
            format!(" {glyph} ")
        };
        match self.style(content) {
            Some(style) => {
                let _ = write!(out, "{}", StyledContent::new(style, text));
            }
            None => out.push_str(&text),
        }
    }

    fn grid<M: Minefield>(&self, out: &mut String, minefield: &M, cursor: Option<Position>, revealed: bool) {
        let border = format!("+{}+", "-".repeat(usize::from(minefield.width()) * 3));
        out.push_str(&border);
        out.push('\n');
        for y in 0..minefield.height() {
            out.push('|');
            for x in 0..minefield.width() {
                let position = Position::new(x, y);
                let tile = minefield.tile_at(position);
                let count = minefield.count_neighbouring_mines(position);
                let content = if revealed {
                    TileContent::revealed(tile, count)
                } else {
                    TileContent::in_play(tile, count)
                };
                self.cell(out, content, cursor == Some(position));
            }
            out.push_str("|\n");
        }
        out.push_str(&border);
        out.push('\n');
    }

    /// The board while the round is running, with `status` below the timer.
    pub fn board<M: Minefield>(&self, game: &Game<M>, elapsed: Duration, status: Option<&str>) -> String {
        let minefield = game.minefield();
        let mut out = format!(
            "{APP_NAME} {}/{}\n",
            minefield.flagged_count(),
            minefield.mine_count()
        );
        self.grid(&mut out, minefield, Some(game.cursor()), false);
        let _ = writeln!(out, "time - {}", format_elapsed(elapsed));
        if let Some(status) = status {
            let _ = writeln!(out, "{status}");
        }
        out
    }

    /// The fully revealed board once the round is over.
    pub fn end_screen<M: Minefield>(&self, game: &Game<M>, elapsed: Duration) -> String {
        let mut out = String::from(match game.state() {
            EngineState::Won => "You won!\n",
            _ => "You lost!\n",
        });
        self.grid(&mut out, game.minefield(), None, true);
        let _ = writeln!(out, "time - {}", format_elapsed(elapsed));
        out.push_str("\nq to quit, any other key for another round\n");
        out
    }

    /// Every tile content next to the glyph it is drawn with.
    pub fn preview(&self) -> String {
        let mut out = String::new();
        for content in TileContent::ALL {
            let _ = write!(out, "{:>10} ", content.name());
            self.cell(&mut out, content, false);
            self.cell(&mut out, content, true);
            out.push('\n');
        }
        out
    }
}
