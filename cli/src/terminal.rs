use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, ResetColor, SetAttribute};
use crossterm::terminal::{self, ClearType};
use crossterm::{QueueableCommand, cursor};

use crate::play::{Input, KeySource};

/// Raw mode on the alternate screen for as long as it lives.
pub struct Terminal {
    stdout: io::Stdout,
}

impl Terminal {
    pub fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        // restored on drop from here on
        let mut guard = Self {
            stdout: io::stdout(),
        };
        guard.stdout.queue(terminal::EnterAlternateScreen)?;
        guard.stdout.queue(cursor::Hide)?;
        guard.stdout.queue(terminal::DisableLineWrap)?;
        guard.stdout.flush()?;
        Ok(guard)
    }

    pub fn out(&mut self) -> &mut io::Stdout {
        &mut self.stdout
    }

    fn restore(&mut self) -> io::Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::error!("Could not restore the terminal: {err}");
        }
    }
}

/// Replaces the screen contents with `frame`, line by line.
pub fn draw_frame<W: Write>(out: &mut W, frame: &str) -> io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    for line in frame.lines() {
        out.write_all(line.as_bytes())?;
        out.queue(terminal::Clear(ClearType::UntilNewLine))?;
        out.write_all(b"\r\n")?;
    }
    out.queue(terminal::Clear(ClearType::FromCursorDown))?;
    out.flush()
}

/// Keys read from the terminal, waking up at least once per `timeout`.
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_input(&mut self, timeout: Duration) -> anyhow::Result<Input> {
        if !event::poll(timeout)? {
            return Ok(Input::Tick);
        }
        Ok(match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                key_name(key).map_or(Input::Tick, Input::Key)
            }
            _ => Input::Tick,
        })
    }
}

/// Spells a key press the way bindings are written, e.g. `ctrl+c`, `shift+tab`
/// or `pgdn`. Keys that can not be bound give `None`.
pub fn key_name(key: KeyEvent) -> Option<String> {
    let base = match key.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::BackTab => return Some("shift+tab".into()),
        KeyCode::Enter => "enter".into(),
        KeyCode::Tab => "tab".into(),
        KeyCode::Backspace => "backspace".into(),
        KeyCode::Delete => "delete".into(),
        KeyCode::Esc => "esc".into(),
        KeyCode::PageUp => "pgup".into(),
        KeyCode::PageDown => "pgdn".into(),
        KeyCode::Up => "up".into(),
        KeyCode::Down => "down".into(),
        KeyCode::Left => "left".into(),
        KeyCode::Right => "right".into(),
        _ => return None,
    };

    let mut name = String::new();
    if key.modifiers.contains(KeyModifiers::ALT) {
        name.push_str("alt+");
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        name.push_str("ctrl+");
    }
    // shifted characters already arrive as their uppercase form
    if key.modifiers.contains(KeyModifiers::SHIFT) && !matches!(key.code, KeyCode::Char(_)) {
        name.push_str("shift+");
    }
    name.push_str(&base);
    Some(name)
}
