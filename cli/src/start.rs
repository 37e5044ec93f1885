use std::fmt::Write;

use sweep_core::*;

use crate::render::LOGO;

const PROMPTS: [&str; 3] = ["field width ", "field height ", "amount of mines "];
const MAX_DIGITS: usize = 5;
const SUBMIT: usize = PROMPTS.len();

pub enum StartOutcome {
    Pending,
    Submit(GameConfig),
    Quit,
}

/// Asks for the field size and mine count before a round.
#[derive(Clone, Debug)]
pub struct StartScreen {
    inputs: [String; 3],
    focus: usize,
}

impl StartScreen {
    /// Inputs start out with the non-zero values of `defaults`.
    pub fn new(defaults: GameConfig) -> Self {
        let prefill = |value: u32| if value == 0 { String::new() } else { value.to_string() };
        Self {
            inputs: [
                prefill(defaults.width.into()),
                prefill(defaults.height.into()),
                prefill(defaults.mines),
            ],
            focus: 0,
        }
    }

    /// Problems with each input, empty when the field can be submitted.
    pub fn messages(&self) -> [Vec<String>; 3] {
        let mut messages: [Vec<String>; 3] = Default::default();

        let width = self.inputs[0].parse::<Coord>();
        let height = self.inputs[1].parse::<Coord>();
        let mines = self.inputs[2].parse::<CellCount>();
        for (index, input) in self.inputs.iter().enumerate() {
            if input.is_empty() {
                messages[index].push(format!("{}must not be empty", PROMPTS[index]));
            }
        }
        if !self.inputs[0].is_empty() && width.is_err() {
            messages[0].push(format!("field width must be at most {}", Coord::MAX));
        }
        if !self.inputs[1].is_empty() && height.is_err() {
            messages[1].push(format!("field height must be at most {}", Coord::MAX));
        }

        if let (Ok(width), Ok(height), Ok(mines)) = (width, height, mines) {
            for problem in GameConfig::new(width, height, mines).problems() {
                let index = match problem {
                    GameError::ZeroDimension { param: "field width" } => 0,
                    GameError::ZeroDimension { .. } => 1,
                    GameError::ZeroMineCount | GameError::TooManyMines => 2,
                };
                messages[index].push(problem.to_string());
            }
        }
        messages
    }

    fn submission(&self) -> Option<GameConfig> {
        if self.messages().iter().any(|messages| !messages.is_empty()) {
            return None;
        }
        Some(GameConfig::new(
            self.inputs[0].parse().ok()?,
            self.inputs[1].parse().ok()?,
            self.inputs[2].parse().ok()?,
        ))
    }

    pub fn handle_key(&mut self, key: &str) -> StartOutcome {
        match key {
            "q" | "ctrl+c" => return StartOutcome::Quit,
            "enter" if self.focus == SUBMIT => {
                if let Some(config) = self.submission() {
                    return StartOutcome::Submit(config);
                }
            }
            "tab" | "down" | "j" | "enter" => self.focus = (self.focus + 1) % (SUBMIT + 1),
            "shift+tab" | "up" | "k" => self.focus = (self.focus + SUBMIT) % (SUBMIT + 1),
            "backspace" | "delete" => {
                if let Some(input) = self.inputs.get_mut(self.focus) {
                    input.pop();
                }
            }
            _ => {
                let digit = key.len() == 1 && key.bytes().all(|b| b.is_ascii_digit());
                if let Some(input) = self.inputs.get_mut(self.focus) {
                    if digit && input.len() < MAX_DIGITS {
                        input.push_str(key);
                    }
                }
            }
        }
        StartOutcome::Pending
    }

    pub fn view(&self) -> String {
        let mut out = format!("{LOGO}\n\n");
        let messages = self.messages();
        for (index, prompt) in PROMPTS.iter().enumerate() {
            let marker = if self.focus == index { '>' } else { ' ' };
            let _ = writeln!(out, "{marker} {prompt}{}", self.inputs[index]);
            for message in &messages[index] {
                let _ = writeln!(out, "    {message}");
            }
        }
        out.push('\n');
        out.push_str(if self.focus == SUBMIT {
            "> [ Submit ]\n"
        } else {
            "  [ Submit ]\n"
        });
        out
    }
}
