use std::io::Write;
use std::time::Duration;

use sweep_core::*;
use web_time::Instant;

use crate::render::Renderer;
use crate::start::{StartOutcome, StartScreen};
use crate::terminal::draw_frame;

/// Longest wait for a key before the screen is redrawn.
pub const FRAME: Duration = Duration::from_millis(100);

fn is_quit(key: &str) -> bool {
    matches!(key, "q" | "ctrl+c")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// A key press spelled like a binding.
    Key(String),
    /// Nothing arrived in time.
    Tick,
    /// No more input will arrive.
    Closed,
}

/// Where key presses come from.
pub trait KeySource {
    /// Waits at most `timeout` for the next key.
    fn next_input(&mut self, timeout: Duration) -> anyhow::Result<Input>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundEnd {
    Finished { elapsed: Duration },
    Quit,
}

/// Drives the screens of a session: start screen, rounds and end screens.
pub struct Frontend<'a, K, W> {
    bindings: &'a Bindings,
    renderer: &'a Renderer,
    keys: K,
    out: W,
}

impl<'a, K: KeySource, W: Write> Frontend<'a, K, W> {
    pub fn new(bindings: &'a Bindings, renderer: &'a Renderer, keys: K, out: W) -> Self {
        Self {
            bindings,
            renderer,
            keys,
            out,
        }
    }

    /// Next key press, `None` once input is closed.
    fn next_key(&mut self) -> anyhow::Result<Option<String>> {
        loop {
            match self.keys.next_input(FRAME)? {
                Input::Key(key) => return Ok(Some(key)),
                Input::Tick => {}
                Input::Closed => return Ok(None),
            }
        }
    }

    /// Asks for the field, `None` when the player quits instead.
    pub fn prompt_field(&mut self, defaults: GameConfig) -> anyhow::Result<Option<GameConfig>> {
        let mut screen = StartScreen::new(defaults);
        loop {
            draw_frame(&mut self.out, &screen.view())?;
            let Some(key) = self.next_key()? else {
                return Ok(None);
            };
            match screen.handle_key(&key) {
                StartOutcome::Pending => {}
                StartOutcome::Submit(field) => return Ok(Some(field)),
                StartOutcome::Quit => return Ok(None),
            }
        }
    }

    /// Plays until the round is won or lost, redrawing the timer every frame.
    ///
    /// Keystrokes that only start a binding, like `g` or `12`, are kept until
    /// the binding completes or can no longer match.
    pub fn play_round<M: Minefield>(&mut self, game: &mut Game<M>) -> anyhow::Result<RoundEnd> {
        let started = Instant::now();
        let mut pending = String::new();
        let mut status: Option<String> = None;

        loop {
            let board = self.renderer.board(game, started.elapsed(), status.as_deref());
            draw_frame(&mut self.out, &board)?;

            let key = match self.keys.next_input(FRAME)? {
                Input::Key(key) => key,
                Input::Tick => continue,
                Input::Closed => return Ok(RoundEnd::Quit),
            };
            if is_quit(&key) {
                log::info!("Quit after {} moves", game.moves());
                return Ok(RoundEnd::Quit);
            }

            pending.push_str(&key);
            match self.bindings.resolve(&pending) {
                Ok(action) => {
                    let outcome = game.apply(action);
                    log::trace!("{:?} -> {:?}", action, outcome);
                    pending.clear();
                    status = None;
                }
                Err(_) if self.bindings.is_prefix(&pending) => {}
                Err(err) => {
                    status = Some(err.to_string());
                    pending.clear();
                }
            }

            if game.is_finished() {
                return Ok(RoundEnd::Finished {
                    elapsed: started.elapsed(),
                });
            }
        }
    }

    /// Shows the revealed field, returns whether another round is wanted.
    pub fn end_screen<M: Minefield>(&mut self, game: &Game<M>, elapsed: Duration) -> anyhow::Result<bool> {
        draw_frame(&mut self.out, &self.renderer.end_screen(game, elapsed))?;
        Ok(self.next_key()?.is_some_and(|key| !is_quit(&key)))
    }

    /// Plays rounds until the player quits, returns how many were started.
    ///
    /// Without a `field` the start screen asks for one, prefilled from
    /// `defaults`, and the answer is kept for the rounds after.
    pub fn run<M, F>(
        &mut self,
        mut field: Option<GameConfig>,
        defaults: GameConfig,
        mut new_game: F,
    ) -> anyhow::Result<u32>
    where
        M: Minefield,
        F: FnMut(GameConfig) -> anyhow::Result<Game<M>>,
    {
        let mut rounds = 0;
        loop {
            let config = match field {
                Some(config) => config,
                None => match self.prompt_field(defaults)? {
                    Some(config) => *field.insert(config),
                    None => return Ok(rounds),
                },
            };

            let mut game = new_game(config)?;
            rounds += 1;
            log::debug!("Round {} on {}x{} with {} mines", rounds, config.width, config.height, config.mines);

            let RoundEnd::Finished { elapsed } = self.play_round(&mut game)? else {
                return Ok(rounds);
            };
            log::info!("Round {} ended {:?} after {} moves", rounds, game.state(), game.moves());
            if !self.end_screen(&game, elapsed)? {
                return Ok(rounds);
            }
        }
    }
}
