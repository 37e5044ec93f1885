use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use sweep_core::*;
use web_time::{SystemTime, UNIX_EPOCH};

mod play;
mod render;
mod start;
mod terminal;

use play::Frontend;
use render::{APP_NAME, Renderer};
use terminal::{Terminal, TerminalKeys};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Field width in tiles
    #[arg(short = 'W', long, env = "SWEEP_FIELD_WIDTH")]
    width: Option<Coord>,

    /// Field height in tiles
    #[arg(short = 'H', long, env = "SWEEP_FIELD_HEIGHT")]
    height: Option<Coord>,

    /// Number of mines
    #[arg(short = 'M', long, env = "SWEEP_MINE_COUNT")]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Read the configuration from this file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Use ASCII glyphs instead of nerd font ones
    #[arg(short = 'A', long)]
    ascii: bool,

    /// Paint tile colours as background instead of foreground
    #[arg(short = 'F', long)]
    fill: bool,

    /// Print every glyph and exit
    #[arg(short = 'P', long)]
    preview: bool,

    /// Print where the configuration is read from and exit
    #[arg(long)]
    config_path: bool,

    /// Write the default configuration to the configuration path and exit
    #[arg(long)]
    default_config: bool,
}

fn default_config_path() -> Option<PathBuf> {
    if cfg!(windows) {
        env::var_os("APPDATA").map(|dir| PathBuf::from(dir).join(APP_NAME).join("config.json"))
    } else {
        env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join(APP_NAME)
                .join("config.json")
        })
    }
}

/// Reads the configuration file. A missing file is only an error when the
/// path was given explicitly.
fn load_config(path: Option<&Path>, explicit: bool) -> anyhow::Result<Config> {
    let Some(path) = path else {
        log::info!("No configuration directory, using defaults");
        return Ok(Config::default());
    };

    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => {
            log::info!("No configuration at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("could not read {}", path.display()));
        }
    };

    log::debug!("Loading configuration from {}", path.display());
    Config::load(&json).with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Writes the default configuration to `path`, never replacing an existing file.
fn write_default_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        bail!("{} already exists, not overwriting it", path.display());
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))?;
    }
    fs::write(path, Config::default().to_json()?)
        .with_context(|| format!("could not write {}", path.display()))?;
    log::info!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.verbose.log_level().is_some() {
        tracing_subscriber::fmt()
            .with_max_level(args.verbose.tracing_level_filter())
            .with_writer(io::stderr)
            .init();
    }

    let explicit = args.config.is_some();
    let path = args.config.clone().or_else(default_config_path);

    if args.config_path || args.default_config {
        let Some(path) = &path else {
            bail!("could not determine the configuration directory");
        };
        if args.config_path {
            println!("{}", path.display());
        }
        if args.default_config {
            write_default_config(path)?;
        }
        return Ok(());
    }

    let mut config = load_config(path.as_deref(), explicit)?;
    config.ascii |= args.ascii;
    config.fill |= args.fill;
    config.width = args.width.or(config.width);
    config.height = args.height.or(config.height);
    config.mines = args.mines.or(config.mines);
    config.validate()?;

    let renderer = Renderer::from_config(&config);
    if args.preview {
        print!("{}", renderer.preview());
        return Ok(());
    }

    // the start screen asks for whatever was not given
    let field = match (config.width, config.height, config.mines) {
        (Some(width), Some(height), Some(mines)) => Some(GameConfig::new(width, height, mines)),
        _ => None,
    };
    let mut seed = args.seed.unwrap_or_else(random_seed);
    let bindings = config.key_bindings();

    let mut terminal = Terminal::enter().context("could not set up the terminal")?;
    let rounds = Frontend::new(&bindings, &renderer, TerminalKeys, terminal.out()).run(
        field,
        config.game_config(),
        |field| {
            log::debug!("seed: {}", seed);
            let game = Game::new(field, seed)?;
            seed = seed.wrapping_add(1);
            Ok(game)
        },
    )?;
    drop(terminal);

    log::info!("Played {} rounds", rounds);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_switches_logging_off() {
        let args = Args::try_parse_from(["sweep"]).unwrap();
        assert_eq!(args.verbose.log_level(), Some(log::Level::Error));

        let args = Args::try_parse_from(["sweep", "-q"]).unwrap();
        assert_eq!(args.verbose.log_level(), None);

        let args = Args::try_parse_from(["sweep", "-vv"]).unwrap();
        assert_eq!(args.verbose.log_level(), Some(log::Level::Info));
    }

    #[test]
    fn fill_flag_parses() {
        let args = Args::try_parse_from(["sweep", "-F", "-A"]).unwrap();
        assert!(args.fill);
        assert!(args.ascii);
    }
}
