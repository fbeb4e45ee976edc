//! capsuletui: Dr. Mario-style falling-capsule puzzle in the terminal, solo or two-player versus.

mod app;
mod capsule;
mod game;
mod input;
mod levels;
mod playfield;
mod resolver;
mod theme;
mod ui;
mod versus;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use game::{DEFAULT_TOP_MARGIN, SessionConfig};
use levels::LevelTable;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Options derived from CLI that shape a match (board size, mode, starting level, seed, speed).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub mode: GameMode,
    pub session: SessionConfig,
    pub initial_level: u32,
    /// Fixed RNG seed; random per run when None.
    pub seed: Option<u64>,
    /// Logic ticks per second.
    pub tick_rate: f64,
}

impl GameConfig {
    fn from_args(args: &Args) -> Result<Self> {
        let levels = LevelTable::classic_with_max(args.levels).context("invalid --levels")?;
        Ok(Self {
            mode: args.mode,
            session: SessionConfig {
                width: args.width,
                height: args.height,
                top_margin: DEFAULT_TOP_MARGIN,
                levels,
                // Show the level-clear banner for about a second.
                level_clear_pause: args.tick_rate.round().max(1.0) as u32,
            },
            initial_level: args.initial_level,
            seed: args.seed,
            tick_rate: args.tick_rate,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    let config = GameConfig::from_args(&args)?;
    config
        .session
        .validate()
        .context("invalid board for the level table")?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        warn!(error = %e, "theme not loaded, using default");
        theme::Theme::default()
    });
    let mut app = App::new(config, theme)?;
    app.run()?;
    Ok(())
}

/// Send tracing output to `path`; the terminal itself belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Dr. Mario-style capsule puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "capsuletui",
    version,
    about = "Falling-capsule puzzle in the terminal. Line up four of a colour to clear them; clear every seed to finish the level.",
    long_about = "capsuletui is a terminal puzzle game in the spirit of Dr. Mario.\n\n\
        Two-coloured capsules fall into a board scattered with seeds. Line up four or more cells \
        of one colour, horizontally or vertically, to clear them; what is left falls and may \
        clear again. Clear every seed to advance. Each level brings more seeds and faster drops.\n\n\
        CONTROLS (single):\n  Left/Right or h/l  Move   Up or k  Rotate   Down or j  Soft drop\n\n\
        CONTROLS (versus):\n  Player 1: a/d move, w rotate, s drop   Player 2: arrows\n\n\
        P pause   R restart after game over   Q / Esc quit"
)]
pub struct Args {
    /// Single player, or two players side by side.
    #[arg(short, long, default_value = "single")]
    pub mode: GameMode,

    /// Board width in cells.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: usize,

    /// Board height in cells.
    #[arg(long, default_value = "20", value_name = "ROWS")]
    pub height: usize,

    /// Level to start on (1-5).
    #[arg(short = 'l', long, default_value = "1", value_name = "N")]
    pub initial_level: u32,

    /// Number of levels to play; seeds and speed keep climbing past the classic five.
    #[arg(long, default_value_t = levels::CLASSIC_MAX_LEVEL, value_name = "N")]
    pub levels: u32,

    /// RNG seed for reproducible boards and capsules.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Game logic ticks per second. Drop speeds are tuned for 60.
    #[arg(long, default_value = "60.0", value_name = "RATE", value_parser = parse_tick_rate)]
    pub tick_rate: f64,

    /// Path to theme file (btop-style theme[key]="value"; keys red, green, blue, yellow, bg, ...).
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write debug logs to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

fn parse_tick_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err("tick rate must be a positive number".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GameMode {
    #[default]
    Single,
    #[value(alias = "vs")]
    Versus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["capsuletui"]);
        let config = GameConfig::from_args(&args).unwrap();
        assert_eq!(config.mode, GameMode::Single);
        assert_eq!(config.session.levels, LevelTable::classic());
        assert_eq!((config.session.width, config.session.height), (10, 20));
        assert_eq!(config.session.level_clear_pause, 60);
        assert!(config.session.validate().is_ok());
    }

    #[test]
    fn test_versus_alias_and_seed() {
        let args = Args::parse_from(["capsuletui", "-m", "vs", "--seed", "5", "-l", "3"]);
        assert_eq!(args.mode, GameMode::Versus);
        assert_eq!(args.seed, Some(5));
        assert_eq!(args.initial_level, 3);
    }

    #[test]
    fn test_rejects_bad_tick_rate() {
        assert!(Args::try_parse_from(["capsuletui", "--tick-rate", "0"]).is_err());
        assert!(Args::try_parse_from(["capsuletui", "--tick-rate", "fast"]).is_err());
    }

    #[test]
    fn test_tiny_board_fails_validation() {
        let args = Args::parse_from(["capsuletui", "--width", "4", "--height", "6"]);
        assert!(GameConfig::from_args(&args).unwrap().session.validate().is_err());
    }

    #[test]
    fn test_huge_board_fails_validation() {
        let args = Args::parse_from(["capsuletui", "--width", "40000"]);
        assert!(GameConfig::from_args(&args).unwrap().session.validate().is_err());
    }

    #[test]
    fn test_zero_levels_rejected() {
        let args = Args::parse_from(["capsuletui", "--levels", "0"]);
        assert!(GameConfig::from_args(&args).is_err());
    }
}
