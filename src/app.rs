//! App: terminal init, fixed-tick main loop and key handling.

use crate::game::{Session, SessionState};
use crate::input::{Action, Keymap, global_action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, PlayerView};
use crate::versus::{Player, Versus};
use crate::{GameConfig, GameMode};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    Paused,
    GameOver,
}

/// The sessions being played: one alone, or two head to head.
#[derive(Debug)]
enum Match {
    Single(Box<Session>),
    Versus(Box<Versus>),
}

impl Match {
    fn start(config: &GameConfig, seed: u64) -> Result<Self> {
        let game = match config.mode {
            GameMode::Single => {
                let mut session = Session::new(config.session.clone(), seed)
                    .context("invalid game configuration")?;
                session.start_level(config.initial_level);
                Self::Single(Box::new(session))
            }
            GameMode::Versus => {
                let mut versus =
                    Versus::new(&config.session, seed).context("invalid game configuration")?;
                versus.start(config.initial_level);
                Self::Versus(Box::new(versus))
            }
        };
        info!(mode = ?config.mode, seed, level = config.initial_level, "game started");
        Ok(game)
    }

    fn tick(&mut self) {
        match self {
            Self::Single(s) => {
                s.tick();
            }
            Self::Versus(v) => v.tick(),
        }
    }

    /// Keymap for each session, in display order.
    fn keymaps(&self) -> &'static [Keymap] {
        match self {
            Self::Single(_) => &[Keymap::Arrows],
            Self::Versus(_) => &[Keymap::Wasd, Keymap::Arrows],
        }
    }

    fn session_mut(&mut self, index: usize) -> Option<&mut Session> {
        match self {
            Self::Single(s) if index == 0 => Some(s.as_mut()),
            Self::Single(_) => None,
            Self::Versus(v) => {
                let player = if index == 0 { Player::One } else { Player::Two };
                Some(v.session_mut(player))
            }
        }
    }

    /// Headline once the match is over, None while it is still running.
    fn result_banner(&self) -> Option<String> {
        match self {
            Self::Single(s) => match s.state() {
                SessionState::GameComplete => Some("You cleared every level!".to_string()),
                SessionState::ToppedOut => Some("Game Over".to_string()),
                SessionState::Active | SessionState::LevelCleared => None,
            },
            Self::Versus(v) => v.outcome().map(|o| o.message()),
        }
    }

    fn views(&self) -> Vec<PlayerView<'_>> {
        match self {
            Self::Single(s) => vec![PlayerView {
                name: "Player",
                keys: "←→ move ↑ turn ↓ drop",
                session: s,
            }],
            Self::Versus(v) => vec![
                PlayerView {
                    name: Player::One.label(),
                    keys: "a/d move w turn s drop",
                    session: v.session(Player::One),
                },
                PlayerView {
                    name: Player::Two.label(),
                    keys: "←→ move ↑ turn ↓ drop",
                    session: v.session(Player::Two),
                },
            ],
        }
    }
}

/// Apply a capsule action to one session.
fn steer(session: &mut Session, action: Action) {
    match action {
        Action::MoveLeft => {
            session.move_pair(-1);
        }
        Action::MoveRight => {
            session.move_pair(1);
        }
        Action::Rotate => {
            session.rotate_pair();
        }
        Action::SoftDrop => {
            session.drop_pair();
        }
        Action::Pause | Action::Restart | Action::Quit | Action::None => {}
    }
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    game: Match,
    screen: Screen,
    seed: u64,
    tick_interval: Duration,
    last_tick: Instant,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let game = Match::start(&config, seed)?;
        let tick_interval = Duration::from_secs_f64(1.0 / config.tick_rate);
        Ok(Self {
            config,
            theme,
            game,
            screen: Screen::Playing,
            seed,
            tick_interval,
            last_tick: Instant::now(),
        })
    }

    fn restart(&mut self) -> Result<()> {
        self.seed = self.seed.wrapping_add(1);
        self.game = Match::start(&self.config, self.seed)?;
        self.screen = Screen::Playing;
        self.last_tick = Instant::now();
        Ok(())
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        let result = self.run_loop(&mut terminal);
        ratatui::restore();
        result
    }

    fn draw(&self, frame: &mut Frame) {
        let banner = self.game.result_banner();
        ui::draw(
            frame,
            self.screen,
            &self.game.views(),
            &self.theme,
            banner.as_deref(),
        );
    }

    /// Returns false when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        let global = global_action(key);
        if key.kind == KeyEventKind::Press {
            match (self.screen, global) {
                (_, Action::Quit) => return Ok(false),
                (Screen::Playing, Action::Pause) => self.screen = Screen::Paused,
                (Screen::Paused, Action::Pause) => self.screen = Screen::Playing,
                (Screen::GameOver, Action::Restart) => self.restart()?,
                _ => {}
            }
        }
        if self.screen != Screen::Playing || key.kind == KeyEventKind::Release {
            return Ok(true);
        }
        for (i, &keymap) in self.game.keymaps().iter().enumerate() {
            let action = key_to_action(key, keymap);
            if !action.is_capsule_control() {
                continue;
            }
            if let Some(session) = self.game.session_mut(i) {
                steer(session, action);
            }
        }
        Ok(true)
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            let timeout = self.tick_interval.saturating_sub(self.last_tick.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if !self.handle_key(key)? {
                            return Ok(());
                        }
                    }
                }
            }

            if self.last_tick.elapsed() >= self.tick_interval {
                self.last_tick = Instant::now();
                if self.screen == Screen::Playing {
                    self.game.tick();
                }
            }
            if self.screen == Screen::Playing {
                if let Some(banner) = self.game.result_banner() {
                    info!(%banner, "game over");
                    self.screen = Screen::GameOver;
                }
            }
        }
    }
}
