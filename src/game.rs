//! Session: one player's board, falling pair, score and level progression.

use crate::capsule::{DropOutcome, FallingPair};
use crate::levels::LevelTable;
use crate::playfield::{CellColor, Playfield};
use crate::resolver;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};

/// Points per chain pass triggered by one lock.
pub const CHAIN_BONUS: u32 = 100;

/// Seeds are never placed in the top rows, so the spawn area starts clear.
pub const DEFAULT_TOP_MARGIN: usize = 3;

/// Largest board side accepted; keeps every drawn board well inside terminal geometry.
pub const MAX_BOARD_SIDE: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("level table is empty")]
    EmptyLevelTable,
    #[error("level {level}: drop interval must be at least one tick")]
    ZeroDropInterval { level: u32 },
    #[error("level {level}: seed count went down or drop speed went up")]
    LevelsNotMonotonic { level: u32 },
    #[error("playfield must be at least 2 columns wide (got {width})")]
    TooNarrow { width: usize },
    #[error("playfield {width}x{height} exceeds the {max}x{max} limit")]
    TooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[error("playfield height {height} leaves no rows below the top margin of {top_margin}")]
    TooShort { height: usize, top_margin: usize },
    #[error("level table needs {seeds} seeds but only {capacity} cells lie below the top margin")]
    TooManySeeds { seeds: u32, capacity: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    /// Rows at the top kept free of seeds.
    pub top_margin: usize,
    pub levels: LevelTable,
    /// Ticks spent in `LevelCleared` before the next level starts (0 = start at once).
    pub level_clear_pause: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            top_margin: DEFAULT_TOP_MARGIN,
            levels: LevelTable::classic(),
            level_clear_pause: 0,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 2 {
            return Err(ConfigError::TooNarrow { width: self.width });
        }
        if self.width > MAX_BOARD_SIDE || self.height > MAX_BOARD_SIDE {
            return Err(ConfigError::TooLarge {
                width: self.width,
                height: self.height,
                max: MAX_BOARD_SIDE,
            });
        }
        if self.height <= self.top_margin {
            return Err(ConfigError::TooShort {
                height: self.height,
                top_margin: self.top_margin,
            });
        }
        let capacity = self.width * (self.height - self.top_margin);
        let seeds = self.levels.max_seeds();
        if seeds as usize > capacity {
            return Err(ConfigError::TooManySeeds { seeds, capacity });
        }
        Ok(())
    }

    /// Left half of a freshly spawned pair; the right half is one column over.
    pub fn spawn_point(&self) -> (i32, i32) {
        ((self.width / 2) as i32 - 1, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    /// All seeds gone below the final level; waiting to start the next one.
    LevelCleared,
    /// A new pair could not be spawned.
    ToppedOut,
    /// All seeds gone on the final level.
    GameComplete,
}

/// What happened when a pair locked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockOutcome {
    pub chains: u32,
    pub removed: usize,
    pub awarded: u32,
    pub level_cleared: bool,
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    playfield: Playfield,
    pair: Option<FallingPair>,
    score: u32,
    level: u32,
    state: SessionState,
    drop_timer: u32,
    /// Ticks left in `LevelCleared`.
    clear_pause: u32,
    rng: StdRng,
}

impl Session {
    /// Empty board with no pair; call `start_level` to begin.
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            playfield: Playfield::new(config.width, config.height),
            config,
            pair: None,
            score: 0,
            level: 1,
            state: SessionState::Active,
            drop_timer: 0,
            clear_pause: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn pair(&self) -> Option<&FallingPair> {
        self.pair.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.config.levels.max_level()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            SessionState::ToppedOut | SessionState::GameComplete
        )
    }

    pub fn remaining_seed_count(&self) -> u32 {
        self.playfield.remaining_seed_count()
    }

    /// Ticks between automatic drops at the current level.
    pub fn drop_interval(&self) -> u32 {
        self.config.levels.get(self.level).drop_interval
    }

    #[cfg(test)]
    pub(crate) fn replace_playfield_for_test(&mut self, playfield: Playfield) {
        self.playfield = playfield;
    }

    fn random_color(&mut self) -> CellColor {
        CellColor::ALL[self.rng.random_range(0..CellColor::ALL.len())]
    }

    /// Reset the board, scatter the level's seeds below the top margin and spawn the first pair.
    /// Score carries over from earlier levels.
    pub fn start_level(&mut self, level: u32) {
        self.level = self.config.levels.clamp(level);
        self.playfield = Playfield::new(self.config.width, self.config.height);
        self.pair = None;
        self.drop_timer = 0;
        self.clear_pause = 0;
        self.state = SessionState::Active;

        let count = self.config.levels.get(self.level).seeds as usize;
        let mut positions: Vec<(usize, usize)> = (self.config.top_margin..self.config.height)
            .flat_map(|y| (0..self.config.width).map(move |x| (x, y)))
            .collect();
        positions.shuffle(&mut self.rng);
        positions.truncate(count);
        let colors: Vec<CellColor> = (0..positions.len()).map(|_| self.random_color()).collect();
        let placed = self.playfield.seed(&positions, &colors);

        info!(level = self.level, seeds = placed, "level started");
        self.spawn_next_pair();
    }

    /// Spawn a pair with random colours at the spawn point; tops out if that spot is taken.
    pub fn spawn_next_pair(&mut self) {
        let (x, y) = self.config.spawn_point();
        let pair = FallingPair::new(x, y, [self.random_color(), self.random_color()]);
        self.drop_timer = 0;
        if pair.collides(&self.playfield) {
            info!(level = self.level, score = self.score, "topped out");
            self.pair = None;
            self.state = SessionState::ToppedOut;
            return;
        }
        self.pair = Some(pair);
    }

    fn can_control(&self) -> bool {
        self.state == SessionState::Active && self.pair.is_some()
    }

    /// Shift the pair sideways. Returns false if blocked or there is no pair.
    pub fn move_pair(&mut self, dx: i32) -> bool {
        if !self.can_control() {
            return false;
        }
        let pf = &self.playfield;
        self.pair.as_mut().is_some_and(|p| p.try_move(dx, 0, pf))
    }

    pub fn rotate_pair(&mut self) -> bool {
        if !self.can_control() {
            return false;
        }
        let pf = &self.playfield;
        self.pair.as_mut().is_some_and(|p| p.try_rotate(pf))
    }

    /// Move the pair down one row; when it cannot move it locks and the board resolves.
    /// Returns the lock outcome if the pair locked.
    pub fn drop_pair(&mut self) -> Option<LockOutcome> {
        if !self.can_control() {
            return None;
        }
        self.drop_timer = 0;
        let pf = &self.playfield;
        let outcome = self.pair.as_mut().map(|p| p.drop_step(pf))?;
        if outcome == DropOutcome::Moved {
            return None;
        }
        if let Some(pair) = self.pair.take() {
            pair.lock_into(&mut self.playfield);
        }
        Some(self.on_pair_locked())
    }

    /// Resolve the board after a lock: chain to a fixpoint, score, then advance or spawn.
    /// Replaces any active pair with a fresh one when play continues.
    pub fn on_pair_locked(&mut self) -> LockOutcome {
        let report = resolver::run_chain(&mut self.playfield);
        let awarded = CHAIN_BONUS * report.chains;
        self.score += awarded;
        let mut outcome = LockOutcome {
            chains: report.chains,
            removed: report.removed,
            awarded,
            level_cleared: false,
        };
        debug!(
            chains = report.chains,
            removed = report.removed,
            seeds_cleared = report.seeds_cleared,
            awarded,
            "pair locked"
        );

        if self.playfield.remaining_seed_count() > 0 {
            self.spawn_next_pair();
            return outcome;
        }

        outcome.level_cleared = true;
        self.pair = None;
        if self.level >= self.max_level() {
            info!(score = self.score, "game complete");
            self.state = SessionState::GameComplete;
        } else {
            info!(level = self.level, score = self.score, "level cleared");
            self.state = SessionState::LevelCleared;
            self.clear_pause = self.config.level_clear_pause;
            if self.clear_pause == 0 {
                self.advance_level();
            }
        }
        outcome
    }

    /// Start the next level after a clear. No-op in any other state.
    pub fn advance_level(&mut self) {
        if self.state == SessionState::LevelCleared {
            self.start_level(self.level + 1);
        }
    }

    /// One fixed-rate logic tick: gravity on the pair, or the pause after a level clear.
    pub fn tick(&mut self) -> Option<LockOutcome> {
        match self.state {
            SessionState::Active => {
                self.drop_timer += 1;
                if self.drop_timer >= self.drop_interval() {
                    return self.drop_pair();
                }
                None
            }
            SessionState::LevelCleared => {
                self.clear_pause = self.clear_pause.saturating_sub(1);
                if self.clear_pause == 0 {
                    self.advance_level();
                }
                None
            }
            SessionState::ToppedOut | SessionState::GameComplete => None,
        }
    }
}
