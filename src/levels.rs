//! Per-level seed counts and drop speeds.

use crate::game::ConfigError;

/// Logic ticks per second the classic drop intervals are tuned for.
pub const TICKS_PER_SECOND: u32 = 60;

/// Fastest allowed drop interval in the classic table.
const MIN_DROP_INTERVAL: u32 = 5;

pub const CLASSIC_MAX_LEVEL: u32 = 5;

fn classic_levels(max_level: u32) -> Vec<LevelSpec> {
    (1..=max_level)
        .map(|level| LevelSpec {
            seeds: 5 + 5 * level,
            drop_interval: (TICKS_PER_SECOND / (2 + level / 2)).max(MIN_DROP_INTERVAL),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSpec {
    /// Seed cells scattered at level start.
    pub seeds: u32,
    /// Ticks between automatic one-row drops of the falling pair.
    pub drop_interval: u32,
}

/// Level table, index 0 is level 1. Seeds never decrease and drops never slow down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    levels: Vec<LevelSpec>,
}

impl LevelTable {
    pub fn new(levels: Vec<LevelSpec>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::EmptyLevelTable);
        }
        for (i, spec) in levels.iter().enumerate() {
            if spec.drop_interval == 0 {
                return Err(ConfigError::ZeroDropInterval { level: i as u32 + 1 });
            }
        }
        for (i, pair) in levels.windows(2).enumerate() {
            let level = i as u32 + 2;
            if pair[1].seeds < pair[0].seeds || pair[1].drop_interval > pair[0].drop_interval {
                return Err(ConfigError::LevelsNotMonotonic { level });
            }
        }
        Ok(Self { levels })
    }

    /// Five levels: 10, 15, 20, 25, 30 seeds; drop every `60 / (2 + level / 2)` ticks, at least 5.
    pub fn classic() -> Self {
        Self {
            levels: classic_levels(CLASSIC_MAX_LEVEL),
        }
    }

    /// The classic progression cut short or carried on to `max_level` levels.
    pub fn classic_with_max(max_level: u32) -> Result<Self, ConfigError> {
        Self::new(classic_levels(max_level))
    }

    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Clamp a 1-based level into `1..=max_level()`.
    pub fn clamp(&self, level: u32) -> u32 {
        level.clamp(1, self.max_level())
    }

    pub fn get(&self, level: u32) -> LevelSpec {
        self.levels[self.clamp(level) as usize - 1]
    }

    pub fn max_seeds(&self) -> u32 {
        self.levels.iter().map(|l| l.seeds).max().unwrap_or(0)
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::classic()
    }
}
