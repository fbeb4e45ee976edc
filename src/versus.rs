//! Two-player versus: two independent sessions ticked back to back.

use crate::game::{ConfigError, Session, SessionConfig, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::One => "Player 1",
            Self::Two => "Player 2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinReason {
    ClearedAllLevels,
    OpponentToppedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieReason {
    BothCleared,
    BothToppedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersusOutcome {
    Winner(Player, WinReason),
    Tie(TieReason),
}

impl VersusOutcome {
    pub fn message(self) -> String {
        match self {
            Self::Winner(p, WinReason::ClearedAllLevels) => format!("{} wins!", p.label()),
            Self::Winner(p, WinReason::OpponentToppedOut) => {
                let other = match p {
                    Player::One => Player::Two,
                    Player::Two => Player::One,
                };
                format!("{} wins ({} topped out)", p.label(), other.label())
            }
            Self::Tie(TieReason::BothCleared) => "Both cleared! It's a tie".to_string(),
            Self::Tie(TieReason::BothToppedOut) => "Both topped out! It's a tie".to_string(),
        }
    }
}

/// Decide a versus match from two sessions. None while neither has finished.
pub fn decide(one: &Session, two: &Session) -> Option<VersusOutcome> {
    if !one.is_terminal() && !two.is_terminal() {
        return None;
    }
    let done = |s: &Session| s.state() == SessionState::GameComplete;
    let outcome = match (done(one), done(two)) {
        (true, false) => VersusOutcome::Winner(Player::One, WinReason::ClearedAllLevels),
        (false, true) => VersusOutcome::Winner(Player::Two, WinReason::ClearedAllLevels),
        (true, true) => VersusOutcome::Tie(TieReason::BothCleared),
        (false, false) => match (one.is_terminal(), two.is_terminal()) {
            (true, false) => VersusOutcome::Winner(Player::Two, WinReason::OpponentToppedOut),
            (false, true) => VersusOutcome::Winner(Player::One, WinReason::OpponentToppedOut),
            _ => VersusOutcome::Tie(TieReason::BothToppedOut),
        },
    };
    Some(outcome)
}

#[derive(Debug)]
pub struct Versus {
    sessions: [Session; 2],
}

impl Versus {
    /// Both players share the config; each gets its own RNG stream derived from `seed`.
    pub fn new(config: &SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            sessions: [
                Session::new(config.clone(), seed)?,
                Session::new(config.clone(), seed.wrapping_add(0x9E37_79B9_7F4A_7C15))?,
            ],
        })
    }

    pub fn start(&mut self, level: u32) {
        for s in &mut self.sessions {
            s.start_level(level);
        }
    }

    pub fn session(&self, player: Player) -> &Session {
        &self.sessions[player.index()]
    }

    pub fn session_mut(&mut self, player: Player) -> &mut Session {
        &mut self.sessions[player.index()]
    }

    /// Tick player one then player two. Stops ticking once the match is decided.
    pub fn tick(&mut self) {
        if self.outcome().is_some() {
            return;
        }
        for s in &mut self.sessions {
            s.tick();
        }
    }

    pub fn outcome(&self) -> Option<VersusOutcome> {
        decide(&self.sessions[0], &self.sessions[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{LevelSpec, LevelTable};
    use crate::playfield::{Cell, CellColor};

    fn one_level_config() -> SessionConfig {
        SessionConfig {
            width: 4,
            height: 6,
            top_margin: 3,
            levels: LevelTable::new(vec![LevelSpec {
                seeds: 1,
                drop_interval: 1,
            }])
            .unwrap(),
            level_clear_pause: 0,
        }
    }

    /// Block the spawn point and respawn so the session tops out.
    fn top_out(s: &mut Session) {
        let mut pf = s.playfield().clone();
        pf.place(Cell::ordinary(CellColor::Red), 1, 0);
        force_board(s, pf);
        s.spawn_next_pair();
        assert_eq!(s.state(), SessionState::ToppedOut);
    }

    /// Swap in a board with a lone seed inside a red run and lock, finishing the last level.
    fn complete(s: &mut Session) {
        let mut pf = crate::playfield::Playfield::new(4, 6);
        pf.seed(&[(0, 5)], &[CellColor::Red]);
        for x in 1..4 {
            pf.place(Cell::ordinary(CellColor::Red), x, 5);
        }
        force_board(s, pf);
        s.on_pair_locked();
        assert_eq!(s.state(), SessionState::GameComplete);
    }

    fn force_board(s: &mut Session, pf: crate::playfield::Playfield) {
        s.replace_playfield_for_test(pf);
    }

    fn started() -> Versus {
        let mut v = Versus::new(&one_level_config(), 11).unwrap();
        v.start(1);
        v
    }

    #[test]
    fn test_undecided_while_both_play() {
        let v = started();
        assert_eq!(v.outcome(), None);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut v = started();
        let before = v.session(Player::Two).playfield().clone();
        top_out(v.session_mut(Player::One));
        assert_eq!(v.session(Player::Two).playfield(), &before);
        assert_eq!(v.session(Player::Two).state(), SessionState::Active);
    }

    #[test]
    fn test_top_out_hands_win_to_opponent() {
        let mut v = started();
        top_out(v.session_mut(Player::One));
        assert_eq!(
            v.outcome(),
            Some(VersusOutcome::Winner(Player::Two, WinReason::OpponentToppedOut))
        );
    }

    #[test]
    fn test_clearing_all_levels_wins() {
        let mut v = started();
        complete(v.session_mut(Player::Two));
        assert_eq!(
            v.outcome(),
            Some(VersusOutcome::Winner(Player::Two, WinReason::ClearedAllLevels))
        );
    }

    #[test]
    fn test_ties() {
        let mut v = started();
        complete(v.session_mut(Player::One));
        complete(v.session_mut(Player::Two));
        assert_eq!(v.outcome(), Some(VersusOutcome::Tie(TieReason::BothCleared)));

        let mut v = started();
        top_out(v.session_mut(Player::One));
        top_out(v.session_mut(Player::Two));
        assert_eq!(v.outcome(), Some(VersusOutcome::Tie(TieReason::BothToppedOut)));
    }

    #[test]
    fn test_tick_stops_after_decision() {
        let mut v = started();
        top_out(v.session_mut(Player::One));
        let before = v.session(Player::Two).pair().cloned();
        v.tick();
        assert_eq!(v.session(Player::Two).pair().cloned(), before);
    }

    #[test]
    fn test_message() {
        let m = VersusOutcome::Winner(Player::One, WinReason::OpponentToppedOut).message();
        assert_eq!(m, "Player 1 wins (Player 2 topped out)");
    }
}
