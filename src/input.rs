//! Key bindings: one set for single player, two side-by-side sets for versus.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    Pause,
    Restart,
    Quit,
    None,
}

impl Action {
    /// Actions that steer a player's capsule (as opposed to app-level ones).
    pub fn is_capsule_control(self) -> bool {
        matches!(
            self,
            Self::MoveLeft | Self::MoveRight | Self::Rotate | Self::SoftDrop
        )
    }
}

/// Which keys steer a capsule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keymap {
    /// Arrows plus vim h/j/k/l. Single player and versus player two.
    Arrows,
    /// w/a/s/d. Versus player one.
    Wasd,
}

fn plain(modifiers: KeyModifiers) -> bool {
    modifiers.is_empty() || modifiers == KeyModifiers::SHIFT
}

/// App-level keys shared by every keymap: pause, restart, quit.
pub fn global_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    match code {
        KeyCode::Char('c') if modifiers == KeyModifiers::CONTROL => Action::Quit,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc if plain(modifiers) => Action::Quit,
        KeyCode::Char('p' | 'P') if plain(modifiers) => Action::Pause,
        KeyCode::Char('r' | 'R') if plain(modifiers) => Action::Restart,
        _ => Action::None,
    }
}

/// Map a key to a capsule action for `keymap`.
pub fn key_to_action(key: KeyEvent, keymap: Keymap) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if !plain(modifiers) {
        return Action::None;
    }
    match (keymap, code) {
        (Keymap::Arrows, KeyCode::Left | KeyCode::Char('h')) => Action::MoveLeft,
        (Keymap::Arrows, KeyCode::Right | KeyCode::Char('l')) => Action::MoveRight,
        (Keymap::Arrows, KeyCode::Up | KeyCode::Char('k')) => Action::Rotate,
        (Keymap::Arrows, KeyCode::Down | KeyCode::Char('j')) => Action::SoftDrop,
        (Keymap::Wasd, KeyCode::Char('a' | 'A')) => Action::MoveLeft,
        (Keymap::Wasd, KeyCode::Char('d' | 'D')) => Action::MoveRight,
        (Keymap::Wasd, KeyCode::Char('w' | 'W')) => Action::Rotate,
        (Keymap::Wasd, KeyCode::Char('s' | 'S')) => Action::SoftDrop,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrows_and_vim() {
        assert_eq!(key_to_action(key(KeyCode::Left), Keymap::Arrows), Action::MoveLeft);
        assert_eq!(key_to_action(key(KeyCode::Char('l')), Keymap::Arrows), Action::MoveRight);
        assert_eq!(key_to_action(key(KeyCode::Up), Keymap::Arrows), Action::Rotate);
        assert_eq!(key_to_action(key(KeyCode::Char('j')), Keymap::Arrows), Action::SoftDrop);
    }

    #[test]
    fn test_keymaps_do_not_overlap() {
        assert_eq!(key_to_action(key(KeyCode::Char('a')), Keymap::Arrows), Action::None);
        assert_eq!(key_to_action(key(KeyCode::Left), Keymap::Wasd), Action::None);
        assert_eq!(key_to_action(key(KeyCode::Char('s')), Keymap::Wasd), Action::SoftDrop);
    }

    #[test]
    fn test_global_keys() {
        assert_eq!(global_action(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(global_action(key(KeyCode::Char('p'))), Action::Pause);
        assert_eq!(global_action(key(KeyCode::Char('r'))), Action::Restart);
        assert_eq!(global_action(key(KeyCode::Char('w'))), Action::None);
        assert_eq!(
            global_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_control_modifier_ignored_for_moves() {
        let k = KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL);
        assert_eq!(key_to_action(k, Keymap::Arrows), Action::None);
    }
}
