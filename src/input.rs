//! Keyboard mapping
//!
//! Little hands mash keys, so nearly every key shoots. Arrow keys aim and
//! Escape pauses. Shortcuts held with Ctrl, Alt or Meta are left to the browser.

use crate::sim::TickInput;

/// Keys that never count as a shot
const IGNORED_KEYS: [&str; 6] = ["Shift", "Control", "Alt", "Meta", "CapsLock", "Tab"];

/// What a key press does to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// +1 up, -1 down
    Aim(i8),
    Pause,
    Fire,
}

impl KeyAction {
    /// Record this action in the next tick's input
    pub fn apply(self, input: &mut TickInput) {
        match self {
            KeyAction::Aim(dir) => input.aim = dir,
            KeyAction::Pause => input.pause = true,
            KeyAction::Fire => input.fire = true,
        }
    }

    /// The browser would otherwise scroll the page
    pub fn suppresses_default(self, key: &str) -> bool {
        matches!(self, KeyAction::Aim(_)) || key == " "
    }
}

/// Map a `KeyboardEvent.key` to an action. `chord` is true while Ctrl, Alt or
/// Meta is held. Holding an arrow keeps aiming, holding anything else fires once.
pub fn key_action(key: &str, repeat: bool, chord: bool) -> Option<KeyAction> {
    if chord || IGNORED_KEYS.contains(&key) {
        return None;
    }

    let action = match key {
        "ArrowUp" => KeyAction::Aim(1),
        "ArrowDown" => KeyAction::Aim(-1),
        "Escape" => KeyAction::Pause,
        _ => KeyAction::Fire,
    };

    if repeat && !matches!(action, KeyAction::Aim(_)) {
        return None;
    }
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_key_fires() {
        for key in ["a", "Z", " ", "Enter", "7", "F5"] {
            assert_eq!(key_action(key, false, false), Some(KeyAction::Fire), "{key}");
        }
    }

    #[test]
    fn test_arrows_aim_and_repeat() {
        assert_eq!(key_action("ArrowUp", false, false), Some(KeyAction::Aim(1)));
        assert_eq!(key_action("ArrowDown", true, false), Some(KeyAction::Aim(-1)));
    }

    #[test]
    fn test_held_key_fires_once() {
        assert_eq!(key_action("a", true, false), None);
        assert_eq!(key_action("Escape", true, false), None);
    }

    #[test]
    fn test_modifier_chords_ignored() {
        // Alt+key, Ctrl+R, Cmd+Tab and friends
        assert_eq!(key_action("a", false, true), None);
        assert_eq!(key_action("ArrowUp", false, true), None);
        for key in IGNORED_KEYS {
            assert_eq!(key_action(key, false, false), None);
        }
    }

    #[test]
    fn test_apply_sets_one_shot_input() {
        let mut input = TickInput::default();
        KeyAction::Aim(-1).apply(&mut input);
        KeyAction::Fire.apply(&mut input);
        assert_eq!(input.aim, -1);
        assert!(input.fire);
        assert!(!input.pause);

        KeyAction::Pause.apply(&mut input);
        assert!(input.pause);
    }

    #[test]
    fn test_scroll_keys_suppressed() {
        assert!(KeyAction::Aim(1).suppresses_default("ArrowUp"));
        assert!(KeyAction::Fire.suppresses_default(" "));
        assert!(!KeyAction::Fire.suppresses_default("a"));
    }
}
