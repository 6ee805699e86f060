//! Key bindings for the demo host.
//!
//! Maps crossterm KeyEvents to editor actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use phf::{Map, phf_map};

use crate::buffer::Motion;
use crate::terminal::RESIZE_KEY;

/// An action resulting from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Type text at every cursor.
    Type(char),
    /// Toggle insert/overtype mode.
    ToggleOvertype,
    Copy,
    Paste,
    Backspace,
    Delete,
    /// Move every cursor.
    Move(Motion),
    /// Move every cursor, extending the selections.
    Select(Motion),
    AddCursorBelow,
    /// Back to a single cursor.
    CollapseCursors,
    /// Focus the next buffer.
    NextEditor,
    /// Move focus away from all buffers.
    Unfocus,
    /// Re-read the settings file.
    ReloadSettings,
    Save,
    Quit,
    /// Terminal was resized.
    Resize,
    /// No action (ignore the key).
    Ignore,
}

/// Ctrl chords. Keep sorted by key.
const CTRL_BINDINGS: Map<char, KeyAction> = phf_map! {
    'a' => KeyAction::Move(Motion::LineStart),
    'c' => KeyAction::Copy,
    'e' => KeyAction::Move(Motion::LineEnd),
    'n' => KeyAction::NextEditor,
    'q' => KeyAction::Quit,
    'r' => KeyAction::ReloadSettings,
    's' => KeyAction::Save,
    'v' => KeyAction::Paste,
};

/// Resolve a KeyEvent to a KeyAction.
pub fn resolve_key(key: KeyEvent) -> KeyAction {
    if key.code == RESIZE_KEY && key.modifiers == KeyModifiers::NONE {
        return KeyAction::Resize;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char(ch) => CTRL_BINDINGS
                .get(&ch.to_ascii_lowercase())
                .copied()
                .unwrap_or(KeyAction::Ignore),
            _ => KeyAction::Ignore,
        };
    }

    if key.modifiers.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Down => KeyAction::AddCursorBelow,
            _ => KeyAction::Ignore,
        };
    }

    let motion = match key.code {
        KeyCode::Up => Some(Motion::Up),
        KeyCode::Down => Some(Motion::Down),
        KeyCode::Left => Some(Motion::Left),
        KeyCode::Right => Some(Motion::Right),
        KeyCode::Home => Some(Motion::LineStart),
        KeyCode::End => Some(Motion::LineEnd),
        _ => None,
    };
    if let Some(motion) = motion {
        return if key.modifiers.contains(KeyModifiers::SHIFT) {
            KeyAction::Select(motion)
        } else {
            KeyAction::Move(motion)
        };
    }

    match key.code {
        KeyCode::Backspace => KeyAction::Backspace,
        KeyCode::Delete => KeyAction::Delete,
        KeyCode::Enter => KeyAction::Type('\n'),
        KeyCode::Tab => KeyAction::Type('\t'),
        KeyCode::Insert => KeyAction::ToggleOvertype,
        KeyCode::Esc => KeyAction::CollapseCursors,
        KeyCode::F(2) => KeyAction::Unfocus,
        KeyCode::Char(ch) => KeyAction::Type(ch),
        _ => KeyAction::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_key(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(resolve_key(key(KeyCode::Up)), KeyAction::Move(Motion::Up));
        assert_eq!(resolve_key(key(KeyCode::Left)), KeyAction::Move(Motion::Left));
        assert_eq!(
            resolve_key(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT)),
            KeyAction::Select(Motion::Right)
        );
        assert_eq!(
            resolve_key(KeyEvent::new(KeyCode::Down, KeyModifiers::ALT)),
            KeyAction::AddCursorBelow
        );
    }

    #[test]
    fn test_printable_char() {
        assert_eq!(resolve_key(key(KeyCode::Char('a'))), KeyAction::Type('a'));
        assert_eq!(
            resolve_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            KeyAction::Type('A')
        );
    }

    #[test]
    fn test_insert_toggles_overtype() {
        assert_eq!(resolve_key(key(KeyCode::Insert)), KeyAction::ToggleOvertype);
    }

    #[test]
    fn test_ctrl_chords() {
        assert_eq!(resolve_key(ctrl_key('q')), KeyAction::Quit);
        assert_eq!(resolve_key(ctrl_key('v')), KeyAction::Paste);
        assert_eq!(resolve_key(ctrl_key('C')), KeyAction::Copy);
        assert_eq!(resolve_key(ctrl_key('x')), KeyAction::Ignore);
    }

    #[test]
    fn test_enter_and_tab_type() {
        assert_eq!(resolve_key(key(KeyCode::Enter)), KeyAction::Type('\n'));
        assert_eq!(resolve_key(key(KeyCode::Tab)), KeyAction::Type('\t'));
    }

    #[test]
    fn test_resize_sentinel() {
        assert_eq!(resolve_key(key(RESIZE_KEY)), KeyAction::Resize);
        assert_eq!(resolve_key(key(KeyCode::F(2))), KeyAction::Unfocus);
    }
}
