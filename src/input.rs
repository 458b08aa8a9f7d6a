//! Input handling
//!
//! Maps keyboard events to session commands.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::session::Command;

/// Map a terminal event to a session command, if any.
pub fn map_event(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

/// Map a key press to a session command.
pub fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }

    match key.code {
        KeyCode::Char(' ') => Some(Command::Snapshot),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::ToggleRecording),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Command::CycleMode),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(Command::CycleFilter),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::SwitchDevice),
        KeyCode::Char('?') => Some(Command::ToggleHelp),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_primary_bindings() {
        assert_eq!(map_key(&key(KeyCode::Char(' '))), Some(Command::Snapshot));
        assert_eq!(
            map_key(&key(KeyCode::Char('r'))),
            Some(Command::ToggleRecording)
        );
        assert_eq!(map_key(&key(KeyCode::Char('m'))), Some(Command::CycleMode));
        assert_eq!(
            map_key(&key(KeyCode::Char('f'))),
            Some(Command::CycleFilter)
        );
        assert_eq!(
            map_key(&key(KeyCode::Char('c'))),
            Some(Command::SwitchDevice)
        );
        assert_eq!(map_key(&key(KeyCode::Char('?'))), Some(Command::ToggleHelp));
        assert_eq!(map_key(&key(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(map_key(&key(KeyCode::Esc)), Some(Command::Quit));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&event), Some(Command::Quit));
    }

    #[test]
    fn test_unbound_keys_ignored() {
        assert_eq!(map_key(&key(KeyCode::Char('x'))), None);
        assert_eq!(map_key(&key(KeyCode::Enter)), None);
    }
}
