//! Player commands and the key mapping that produces them.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::{Direction, GameState, TickOutcome};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    HardDrop,
    Rotate,
    Quit,
}

impl Command {
    /// Case-sensitive single-character mapping. Anything else is ignored.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'h' => Some(Command::MoveLeft),
            'l' => Some(Command::MoveRight),
            'j' => Some(Command::HardDrop),
            'r' => Some(Command::Rotate),
            'q' => Some(Command::Quit),
            _ => None,
        }
    }

    /// Only plain presses of a character key count; shift is already folded into the char.
    pub fn from_key_event(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        match key.code {
            KeyCode::Char(c) => Self::from_char(c),
            _ => None,
        }
    }
}

/// Ctrl-C, since raw mode swallows SIGINT.
pub fn is_interrupt(key: KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.code == KeyCode::Char('c')
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

impl GameState {
    /// Applies one command. Returns whether anything changed.
    pub fn apply(&mut self, command: Command) -> bool {
        if !self.is_running() {
            return false;
        }
        match command {
            Command::MoveLeft => self.try_move(Direction::Left),
            Command::MoveRight => self.try_move(Direction::Right),
            Command::Rotate => self.try_rotate(),
            Command::HardDrop => !matches!(self.hard_drop(), TickOutcome::Halted),
            Command::Quit => {
                self.quit();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_the_five_command_keys() {
        assert_eq!(Command::from_char('h'), Some(Command::MoveLeft));
        assert_eq!(Command::from_char('l'), Some(Command::MoveRight));
        assert_eq!(Command::from_char('j'), Some(Command::HardDrop));
        assert_eq!(Command::from_char('r'), Some(Command::Rotate));
        assert_eq!(Command::from_char('q'), Some(Command::Quit));
    }

    #[test]
    fn mapping_is_case_sensitive() {
        for c in ['H', 'L', 'J', 'R', 'Q', 'x', ' ', '\n'] {
            assert_eq!(Command::from_char(c), None, "{c:?} should be ignored");
        }
    }

    #[test]
    fn key_events_need_a_plain_press() {
        assert_eq!(
            Command::from_key_event(KeyEvent::from(KeyCode::Char('r'))),
            Some(Command::Rotate)
        );
        assert_eq!(Command::from_key_event(KeyEvent::from(KeyCode::Left)), None);

        let ctrl_h = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::CONTROL);
        assert_eq!(Command::from_key_event(ctrl_h), None);

        let mut release = KeyEvent::from(KeyCode::Char('h'));
        release.kind = KeyEventKind::Release;
        assert_eq!(Command::from_key_event(release), None);
    }

    #[test]
    fn ctrl_c_is_an_interrupt() {
        assert!(is_interrupt(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_interrupt(KeyEvent::from(KeyCode::Char('c'))));
    }
}
