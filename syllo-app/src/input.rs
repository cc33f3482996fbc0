use syllo_core::{Judgment, SessionEvent};
use winit::keyboard::KeyCode;

/// What a key press means to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Event(SessionEvent),
    /// Enter pressed on the id field; the app attaches the typed text.
    SubmitEntry,
    Type(char),
    Erase,
}

pub fn decode_key(code: KeyCode, entering_id: bool) -> Option<KeyInput> {
    if code == KeyCode::Escape {
        return Some(KeyInput::Event(SessionEvent::Quit));
    }
    if entering_id {
        return match code {
            KeyCode::Enter | KeyCode::NumpadEnter => Some(KeyInput::SubmitEntry),
            KeyCode::Backspace => Some(KeyInput::Erase),
            KeyCode::Minus | KeyCode::NumpadSubtract => Some(KeyInput::Type('-')),
            _ => digit(code).map(KeyInput::Type),
        };
    }
    let event = match code {
        KeyCode::Space => SessionEvent::Advance,
        KeyCode::KeyD => SessionEvent::Judge(Judgment::Valid),
        KeyCode::KeyK => SessionEvent::Judge(Judgment::Invalid),
        _ => return None,
    };
    Some(KeyInput::Event(event))
}

fn digit(code: KeyCode) -> Option<char> {
    use KeyCode::*;
    let n = match code {
        Digit0 | Numpad0 => 0,
        Digit1 | Numpad1 => 1,
        Digit2 | Numpad2 => 2,
        Digit3 | Numpad3 => 3,
        Digit4 | Numpad4 => 4,
        Digit5 | Numpad5 => 5,
        Digit6 | Numpad6 => 6,
        Digit7 | Numpad7 => 7,
        Digit8 | Numpad8 => 8,
        Digit9 | Numpad9 => 9,
        _ => return None,
    };
    char::from_digit(n, 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_quits_everywhere() {
        for entering in [true, false] {
            assert_eq!(
                decode_key(KeyCode::Escape, entering),
                Some(KeyInput::Event(SessionEvent::Quit))
            );
        }
    }

    #[test]
    fn id_entry_keys() {
        assert_eq!(decode_key(KeyCode::Digit7, true), Some(KeyInput::Type('7')));
        assert_eq!(decode_key(KeyCode::Numpad0, true), Some(KeyInput::Type('0')));
        assert_eq!(decode_key(KeyCode::Backspace, true), Some(KeyInput::Erase));
        assert_eq!(decode_key(KeyCode::Enter, true), Some(KeyInput::SubmitEntry));
        assert_eq!(decode_key(KeyCode::Space, true), None);
        assert_eq!(decode_key(KeyCode::KeyD, true), None);
    }

    #[test]
    fn session_keys() {
        assert_eq!(
            decode_key(KeyCode::Space, false),
            Some(KeyInput::Event(SessionEvent::Advance))
        );
        assert_eq!(
            decode_key(KeyCode::KeyD, false),
            Some(KeyInput::Event(SessionEvent::Judge(Judgment::Valid)))
        );
        assert_eq!(
            decode_key(KeyCode::KeyK, false),
            Some(KeyInput::Event(SessionEvent::Judge(Judgment::Invalid)))
        );
        assert_eq!(decode_key(KeyCode::Digit1, false), None);
    }
}
