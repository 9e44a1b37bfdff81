use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::lottery::geometry::Formation;

/// What the operator asked for, independent of which key was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Enter, start, stop or continue depending on the draw status.
    Confirm,
    /// Throw away a revealed round.
    Cancel,
    /// Re-arrange the idle cards.
    Layout(Formation),
    /// Make the next or previous prize current.
    NextPrize,
    PrevPrize,
    /// Put the most recent winner back into the pool.
    UndoWinner,
    /// Clear every win and prize counter.
    ResetWinners,
}

#[inline(always)]
pub fn intent_from_keycode(code: KeyCode) -> Option<Intent> {
    match code {
        KeyCode::Space => Some(Intent::Confirm),
        KeyCode::Escape => Some(Intent::Cancel),
        KeyCode::Digit1 | KeyCode::Numpad1 => Some(Intent::Layout(Formation::Table)),
        KeyCode::Digit2 | KeyCode::Numpad2 => Some(Intent::Layout(Formation::Sphere)),
        KeyCode::Digit3 | KeyCode::Numpad3 => Some(Intent::Layout(Formation::Helix)),
        KeyCode::ArrowRight => Some(Intent::NextPrize),
        KeyCode::ArrowLeft => Some(Intent::PrevPrize),
        KeyCode::Backspace => Some(Intent::UndoWinner),
        KeyCode::Delete => Some(Intent::ResetWinners),
        _ => None,
    }
}

/// Only fresh presses count; releases and auto-repeat are dropped.
pub fn intent_from_event(event: &KeyEvent) -> Option<Intent> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    match event.physical_key {
        PhysicalKey::Code(code) => intent_from_keycode(code),
        PhysicalKey::Unidentified(_) => None,
    }
}
