//! Key and mouse mapping from terminal events to logical actions.
//!
//! One key can stand for several actions (Enter both commits a tile and
//! confirms a menu entry); the state machine picks whichever applies.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};

use crate::types::{Action, ActionSet};

/// Map a key to the actions it triggers. Empty when the key is unbound.
pub fn map_key(key: KeyEvent) -> ActionSet {
    use Action::*;
    let actions: &[Action] = match key.code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => &[CameraLeft],
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => &[CameraRight],
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => &[CameraUp, MenuUp],
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => &[CameraDown, MenuDown],

        KeyCode::Char(' ') | KeyCode::Char('c') | KeyCode::Char('C') => &[CycleTile],
        KeyCode::Tab | KeyCode::Char('n') | KeyCode::Char('N') => &[SkipTile],
        KeyCode::Enter => &[Commit, MenuConfirm],
        KeyCode::Esc => &[Cancel],

        KeyCode::F(3) | KeyCode::Char('`') => &[ToggleDebug],
        _ => &[],
    };
    actions.iter().copied().collect()
}

/// Zoom steps for a key: `+`/`=` zoom in, `-`/`_` zoom out.
pub fn map_zoom_key(key: KeyEvent) -> f64 {
    match key.code {
        KeyCode::Char('+') | KeyCode::Char('=') => 1.0,
        KeyCode::Char('-') | KeyCode::Char('_') => -1.0,
        _ => 0.0,
    }
}

/// Actions for a mouse button going down.
pub fn map_mouse_button(button: MouseButton) -> ActionSet {
    match button {
        MouseButton::Left => [Action::Commit, Action::MenuConfirm].into_iter().collect(),
        MouseButton::Right => ActionSet::from(Action::CycleTile),
        MouseButton::Middle => ActionSet::from(Action::SkipTile),
    }
}

/// Zoom steps for a scroll event.
pub fn map_scroll(kind: MouseEventKind) -> f64 {
    match kind {
        MouseEventKind::ScrollUp => 1.0,
        MouseEventKind::ScrollDown => -1.0,
        _ => 0.0,
    }
}

/// Ctrl-C: leave immediately, whatever the game is doing.
///
/// Every other exit goes through the title menu.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
