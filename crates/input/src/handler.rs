//! Per-frame input accumulation for terminal environments.
//!
//! Between frames the host feeds every terminal event in; once per frame
//! [`InputHandler::frame`] drains them into a [`FrameInput`].
//!
//! Camera and menu-navigation actions count as held while their key keeps
//! repeating. Most terminals never report key releases, so a held action
//! expires after a short timeout without a fresh press or repeat.

use std::time::Instant;

use crossterm::event::{KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

use crate::map::{map_key, map_mouse_button, map_scroll, map_zoom_key};
use crate::types::{Action, ActionSet, Point};
use isotile_core::FrameInput;

// Must stay below the menu debounce so a tapped key never counts twice.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 120;

/// Actions that track a held state rather than single presses.
const HOLDABLE: [Action; 6] = [
    Action::CameraLeft,
    Action::CameraRight,
    Action::CameraUp,
    Action::CameraDown,
    Action::MenuUp,
    Action::MenuDown,
];

#[derive(Debug, Clone)]
pub struct InputHandler {
    pressed: ActionSet,
    /// Last press or repeat per action, indexed by [`Action::index`].
    last_seen: [Option<Instant>; Action::ALL.len()],
    zoom_delta: f64,
    mouse: Option<(u16, u16)>,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            pressed: ActionSet::empty(),
            last_seen: [None; Action::ALL.len()],
            zoom_delta: 0.0,
            mouse: None,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Last mouse position as terminal `(column, row)`, if the mouse has moved.
    pub fn mouse(&self) -> Option<(u16, u16)> {
        self.mouse
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let actions = map_key(key);
        match key.kind {
            KeyEventKind::Release => {
                for action in actions.iter() {
                    self.last_seen[action.index()] = None;
                }
            }
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if key.kind == KeyEventKind::Press {
                    self.pressed = self.pressed.union(actions);
                    self.zoom_delta += map_zoom_key(key);
                }
                let now = Instant::now();
                for action in actions.iter().filter(|a| HOLDABLE.contains(a)) {
                    self.last_seen[action.index()] = Some(now);
                }
            }
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        self.mouse = Some((event.column, event.row));
        match event.kind {
            MouseEventKind::Down(button) => {
                self.pressed = self.pressed.union(map_mouse_button(button));
            }
            kind => self.zoom_delta += map_scroll(kind),
        }
    }

    /// Actions currently considered held, dropping the ones that timed out.
    pub fn held(&mut self) -> ActionSet {
        let timeout = u128::from(self.key_release_timeout_ms);
        let mut held = ActionSet::empty();
        for action in HOLDABLE {
            let slot = &mut self.last_seen[action.index()];
            if matches!(slot, Some(at) if at.elapsed().as_millis() <= timeout) {
                held.insert(action);
            } else {
                *slot = None;
            }
        }
        held
    }

    /// Drain this frame's input. `pointer` is the mouse position in world space.
    pub fn frame(&mut self, pointer: Point, elapsed_ms: u32) -> FrameInput {
        let held = self.held();
        let input = FrameInput {
            pointer,
            pressed: self.pressed,
            held,
            zoom_delta: self.zoom_delta,
            elapsed_ms,
        };
        self.pressed = ActionSet::empty();
        self.zoom_delta = 0.0;
        input
    }

    pub fn reset(&mut self) {
        self.pressed = ActionSet::empty();
        self.last_seen = [None; Action::ALL.len()];
        self.zoom_delta = 0.0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
