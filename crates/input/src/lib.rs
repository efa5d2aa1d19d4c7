//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key and mouse events into logical [`crate::types::Action`]s
//! and collects them into one [`isotile_core::FrameInput`] per frame, including
//! held-key tracking for terminals without key-release events.

pub mod handler;
pub mod map;

pub use isotile_types as types;

pub use handler::InputHandler;
pub use map::{map_key, map_mouse_button, map_scroll, map_zoom_key, should_quit};
