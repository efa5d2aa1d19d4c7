//! Terminal front end for the isotile core.
//!
//! [`IsoView`] implements the core's `Surface` over a character framebuffer,
//! drawing each tile as a shaded diamond. [`TerminalRenderer`] pushes that
//! framebuffer to the terminal, writing only changed cells after the first
//! frame. The same world-to-cell mapping runs backwards for mouse picking.

pub mod fb;
pub mod iso_view;
pub mod renderer;

pub use isotile_core as core;
pub use isotile_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use iso_view::{group_color, IsoView, TermSurface, Viewport};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, Run, TerminalRenderer};
