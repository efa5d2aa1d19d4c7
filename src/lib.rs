//! Isotile (workspace facade crate).
//!
//! Exposes `isotile::{core,input,term,types}` while the implementation lives
//! in dedicated crates under `crates/`.

pub use isotile_core as core;
pub use isotile_input as input;
pub use isotile_term as term;
pub use isotile_types as types;
