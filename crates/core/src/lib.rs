//! Core game logic - tile matching, board state and the game state machine
//!
//! This crate holds every rule of the game and no presentation code. A host
//! feeds it one [`FrameInput`] per frame and reads draw commands back through
//! the [`scene::Surface`] trait, so the same core runs in a terminal, a window
//! or a headless test.
//!
//! - **Deterministic**: the tile supply takes an injected RNG; same seed, same game
//! - **Testable**: every rule has unit tests next to it
//! - **No globals**: one owned [`GameSession`] per game
//!
//! # Module Structure
//!
//! - [`atlas`]: tile catalog parsed from the sprite-sheet XML description
//! - [`join`]: which edge tags connect
//! - [`iso`]: cell to world projection and pointer picking
//! - [`board`]: placement grid with highlight fades
//! - [`supply`]: the offered tile, cycling and advancing
//! - [`scoring`]: edge matching on placement
//! - [`session`]: board, supply, camera and score of one game
//! - [`state`]: Title / Running / GameOver state machine
//! - [`scene`]: draw command emission
//! - [`config`]: layered configuration
//!
//! # Rules
//!
//! - Any empty cell accepts the offered tile; adjacency is only needed to score
//! - Each edge of the new tile that connects to an occupied neighbour scores 1
//! - `Concrete` connects to nothing; the two footpath tags connect to each other
//! - A scoring tile flashes and fades out over ~2 seconds
//! - The game ends when the last cell is filled
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use isotile_core::{Atlas, GameSession, IsoProjection, TileSupply, AdvancePolicy};
//!
//! let atlas = Arc::new(Atlas::from_xml(r#"
//!     <TextureAtlas>
//!       <TileGroup name="road">
//!         <SubTexture name="r" x="0" y="0" width="132" height="99"
//!             joinTL="Road" joinTR="Road" joinBR="Road" joinBL="Road"/>
//!       </TileGroup>
//!     </TextureAtlas>"#).unwrap());
//!
//! let supply = TileSupply::seeded(atlas, AdvancePolicy::Random, 7);
//! let mut session = GameSession::new(supply, IsoProjection::default());
//!
//! session.try_commit(0, 0).unwrap();
//! session.try_commit(1, 0).unwrap();
//! assert_eq!(session.score(), 1);
//! assert!(session.board().cell(1, 0).unwrap().highlighted);
//! ```

pub mod atlas;
pub mod board;
pub mod config;
pub mod iso;
pub mod join;
pub mod scene;
pub mod scoring;
pub mod session;
pub mod state;
pub mod supply;

pub use isotile_types as types;

// Re-export commonly used types for convenience
pub use atlas::{Atlas, AtlasError, TileGroup, TileVariant};
pub use board::{Board, BoardCell, PlacementRejected, Slot};
pub use config::GameConfig;
pub use iso::IsoProjection;
pub use join::{compatible, JoinRule};
pub use scene::{render, Align, DrawTile, GridCell, Surface, TextLine};
pub use scoring::{try_commit, PlacementOutcome};
pub use session::{Camera, CommitResult, GameSession};
pub use state::{FrameInput, FrameOutcome, FrameStats, Game, MenuSelection, Mode};
pub use supply::{AdvancePolicy, TileSupply};
