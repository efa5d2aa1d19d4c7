//! Scoring module - edge matching against already placed neighbours
//!
//! When a tile lands on `(x, y)` each of its four edges is compared with the
//! facing edge of the neighbour across it, if that neighbour is on the board
//! and occupied:
//!
//! | Edge of new tile | Neighbour | Neighbour edge |
//! |------------------|-----------|----------------|
//! | TopLeft | `(x - 1, y)` | BottomRight |
//! | BottomRight | `(x + 1, y)` | TopLeft |
//! | BottomLeft | `(x, y - 1)` | TopRight |
//! | TopRight | `(x, y + 1)` | BottomLeft |
//!
//! Every compatible pair scores one point. Placing next to nothing, or next to
//! nothing compatible, is legal and scores zero.

use crate::atlas::{Atlas, TileVariant};
use crate::board::{Board, PlacementRejected};
use crate::join::compatible;
use crate::types::{EdgeSet, TileRef};

/// Result of an accepted placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementOutcome {
    /// Points earned by this placement (one per matched edge).
    pub score_delta: u32,
    /// Edges of the new tile that matched a neighbour.
    pub matched: EdgeSet,
    /// The placement filled the last empty slot.
    pub board_full: bool,
}

impl PlacementOutcome {
    pub fn scored(&self) -> bool {
        self.score_delta > 0
    }
}

/// Edges of `tile` (as if placed at `(x, y)`) that connect to occupied neighbours.
pub fn matched_edges(board: &Board, atlas: &Atlas, x: u8, y: u8, tile: &TileVariant) -> EdgeSet {
    let mut matched = EdgeSet::empty();
    for (edge, nx, ny) in board.neighbors(x, y) {
        let Some(neighbor) = board.occupant_at(nx, ny).and_then(|r| atlas.get(r)) else {
            continue;
        };
        if compatible(tile.join(edge), neighbor.join(edge.opposite())) {
            matched.insert(edge);
        }
    }
    matched
}

/// Place `tile` at `(x, y)` and score it.
///
/// A rejected placement leaves the board untouched. On success the highlight
/// is armed on the new cell when at least one edge matched.
pub fn try_commit(
    board: &mut Board,
    atlas: &Atlas,
    x: u8,
    y: u8,
    tile: TileRef,
) -> Result<PlacementOutcome, PlacementRejected> {
    let variant = atlas.get(tile).ok_or(PlacementRejected::OutOfBounds)?;
    board.place(x, y, tile)?;

    let matched = matched_edges(board, atlas, x, y, variant);
    if !matched.is_empty() {
        board.arm_highlight(x, y);
    }

    Ok(PlacementOutcome {
        score_delta: matched.len(),
        matched,
        board_full: board.is_full(),
    })
}
