//! Board module - manages the placement grid
//!
//! The board is a square `size × size` grid where each slot is either empty or
//! holds a reference to a placed tile. Slots also carry the transient highlight
//! state used to flash tiles that scored.
//! Uses a flat vector (row-major, `y * size + x`) sized once at construction.
//!
//! Highlight fade: arming sets `alpha = 0`; every frame the alpha climbs by
//! [`FADE_STEP`] until one more step would pass `255 - FADE_STEP`, at which
//! point the highlight flag drops and the alpha freezes. Renderers treat
//! `255 - alpha` as the tint strength, so the flash starts strong and fades out.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::types::{Edge, TileRef, FADE_STEP, MAX_BOARD_SIZE};

/// Contents of one board slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    Empty,
    Occupied(TileRef),
}

impl Slot {
    pub fn tile(&self) -> Option<TileRef> {
        match self {
            Slot::Empty => None,
            Slot::Occupied(tile) => Some(*tile),
        }
    }
}

/// One board cell: its slot plus highlight/fade state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoardCell {
    pub slot: Slot,
    pub highlighted: bool,
    pub alpha: u8,
}

impl BoardCell {
    /// Highlight tint strength (0 = none, 255 = full).
    pub fn tint_strength(&self) -> u8 {
        if self.highlighted {
            255 - self.alpha
        } else {
            0
        }
    }
}

/// Why a placement did not happen. Expected during play, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementRejected {
    #[error("cell is already occupied")]
    AlreadyOccupied,
    #[error("cell is outside the board")]
    OutOfBounds,
}

/// The placement grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    size: u8,
    /// Flat array of cells, row-major order (y * size + x)
    cells: Vec<BoardCell>,
    occupied: usize,
}

impl Board {
    /// Create an empty `size × size` board.
    ///
    /// `size` is clamped into `1..=MAX_BOARD_SIZE`.
    pub fn new(size: u8) -> Self {
        let size = size.clamp(1, MAX_BOARD_SIZE);
        let len = usize::from(size) * usize::from(size);
        Self {
            size,
            cells: vec![BoardCell::default(); len],
            occupied: 0,
        }
    }

    #[inline(always)]
    fn index(&self, x: u8, y: u8) -> Option<usize> {
        if x >= self.size || y >= self.size {
            return None;
        }
        Some(usize::from(y) * usize::from(self.size) + usize::from(x))
    }

    /// Cells per side
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, x: i16, y: i16) -> bool {
        (0..i16::from(self.size)).contains(&x) && (0..i16::from(self.size)).contains(&y)
    }

    /// Get cell at position (x, y); `None` if out of bounds
    pub fn cell(&self, x: u8, y: u8) -> Option<&BoardCell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    pub fn occupant_at(&self, x: u8, y: u8) -> Option<TileRef> {
        self.cell(x, y).and_then(|c| c.slot.tile())
    }

    pub fn is_occupied(&self, x: u8, y: u8) -> bool {
        self.occupant_at(x, y).is_some()
    }

    /// Put `tile` into an empty slot. Adjacency is not required to place.
    pub fn place(&mut self, x: u8, y: u8, tile: TileRef) -> Result<(), PlacementRejected> {
        let idx = self.index(x, y).ok_or(PlacementRejected::OutOfBounds)?;
        let cell = &mut self.cells[idx];
        if cell.slot != Slot::Empty {
            return Err(PlacementRejected::AlreadyOccupied);
        }
        *cell = BoardCell {
            slot: Slot::Occupied(tile),
            highlighted: false,
            alpha: 0,
        };
        self.occupied += 1;
        Ok(())
    }

    pub fn total_occupied(&self) -> usize {
        self.occupied
    }

    pub fn is_full(&self) -> bool {
        self.occupied == self.cells.len()
    }

    /// Clear every slot and all highlight state (new game).
    pub fn reset(&mut self) {
        self.cells.fill(BoardCell::default());
        self.occupied = 0;
    }

    /// Start the highlight flash on (x, y). Returns false if out of bounds.
    pub fn arm_highlight(&mut self, x: u8, y: u8) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                let cell = &mut self.cells[idx];
                cell.highlighted = true;
                cell.alpha = 0;
                true
            }
            None => false,
        }
    }

    /// Advance every active highlight by one frame.
    pub fn advance_fades(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.highlighted) {
            if cell.alpha < u8::MAX - FADE_STEP {
                cell.alpha += FADE_STEP;
            } else {
                cell.highlighted = false;
            }
        }
    }

    pub fn has_active_fades(&self) -> bool {
        self.cells.iter().any(|c| c.highlighted)
    }

    /// In-bounds neighbours of (x, y), tagged with the edge of (x, y) they touch.
    pub fn neighbors(&self, x: u8, y: u8) -> ArrayVec<(Edge, u8, u8), 4> {
        let mut out = ArrayVec::new();
        for edge in Edge::ALL {
            let (dx, dy) = edge.offset();
            let nx = i16::from(x) + i16::from(dx);
            let ny = i16::from(y) + i16::from(dy);
            if self.in_bounds(nx, ny) {
                out.push((edge, nx as u8, ny as u8));
            }
        }
        out
    }

    /// Cells in painter's order: columns left to right, each from the back row forward.
    pub fn paint_order(&self) -> impl Iterator<Item = (u8, u8, &BoardCell)> + '_ {
        let size = self.size;
        (0..size).flat_map(move |x| {
            (0..size).rev().map(move |y| {
                let idx = usize::from(y) * usize::from(size) + usize::from(x);
                (x, y, &self.cells[idx])
            })
        })
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[BoardCell] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_BOARD_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(8);
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(7, 0), Some(7));
        assert_eq!(board.index(0, 1), Some(8));
        assert_eq!(board.index(7, 7), Some(63));
        assert_eq!(board.index(8, 0), None);
        assert_eq!(board.index(0, 8), None);
    }

    #[test]
    fn test_size_is_clamped() {
        assert_eq!(Board::new(0).size(), 1);
        assert_eq!(Board::new(200).size(), MAX_BOARD_SIZE);
        assert_eq!(Board::new(10).capacity(), 100);
    }

    #[test]
    fn test_place_then_occupied() {
        let mut board = Board::new(8);
        let tile = TileRef::new(2, 1);

        assert_eq!(board.place(3, 4, tile), Ok(()));
        assert_eq!(board.occupant_at(3, 4), Some(tile));
        assert_eq!(board.total_occupied(), 1);

        assert_eq!(
            board.place(3, 4, TileRef::new(0, 0)),
            Err(PlacementRejected::AlreadyOccupied)
        );
        assert_eq!(board.occupant_at(3, 4), Some(tile));
        assert_eq!(board.total_occupied(), 1);
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut board = Board::new(8);
        assert_eq!(
            board.place(8, 0, TileRef::default()),
            Err(PlacementRejected::OutOfBounds)
        );
        assert_eq!(board.total_occupied(), 0);
    }

    #[test]
    fn test_corner_has_two_neighbors() {
        let board = Board::new(8);
        let n = board.neighbors(0, 0);
        assert_eq!(n.len(), 2);
        assert!(n.contains(&(Edge::BottomRight, 1, 0)));
        assert!(n.contains(&(Edge::TopRight, 0, 1)));

        assert_eq!(board.neighbors(3, 3).len(), 4);
        assert_eq!(board.neighbors(7, 3).len(), 3);
    }

    #[test]
    fn test_paint_order_back_to_front() {
        let board = Board::new(2);
        let order: Vec<(u8, u8)> = board.paint_order().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(order, vec![(0, 1), (0, 0), (1, 1), (1, 0)]);
    }

    #[test]
    fn test_fade_saturates_then_clears() {
        let mut board = Board::new(4);
        board.place(1, 1, TileRef::default()).unwrap();
        assert!(board.arm_highlight(1, 1));

        let mut last = board.cell(1, 1).unwrap().alpha;
        assert_eq!(last, 0);
        let mut frames = 0;
        while board.cell(1, 1).unwrap().highlighted {
            board.advance_fades();
            frames += 1;
            let cell = *board.cell(1, 1).unwrap();
            if cell.highlighted {
                assert_eq!(cell.alpha, last + FADE_STEP);
                last = cell.alpha;
            }
        }
        // 0 -> 254 in 127 steps, one more frame to drop the flag.
        assert_eq!(frames, 128);
        assert_eq!(last, 254);

        board.advance_fades();
        assert_eq!(board.cell(1, 1).unwrap().alpha, 254);
        assert!(!board.has_active_fades());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut board = Board::new(3);
        board.place(0, 0, TileRef::default()).unwrap();
        board.arm_highlight(0, 0);
        board.reset();
        assert_eq!(board.total_occupied(), 0);
        assert!(board.cells().iter().all(|c| *c == BoardCell::default()));
    }
}
