//! Isometric projection between board cells and world space
//!
//! Cell `(x, y)` projects to the diamond centre
//! `((x + y) * w / 2, (y - x) * h / 2)`. Walking `+x` moves a tile down-right,
//! walking `+y` moves it up-right.
//!
//! Picking runs the inverse. Pointers usually track sprites drawn above the
//! diamond, so the projection carries a vertical `pick_bias` that is removed
//! before inverting. With a bias of zero, picking is the exact inverse of
//! [`IsoProjection::cell_to_screen`]; [`IsoProjection::cursor`] uses one tile
//! height, matching sprites anchored at their top.
//!
//! Points outside the board clamp to the nearest edge cell on each axis
//! independently, so the cursor always snaps somewhere.

use crate::types::{Point, TILE_HEIGHT, TILE_WIDTH};

/// Mapping between board cells and projected world positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjection {
    tile_width: f64,
    tile_height: f64,
    board_size: u8,
    pick_bias: f64,
}

impl IsoProjection {
    /// Exact projection: picking inverts [`Self::cell_to_screen`].
    pub fn new(tile_width: f64, tile_height: f64, board_size: u8) -> Self {
        Self {
            tile_width,
            tile_height,
            board_size,
            pick_bias: 0.0,
        }
    }

    /// Cursor projection: the pointer sits one tile height above the diamond.
    pub fn cursor(tile_width: f64, tile_height: f64, board_size: u8) -> Self {
        Self::new(tile_width, tile_height, board_size).with_pick_bias(tile_height)
    }

    pub fn with_pick_bias(mut self, pick_bias: f64) -> Self {
        self.pick_bias = pick_bias;
        self
    }

    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    pub fn tile_height(&self) -> f64 {
        self.tile_height
    }

    pub fn board_size(&self) -> u8 {
        self.board_size
    }

    pub fn pick_bias(&self) -> f64 {
        self.pick_bias
    }

    /// Diamond centre of cell `(x, y)`.
    pub fn cell_to_screen(&self, x: u8, y: u8) -> Point {
        let (x, y) = (f64::from(x), f64::from(y));
        Point::new(
            (x + y) * self.tile_width / 2.0,
            (y - x) * self.tile_height / 2.0,
        )
    }

    /// Diamond centre raised by `offset` pixels. Sprites pass half their height.
    pub fn sprite_anchor(&self, x: u8, y: u8, offset: f64) -> Point {
        self.cell_to_screen(x, y) + Point::new(0.0, offset)
    }

    /// The point that picks back to `(x, y)` exactly.
    pub fn pick_anchor(&self, x: u8, y: u8) -> Point {
        self.cell_to_screen(x, y) + Point::new(0.0, self.pick_bias)
    }

    /// Nearest cell under `point`, clamped into the board on each axis.
    pub fn screen_to_cell(&self, point: Point) -> (u8, u8) {
        let u = point.x / self.tile_width;
        let v = (point.y - self.pick_bias) / self.tile_height;
        (self.clamp_axis(u - v), self.clamp_axis(u + v))
    }

    /// Like [`Self::screen_to_cell`] but `None` when the point lies off the board.
    pub fn screen_to_cell_strict(&self, point: Point) -> Option<(u8, u8)> {
        let u = point.x / self.tile_width;
        let v = (point.y - self.pick_bias) / self.tile_height;
        let max = f64::from(self.board_size) - 1.0;
        let (x, y) = ((u - v).round(), (u + v).round());
        if (0.0..=max).contains(&x) && (0.0..=max).contains(&y) {
            Some((x as u8, y as u8))
        } else {
            None
        }
    }

    #[inline]
    fn clamp_axis(&self, v: f64) -> u8 {
        let max = f64::from(self.board_size.saturating_sub(1));
        // NaN casts to 0.
        v.round().clamp(0.0, max) as u8
    }
}

impl Default for IsoProjection {
    fn default() -> Self {
        Self::cursor(TILE_WIDTH, TILE_HEIGHT, crate::types::DEFAULT_BOARD_SIZE)
    }
}
