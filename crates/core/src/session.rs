//! Game session module - everything that belongs to one game in progress
//!
//! A session ties together the board, the tile supply, the camera and the
//! running score. It is owned by the state machine and recreated in place on
//! "New Game"; nothing about it lives in globals.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;

use crate::atlas::Atlas;
use crate::board::{Board, PlacementRejected};
use crate::iso::IsoProjection;
use crate::scoring::{self, PlacementOutcome};
use crate::supply::TileSupply;
use crate::types::{Point, TileRef, CAMERA_START, CAMERA_ZOOM_SPEED};

/// Viewer position and scale in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point,
    pub zoom: f64,
}

impl Camera {
    pub const MIN_ZOOM: f64 = 0.1;
    pub const MAX_ZOOM: f64 = 10.0;

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.position = self.position + Point::new(dx, dy);
    }

    /// Scale by `CAMERA_ZOOM_SPEED ^ delta`.
    pub fn zoom_by(&mut self, delta: f64) {
        if delta == 0.0 || !delta.is_finite() {
            return;
        }
        self.zoom = (self.zoom * CAMERA_ZOOM_SPEED.powf(delta)).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: CAMERA_START,
            zoom: 1.0,
        }
    }
}

/// What an accepted commit did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitResult {
    Placed(PlacementOutcome),
    /// The placement filled the board; the game is over.
    BoardFull {
        final_score: u32,
        outcome: PlacementOutcome,
    },
}

impl CommitResult {
    pub fn outcome(&self) -> &PlacementOutcome {
        match self {
            CommitResult::Placed(outcome) | CommitResult::BoardFull { outcome, .. } => outcome,
        }
    }
}

/// One game in progress.
#[derive(Debug, Clone)]
pub struct GameSession<R = StdRng> {
    atlas: Arc<Atlas>,
    board: Board,
    supply: TileSupply<R>,
    projection: IsoProjection,
    camera: Camera,
    score: u32,
    placements: u32,
}

impl<R: Rng> GameSession<R> {
    /// Fresh session. The board size comes from the projection.
    pub fn new(supply: TileSupply<R>, projection: IsoProjection) -> Self {
        Self {
            atlas: supply.atlas().clone(),
            board: Board::new(projection.board_size()),
            supply,
            projection,
            camera: Camera::default(),
            score: 0,
            placements: 0,
        }
    }

    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn supply(&self) -> &TileSupply<R> {
        &self.supply
    }

    pub fn supply_mut(&mut self) -> &mut TileSupply<R> {
        &mut self.supply
    }

    pub fn projection(&self) -> &IsoProjection {
        &self.projection
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn placements(&self) -> u32 {
        self.placements
    }

    pub fn offer(&self) -> TileRef {
        self.supply.current()
    }

    /// Board cell under a pointer given in world coordinates.
    pub fn hovered_cell(&self, pointer: Point) -> (u8, u8) {
        self.projection.screen_to_cell(pointer)
    }

    /// Place the current offer at `(x, y)`, score it and draw the next offer.
    ///
    /// A rejected placement leaves the session unchanged.
    pub fn try_commit(&mut self, x: u8, y: u8) -> Result<CommitResult, PlacementRejected> {
        let tile = self.supply.current();
        let outcome = match scoring::try_commit(&mut self.board, &self.atlas, x, y, tile) {
            Ok(outcome) => outcome,
            Err(reason) => {
                tracing::debug!(x, y, %reason, "placement rejected");
                return Err(reason);
            }
        };

        self.score = self.score.saturating_add(outcome.score_delta);
        self.placements += 1;
        let next = self.supply.next_group();
        tracing::trace!(
            x,
            y,
            group = tile.group,
            variant = tile.variant,
            delta = outcome.score_delta,
            score = self.score,
            next_group = next.group,
            "tile placed"
        );

        if outcome.board_full {
            tracing::info!(score = self.score, placements = self.placements, "board full");
            Ok(CommitResult::BoardFull {
                final_score: self.score,
                outcome,
            })
        } else {
            Ok(CommitResult::Placed(outcome))
        }
    }

    /// Start over: empty board, zero score, fresh offer, camera back home.
    pub fn reset(&mut self) {
        self.board.reset();
        self.supply.restart();
        self.camera = Camera::default();
        self.score = 0;
        self.placements = 0;
    }

    pub fn advance_fades(&mut self) {
        self.board.advance_fades();
    }
}
