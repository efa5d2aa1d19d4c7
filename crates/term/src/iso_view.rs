//! IsoView: rasterizes the game scene into a terminal framebuffer.
//!
//! This module is pure (no I/O). World space is mapped onto terminal cells at
//! a fixed number of world pixels per column and per row (scaled by the camera
//! zoom), with the camera position at the centre of the viewport. Each tile is
//! drawn as a filled diamond centred on its pick anchor, sized from the board
//! projection, so the mouse cell under a diamond picks that same board cell.
//! Empty cells get only a dim outline ring.

use rand::Rng;

use isotile_core::scene::{self, Align, DrawTile, GridCell, Surface, TextLine};
use isotile_core::{Camera, Game, IsoProjection};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{Point, TILE_HEIGHT, TILE_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const BACKGROUND: Rgb = Rgb::new(16, 18, 24);
const TEXT: Rgb = Rgb::new(220, 220, 220);
const EMPHASIS: Rgb = Rgb::new(255, 210, 80);
const GRID: Rgb = Rgb::new(44, 48, 60);

/// Terrain colors, picked per group name.
const PALETTE: [Rgb; 8] = [
    Rgb::new(110, 110, 120),
    Rgb::new(70, 140, 70),
    Rgb::new(60, 110, 190),
    Rgb::new(170, 80, 60),
    Rgb::new(190, 170, 90),
    Rgb::new(120, 90, 160),
    Rgb::new(60, 160, 160),
    Rgb::new(150, 150, 150),
];

/// Maps world space onto terminal cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoView {
    px_per_col: f64,
    px_per_row: f64,
    /// Strongest tint mix applied to a freshly scored tile.
    tint_mix: f32,
}

impl Default for IsoView {
    fn default() -> Self {
        Self::fitted(TILE_WIDTH, TILE_HEIGHT)
    }
}

impl IsoView {
    /// View where one diamond of `projection` spans 8 columns by 4 rows at zoom 1.
    pub fn for_projection(projection: &IsoProjection) -> Self {
        Self::fitted(projection.tile_width(), projection.tile_height())
    }

    // Terminal glyphs are about twice as tall as wide, so 8×4 keeps the 2:1 look.
    fn fitted(tile_width: f64, tile_height: f64) -> Self {
        Self {
            px_per_col: tile_width / 8.0,
            px_per_row: tile_height / 4.0,
            tint_mix: 0.8,
        }
    }

    pub fn new(px_per_col: f64, px_per_row: f64) -> Self {
        Self {
            px_per_col,
            px_per_row,
            ..Self::default()
        }
    }

    /// World point to fractional terminal position `(column, row)`.
    pub fn world_to_term(&self, p: Point, camera: &Camera, vp: Viewport) -> (f64, f64) {
        let col = (p.x - camera.position.x) * camera.zoom / self.px_per_col
            + f64::from(vp.width) / 2.0;
        // World y points up, terminal rows go down.
        let row = -(p.y - camera.position.y) * camera.zoom / self.px_per_row
            + f64::from(vp.height) / 2.0;
        (col, row)
    }

    /// Centre of terminal cell `(column, row)` in world space.
    pub fn term_to_world(&self, col: u16, row: u16, camera: &Camera, vp: Viewport) -> Point {
        let cx = f64::from(col) + 0.5 - f64::from(vp.width) / 2.0;
        let cy = f64::from(row) + 0.5 - f64::from(vp.height) / 2.0;
        Point::new(
            cx * self.px_per_col / camera.zoom + camera.position.x,
            -cy * self.px_per_row / camera.zoom + camera.position.y,
        )
    }

    /// Render the whole frame into `fb`, sized to `viewport`.
    pub fn render_into<R: Rng>(&self, game: &Game<R>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell {
            ch: ' ',
            style: CellStyle::new(TEXT, BACKGROUND),
        });
        let session = game.session();
        let mut surface = TermSurface::new(self, fb, viewport);
        surface.begin_board(session.camera(), session.projection());
        scene::render(game, &mut surface);
    }

    /// Convenience wrapper that allocates a new framebuffer.
    pub fn render<R: Rng>(&self, game: &Game<R>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }
}

/// Stable color per group name.
pub fn group_color(name: &str) -> Rgb {
    let hash = name
        .bytes()
        .fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(usize::from(b)));
    PALETTE[hash % PALETTE.len()]
}

/// [`Surface`] over a framebuffer.
pub struct TermSurface<'a> {
    view: &'a IsoView,
    fb: &'a mut FrameBuffer,
    camera: Camera,
    /// Diamond size in world pixels, from the board projection.
    tile_size: (f64, f64),
    viewport: Viewport,
}

impl<'a> TermSurface<'a> {
    pub fn new(view: &'a IsoView, fb: &'a mut FrameBuffer, viewport: Viewport) -> Self {
        Self {
            view,
            fb,
            camera: Camera::default(),
            tile_size: (TILE_WIDTH, TILE_HEIGHT),
            viewport,
        }
    }

    /// Fill the terminal cells covered by the diamond centred on `anchor`.
    ///
    /// `fill` gets the color already there and the normalized distance from
    /// the centre (0 at the centre, 1 on the outline); `None` leaves the cell.
    /// Returns the centre in terminal coordinates.
    fn diamond(
        &mut self,
        anchor: Point,
        mut fill: impl FnMut(Rgb, f64) -> Option<Rgb>,
    ) -> Option<(f64, f64)> {
        let (cc, cr) = self.view.world_to_term(anchor, &self.camera, self.viewport);
        let (width, height) = self.tile_size;
        let half_w = width / 2.0 * self.camera.zoom / self.view.px_per_col;
        let half_h = height / 2.0 * self.camera.zoom / self.view.px_per_row;
        if !(half_w > 0.0 && half_h > 0.0) {
            return None;
        }

        let (x0, x1) = ((cc - half_w).floor() as i32, (cc + half_w).ceil() as i32);
        let (y0, y1) = ((cr - half_h).floor() as i32, (cr + half_h).ceil() as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = (f64::from(x) + 0.5 - cc).abs() / half_w;
                let dy = (f64::from(y) + 0.5 - cr).abs() / half_h;
                if dx + dy > 1.0 {
                    continue;
                }
                let (Ok(ux), Ok(uy)) = (u16::try_from(x), u16::try_from(y)) else {
                    continue;
                };
                let Some(under) = self.fb.get(ux, uy) else {
                    continue;
                };
                if let Some(bg) = fill(under.style.bg, dx + dy) {
                    self.fb.set(
                        ux,
                        uy,
                        Cell {
                            ch: ' ',
                            style: CellStyle::new(TEXT, bg),
                        },
                    );
                }
            }
        }
        Some((cc, cr))
    }
}

impl Surface for TermSurface<'_> {
    fn begin_board(&mut self, camera: &Camera, projection: &IsoProjection) {
        self.camera = *camera;
        self.tile_size = (projection.tile_width(), projection.tile_height());
    }

    fn draw_empty_cell(&mut self, cell: &GridCell) {
        self.diamond(cell.pick_anchor, |_, dist| (dist > 0.7).then_some(GRID));
    }

    fn draw_tile(&mut self, tile: &DrawTile<'_>) {
        let mut color = group_color(tile.group);
        if let Some(tint) = tile.tint {
            let strength = f32::from(tint.a) / 255.0 * self.view.tint_mix;
            color = color.blend(Rgb::from(tint), strength);
        }

        let opacity = tile.opacity;
        let centre = self.diamond(tile.pick_anchor, |under, dist| {
            // Shade the outer ring so neighbouring diamonds stay distinct.
            let shade = if dist > 0.75 { 0.25 } else { 0.0 };
            Some(under.blend(color.blend(Rgb::new(0, 0, 0), shade), opacity))
        });

        // Group initial on fully opaque tiles.
        let (Some((cc, cr)), true) = (centre, opacity >= 1.0) else {
            return;
        };
        if let Some(ch) = tile.group.chars().next() {
            let (x, y) = (cc.floor() as i32, cr.floor() as i32);
            let bg = self
                .fb
                .get(x.max(0) as u16, y.max(0) as u16)
                .map_or(BACKGROUND, |c| c.style.bg);
            self.fb.set_clipped(
                x,
                y,
                Cell {
                    ch: ch.to_ascii_uppercase(),
                    style: CellStyle::new(Rgb::new(0, 0, 0), bg),
                },
            );
        }
    }

    fn draw_text(&mut self, line: &TextLine) {
        let style = if line.emphasis {
            CellStyle::new(EMPHASIS, BACKGROUND).bold()
        } else {
            CellStyle::new(TEXT, BACKGROUND)
        };
        let len = u16::try_from(line.text.chars().count()).unwrap_or(u16::MAX);
        let x = match line.align {
            Align::Left => 1,
            Align::Center => self.fb.width().saturating_sub(len) / 2,
        };
        self.fb.put_str(x, line.row, &line.text, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use isotile_core::{
        AdvancePolicy, Atlas, FrameInput, GameSession, TileGroup, TileSupply, TileVariant,
    };
    use crate::types::{Action, ActionSet, JoinTag, SpriteRect};

    fn game() -> Game {
        game_with(IsoProjection::default())
    }

    fn game_with(projection: IsoProjection) -> Game {
        let rect = SpriteRect {
            x: 0,
            y: 0,
            width: 132,
            height: 99,
        };
        let atlas = Arc::new(
            Atlas::from_groups(vec![TileGroup::new(
                "road",
                vec![TileVariant::new("road", rect, [JoinTag::Road; 4])],
            )
            .unwrap()])
            .unwrap(),
        );
        let supply = TileSupply::seeded(atlas, AdvancePolicy::Random, 5);
        Game::new(GameSession::new(supply, projection))
    }

    #[test]
    fn term_round_trip_picks_the_same_cell() {
        let view = IsoView::default();
        let vp = Viewport::new(400, 200);
        let camera = Camera::default();
        let iso = IsoProjection::default();
        for x in 0..8 {
            for y in 0..8 {
                let (col, row) = view.world_to_term(iso.pick_anchor(x, y), &camera, vp);
                let world = view.term_to_world(col.floor() as u16, row.floor() as u16, &camera, vp);
                assert_eq!(iso.screen_to_cell(world), (x, y));
            }
        }
    }

    #[test]
    fn camera_sits_at_viewport_centre() {
        let view = IsoView::default();
        let camera = Camera::default();
        let vp = Viewport::new(80, 24);
        assert_eq!(view.world_to_term(camera.position, &camera, vp), (40.0, 12.0));
    }

    #[test]
    fn title_screen_shows_menu() {
        let fb = IsoView::default().render(&game(), Viewport::new(40, 16));
        let rows: Vec<String> = (0..16).map(|y| fb.row_text(y)).collect();
        assert!(rows.iter().any(|r| r.contains("> New Game <")));
        assert!(rows.iter().any(|r| r.contains("Quit")));
    }

    #[test]
    fn placed_tile_is_painted() {
        let mut game = game();
        game.frame(&FrameInput {
            pressed: ActionSet::from(Action::MenuConfirm),
            ..FrameInput::default()
        });
        let view = IsoView::default();
        let vp = Viewport::new(120, 60);
        let camera = *game.session().camera();
        let target = game.session().projection().pick_anchor(2, 2);
        game.frame(&FrameInput {
            pointer: target,
            pressed: ActionSet::from(Action::Commit),
            ..FrameInput::default()
        });
        assert!(game.session().board().is_occupied(2, 2));

        let fb = view.render(&game, vp);
        let (col, row) = view.world_to_term(target, &camera, vp);
        let cell = fb.get(col.floor() as u16, row.floor() as u16).unwrap();
        assert_eq!(cell.ch, 'R');
        assert!(fb.row_text(0).contains("Score: 0"));
    }

    /// Number of cells on row `y` whose background differs from the clear color.
    fn painted_in_row(fb: &FrameBuffer, y: u16) -> usize {
        (0..fb.width())
            .filter(|&x| fb.get(x, y).is_some_and(|c| c.style.bg != BACKGROUND))
            .count()
    }

    fn blank(width: u16, height: u16) -> FrameBuffer {
        let mut fb = FrameBuffer::new(width, height);
        fb.clear(Cell {
            ch: ' ',
            style: CellStyle::new(TEXT, BACKGROUND),
        });
        fb
    }

    fn tile_at(anchor: Point) -> DrawTile<'static> {
        DrawTile {
            tile: Default::default(),
            cell: (0, 0),
            group: "road",
            rect: SpriteRect {
                x: 0,
                y: 0,
                width: 66,
                height: 50,
            },
            at: anchor,
            pick_anchor: anchor,
            tint: None,
            opacity: 1.0,
        }
    }

    #[test]
    fn diamond_size_follows_the_projection() {
        let view = IsoView::default();
        let vp = Viewport::new(40, 20);
        let small = IsoProjection::new(66.0, 33.0, 8);
        let anchor = small.pick_anchor(2, 2);
        let camera = Camera {
            position: anchor,
            zoom: 1.0,
        };

        let mut fb = blank(40, 20);
        let mut surface = TermSurface::new(&view, &mut fb, vp);
        surface.begin_board(&camera, &small);
        surface.draw_tile(&tile_at(anchor));
        // Half of a 66 px diamond at 16.5 px per column is 2 columns.
        assert_eq!(painted_in_row(&fb, 10), 2);

        let mut fb = blank(40, 20);
        let mut surface = TermSurface::new(&view, &mut fb, vp);
        surface.begin_board(&camera, &IsoProjection::default());
        surface.draw_tile(&tile_at(anchor));
        assert_eq!(painted_in_row(&fb, 10), 6);
    }

    #[test]
    fn neighbouring_small_tiles_keep_their_own_glyphs() {
        let small = IsoProjection::new(66.0, 33.0, 8);
        let mut game = game_with(small);
        game.frame(&FrameInput {
            pressed: ActionSet::from(Action::MenuConfirm),
            ..FrameInput::default()
        });
        for (x, y) in [(2, 2), (3, 2), (2, 3)] {
            game.frame(&FrameInput {
                pointer: small.pick_anchor(x, y),
                pressed: ActionSet::from(Action::Commit),
                ..FrameInput::default()
            });
        }
        game.session_mut().camera_mut().position = small.pick_anchor(2, 2);

        let view = IsoView::default();
        let vp = Viewport::new(60, 30);
        let fb = view.render(&game, vp);
        let camera = *game.session().camera();
        for (x, y) in [(2, 2), (3, 2), (2, 3)] {
            let (col, row) = view.world_to_term(small.pick_anchor(x, y), &camera, vp);
            let cell = fb.get(col.floor() as u16, row.floor() as u16).unwrap();
            assert_eq!(cell.ch, 'R', "({x}, {y})");
            // Picking through the terminal lands on the same cell.
            let world = view.term_to_world(col.floor() as u16, row.floor() as u16, &camera, vp);
            assert_eq!(small.screen_to_cell(world), (x, y));
        }
    }

    #[test]
    fn empty_board_shows_its_outline() {
        let mut game = game();
        game.frame(&FrameInput {
            pressed: ActionSet::from(Action::MenuConfirm),
            ..FrameInput::default()
        });
        let fb = IsoView::default().render(&game, Viewport::new(120, 60));
        let grid = (0..60)
            .flat_map(|y| (0..120).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.get(x, y).is_some_and(|c| c.style.bg == GRID))
            .count();
        assert!(grid > 0);
    }

    #[test]
    fn for_projection_fits_eight_columns_per_tile() {
        let small = IsoProjection::new(66.0, 33.0, 8);
        let view = IsoView::for_projection(&small);
        let camera = Camera::default();
        let vp = Viewport::new(80, 24);
        let (a, _) = view.world_to_term(small.cell_to_screen(0, 0), &camera, vp);
        let (b, _) = view.world_to_term(small.cell_to_screen(1, 1), &camera, vp);
        assert_eq!(b - a, 8.0);
    }
}
