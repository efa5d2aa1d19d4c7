//! Scene module - turns game state into draw commands
//!
//! The core never rasterizes anything. [`render`] walks the current state and
//! hands a [`Surface`] one [`DrawTile`] per visible sprite, one [`GridCell`]
//! per empty board cell, plus [`TextLine`]s for the HUD and menus. Board cells
//! arrive back to front with the offer preview in its cell's slot, so a
//! surface can paint them in order without sorting.

use rand::Rng;

use crate::iso::IsoProjection;
use crate::session::Camera;
use crate::state::{Game, MenuSelection, Mode};
use crate::types::{Point, Rgba, SpriteRect, TileRef, HIGHLIGHT_TINT};

/// Opacity of the offered tile drawn under the pointer.
pub const PREVIEW_OPACITY: f32 = 0.5;

/// One sprite to draw, positioned in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTile<'a> {
    pub tile: TileRef,
    pub cell: (u8, u8),
    /// Name of the tile's group, for surfaces that color by terrain.
    pub group: &'a str,
    /// Source rectangle in the sprite sheet.
    pub rect: SpriteRect,
    /// Sprite anchor: diamond centre raised by half the sprite height.
    pub at: Point,
    /// Point that picks back to `cell`; where the pointer sits over this tile.
    pub pick_anchor: Point,
    pub tint: Option<Rgba>,
    pub opacity: f32,
}

/// An empty board cell, drawn as the board outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub cell: (u8, u8),
    /// Diamond centre as seen by the pointer.
    pub pick_anchor: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// One line of HUD or menu text, addressed by screen row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub row: u16,
    pub text: String,
    pub emphasis: bool,
    pub align: Align,
}

impl TextLine {
    fn left(row: u16, text: impl Into<String>) -> Self {
        Self {
            row,
            text: text.into(),
            emphasis: false,
            align: Align::Left,
        }
    }

    fn center(row: u16, text: impl Into<String>, emphasis: bool) -> Self {
        Self {
            row,
            text: text.into(),
            emphasis,
            align: Align::Center,
        }
    }
}

/// Something that can draw sprites and text.
pub trait Surface {
    /// Called once before the board cells of a frame.
    fn begin_board(&mut self, _camera: &Camera, _projection: &IsoProjection) {}

    fn draw_empty_cell(&mut self, cell: &GridCell);

    fn draw_tile(&mut self, tile: &DrawTile<'_>);

    fn draw_text(&mut self, line: &TextLine);
}

/// Emit the whole frame onto `surface`.
pub fn render<R: Rng, S: Surface + ?Sized>(game: &Game<R>, surface: &mut S) {
    match game.mode() {
        Mode::Title | Mode::Settings | Mode::About => render_menu(game.menu_selection(), surface),
        Mode::Running => {
            render_board(game, Some(game.hovered()), surface);
            render_hud(game, surface);
        }
        Mode::GameOver { final_score } => {
            render_board(game, None, surface);
            surface.draw_text(&TextLine::center(3, "GAME OVER", true));
            surface.draw_text(&TextLine::center(5, format!("Final score: {final_score}"), false));
            surface.draw_text(&TextLine::center(7, "Enter or Esc for the title screen", false));
        }
    }

    if game.debug() {
        render_debug(game, surface);
    }
}

/// Board cells back to front. The preview, if any, is painted in its own
/// cell's slot so nearer tiles still cover it.
fn render_board<R: Rng, S: Surface + ?Sized>(
    game: &Game<R>,
    preview: Option<(u8, u8)>,
    surface: &mut S,
) {
    let session = game.session();
    let atlas = session.atlas();
    let iso = session.projection();
    surface.begin_board(session.camera(), iso);

    for (x, y, cell) in session.board().paint_order() {
        let Some(tile) = cell.slot.tile() else {
            surface.draw_empty_cell(&GridCell {
                cell: (x, y),
                pick_anchor: iso.pick_anchor(x, y),
            });
            if preview == Some((x, y)) {
                render_preview(game, x, y, surface);
            }
            continue;
        };
        let (Some(group), Some(variant)) = (atlas.group(tile.group), atlas.get(tile)) else {
            continue;
        };
        let rect = variant.rect();
        let tint = cell
            .highlighted
            .then(|| HIGHLIGHT_TINT.with_alpha(cell.tint_strength()));
        surface.draw_tile(&DrawTile {
            tile,
            cell: (x, y),
            group: group.name(),
            rect,
            at: iso.sprite_anchor(x, y, f64::from(rect.height) / 2.0),
            pick_anchor: iso.pick_anchor(x, y),
            tint,
            opacity: 1.0,
        });
    }
}

fn render_preview<R: Rng, S: Surface + ?Sized>(game: &Game<R>, x: u8, y: u8, surface: &mut S) {
    let session = game.session();
    let supply = session.supply();
    let rect = supply.current_tile().rect();
    let iso = session.projection();
    surface.draw_tile(&DrawTile {
        tile: supply.current(),
        cell: (x, y),
        group: supply.current_group().name(),
        rect,
        at: iso.sprite_anchor(x, y, f64::from(rect.height) / 2.0),
        pick_anchor: iso.pick_anchor(x, y),
        tint: None,
        opacity: PREVIEW_OPACITY,
    });
}

fn render_hud<R: Rng, S: Surface + ?Sized>(game: &Game<R>, surface: &mut S) {
    let session = game.session();
    let supply = session.supply();
    let offer = supply.current();
    surface.draw_text(&TextLine::left(0, format!("Score: {}", session.score())));
    surface.draw_text(&TextLine::left(
        1,
        format!(
            "Tile: {} {}/{}",
            supply.current_group().name(),
            offer.variant + 1,
            supply.current_group().len()
        ),
    ));
}

fn render_menu<S: Surface + ?Sized>(selected: MenuSelection, surface: &mut S) {
    surface.draw_text(&TextLine::center(2, "ISOTILE", true));
    for (i, entry) in MenuSelection::ALL.into_iter().enumerate() {
        let row = 5 + 2 * i as u16;
        let text = if entry == selected {
            format!("> {} <", entry.label())
        } else {
            entry.label().to_string()
        };
        surface.draw_text(&TextLine::center(row, text, entry == selected));
    }
}

fn render_debug<R: Rng, S: Surface + ?Sized>(game: &Game<R>, surface: &mut S) {
    let session = game.session();
    let (x, y) = game.hovered();
    let pointer = game.pointer();
    let lines = [
        format!("fps: {}", game.stats().fps()),
        format!("cell: ({x}, {y})"),
        format!("pointer: ({:.0}, {:.0})", pointer.x, pointer.y),
        format!(
            "occupied: {}/{}",
            session.board().total_occupied(),
            session.board().capacity()
        ),
    ];
    for (i, text) in lines.into_iter().enumerate() {
        surface.draw_text(&TextLine::left(3 + i as u16, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{Atlas, TileGroup, TileVariant};
    use crate::iso::IsoProjection;
    use crate::session::GameSession;
    use crate::state::FrameInput;
    use crate::supply::{AdvancePolicy, TileSupply};
    use crate::types::{Action, ActionSet, JoinTag, TILE_HEIGHT, TILE_WIDTH};
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        tiles: Vec<((u8, u8), Option<Rgba>, f32)>,
        anchors: Vec<Point>,
        empty: Vec<(u8, u8)>,
        /// Every board cell in emission order; `true` for tiles.
        order: Vec<((u8, u8), bool)>,
        text: Vec<String>,
    }

    impl Surface for Recorder {
        fn draw_empty_cell(&mut self, cell: &GridCell) {
            self.empty.push(cell.cell);
            self.order.push((cell.cell, false));
        }

        fn draw_tile(&mut self, tile: &DrawTile<'_>) {
            self.tiles.push((tile.cell, tile.tint, tile.opacity));
            self.anchors.push(tile.at);
            self.order.push((tile.cell, true));
        }

        fn draw_text(&mut self, line: &TextLine) {
            self.text.push(line.text.clone());
        }
    }

    fn running_game() -> Game {
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
        let supply = TileSupply::seeded(atlas, AdvancePolicy::Sequential, 0);
        let mut game = Game::new(GameSession::new(
            supply,
            IsoProjection::new(TILE_WIDTH, TILE_HEIGHT, 4),
        ));
        game.frame(&FrameInput {
            pressed: ActionSet::from(Action::MenuConfirm),
            ..FrameInput::default()
        });
        game
    }

    fn commit_at(game: &mut Game, x: u8, y: u8) {
        let pointer = game.session().projection().cell_to_screen(x, y);
        game.frame(&FrameInput {
            pointer,
            pressed: ActionSet::from(Action::Commit),
            ..FrameInput::default()
        });
    }

    #[test]
    fn title_draws_menu_only() {
        let rect = SpriteRect {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        };
        let atlas = Arc::new(
            Atlas::from_groups(vec![TileGroup::new(
                "g",
                vec![TileVariant::new("t", rect, [JoinTag::Road; 4])],
            )
            .unwrap()])
            .unwrap(),
        );
        let game: Game = Game::new(GameSession::new(
            TileSupply::seeded(atlas, AdvancePolicy::Random, 1),
            IsoProjection::default(),
        ));
        let mut out = Recorder::default();
        render(&game, &mut out);
        assert!(out.tiles.is_empty());
        assert!(out.empty.is_empty());
        assert!(out.text.contains(&"> New Game <".to_string()));
        assert!(out.text.contains(&"Quit".to_string()));
    }

    fn hover(game: &mut Game, x: u8, y: u8) {
        let pointer = game.session().projection().cell_to_screen(x, y);
        game.frame(&FrameInput {
            pointer,
            ..FrameInput::default()
        });
    }

    #[test]
    fn board_is_painted_back_to_front() {
        let mut game = running_game();
        commit_at(&mut game, 0, 0);
        commit_at(&mut game, 0, 1);
        hover(&mut game, 3, 3);

        let mut out = Recorder::default();
        render(&game, &mut out);
        let cells: Vec<(u8, u8)> = out.tiles.iter().map(|t| t.0).collect();
        assert_eq!(cells, vec![(0, 1), (0, 0), (3, 3)]);
        assert_eq!(out.tiles[2].2, PREVIEW_OPACITY);
        assert!(out.text.iter().any(|t| t == "Score: 1"));
    }

    #[test]
    fn empty_cells_outline_the_board() {
        let mut game = running_game();
        commit_at(&mut game, 0, 0);
        commit_at(&mut game, 2, 1);

        let mut out = Recorder::default();
        render(&game, &mut out);
        assert_eq!(out.empty.len(), 14);
        assert!(!out.empty.contains(&(0, 0)));
        assert!(!out.empty.contains(&(2, 1)));

        // The pointer rests on (2, 1), which is occupied: no preview, so
        // every cell appears exactly once, in painter's order.
        let emitted: Vec<(u8, u8)> = out.order.iter().map(|(cell, _)| *cell).collect();
        let expected: Vec<(u8, u8)> = game
            .session()
            .board()
            .paint_order()
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(emitted, expected);
    }

    #[test]
    fn preview_sits_between_farther_and_nearer_tiles() {
        let mut game = running_game();
        commit_at(&mut game, 0, 0);
        commit_at(&mut game, 2, 1);
        hover(&mut game, 1, 1);

        let mut out = Recorder::default();
        render(&game, &mut out);
        let cells: Vec<((u8, u8), f32)> = out.tiles.iter().map(|t| (t.0, t.2)).collect();
        assert_eq!(
            cells,
            vec![((0, 0), 1.0), ((1, 1), PREVIEW_OPACITY), ((2, 1), 1.0)]
        );
    }

    #[test]
    fn preview_is_hidden_over_an_occupied_cell() {
        let mut game = running_game();
        commit_at(&mut game, 1, 2);
        hover(&mut game, 1, 2);

        let mut out = Recorder::default();
        render(&game, &mut out);
        assert!(out.tiles.iter().all(|t| t.2 == 1.0));
    }

    #[test]
    fn sprites_are_raised_by_half_their_height() {
        let mut game = running_game();
        commit_at(&mut game, 1, 2);

        let mut out = Recorder::default();
        render(&game, &mut out);
        let centre = game.session().projection().cell_to_screen(1, 2);
        assert_eq!(out.anchors[0], centre + Point::new(0.0, 99.0 / 2.0));
    }

    #[test]
    fn game_over_shows_board_without_preview() {
        let mut game = running_game();
        for x in 0..4 {
            for y in 0..4 {
                commit_at(&mut game, x, y);
            }
        }
        assert!(matches!(game.mode(), Mode::GameOver { .. }));

        let mut out = Recorder::default();
        render(&game, &mut out);
        assert_eq!(out.tiles.len(), 16);
        assert!(out.empty.is_empty());
        assert!(out.text.iter().any(|t| t == "GAME OVER"));
    }

    #[test]
    fn scored_tile_is_tinted_while_fading() {
        let mut game = running_game();
        commit_at(&mut game, 1, 1);
        commit_at(&mut game, 2, 1);

        let mut out = Recorder::default();
        render(&game, &mut out);
        let tinted: Vec<_> = out.tiles.iter().filter(|t| t.1.is_some()).collect();
        assert_eq!(tinted.len(), 1);
        assert_eq!(tinted[0].0, (2, 1));
        // One fade step has already run in the commit frame.
        assert_eq!(tinted[0].1.map(|c| c.a), Some(255 - 2));
    }
}
