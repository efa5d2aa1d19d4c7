//! Game state machine - decides which subsystem sees input each frame
//!
//! ```text
//!            NewGame                 BoardFull
//!   Title ───────────────► Running ────────────► GameOver
//!     ▲  ◄─────────────────  │                      │
//!     │        Cancel        │                      │
//!     └──────────────────────┴──────────────────────┘
//!                                 Confirm / Cancel
//! ```
//!
//! Title confirms on Quit (or Cancel) end the frame loop. Settings and About
//! are listed in the menu but reserved; confirming them leaves the game on
//! the title screen.
//!
//! The host drives everything through [`Game::frame`], once per frame, with a
//! [`FrameInput`] describing that frame's pointer and logical actions.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;

use crate::atlas::Atlas;
use crate::config::GameConfig;
use crate::session::{CommitResult, GameSession};
use crate::supply::TileSupply;
use crate::types::{Action, ActionSet, Point, CAMERA_SPEED, MENU_DEBOUNCE_MS};

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Title,
    /// Reserved.
    Settings,
    /// Reserved.
    About,
    Running,
    GameOver {
        final_score: u32,
    },
}

/// Title menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuSelection {
    #[default]
    NewGame,
    Settings,
    About,
    Quit,
}

impl MenuSelection {
    pub const ALL: [MenuSelection; 4] = [
        MenuSelection::NewGame,
        MenuSelection::Settings,
        MenuSelection::About,
        MenuSelection::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuSelection::NewGame => "New Game",
            MenuSelection::Settings => "Settings",
            MenuSelection::About => "About",
            MenuSelection::Quit => "Quit",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Whether the host should keep running the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

/// Everything the core needs from the host for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer position in world space.
    pub pointer: Point,
    /// Actions that went down this frame.
    pub pressed: ActionSet,
    /// Actions being held down.
    pub held: ActionSet,
    /// Zoom steps (positive zooms in).
    pub zoom_delta: f64,
    /// Time since the previous frame.
    pub elapsed_ms: u32,
}

/// Once-per-second frame counter. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    frames: u32,
    window_ms: u32,
    fps: u32,
    total_frames: u64,
}

impl FrameStats {
    pub fn record(&mut self, elapsed_ms: u32) {
        self.frames += 1;
        self.total_frames += 1;
        self.window_ms = self.window_ms.saturating_add(elapsed_ms);
        if self.window_ms >= 1000 {
            self.fps = self.frames * 1000 / self.window_ms;
            self.frames = 0;
            self.window_ms = 0;
        }
    }

    /// Frames counted during the last full second.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

/// The whole game: menus plus the session being played.
#[derive(Debug, Clone)]
pub struct Game<R = StdRng> {
    mode: Mode,
    menu: MenuSelection,
    menu_cooldown_ms: u32,
    session: GameSession<R>,
    pointer: Point,
    hovered: (u8, u8),
    debug: bool,
    stats: FrameStats,
}

impl Game<StdRng> {
    /// Build a game from configuration and an already loaded atlas.
    pub fn from_config(config: &GameConfig, atlas: Arc<Atlas>) -> Self {
        let supply = match config.seed {
            Some(seed) => TileSupply::seeded(atlas, config.advance_policy, seed),
            None => TileSupply::from_entropy(atlas, config.advance_policy),
        };
        let mut game = Self::new(GameSession::new(supply, config.projection()));
        game.debug = config.debug;
        game
    }
}

impl<R: Rng> Game<R> {
    /// Start on the title screen.
    pub fn new(session: GameSession<R>) -> Self {
        Self {
            mode: Mode::Title,
            menu: MenuSelection::NewGame,
            menu_cooldown_ms: 0,
            session,
            pointer: Point::default(),
            hovered: (0, 0),
            debug: false,
            stats: FrameStats::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn menu_selection(&self) -> MenuSelection {
        self.menu
    }

    pub fn session(&self) -> &GameSession<R> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession<R> {
        &mut self.session
    }

    /// Cell under the pointer as of the last running frame.
    pub fn hovered(&self) -> (u8, u8) {
        self.hovered
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Run one frame.
    pub fn frame(&mut self, input: &FrameInput) -> FrameOutcome {
        self.stats.record(input.elapsed_ms);
        self.pointer = input.pointer;

        if input.pressed.contains(Action::ToggleDebug) {
            self.debug = !self.debug;
        }

        let outcome = match self.mode {
            Mode::Title | Mode::Settings | Mode::About => self.menu_frame(input),
            Mode::Running => self.running_frame(input),
            Mode::GameOver { .. } => self.game_over_frame(input),
        };

        if matches!(self.mode, Mode::Running | Mode::GameOver { .. }) {
            self.session.advance_fades();
        }
        outcome
    }

    fn enter_title(&mut self) {
        self.mode = Mode::Title;
        self.menu = MenuSelection::NewGame;
        self.menu_cooldown_ms = MENU_DEBOUNCE_MS;
    }

    fn menu_frame(&mut self, input: &FrameInput) -> FrameOutcome {
        self.menu_cooldown_ms = self.menu_cooldown_ms.saturating_sub(input.elapsed_ms);
        if self.menu_cooldown_ms > 0 {
            return FrameOutcome::Continue;
        }

        let active = input.pressed.union(input.held);
        let mut accepted = true;
        if active.contains(Action::Cancel) {
            tracing::info!("quit from title");
            return FrameOutcome::Quit;
        } else if active.contains(Action::MenuConfirm) {
            match self.menu {
                MenuSelection::NewGame => {
                    self.session.reset();
                    self.mode = Mode::Running;
                    tracing::info!(
                        board_size = self.session.board().size(),
                        first_group = self.session.offer().group,
                        "new game"
                    );
                }
                MenuSelection::Settings | MenuSelection::About => {
                    tracing::debug!(entry = self.menu.label(), "menu entry not available");
                    self.mode = Mode::Title;
                }
                MenuSelection::Quit => {
                    tracing::info!("quit from title");
                    return FrameOutcome::Quit;
                }
            }
        } else if active.contains(Action::MenuUp) {
            self.menu = self.menu.prev();
        } else if active.contains(Action::MenuDown) {
            self.menu = self.menu.next();
        } else {
            accepted = false;
        }

        if accepted {
            self.menu_cooldown_ms = MENU_DEBOUNCE_MS;
        }
        FrameOutcome::Continue
    }

    fn running_frame(&mut self, input: &FrameInput) -> FrameOutcome {
        let held = input.held.union(input.pressed);
        let step = CAMERA_SPEED * f64::from(input.elapsed_ms) / 1000.0;
        let (mut dx, mut dy) = (0.0, 0.0);
        if held.contains(Action::CameraLeft) {
            dx -= step;
        }
        if held.contains(Action::CameraRight) {
            dx += step;
        }
        if held.contains(Action::CameraUp) {
            dy += step;
        }
        if held.contains(Action::CameraDown) {
            dy -= step;
        }
        let camera = self.session.camera_mut();
        camera.pan(dx, dy);
        camera.zoom_by(input.zoom_delta);

        self.hovered = self.session.hovered_cell(input.pointer);

        if input.pressed.contains(Action::Cancel) {
            tracing::info!(score = self.session.score(), "back to title");
            self.enter_title();
            return FrameOutcome::Continue;
        }
        if input.pressed.contains(Action::CycleTile) {
            self.session.supply_mut().cycle_variant();
        }
        if input.pressed.contains(Action::SkipTile) {
            self.session.supply_mut().next_group();
        }
        if input.pressed.contains(Action::Commit) {
            let (x, y) = self.hovered;
            if let Ok(CommitResult::BoardFull { final_score, .. }) = self.session.try_commit(x, y) {
                tracing::info!(final_score, "game over");
                self.mode = Mode::GameOver { final_score };
            }
        }
        FrameOutcome::Continue
    }

    fn game_over_frame(&mut self, input: &FrameInput) -> FrameOutcome {
        if input.pressed.contains(Action::MenuConfirm) || input.pressed.contains(Action::Cancel) {
            self.enter_title();
        }
        FrameOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{TileGroup, TileVariant};
    use crate::iso::IsoProjection;
    use crate::supply::AdvancePolicy;
    use crate::types::{JoinTag, SpriteRect, TICK_MS, TILE_HEIGHT, TILE_WIDTH};

    fn game() -> Game {
        let rect = SpriteRect {
            x: 0,
            y: 0,
            width: 132,
            height: 99,
        };
        let atlas = Arc::new(
            Atlas::from_groups(vec![
                TileGroup::new("a", vec![TileVariant::new("a", rect, [JoinTag::Road; 4])]).unwrap(),
                TileGroup::new("b", vec![TileVariant::new("b", rect, [JoinTag::River; 4])]).unwrap(),
            ])
            .unwrap(),
        );
        let supply = TileSupply::seeded(atlas, AdvancePolicy::Sequential, 3);
        Game::new(GameSession::new(
            supply,
            IsoProjection::new(TILE_WIDTH, TILE_HEIGHT, 8),
        ))
    }

    fn press(action: Action) -> FrameInput {
        FrameInput {
            pressed: ActionSet::from(action),
            elapsed_ms: TICK_MS,
            ..FrameInput::default()
        }
    }

    fn idle(ms: u32) -> FrameInput {
        FrameInput {
            elapsed_ms: ms,
            ..FrameInput::default()
        }
    }

    #[test]
    fn menu_wraps_both_ways() {
        assert_eq!(MenuSelection::NewGame.prev(), MenuSelection::Quit);
        assert_eq!(MenuSelection::Quit.next(), MenuSelection::NewGame);
        assert_eq!(MenuSelection::Settings.next(), MenuSelection::About);
    }

    #[test]
    fn menu_input_is_debounced() {
        let mut game = game();
        game.frame(&press(Action::MenuDown));
        assert_eq!(game.menu_selection(), MenuSelection::Settings);

        // Still cooling down: ignored.
        game.frame(&press(Action::MenuDown));
        assert_eq!(game.menu_selection(), MenuSelection::Settings);

        game.frame(&idle(MENU_DEBOUNCE_MS));
        game.frame(&press(Action::MenuDown));
        assert_eq!(game.menu_selection(), MenuSelection::About);
    }

    #[test]
    fn debounce_ends_on_the_frame_it_runs_out() {
        let mut game = game();
        game.frame(&press(Action::MenuDown));
        assert_eq!(game.menu_selection(), MenuSelection::Settings);

        for _ in 0..8 {
            game.frame(&idle(TICK_MS));
        }
        // 144 ms in: still cooling down.
        game.frame(&press(Action::MenuDown));
        assert_eq!(game.menu_selection(), MenuSelection::Settings);

        // 160 ms in: the window closes during this frame, so it counts.
        game.frame(&press(Action::MenuDown));
        assert_eq!(game.menu_selection(), MenuSelection::About);
    }

    #[test]
    fn new_game_then_cancel_returns_to_title() {
        let mut game = game();
        assert_eq!(game.frame(&press(Action::MenuConfirm)), FrameOutcome::Continue);
        assert_eq!(game.mode(), Mode::Running);

        game.frame(&press(Action::Cancel));
        assert_eq!(game.mode(), Mode::Title);

        // The same cancel key right after must not quit.
        assert_eq!(game.frame(&press(Action::Cancel)), FrameOutcome::Continue);
    }

    #[test]
    fn reserved_entries_stay_on_title() {
        let mut game = game();
        game.frame(&press(Action::MenuDown));
        game.frame(&idle(MENU_DEBOUNCE_MS));
        game.frame(&press(Action::MenuConfirm));
        assert_eq!(game.mode(), Mode::Title);
        assert_eq!(game.menu_selection(), MenuSelection::Settings);
    }

    #[test]
    fn quit_and_cancel_end_the_loop() {
        let mut cancelled = game();
        assert_eq!(cancelled.frame(&press(Action::Cancel)), FrameOutcome::Quit);

        let mut quitting = game();
        quitting.frame(&press(Action::MenuUp));
        assert_eq!(quitting.menu_selection(), MenuSelection::Quit);
        quitting.frame(&idle(MENU_DEBOUNCE_MS));
        assert_eq!(quitting.frame(&press(Action::MenuConfirm)), FrameOutcome::Quit);
    }

    #[test]
    fn held_arrow_pans_camera() {
        let mut game = game();
        game.frame(&press(Action::MenuConfirm));
        let start = game.session().camera().position;
        game.frame(&FrameInput {
            held: ActionSet::from(Action::CameraRight),
            elapsed_ms: 100,
            ..FrameInput::default()
        });
        let moved = game.session().camera().position;
        assert!((moved.x - start.x - 50.0).abs() < 1e-9);
        assert_eq!(moved.y, start.y);
    }

    #[test]
    fn commit_places_at_hovered_cell() {
        let mut game = game();
        game.frame(&press(Action::MenuConfirm));
        let iso = *game.session().projection();
        game.frame(&FrameInput {
            pointer: iso.cell_to_screen(2, 3),
            pressed: ActionSet::from(Action::Commit),
            elapsed_ms: TICK_MS,
            ..FrameInput::default()
        });
        assert_eq!(game.hovered(), (2, 3));
        assert!(game.session().board().is_occupied(2, 3));
    }

    #[test]
    fn toggle_debug_works_anywhere() {
        let mut game = game();
        game.frame(&press(Action::ToggleDebug));
        assert!(game.debug());
        game.frame(&press(Action::MenuConfirm));
        game.frame(&press(Action::ToggleDebug));
        assert!(!game.debug());
    }

    #[test]
    fn fps_published_each_second() {
        let mut stats = FrameStats::default();
        for _ in 0..62 {
            stats.record(TICK_MS);
        }
        assert_eq!(stats.fps(), 0);
        stats.record(TICK_MS);
        // 63 frames over 1008ms.
        assert_eq!(stats.fps(), 62);
        assert_eq!(stats.total_frames(), 63);
    }
}
