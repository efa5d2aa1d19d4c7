//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used
//! by the game core, the input mapping layer and any renderer alike.
//!
//! # Board Geometry
//!
//! The board is a square grid of `board_size × board_size` cells drawn as an
//! isometric diamond. Tiles are 132×66 pixels in the source sprite sheet:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_BOARD_SIZE` | 8 | Cells per board side |
//! | `MAX_BOARD_SIZE` | 32 | Largest accepted board side |
//! | `TILE_WIDTH` | 132.0 | Diamond width in pixels |
//! | `TILE_HEIGHT` | 66.0 | Diamond height in pixels |
//!
//! # Frame Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed frame interval (~60 FPS) |
//! | `FADE_STEP` | 2 | Highlight alpha step per frame |
//! | `MENU_DEBOUNCE_MS` | 150 | Menu input cooldown |
//!
//! # Examples
//!
//! ```
//! use isotile_types::{Action, Edge, JoinTag};
//!
//! assert_eq!(JoinTag::from_name("road"), Some(JoinTag::Road));
//! assert_eq!(Edge::TopLeft.opposite(), Edge::BottomRight);
//! assert_eq!(Action::from_name("commit"), Some(Action::Commit));
//! ```

use std::ops::{Add, Sub};

/// Default board side length (cells).
pub const DEFAULT_BOARD_SIZE: u8 = 8;

/// Largest board side accepted by configuration.
pub const MAX_BOARD_SIZE: u8 = 32;

/// Isometric diamond width in pixels.
pub const TILE_WIDTH: f64 = 132.0;

/// Isometric diamond height in pixels.
pub const TILE_HEIGHT: f64 = 66.0;

/// Fixed frame interval in milliseconds (16ms ≈ 60 FPS).
pub const TICK_MS: u32 = 16;

/// Highlight alpha increment applied once per frame.
pub const FADE_STEP: u8 = 2;

/// Cooldown after an accepted menu input, so a held key does not repeat every frame.
pub const MENU_DEBOUNCE_MS: u32 = 150;

/// Camera pan speed in world pixels per second.
pub const CAMERA_SPEED: f64 = 500.0;

/// Zoom factor applied per unit of zoom delta.
pub const CAMERA_ZOOM_SPEED: f64 = 1.2;

/// Camera position at startup (roughly centres an 8×8 board).
pub const CAMERA_START: Point = Point::new(480.0, 120.0);

/// Tint applied to freshly scored tiles.
pub const HIGHLIGHT_TINT: Rgba = Rgba::new(255, 255, 0, 255);


/// A point in world (projected screen) space.
///
/// The y axis points up, matching the isometric projection where
/// increasing `y - x` moves a cell towards the top of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Pixel rectangle of a sprite inside the source sheet.
///
/// `x`/`y` are measured from the top-left corner of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Reference to one tile variant: `(group index, variant index)` into an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileRef {
    pub group: usize,
    pub variant: usize,
}

impl TileRef {
    pub const fn new(group: usize, variant: usize) -> Self {
        Self { group, variant }
    }
}

/// Terrain label carried by one edge of a tile.
///
/// Two adjacent tiles "connect" when the facing edge tags are compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinTag {
    Concrete,
    Road,
    RoadFootpathLeft,
    RoadFootpathRight,
    FullWidthRoad,
    Canal,
    BikePath,
    NatureStrip,
    TunnelHeight,
    TunnelDepth,
    RedWallFull,
    RedWallGap,
    RoadHeight,
    River,
}

impl JoinTag {
    pub const ALL: [JoinTag; 14] = [
        JoinTag::Concrete,
        JoinTag::Road,
        JoinTag::RoadFootpathLeft,
        JoinTag::RoadFootpathRight,
        JoinTag::FullWidthRoad,
        JoinTag::Canal,
        JoinTag::BikePath,
        JoinTag::NatureStrip,
        JoinTag::TunnelHeight,
        JoinTag::TunnelDepth,
        JoinTag::RedWallFull,
        JoinTag::RedWallGap,
        JoinTag::RoadHeight,
        JoinTag::River,
    ];

    /// Parse a join tag from its variant name (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use isotile_types::JoinTag;
    ///
    /// assert_eq!(JoinTag::from_name("Canal"), Some(JoinTag::Canal));
    /// assert_eq!(JoinTag::from_name("bikepath"), Some(JoinTag::BikePath));
    /// assert_eq!(JoinTag::from_name("unknown"), None);
    /// ```
    pub fn from_name(s: &str) -> Option<Self> {
        JoinTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinTag::Concrete => "Concrete",
            JoinTag::Road => "Road",
            JoinTag::RoadFootpathLeft => "RoadFootpathLeft",
            JoinTag::RoadFootpathRight => "RoadFootpathRight",
            JoinTag::FullWidthRoad => "FullWidthRoad",
            JoinTag::Canal => "Canal",
            JoinTag::BikePath => "BikePath",
            JoinTag::NatureStrip => "NatureStrip",
            JoinTag::TunnelHeight => "TunnelHeight",
            JoinTag::TunnelDepth => "TunnelDepth",
            JoinTag::RedWallFull => "RedWallFull",
            JoinTag::RedWallGap => "RedWallGap",
            JoinTag::RoadHeight => "RoadHeight",
            JoinTag::River => "River",
        }
    }
}

/// One of the four edges of an isometric diamond.
///
/// Board adjacency (cell `(x, y)`):
/// - **TopLeft** faces `(x - 1, y)`
/// - **BottomRight** faces `(x + 1, y)`
/// - **BottomLeft** faces `(x, y - 1)`
/// - **TopRight** faces `(x, y + 1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Edge {
    /// Edges in atlas attribute order (`joinTL`, `joinTR`, `joinBR`, `joinBL`).
    pub const ALL: [Edge; 4] = [
        Edge::TopLeft,
        Edge::TopRight,
        Edge::BottomRight,
        Edge::BottomLeft,
    ];

    /// Position of this edge in [`Edge::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Edge::TopLeft => 0,
            Edge::TopRight => 1,
            Edge::BottomRight => 2,
            Edge::BottomLeft => 3,
        }
    }

    /// The neighbour's edge that touches this one.
    pub const fn opposite(self) -> Self {
        match self {
            Edge::TopLeft => Edge::BottomRight,
            Edge::BottomRight => Edge::TopLeft,
            Edge::TopRight => Edge::BottomLeft,
            Edge::BottomLeft => Edge::TopRight,
        }
    }

    /// Board offset `(dx, dy)` of the neighbour across this edge.
    pub const fn offset(self) -> (i8, i8) {
        match self {
            Edge::TopLeft => (-1, 0),
            Edge::BottomRight => (1, 0),
            Edge::BottomLeft => (0, -1),
            Edge::TopRight => (0, 1),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Edge::TopLeft => "top-left",
            Edge::TopRight => "top-right",
            Edge::BottomRight => "bottom-right",
            Edge::BottomLeft => "bottom-left",
        }
    }
}

/// Compact set of edges (bit per [`Edge::index`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeSet(u8);

impl EdgeSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, edge: Edge) {
        self.0 |= 1 << edge.index();
    }

    pub fn contains(&self, edge: Edge) -> bool {
        self.0 & (1 << edge.index()) != 0
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Edge> {
        Edge::ALL.into_iter().filter(move |e| self.contains(*e))
    }
}

/// Logical actions a frontend can report for a frame.
///
/// Frontends map their own keys/buttons to these; the core never sees raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Pan camera left (held)
    CameraLeft,
    /// Pan camera right (held)
    CameraRight,
    /// Pan camera up (held)
    CameraUp,
    /// Pan camera down (held)
    CameraDown,
    /// Step to the next variant of the offered tile group
    CycleTile,
    /// Discard the offer and draw a new group
    SkipTile,
    /// Place the offered tile on the hovered cell
    Commit,
    /// Back out of the current screen
    Cancel,
    MenuUp,
    MenuDown,
    MenuConfirm,
    /// Toggle the debug overlay
    ToggleDebug,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::CameraLeft,
        Action::CameraRight,
        Action::CameraUp,
        Action::CameraDown,
        Action::CycleTile,
        Action::SkipTile,
        Action::Commit,
        Action::Cancel,
        Action::MenuUp,
        Action::MenuDown,
        Action::MenuConfirm,
        Action::ToggleDebug,
    ];

    /// Position of this action in [`Action::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use isotile_types::Action;
    ///
    /// assert_eq!(Action::from_name("cycleTile"), Some(Action::CycleTile));
    /// assert_eq!(Action::from_name("MENUCONFIRM"), Some(Action::MenuConfirm));
    /// assert_eq!(Action::from_name("jump"), None);
    /// ```
    pub fn from_name(s: &str) -> Option<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CameraLeft => "cameraLeft",
            Action::CameraRight => "cameraRight",
            Action::CameraUp => "cameraUp",
            Action::CameraDown => "cameraDown",
            Action::CycleTile => "cycleTile",
            Action::SkipTile => "skipTile",
            Action::Commit => "commit",
            Action::Cancel => "cancel",
            Action::MenuUp => "menuUp",
            Action::MenuDown => "menuDown",
            Action::MenuConfirm => "menuConfirm",
            Action::ToggleDebug => "toggleDebug",
        }
    }
}

/// Set of actions active during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActionSet(u16);

impl ActionSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: ActionSet) -> ActionSet {
        ActionSet(self.0 | other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Action> {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl From<Action> for ActionSet {
    fn from(action: Action) -> Self {
        ActionSet(action.bit())
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}
