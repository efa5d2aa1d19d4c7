//! Configuration - defaults, optional `isotile.toml`, then `ISOTILE_*` env vars
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `atlas_path` | `assets/cityTiles_sheet.xml` | Tile atlas description |
//! | `board_size` | 8 | Cells per side (1..=32) |
//! | `advance_policy` | `random` | `random` or `sequential` |
//! | `seed` | none | Fixed RNG seed; entropy when absent |
//! | `tile_width` / `tile_height` | 132 / 66 | Diamond size in pixels |
//! | `pick_bias` | tile height | Vertical pointer offset removed before picking |
//! | `debug` | false | Start with the debug overlay on |

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::iso::IsoProjection;
use crate::supply::AdvancePolicy;
use crate::types::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, TILE_HEIGHT, TILE_WIDTH};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "isotile.toml";

/// Prefix for environment overrides (`ISOTILE_BOARD_SIZE=10`).
pub const ENV_PREFIX: &str = "ISOTILE";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub atlas_path: PathBuf,
    pub board_size: u8,
    pub advance_policy: AdvancePolicy,
    pub seed: Option<u64>,
    pub tile_width: f64,
    pub tile_height: f64,
    pub pick_bias: Option<f64>,
    pub debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            atlas_path: PathBuf::from("assets/cityTiles_sheet.xml"),
            board_size: DEFAULT_BOARD_SIZE,
            advance_policy: AdvancePolicy::default(),
            seed: None,
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            pick_bias: None,
            debug: false,
        }
    }
}

impl GameConfig {
    /// Load from [`CONFIG_FILE`] in the working directory plus the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from `path` (optional) plus the environment, then validate.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: GameConfig = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::Message(format!(
                "board_size must be between 1 and {MAX_BOARD_SIZE}, got {}",
                self.board_size
            )));
        }
        for (name, value) in [("tile_width", self.tile_width), ("tile_height", self.tile_height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Message(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.pick_bias.is_some_and(|bias| !bias.is_finite()) {
            return Err(ConfigError::Message("pick_bias must be finite".to_string()));
        }
        Ok(())
    }

    /// Projection for these tile and board dimensions.
    pub fn projection(&self) -> IsoProjection {
        IsoProjection::new(self.tile_width, self.tile_height, self.board_size)
            .with_pick_bias(self.pick_bias.unwrap_or(self.tile_height))
    }
}
