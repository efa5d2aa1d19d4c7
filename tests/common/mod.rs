//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use isotile::core::{AdvancePolicy, Atlas, GameSession, IsoProjection, TileSupply};
use isotile::types::{TILE_HEIGHT, TILE_WIDTH};

/// Two groups: `road` (all Road edges, then Road on top-left only) and `grass`.
pub const ROAD_XML: &str = r#"
<TextureAtlas imagePath="test.png">
  <TileGroup name="road">
    <SubTexture name="road_all" x="0" y="0" width="132" height="99"
        joinTL="Road" joinTR="Road" joinBR="Road" joinBL="Road"/>
    <SubTexture name="road_tl" x="132" y="0" width="132" height="99"
        joinTL="Road" joinTR="Concrete" joinBR="Concrete" joinBL="Concrete"/>
  </TileGroup>
  <TileGroup name="grass">
    <SubTexture name="grass" x="0" y="99" width="132" height="83"
        joinTL="NatureStrip" joinTR="NatureStrip" joinBR="NatureStrip" joinBL="NatureStrip"/>
  </TileGroup>
</TextureAtlas>
"#;

/// One group holding a single all-Road tile.
pub const ALL_ROAD_XML: &str = r#"
<TextureAtlas>
  <TileGroup name="road">
    <SubTexture name="road_all" x="0" y="0" width="132" height="99"
        joinTL="Road" joinTR="Road" joinBR="Road" joinBL="Road"/>
  </TileGroup>
</TextureAtlas>
"#;

pub fn atlas(xml: &str) -> Arc<Atlas> {
    Arc::new(Atlas::from_xml(xml).expect("fixture atlas parses"))
}

pub fn session(xml: &str, board_size: u8, policy: AdvancePolicy) -> GameSession {
    let supply = TileSupply::seeded(atlas(xml), policy, 2024);
    GameSession::new(
        supply,
        IsoProjection::new(TILE_WIDTH, TILE_HEIGHT, board_size),
    )
}
