//! Atlas module - the tile catalog parsed from a sprite-sheet description
//!
//! The description is an XML document listing named tile groups, each holding
//! sub-textures with a pixel rectangle and four edge join tags:
//!
//! ```xml
//! <TextureAtlas imagePath="cityTiles_sheet.png">
//!   <TileGroup name="road">
//!     <SubTexture name="cityTiles_001.png" x="0" y="0" width="132" height="99"
//!                 joinTL="Road" joinTR="Concrete" joinBR="Road" joinBL="Concrete"/>
//!   </TileGroup>
//! </TextureAtlas>
//! ```
//!
//! Group and variant order is preserved; it drives tile cycling.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::types::{Edge, JoinTag, SpriteRect, TileRef};

/// Errors raised while loading the tile catalog. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to read atlas {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed atlas document: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("tile {tile:?} in group {group:?} has unknown {edge} join tag {value:?}")]
    UnknownJoinTag {
        group: String,
        tile: String,
        edge: &'static str,
        value: String,
    },

    #[error("tile {tile:?} in group {group:?} has an empty sprite rectangle")]
    EmptySprite { group: String, tile: String },

    #[error("tile group {0:?} has no tiles")]
    EmptyGroup(String),

    #[error("atlas has no tile groups")]
    NoGroups,
}

#[derive(Debug, Deserialize)]
struct AtlasDef {
    #[serde(rename = "@imagePath", default)]
    image_path: Option<String>,
    #[serde(rename = "TileGroup", default)]
    groups: Vec<GroupDef>,
}

#[derive(Debug, Deserialize)]
struct GroupDef {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "SubTexture", default)]
    sub_textures: Vec<SubTextureDef>,
}

#[derive(Debug, Deserialize)]
struct SubTextureDef {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@x")]
    x: u32,
    #[serde(rename = "@y")]
    y: u32,
    #[serde(rename = "@width")]
    width: u32,
    #[serde(rename = "@height")]
    height: u32,
    #[serde(rename = "@joinTL")]
    join_tl: String,
    #[serde(rename = "@joinTR")]
    join_tr: String,
    #[serde(rename = "@joinBR")]
    join_br: String,
    #[serde(rename = "@joinBL")]
    join_bl: String,
}

/// One drawable tile: a sprite rectangle plus its four edge tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileVariant {
    name: String,
    rect: SpriteRect,
    /// Indexed by [`Edge::index`].
    joins: [JoinTag; 4],
}

impl TileVariant {
    /// `joins` is given in [`Edge::ALL`] order: top-left, top-right, bottom-right, bottom-left.
    pub fn new(name: impl Into<String>, rect: SpriteRect, joins: [JoinTag; 4]) -> Self {
        Self {
            name: name.into(),
            rect,
            joins,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rect(&self) -> SpriteRect {
        self.rect
    }

    pub fn join(&self, edge: Edge) -> JoinTag {
        self.joins[edge.index()]
    }

    pub fn joins(&self) -> &[JoinTag; 4] {
        &self.joins
    }
}

/// Named, ordered collection of variants of the same terrain type. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGroup {
    name: String,
    variants: Vec<TileVariant>,
}

impl TileGroup {
    pub fn new(name: impl Into<String>, variants: Vec<TileVariant>) -> Result<Self, AtlasError> {
        let name = name.into();
        if variants.is_empty() {
            return Err(AtlasError::EmptyGroup(name));
        }
        Ok(Self { name, variants })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[TileVariant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Always false for a constructed group; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// The full tile catalog. Loaded once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atlas {
    image_path: Option<String>,
    groups: Vec<TileGroup>,
}

impl Atlas {
    pub fn from_groups(groups: Vec<TileGroup>) -> Result<Self, AtlasError> {
        if groups.is_empty() {
            return Err(AtlasError::NoGroups);
        }
        Ok(Self {
            image_path: None,
            groups,
        })
    }

    /// Read and parse an atlas description from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| AtlasError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let atlas = Self::from_xml(&text)?;
        tracing::info!(
            path = %path.display(),
            groups = atlas.groups.len(),
            tiles = atlas.tile_count(),
            "loaded tile atlas"
        );
        Ok(atlas)
    }

    /// Parse an atlas description held in memory.
    pub fn from_xml(text: &str) -> Result<Self, AtlasError> {
        let def: AtlasDef = quick_xml::de::from_str(text)?;

        let mut groups = Vec::with_capacity(def.groups.len());
        for group in def.groups {
            let mut variants = Vec::with_capacity(group.sub_textures.len());
            for sub in group.sub_textures {
                variants.push(variant_from_def(&group.name, sub)?);
            }
            groups.push(TileGroup::new(group.name, variants)?);
        }

        let mut atlas = Self::from_groups(groups)?;
        atlas.image_path = def.image_path;
        Ok(atlas)
    }

    /// Sprite sheet image referenced by the description, if any.
    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub fn groups(&self) -> &[TileGroup] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&TileGroup> {
        self.groups.get(index)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn tile_count(&self) -> usize {
        self.groups.iter().map(TileGroup::len).sum()
    }

    pub fn get(&self, tile: TileRef) -> Option<&TileVariant> {
        self.groups.get(tile.group)?.variants.get(tile.variant)
    }

    /// Resolve a reference produced by this atlas.
    ///
    /// Panics on a reference that did not come from this atlas.
    pub fn tile(&self, tile: TileRef) -> &TileVariant {
        &self.groups[tile.group].variants[tile.variant]
    }

    pub fn contains(&self, tile: TileRef) -> bool {
        self.get(tile).is_some()
    }
}

fn variant_from_def(group: &str, sub: SubTextureDef) -> Result<TileVariant, AtlasError> {
    if sub.width == 0 || sub.height == 0 {
        return Err(AtlasError::EmptySprite {
            group: group.to_string(),
            tile: sub.name,
        });
    }

    let raw = [&sub.join_tl, &sub.join_tr, &sub.join_br, &sub.join_bl];
    let mut joins = [JoinTag::Concrete; 4];
    for (edge, value) in Edge::ALL.into_iter().zip(raw) {
        joins[edge.index()] =
            JoinTag::from_name(value).ok_or_else(|| AtlasError::UnknownJoinTag {
                group: group.to_string(),
                tile: sub.name.clone(),
                edge: edge.as_str(),
                value: value.clone(),
            })?;
    }

    let rect = SpriteRect {
        x: sub.x,
        y: sub.y,
        width: sub.width,
        height: sub.height,
    };
    Ok(TileVariant::new(sub.name, rect, joins))
}
