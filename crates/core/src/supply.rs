//! Tile supply - the offer the player is currently holding
//!
//! The offer is a `(group, variant)` pair into the atlas. Cycling walks the
//! variants of the current group; advancing picks a new group and restarts at
//! variant 0. The random source is injected so games can be replayed from a seed.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::atlas::{Atlas, TileGroup, TileVariant};
use crate::types::TileRef;

/// How the next group is chosen after a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvancePolicy {
    /// Independent uniform draw per advance; repeats allowed.
    #[default]
    Random,
    /// Next group in atlas order, wrapping.
    Sequential,
}

#[derive(Debug, Clone)]
pub struct TileSupply<R = StdRng> {
    atlas: Arc<Atlas>,
    policy: AdvancePolicy,
    current: TileRef,
    rng: R,
}

impl TileSupply<StdRng> {
    /// Supply with a reproducible sequence.
    pub fn seeded(atlas: Arc<Atlas>, policy: AdvancePolicy, seed: u64) -> Self {
        Self::new(atlas, policy, StdRng::seed_from_u64(seed))
    }

    /// Supply seeded from the operating system.
    pub fn from_entropy(atlas: Arc<Atlas>, policy: AdvancePolicy) -> Self {
        Self::new(atlas, policy, StdRng::from_os_rng())
    }
}

impl<R: Rng> TileSupply<R> {
    /// Create a supply and draw the first offer.
    ///
    /// Sequential supplies start at group 0; random ones draw immediately.
    pub fn new(atlas: Arc<Atlas>, policy: AdvancePolicy, rng: R) -> Self {
        let mut supply = Self {
            atlas,
            policy,
            current: TileRef::default(),
            rng,
        };
        supply.restart();
        supply
    }

    pub fn current(&self) -> TileRef {
        self.current
    }

    pub fn current_group(&self) -> &TileGroup {
        &self.atlas.groups()[self.current.group]
    }

    pub fn current_tile(&self) -> &TileVariant {
        self.atlas.tile(self.current)
    }

    pub fn policy(&self) -> AdvancePolicy {
        self.policy
    }

    pub fn atlas(&self) -> &Arc<Atlas> {
        &self.atlas
    }

    /// Step to the next variant of the current group, wrapping to 0.
    pub fn cycle_variant(&mut self) -> TileRef {
        let len = self.current_group().len();
        self.current.variant = (self.current.variant + 1) % len;
        self.current
    }

    /// Pick a new group per the advance policy and reset the variant to 0.
    pub fn next_group(&mut self) -> TileRef {
        let groups = self.atlas.group_count();
        let group = match self.policy {
            AdvancePolicy::Random => self.rng.random_range(0..groups),
            AdvancePolicy::Sequential => (self.current.group + 1) % groups,
        };
        self.current = TileRef::new(group, 0);
        self.current
    }

    /// Fresh first offer for a new game.
    pub fn restart(&mut self) -> TileRef {
        match self.policy {
            AdvancePolicy::Random => self.next_group(),
            AdvancePolicy::Sequential => {
                self.current = TileRef::new(0, 0);
                self.current
            }
        }
    }
}
