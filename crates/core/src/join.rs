//! Join rule - decides whether two touching edges connect
//!
//! - `Concrete` never connects, not even to another `Concrete` edge
//! - `RoadFootpathLeft` and `RoadFootpathRight` connect to each other (but not to themselves)
//! - every other tag connects only to itself

use crate::types::JoinTag;

/// Whether edge tag `a` connects to the facing edge tag `b`.
pub fn compatible(a: JoinTag, b: JoinTag) -> bool {
    match (a, b) {
        (JoinTag::Concrete, _) | (_, JoinTag::Concrete) => false,
        (JoinTag::RoadFootpathLeft, JoinTag::RoadFootpathRight)
        | (JoinTag::RoadFootpathRight, JoinTag::RoadFootpathLeft) => true,
        (JoinTag::RoadFootpathLeft, _) | (JoinTag::RoadFootpathRight, _) => false,
        _ => a == b,
    }
}

/// Method form of [`compatible`].
pub trait JoinRule {
    fn compatible_with(self, other: JoinTag) -> bool;
}

impl JoinRule for JoinTag {
    fn compatible_with(self, other: JoinTag) -> bool {
        compatible(self, other)
    }
}
