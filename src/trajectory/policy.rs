//! Selection rule for TVD → MD when the path reaches a TVD more than once.

use serde::{Deserialize, Serialize};

use crate::types::MeasuredDepth;

/// Which crossing [`Trajectory::md_at_tvd`](crate::Trajectory::md_at_tvd) returns.
///
/// A deviated hole can pass a given TVD several times (building through
/// horizontal, then dropping back). The geometry yields every crossing; the
/// policy only picks one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CrossingPolicy {
    /// The smallest MD: where the hole first reaches the TVD going down from surface.
    #[default]
    First,
    /// The largest MD: the last time the hole passes the TVD.
    Last,
}

impl CrossingPolicy {
    /// Pick a crossing from an ascending list.
    pub fn select(self, crossings: &[MeasuredDepth]) -> Option<MeasuredDepth> {
        match self {
            CrossingPolicy::First => crossings.first().copied(),
            CrossingPolicy::Last => crossings.last().copied(),
        }
    }
}
