//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a refinement level within a mesh hierarchy.
///
/// Level 0 is the coarsest level; `LevelId(n + 1)` refines `LevelId(n)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(pub u32);

impl LevelId {
    /// The coarsest level.
    pub const COARSEST: Self = Self(0);

    /// Returns `true` for level 0.
    pub fn is_coarsest(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LevelId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a process (rank) within a process group.
///
/// Ranks are dense in `0..size`. Patches record their owning rank so
/// that each rank aggregates only the cells it holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub usize);

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Rank {
    fn from(v: usize) -> Self {
        Self(v)
    }
}
