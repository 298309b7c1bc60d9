//! Error types for mesh construction.

use std::fmt;

use ember_core::LevelId;

use crate::grid_box::GridBox;

/// Errors arising from geometry, box, or hierarchy construction.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A box with `lo > hi` on some axis.
    EmptyBox {
        /// Lower corner.
        lo: [i32; 3],
        /// Upper corner.
        hi: [i32; 3],
    },
    /// The physical domain or its resolution is invalid.
    InvalidDomain {
        /// What went wrong.
        reason: String,
    },
    /// A refinement ratio below 2 on a fine level.
    InvalidRefinement {
        /// The rejected ratio.
        ratio: u32,
    },
    /// A patch lies (partly) outside the domain at its level's resolution.
    PatchOutsideDomain {
        /// Level the patch was offered to.
        level: LevelId,
        /// The offending box.
        bx: GridBox,
    },
    /// Per-cell data does not match the patch's cell count.
    PatchLengthMismatch {
        /// Cells in the box.
        expected: usize,
        /// Length of the supplied data.
        actual: usize,
    },
    /// A patch was assigned to a rank outside the process group.
    InvalidRank {
        /// The rejected rank.
        rank: usize,
        /// Number of ranks.
        size: usize,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBox { lo, hi } => write!(f, "box {lo:?}..={hi:?} is empty"),
            Self::InvalidDomain { reason } => write!(f, "invalid domain: {reason}"),
            Self::InvalidRefinement { ratio } => {
                write!(f, "refinement ratio {ratio} must be at least 2")
            }
            Self::PatchOutsideDomain { level, bx } => {
                write!(f, "patch {bx} lies outside the domain of level {level}")
            }
            Self::PatchLengthMismatch { expected, actual } => {
                write!(f, "patch holds {expected} cells but {actual} values were supplied")
            }
            Self::InvalidRank { rank, size } => {
                write!(f, "rank {rank} is outside a process group of size {size}")
            }
        }
    }
}

impl std::error::Error for MeshError {}
