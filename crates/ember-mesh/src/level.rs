//! One refinement level: cell size and patches.

use ember_core::{CellState, LevelId, Rank};

use crate::geometry::{CoordSystem, Geometry};
use crate::patch::Patch;

/// Physical placement of a level's cells: origin, cell size, coordinates.
///
/// `Copy`, so it can be taken out of a [`Level`] before mutably
/// borrowing the level's patches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelFrame {
    prob_lo: [f64; 3],
    dx: [f64; 3],
    coord: CoordSystem,
}

impl LevelFrame {
    /// Cell size per axis.
    pub fn dx(&self) -> [f64; 3] {
        self.dx
    }

    /// Lower physical corner of cell `idx`.
    pub fn cell_lo(&self, idx: [i32; 3]) -> [f64; 3] {
        std::array::from_fn(|n| self.prob_lo[n] + self.dx[n] * f64::from(idx[n]))
    }

    /// Physical centre of cell `idx`: `prob_lo + dx * (idx + 0.5)`.
    pub fn cell_center(&self, idx: [i32; 3]) -> [f64; 3] {
        std::array::from_fn(|n| self.prob_lo[n] + self.dx[n] * (f64::from(idx[n]) + 0.5))
    }

    /// Volume of cell `idx` in the domain's coordinate system.
    pub fn cell_volume(&self, idx: [i32; 3]) -> f64 {
        self.coord.cell_volume(self.cell_lo(idx), self.dx)
    }
}

/// A single refinement level of the hierarchy.
///
/// Levels are created through [`Hierarchy`](crate::Hierarchy), which
/// checks that every patch lies inside the domain at this level's
/// resolution.
#[derive(Clone, Debug)]
pub struct Level {
    id: LevelId,
    ref_ratio: u32,
    ratio_to_coarsest: u32,
    frame: LevelFrame,
    patches: Vec<Patch>,
}

impl Level {
    pub(crate) fn new(
        id: LevelId,
        geometry: &Geometry,
        ref_ratio: u32,
        ratio_to_coarsest: u32,
        patches: Vec<Patch>,
    ) -> Self {
        Self {
            id,
            ref_ratio,
            ratio_to_coarsest,
            frame: LevelFrame {
                prob_lo: geometry.prob_lo(),
                dx: geometry.cell_size(ratio_to_coarsest),
                coord: geometry.coord(),
            },
            patches,
        }
    }

    /// Level identifier.
    pub fn id(&self) -> LevelId {
        self.id
    }

    /// Refinement ratio relative to the next coarser level (1 on level 0).
    pub fn ref_ratio(&self) -> u32 {
        self.ref_ratio
    }

    /// Refinement ratio relative to level 0.
    pub fn ratio_to_coarsest(&self) -> u32 {
        self.ratio_to_coarsest
    }

    /// Physical placement of the level's cells.
    pub fn frame(&self) -> LevelFrame {
        self.frame
    }

    /// Cell size per axis.
    pub fn dx(&self) -> [f64; 3] {
        self.frame.dx
    }

    /// Coordinate system of the domain.
    pub fn coord(&self) -> CoordSystem {
        self.frame.coord
    }

    /// All patches on the level, regardless of owner.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Mutable access to all patches.
    pub fn patches_mut(&mut self) -> &mut [Patch] {
        &mut self.patches
    }

    /// Patches owned by `rank`.
    pub fn local_patches(&self, rank: Rank) -> impl Iterator<Item = &Patch> + '_ {
        self.patches.iter().filter(move |p| p.owner() == rank)
    }

    /// Total number of cells across all patches.
    pub fn cell_count(&self) -> usize {
        self.patches.iter().map(|p| p.bx().num_cells()).sum()
    }

    /// The cell at `idx` from whichever patch holds it, or `None`
    /// outside the level's coverage.
    pub fn cell(&self, idx: [i32; 3]) -> Option<&CellState> {
        self.patches.iter().find_map(|p| p.cell(idx))
    }

    /// Physical centre of cell `idx`.
    pub fn cell_center(&self, idx: [i32; 3]) -> [f64; 3] {
        self.frame.cell_center(idx)
    }

    /// Volume of cell `idx`.
    pub fn cell_volume(&self, idx: [i32; 3]) -> f64 {
        self.frame.cell_volume(idx)
    }
}
