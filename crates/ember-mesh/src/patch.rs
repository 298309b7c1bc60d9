//! A box of cell data owned by one rank.

use ember_core::{CellState, Rank};

use crate::error::MeshError;
use crate::grid_box::GridBox;

/// Cell data for one [`GridBox`] on one level.
///
/// Alongside the conserved state, a patch carries the per-cell fuel
/// consumption rate ρ·ω̇ produced by the burner (used for flame-speed
/// diagnostics) and a mask of cells covered by the next finer level.
/// All three vectors are indexed by the box's flat offset.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    bx: GridBox,
    owner: Rank,
    cells: Vec<CellState>,
    fuel_rate: Vec<f64>,
    covered: Vec<bool>,
}

impl Patch {
    /// A patch of zeroed cells with `n_species` species slots each.
    pub fn new(bx: GridBox, owner: Rank, n_species: usize) -> Self {
        let n = bx.num_cells();
        Self {
            bx,
            owner,
            cells: vec![CellState::zeroed(n_species); n],
            fuel_rate: vec![0.0; n],
            covered: vec![false; n],
        }
    }

    /// A patch holding the given cell states.
    pub fn from_cells(bx: GridBox, owner: Rank, cells: Vec<CellState>) -> Result<Self, MeshError> {
        let n = bx.num_cells();
        if cells.len() != n {
            return Err(MeshError::PatchLengthMismatch {
                expected: n,
                actual: cells.len(),
            });
        }
        Ok(Self {
            bx,
            owner,
            cells,
            fuel_rate: vec![0.0; n],
            covered: vec![false; n],
        })
    }

    /// Replace the fuel consumption rate.
    pub fn set_fuel_rate(&mut self, rate: Vec<f64>) -> Result<(), MeshError> {
        if rate.len() != self.cells.len() {
            return Err(MeshError::PatchLengthMismatch {
                expected: self.cells.len(),
                actual: rate.len(),
            });
        }
        self.fuel_rate = rate;
        Ok(())
    }

    /// The index box.
    pub fn bx(&self) -> &GridBox {
        &self.bx
    }

    /// The owning rank.
    pub fn owner(&self) -> Rank {
        self.owner
    }

    /// Cell states in flat-offset order.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Mutable cell states in flat-offset order.
    pub fn cells_mut(&mut self) -> &mut [CellState] {
        &mut self.cells
    }

    /// Fuel consumption rate per cell.
    pub fn fuel_rate(&self) -> &[f64] {
        &self.fuel_rate
    }

    /// Covered-by-finer-level mask per cell.
    pub fn covered(&self) -> &[bool] {
        &self.covered
    }

    /// The cell at `idx`, if inside the box.
    pub fn cell(&self, idx: [i32; 3]) -> Option<&CellState> {
        self.bx.offset(idx).map(|o| &self.cells[o])
    }

    /// Clear the covered mask.
    pub(crate) fn clear_covered(&mut self) {
        self.covered.fill(false);
    }

    /// Mark every cell inside `region` as covered.
    pub(crate) fn mark_covered(&mut self, region: &GridBox) {
        if let Some(overlap) = self.bx.intersect(region) {
            for idx in overlap.cells() {
                if let Some(o) = self.bx.offset(idx) {
                    self.covered[o] = true;
                }
            }
        }
    }
}
