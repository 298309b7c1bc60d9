//! The level hierarchy and covered-cell bookkeeping.

use ember_core::{LevelId, Rank};

use crate::error::MeshError;
use crate::geometry::Geometry;
use crate::grid_box::GridBox;
use crate::level::Level;
use crate::patch::Patch;

/// Levels in increasing refinement order, plus the simulation clock.
///
/// The hierarchy owns every cell state. State construction and
/// diagnostics borrow it for the duration of one call and keep no
/// references afterwards.
#[derive(Clone, Debug)]
pub struct Hierarchy {
    geometry: Geometry,
    levels: Vec<Level>,
    time: f64,
}

impl Hierarchy {
    /// An empty hierarchy over `geometry` at time zero.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            levels: Vec::new(),
            time: 0.0,
        }
    }

    /// A single-level hierarchy covering the whole domain.
    ///
    /// The domain is chopped into boxes of at most `max_grid_size` cells
    /// per axis and the boxes are dealt round-robin to `n_ranks` ranks.
    pub fn uniform(
        geometry: Geometry,
        max_grid_size: u32,
        n_species: usize,
        n_ranks: usize,
    ) -> Result<Self, MeshError> {
        let domain = geometry.domain_box(1);
        let mut h = Self::new(geometry);
        h.push_level(1, distribute(&domain, max_grid_size, n_species, n_ranks)?)?;
        Ok(h)
    }

    /// Append a finer level.
    ///
    /// `ref_ratio` is relative to the current finest level and is ignored
    /// for level 0. Every patch must lie inside the domain at the new
    /// level's resolution.
    pub fn push_level(
        &mut self,
        ref_ratio: u32,
        patches: Vec<Patch>,
    ) -> Result<LevelId, MeshError> {
        let (ref_ratio, ratio_to_coarsest) = match self.levels.last() {
            None => (1, 1),
            Some(coarser) => {
                if ref_ratio < 2 {
                    return Err(MeshError::InvalidRefinement { ratio: ref_ratio });
                }
                (ref_ratio, coarser.ratio_to_coarsest() * ref_ratio)
            }
        };
        let id = LevelId(self.levels.len() as u32);
        let domain = self.geometry.domain_box(ratio_to_coarsest);
        if let Some(p) = patches.iter().find(|p| !domain.contains_box(p.bx())) {
            return Err(MeshError::PatchOutsideDomain {
                level: id,
                bx: *p.bx(),
            });
        }
        self.levels.push(Level::new(
            id,
            &self.geometry,
            ref_ratio,
            ratio_to_coarsest,
            patches,
        ));
        Ok(id)
    }

    /// Append a finer level covering `region` (given at the new level's
    /// resolution), chopped and distributed like [`uniform`](Self::uniform).
    pub fn push_refined(
        &mut self,
        ref_ratio: u32,
        region: GridBox,
        max_grid_size: u32,
        n_species: usize,
        n_ranks: usize,
    ) -> Result<LevelId, MeshError> {
        self.push_level(
            ref_ratio,
            distribute(&region, max_grid_size, n_species, n_ranks)?,
        )
    }

    /// Problem geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Levels, coarsest first.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Mutable levels, coarsest first.
    pub fn levels_mut(&mut self) -> &mut [Level] {
        &mut self.levels
    }

    /// The level with the given id.
    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.get(id.0 as usize)
    }

    /// The finest level, or `None` for an empty hierarchy.
    pub fn finest_level(&self) -> Option<LevelId> {
        self.levels.last().map(Level::id)
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advance the clock. The time integrator is external; it reports here.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Recompute covered masks: a cell of level L is covered when any
    /// patch of level L+1 overlays it. The finest level is never covered.
    pub fn mark_covered(&mut self) {
        for lev in 0..self.levels.len() {
            let (coarse, fine) = self.levels.split_at_mut(lev + 1);
            let coarse = &mut coarse[lev];
            for p in coarse.patches_mut() {
                p.clear_covered();
            }
            if let Some(fine) = fine.first() {
                let ratio = fine.ref_ratio();
                for fp in fine.patches() {
                    let shadow = fp.bx().coarsen(ratio);
                    for p in coarse.patches_mut() {
                        p.mark_covered(&shadow);
                    }
                }
            }
        }
    }
}

fn distribute(
    region: &GridBox,
    max_grid_size: u32,
    n_species: usize,
    n_ranks: usize,
) -> Result<Vec<Patch>, MeshError> {
    if n_ranks == 0 {
        return Err(MeshError::InvalidRank { rank: 0, size: 0 });
    }
    Ok(region
        .chop(max_grid_size)
        .into_iter()
        .enumerate()
        .map(|(i, bx)| Patch::new(bx, Rank(i % n_ranks), n_species))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CoordSystem;

    fn geometry() -> Geometry {
        Geometry::new([0.0; 3], [1.0; 3], [8, 8, 8], CoordSystem::Cartesian).unwrap()
    }

    #[test]
    fn uniform_chops_and_deals_round_robin() {
        let h = Hierarchy::uniform(geometry(), 4, 2, 3).unwrap();
        let l0 = &h.levels()[0];
        assert_eq!(l0.patches().len(), 8);
        assert_eq!(l0.cell_count(), 512);
        assert_eq!(l0.local_patches(Rank(0)).count(), 3);
        assert_eq!(l0.local_patches(Rank(2)).count(), 2);
        assert_eq!(h.finest_level(), Some(LevelId(0)));
    }

    #[test]
    fn zero_ranks_rejected() {
        assert!(Hierarchy::uniform(geometry(), 4, 2, 0).is_err());
    }

    #[test]
    fn fine_level_needs_ratio_of_two() {
        let mut h = Hierarchy::uniform(geometry(), 8, 1, 1).unwrap();
        let err = h.push_refined(1, GridBox::new([0; 3], [3; 3]).unwrap(), 8, 1, 1);
        assert_eq!(err, Err(MeshError::InvalidRefinement { ratio: 1 }));
    }

    #[test]
    fn fine_patch_outside_domain_rejected() {
        let mut h = Hierarchy::uniform(geometry(), 8, 1, 1).unwrap();
        let err = h.push_refined(2, GridBox::new([12; 3], [16; 3]).unwrap(), 8, 1, 1);
        assert!(matches!(err, Err(MeshError::PatchOutsideDomain { .. })));
    }

    #[test]
    fn fine_level_covers_coarse_shadow() {
        let mut h = Hierarchy::uniform(geometry(), 8, 1, 1).unwrap();
        // Fine cells 4..=11 coarsen to coarse cells 2..=5: 4^3 = 64 covered.
        h.push_refined(2, GridBox::new([4; 3], [11; 3]).unwrap(), 8, 1, 1)
            .unwrap();
        h.mark_covered();
        let covered: usize = h.levels()[0]
            .patches()
            .iter()
            .map(|p| p.covered().iter().filter(|&&c| c).count())
            .sum();
        assert_eq!(covered, 64);
        let fine_covered = h.levels()[1].patches()[0].covered().iter().any(|&c| c);
        assert!(!fine_covered);
        assert_eq!(h.levels()[1].dx(), [1.0 / 16.0; 3]);
        assert_eq!(h.levels()[1].ratio_to_coarsest(), 2);
    }

    #[test]
    fn clock_is_settable() {
        let mut h = Hierarchy::new(geometry());
        assert_eq!(h.time(), 0.0);
        h.set_time(1.5);
        assert_eq!(h.time(), 1.5);
        assert_eq!(h.finest_level(), None);
    }
}
