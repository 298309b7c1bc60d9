//! Inclusive integer index boxes.

use std::fmt;

use crate::error::MeshError;

/// An axis-aligned box of cell indices, inclusive at both corners.
///
/// Cells are laid out with axis 0 varying fastest, so the flat offset of
/// `(i, j, k)` is `(i - lo0) + n0 * ((j - lo1) + n1 * (k - lo2))`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridBox {
    lo: [i32; 3],
    hi: [i32; 3],
}

impl GridBox {
    /// Create a box, rejecting `lo > hi` on any axis.
    pub fn new(lo: [i32; 3], hi: [i32; 3]) -> Result<Self, MeshError> {
        if (0..3).any(|n| lo[n] > hi[n]) {
            return Err(MeshError::EmptyBox { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Caller guarantees `lo <= hi` on every axis.
    pub(crate) fn from_corners(lo: [i32; 3], hi: [i32; 3]) -> Self {
        debug_assert!((0..3).all(|n| lo[n] <= hi[n]));
        Self { lo, hi }
    }

    /// Lower corner.
    pub fn lo(&self) -> [i32; 3] {
        self.lo
    }

    /// Upper corner (inclusive).
    pub fn hi(&self) -> [i32; 3] {
        self.hi
    }

    /// Cells per axis.
    pub fn size(&self) -> [usize; 3] {
        std::array::from_fn(|n| (self.hi[n] - self.lo[n]) as usize + 1)
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        self.size().iter().product()
    }

    /// Whether `idx` lies inside the box.
    pub fn contains(&self, idx: [i32; 3]) -> bool {
        (0..3).all(|n| self.lo[n] <= idx[n] && idx[n] <= self.hi[n])
    }

    /// Whether `other` lies entirely inside the box.
    pub fn contains_box(&self, other: &GridBox) -> bool {
        self.contains(other.lo) && self.contains(other.hi)
    }

    /// The overlap of two boxes, if any.
    pub fn intersect(&self, other: &GridBox) -> Option<GridBox> {
        let lo: [i32; 3] = std::array::from_fn(|n| self.lo[n].max(other.lo[n]));
        let hi: [i32; 3] = std::array::from_fn(|n| self.hi[n].min(other.hi[n]));
        GridBox::new(lo, hi).ok()
    }

    /// The same region at `ratio` times finer resolution.
    pub fn refine(&self, ratio: u32) -> GridBox {
        let r = ratio as i32;
        GridBox::from_corners(self.lo.map(|v| v * r), self.hi.map(|v| (v + 1) * r - 1))
    }

    /// The smallest coarse box covering this one at `ratio` times coarser resolution.
    pub fn coarsen(&self, ratio: u32) -> GridBox {
        let r = ratio as i32;
        GridBox::from_corners(self.lo.map(|v| v.div_euclid(r)), self.hi.map(|v| v.div_euclid(r)))
    }

    /// Split into boxes no larger than `max_size` cells per axis.
    ///
    /// The pieces tile the box exactly and are returned in flat-offset
    /// order of their lower corners.
    pub fn chop(&self, max_size: u32) -> Vec<GridBox> {
        let m = max_size.max(1) as i32;
        let ranges: [Vec<(i32, i32)>; 3] = std::array::from_fn(|n| {
            let mut out = Vec::new();
            let mut start = self.lo[n];
            while start <= self.hi[n] {
                let end = (start + m - 1).min(self.hi[n]);
                out.push((start, end));
                start = end + 1;
            }
            out
        });
        let mut boxes = Vec::with_capacity(ranges.iter().map(Vec::len).product());
        for &(k0, k1) in &ranges[2] {
            for &(j0, j1) in &ranges[1] {
                for &(i0, i1) in &ranges[0] {
                    boxes.push(GridBox::from_corners([i0, j0, k0], [i1, j1, k1]));
                }
            }
        }
        boxes
    }

    /// Flat offset of `idx`, or `None` if outside.
    pub fn offset(&self, idx: [i32; 3]) -> Option<usize> {
        if !self.contains(idx) {
            return None;
        }
        let [n0, n1, _] = self.size();
        let i = (idx[0] - self.lo[0]) as usize;
        let j = (idx[1] - self.lo[1]) as usize;
        let k = (idx[2] - self.lo[2]) as usize;
        Some(i + n0 * (j + n1 * k))
    }

    /// Index of the cell at flat `offset`. `offset` must be below [`num_cells`](Self::num_cells).
    pub fn index_at(&self, offset: usize) -> [i32; 3] {
        let [n0, n1, _] = self.size();
        let i = offset % n0;
        let j = (offset / n0) % n1;
        let k = offset / (n0 * n1);
        [
            self.lo[0] + i as i32,
            self.lo[1] + j as i32,
            self.lo[2] + k as i32,
        ]
    }

    /// All cell indices in flat-offset order.
    pub fn cells(&self) -> impl Iterator<Item = [i32; 3]> + '_ {
        (0..self.num_cells()).map(move |o| self.index_at(o))
    }
}

impl fmt::Display for GridBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{})..=({},{},{})",
            self.lo[0], self.lo[1], self.lo[2], self.hi[0], self.hi[1], self.hi[2]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn b(lo: [i32; 3], hi: [i32; 3]) -> GridBox {
        GridBox::new(lo, hi).unwrap()
    }

    #[test]
    fn inverted_box_rejected() {
        assert!(matches!(
            GridBox::new([0, 2, 0], [3, 1, 3]),
            Err(MeshError::EmptyBox { .. })
        ));
    }

    #[test]
    fn single_cell_box() {
        let bx = b([2, 2, 2], [2, 2, 2]);
        assert_eq!(bx.num_cells(), 1);
        assert_eq!(bx.offset([2, 2, 2]), Some(0));
        assert_eq!(bx.offset([3, 2, 2]), None);
    }

    #[test]
    fn axis_zero_varies_fastest() {
        let bx = b([0, 0, 0], [1, 1, 1]);
        let cells: Vec<_> = bx.cells().collect();
        assert_eq!(cells[0], [0, 0, 0]);
        assert_eq!(cells[1], [1, 0, 0]);
        assert_eq!(cells[2], [0, 1, 0]);
        assert_eq!(cells[4], [0, 0, 1]);
    }

    #[test]
    fn refine_then_coarsen_is_identity() {
        let bx = b([-1, 0, 3], [2, 4, 5]);
        assert_eq!(bx.refine(2).coarsen(2), bx);
        assert_eq!(bx.refine(2).lo(), [-2, 0, 6]);
        assert_eq!(bx.refine(2).hi(), [5, 9, 11]);
    }

    #[test]
    fn coarsen_rounds_outward() {
        let bx = b([1, 1, 1], [4, 4, 4]);
        let c = bx.coarsen(4);
        assert_eq!(c.lo(), [0, 0, 0]);
        assert_eq!(c.hi(), [1, 1, 1]);
    }

    #[test]
    fn intersect_disjoint_is_none() {
        let a = b([0, 0, 0], [1, 1, 1]);
        let c = b([2, 0, 0], [3, 1, 1]);
        assert_eq!(a.intersect(&c), None);
        assert_eq!(a.intersect(&a), Some(a));
    }

    proptest! {
        #[test]
        fn chop_tiles_exactly(
            n0 in 1i32..20, n1 in 1i32..20, n2 in 1i32..20, max in 1u32..8,
        ) {
            let bx = b([0, 0, 0], [n0 - 1, n1 - 1, n2 - 1]);
            let pieces = bx.chop(max);
            let total: usize = pieces.iter().map(GridBox::num_cells).sum();
            prop_assert_eq!(total, bx.num_cells());
            for p in &pieces {
                prop_assert!(bx.contains_box(p));
                prop_assert!(p.size().iter().all(|&s| s <= max as usize));
            }
        }

        #[test]
        fn offset_and_index_are_inverse(
            n0 in 1i32..10, n1 in 1i32..10, n2 in 1i32..10, o in 0usize..1000,
        ) {
            let bx = b([-3, 1, 2], [-3 + n0 - 1, n1, 1 + n2]);
            let o = o % bx.num_cells();
            prop_assert_eq!(bx.offset(bx.index_at(o)), Some(o));
        }
    }
}
