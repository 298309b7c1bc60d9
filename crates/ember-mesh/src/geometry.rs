//! Physical problem domain and coordinate system.

use std::f64::consts::PI;

use crate::error::MeshError;
use crate::grid_box::GridBox;

/// Coordinate system of the problem domain.
///
/// Curvilinear systems use axis 0 as the radius; cell volumes follow the
/// corresponding shell or annulus formulas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordSystem {
    /// Cartesian `(x, y, z)`.
    Cartesian,
    /// Axisymmetric `(r, z)`; axis 2 is ignored.
    Cylindrical,
    /// Spherical `r`; axes 1 and 2 are ignored.
    Spherical,
}

impl CoordSystem {
    /// Volume of the cell whose lower corner is `lo` and size is `dx`.
    pub fn cell_volume(self, lo: [f64; 3], dx: [f64; 3]) -> f64 {
        match self {
            Self::Cartesian => dx[0] * dx[1] * dx[2],
            Self::Cylindrical => {
                let (r0, r1) = (lo[0], lo[0] + dx[0]);
                PI * (r1 * r1 - r0 * r0) * dx[1]
            }
            Self::Spherical => {
                let (r0, r1) = (lo[0], lo[0] + dx[0]);
                4.0 / 3.0 * PI * (r1 * r1 * r1 - r0 * r0 * r0)
            }
        }
    }
}

/// The physical domain and its coarse-level resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    prob_lo: [f64; 3],
    prob_hi: [f64; 3],
    n_cells: [u32; 3],
    coord: CoordSystem,
}

impl Geometry {
    /// Create a geometry spanning `prob_lo..prob_hi` with `n_cells` coarse
    /// cells per axis.
    ///
    /// Returns `Err(MeshError::InvalidDomain)` if any axis has zero cells
    /// or a non-finite or non-positive extent.
    pub fn new(
        prob_lo: [f64; 3],
        prob_hi: [f64; 3],
        n_cells: [u32; 3],
        coord: CoordSystem,
    ) -> Result<Self, MeshError> {
        for axis in 0..3 {
            let extent = prob_hi[axis] - prob_lo[axis];
            if !extent.is_finite() || extent <= 0.0 {
                return Err(MeshError::InvalidDomain {
                    reason: format!(
                        "axis {axis} extent {} .. {} is not positive",
                        prob_lo[axis], prob_hi[axis]
                    ),
                });
            }
            if n_cells[axis] == 0 || n_cells[axis] > i32::MAX as u32 {
                return Err(MeshError::InvalidDomain {
                    reason: format!("axis {axis} has {} cells", n_cells[axis]),
                });
            }
        }
        if coord != CoordSystem::Cartesian && prob_lo[0] < 0.0 {
            return Err(MeshError::InvalidDomain {
                reason: format!("curvilinear radius starts below zero at {}", prob_lo[0]),
            });
        }
        Ok(Self {
            prob_lo,
            prob_hi,
            n_cells,
            coord,
        })
    }

    /// Lower physical corner.
    pub fn prob_lo(&self) -> [f64; 3] {
        self.prob_lo
    }

    /// Upper physical corner.
    pub fn prob_hi(&self) -> [f64; 3] {
        self.prob_hi
    }

    /// Coarse cells per axis.
    pub fn n_cells(&self) -> [u32; 3] {
        self.n_cells
    }

    /// Coordinate system.
    pub fn coord(&self) -> CoordSystem {
        self.coord
    }

    /// The problem centre.
    ///
    /// The domain midpoint for Cartesian geometry; the origin for
    /// curvilinear geometry, where the star sits on the symmetry axis.
    pub fn center(&self) -> [f64; 3] {
        match self.coord {
            CoordSystem::Cartesian => {
                std::array::from_fn(|n| 0.5 * (self.prob_lo[n] + self.prob_hi[n]))
            }
            CoordSystem::Cylindrical | CoordSystem::Spherical => [0.0; 3],
        }
    }

    /// Cell size on a level refined by `ratio_to_coarsest` relative to level 0.
    pub fn cell_size(&self, ratio_to_coarsest: u32) -> [f64; 3] {
        std::array::from_fn(|n| {
            (self.prob_hi[n] - self.prob_lo[n])
                / (f64::from(self.n_cells[n]) * f64::from(ratio_to_coarsest))
        })
    }

    /// The full domain as an index box at the given refinement.
    pub fn domain_box(&self, ratio_to_coarsest: u32) -> GridBox {
        let hi = self.n_cells.map(|n| n as i32 - 1);
        GridBox::from_corners([0; 3], hi).refine(ratio_to_coarsest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube(n: u32) -> Geometry {
        Geometry::new([0.0; 3], [1.0; 3], [n; 3], CoordSystem::Cartesian).unwrap()
    }

    #[test]
    fn cartesian_center_is_midpoint() {
        let g = Geometry::new(
            [-2.0, 0.0, 1.0],
            [2.0, 4.0, 3.0],
            [4, 4, 4],
            CoordSystem::Cartesian,
        )
        .unwrap();
        assert_eq!(g.center(), [0.0, 2.0, 2.0]);
    }

    #[test]
    fn curvilinear_center_is_origin() {
        let g = Geometry::new([0.0; 3], [5.0; 3], [8, 8, 1], CoordSystem::Cylindrical).unwrap();
        assert_eq!(g.center(), [0.0; 3]);
    }

    #[test]
    fn zero_cells_rejected() {
        let err = Geometry::new([0.0; 3], [1.0; 3], [4, 0, 4], CoordSystem::Cartesian);
        assert!(matches!(err, Err(MeshError::InvalidDomain { .. })));
    }

    #[test]
    fn inverted_domain_rejected() {
        let err = Geometry::new([0.0; 3], [1.0, -1.0, 1.0], [4; 3], CoordSystem::Cartesian);
        assert!(matches!(err, Err(MeshError::InvalidDomain { .. })));
    }

    #[test]
    fn cell_size_scales_with_refinement() {
        let g = unit_cube(4);
        assert_eq!(g.cell_size(1), [0.25; 3]);
        assert_eq!(g.cell_size(2), [0.125; 3]);
        assert_eq!(g.domain_box(2).hi(), [7, 7, 7]);
    }

    #[test]
    fn cartesian_volume_is_product() {
        let v = CoordSystem::Cartesian.cell_volume([0.0; 3], [0.5, 0.25, 2.0]);
        assert!((v - 0.25).abs() < 1e-15);
    }

    #[test]
    fn curvilinear_volumes_tile_the_shell() {
        // Two spherical shells of width 0.5 add up to the unit sphere.
        let a = CoordSystem::Spherical.cell_volume([0.0; 3], [0.5; 3]);
        let b = CoordSystem::Spherical.cell_volume([0.5, 0.0, 0.0], [0.5; 3]);
        assert!((a + b - 4.0 / 3.0 * PI).abs() < 1e-12);

        // A unit-height cylinder of radius 1.
        let c = CoordSystem::Cylindrical.cell_volume([0.0; 3], [1.0, 1.0, 7.0]);
        assert!((c - PI).abs() < 1e-12);
    }
}
