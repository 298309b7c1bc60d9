//! One-dimensional stellar profiles and a linear interpolator over them.

use std::error::Error;
use std::fmt;

use crate::error::ClosureError;
use crate::state::SpeciesVec;
use crate::traits::ProfileInterpolator;

/// One radial sample of a stellar model.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfilePoint {
    /// Radius of the sample.
    pub radius: f64,
    /// Mass density.
    pub density: f64,
    /// Temperature.
    pub temperature: f64,
    /// Species mass fractions, in network order.
    pub xn: SpeciesVec,
    /// Electron fraction.
    pub ye: f64,
}

/// The thermodynamic state a profile yields at a radius.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileSample {
    /// Mass density.
    pub density: f64,
    /// Temperature.
    pub temperature: f64,
    /// Raw (not yet floored or normalised) species mass fractions.
    pub xn: SpeciesVec,
    /// Electron fraction.
    pub ye: f64,
}

/// Errors detected while validating a [`StellarProfile`].
#[derive(Clone, Debug, PartialEq)]
pub enum ProfileError {
    /// The profile has no points.
    Empty,
    /// Radii are not strictly increasing at `index`.
    NonIncreasingRadius {
        /// Index of the first point not beyond its predecessor.
        index: usize,
    },
    /// A point carries a different species count than the first point.
    SpeciesCountMismatch {
        /// Index of the offending point.
        index: usize,
        /// Species count of point 0.
        expected: usize,
        /// Species count of the offending point.
        actual: usize,
    },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "stellar profile has no points"),
            Self::NonIncreasingRadius { index } => {
                write!(f, "profile radius at point {index} is not strictly increasing")
            }
            Self::SpeciesCountMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "profile point {index} has {actual} species, expected {expected}"
            ),
        }
    }
}

impl Error for ProfileError {}

/// An ordered, validated sequence of radial samples.
///
/// Radii are strictly increasing and every point carries the same
/// number of species. Species fractions are expected to sum to one but
/// this is not enforced.
#[derive(Clone, Debug, PartialEq)]
pub struct StellarProfile {
    name: String,
    points: Vec<ProfilePoint>,
}

impl StellarProfile {
    /// Validate and wrap a list of points.
    pub fn new(name: impl Into<String>, points: Vec<ProfilePoint>) -> Result<Self, ProfileError> {
        let first = points.first().ok_or(ProfileError::Empty)?;
        let n_species = first.xn.len();
        for (index, pair) in points.windows(2).enumerate() {
            if !(pair[1].radius > pair[0].radius) {
                return Err(ProfileError::NonIncreasingRadius { index: index + 1 });
            }
        }
        if let Some((index, p)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| p.xn.len() != n_species)
        {
            return Err(ProfileError::SpeciesCountMismatch {
                index,
                expected: n_species,
                actual: p.xn.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            points,
        })
    }

    /// Model name, used in startup logging.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of radial points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: construction rejects empty profiles.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The validated points.
    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    /// Number of species per point.
    pub fn species_count(&self) -> usize {
        self.points[0].xn.len()
    }
}

/// Piecewise-linear interpolation in radius over a [`StellarProfile`].
///
/// Radii below the first point or beyond the last are clamped to the
/// end values.
#[derive(Clone, Debug)]
pub struct LinearProfile {
    profile: StellarProfile,
}

impl LinearProfile {
    /// Wrap a validated profile.
    pub fn new(profile: StellarProfile) -> Self {
        Self { profile }
    }

    /// The underlying profile.
    pub fn profile(&self) -> &StellarProfile {
        &self.profile
    }
}

impl ProfileInterpolator for LinearProfile {
    fn sample(&self, radius: f64) -> Result<ProfileSample, ClosureError> {
        if !radius.is_finite() {
            return Err(ClosureError::Profile {
                radius,
                reason: "radius is not finite".into(),
            });
        }
        let pts = self.profile.points();
        let upper = pts.partition_point(|p| p.radius < radius);
        if upper == 0 {
            return Ok(exact(&pts[0]));
        }
        if upper == pts.len() {
            return Ok(exact(&pts[pts.len() - 1]));
        }
        let lo = &pts[upper - 1];
        let hi = &pts[upper];
        let t = (radius - lo.radius) / (hi.radius - lo.radius);
        let lerp = |a: f64, b: f64| a + t * (b - a);
        Ok(ProfileSample {
            density: lerp(lo.density, hi.density),
            temperature: lerp(lo.temperature, hi.temperature),
            xn: lo.xn.iter().zip(&hi.xn).map(|(&a, &b)| lerp(a, b)).collect(),
            ye: lerp(lo.ye, hi.ye),
        })
    }

    fn species_count(&self) -> usize {
        self.profile.species_count()
    }

    fn model(&self) -> Option<&StellarProfile> {
        Some(&self.profile)
    }
}

fn exact(p: &ProfilePoint) -> ProfileSample {
    ProfileSample {
        density: p.density,
        temperature: p.temperature,
        xn: p.xn.clone(),
        ye: p.ye,
    }
}
