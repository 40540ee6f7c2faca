//! Parameter resolution: turns `(resolution, ratio)` into validated grid
//! dimensions and the evenly spaced `(r, phi)` samples over the unit disk.

use std::f64::consts::TAU;

use ::config::constants::{
    DEFAULT_RATIO, DEFAULT_RESOLUTION, MAX_VERTICES, MIN_ANGULAR_COUNT, MIN_RESOLUTION,
    MIN_SEAM_SLOTS,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Validated grid dimensions.
///
/// `resolution` counts the rings around the pole; `angular_count` is the
/// number of samples on each ring and is always even, so the half-turn shift
/// `angular_count / 2` lands exactly on a grid index.
///
/// # Examples
/// ```
/// use boy_surface::resolution::ResolutionSpec;
///
/// let spec = ResolutionSpec::new(4, 2.0).unwrap();
/// assert_eq!(spec.angular_count(), 8);
/// assert_eq!(spec.half_turn(), 4);
/// assert_eq!(spec.vertex_count(), 29);
/// assert_eq!(spec.face_count(), 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResolutionSpec")]
pub struct ResolutionSpec {
    resolution: u32,
    ratio: f64,
    angular_count: u32,
}

impl ResolutionSpec {
    /// Validates the inputs and derives `angular_count = round(ratio * resolution)`.
    ///
    /// Rounding is half away from zero, so `5 * 1.3` becomes 7 and is
    /// rejected as odd.
    pub fn new(resolution: u32, ratio: f64) -> Result<Self, ConfigurationError> {
        if resolution < MIN_RESOLUTION {
            return Err(ConfigurationError::ResolutionTooSmall {
                resolution,
                min: MIN_RESOLUTION,
            });
        }
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(ConfigurationError::InvalidRatio { ratio });
        }

        // Float-to-int casts saturate; huge products fail the vertex budget below.
        let angular_count = (ratio * f64::from(resolution)).round() as u64;

        if angular_count < u64::from(MIN_ANGULAR_COUNT) {
            return Err(ConfigurationError::AngularCountTooSmall {
                angular_count,
                ratio,
                resolution,
                min: MIN_ANGULAR_COUNT,
            });
        }
        if angular_count % 2 != 0 {
            return Err(ConfigurationError::OddAngularCount {
                angular_count,
                ratio,
                resolution,
            });
        }
        let slots = angular_count / 2;
        if slots < u64::from(MIN_SEAM_SLOTS) {
            return Err(ConfigurationError::SeamTooShort {
                angular_count,
                slots,
                min: MIN_SEAM_SLOTS,
            });
        }

        let count = grid_vertex_count(u64::from(resolution), angular_count);
        if count > MAX_VERTICES {
            return Err(ConfigurationError::TooManyVertices {
                count,
                max: MAX_VERTICES,
            });
        }

        Ok(Self {
            resolution,
            ratio,
            // Bounded by MAX_VERTICES, which is below u32::MAX.
            angular_count: angular_count as u32,
        })
    }

    /// Number of non-pole rings.
    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Requested angular-to-radial density multiplier.
    #[inline]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Samples per ring (even, at least `2 * MIN_SEAM_SLOTS`).
    #[inline]
    pub fn angular_count(&self) -> u32 {
        self.angular_count
    }

    /// Angular index shift that maps an outer sample to its antipode.
    #[inline]
    pub fn half_turn(&self) -> u32 {
        self.angular_count / 2
    }

    /// Distinct vertices after seam identification:
    /// `1 + (resolution - 1) * n + n / 2`.
    pub fn vertex_count(&self) -> usize {
        grid_vertex_count(u64::from(self.resolution), u64::from(self.angular_count)) as usize
    }

    /// Faces emitted: `n` pole triangles plus `(resolution - 1) * n` quads.
    pub fn face_count(&self) -> usize {
        let n = self.angular_count as usize;
        n + (self.resolution as usize - 1) * n
    }

    /// Distinct undirected edges: `n` spokes, `(resolution - 1) * n` radial
    /// and as many ring edges inside the disk, plus `n / 2` on the seam.
    pub fn edge_count(&self) -> usize {
        let n = self.angular_count as usize;
        n + 2 * (self.resolution as usize - 1) * n + n / 2
    }

    /// Builds the evenly spaced sample grid for these dimensions.
    pub fn grid(&self) -> ParameterGrid {
        ParameterGrid::new(self)
    }
}

/// Wire form of [`ResolutionSpec`]; only becomes a spec through
/// [`ResolutionSpec::new`].
#[derive(Deserialize)]
struct RawResolutionSpec {
    resolution: u32,
    ratio: f64,
    #[serde(default)]
    angular_count: Option<u32>,
}

impl TryFrom<RawResolutionSpec> for ResolutionSpec {
    type Error = ConfigurationError;

    fn try_from(raw: RawResolutionSpec) -> Result<Self, Self::Error> {
        let spec = Self::new(raw.resolution, raw.ratio)?;
        match raw.angular_count {
            Some(angular_count) if angular_count != spec.angular_count => {
                Err(ConfigurationError::AngularCountMismatch {
                    angular_count: u64::from(angular_count),
                    expected: u64::from(spec.angular_count),
                })
            }
            _ => Ok(spec),
        }
    }
}

impl Default for ResolutionSpec {
    fn default() -> Self {
        let angular_count = (DEFAULT_RATIO * f64::from(DEFAULT_RESOLUTION)).round() as u32;
        Self {
            resolution: DEFAULT_RESOLUTION,
            ratio: DEFAULT_RATIO,
            angular_count,
        }
    }
}

fn grid_vertex_count(resolution: u64, angular_count: u64) -> u64 {
    (resolution - 1)
        .saturating_mul(angular_count)
        .saturating_add(angular_count / 2)
        .saturating_add(1)
}

/// Radial and angular samples of the unit disk, excluding the pole.
///
/// `radii[i - 1]` is the radius of ring `i` (`i / resolution`, so the last
/// ring sits on the unit circle) and `angles[j]` is `j * 2pi / n`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    radii: Vec<f64>,
    angles: Vec<f64>,
}

impl ParameterGrid {
    /// Samples the grid described by `spec`.
    pub fn new(spec: &ResolutionSpec) -> Self {
        let rings = spec.resolution();
        let samples = spec.angular_count();
        let radii = (1..=rings)
            .map(|ring| f64::from(ring) / f64::from(rings))
            .collect();
        let angles = (0..samples)
            .map(|step| TAU * f64::from(step) / f64::from(samples))
            .collect();
        Self { radii, angles }
    }

    /// Ring radii in increasing order, ending at exactly 1.
    #[inline]
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Angular samples in `[0, 2pi)`.
    #[inline]
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Number of rings.
    #[inline]
    pub fn ring_count(&self) -> usize {
        self.radii.len()
    }

    /// Samples per ring.
    #[inline]
    pub fn angular_count(&self) -> usize {
        self.angles.len()
    }
}
