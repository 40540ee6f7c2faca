//! Bryant–Kusner immersion of Boy's surface.
//!
//! A disk sample `w = r·e^{iφ}` maps to
//!
//! ```text
//! D  = w⁶ + √5·w³ − 1
//! g1 = −3/2 · Im(w(1 − w⁴) / D)
//! g2 = −3/2 · Re(w(1 + w⁴) / D)
//! g3 = Im((1 + w⁶) / D) − 1/2
//! (x, y, z) = (g1, g2, g3) / (g1² + g2² + g3²)
//! ```
//!
//! `D` vanishes on three points of radius ≈ 0.7256 inside the disk, so the
//! evaluator multiplies through by `conj(D)` and normalizes the cleared
//! numerators instead. On the unit circle `w` and `−w` land on the same point,
//! which is what makes the half-turn seam close geometrically.

use glam::DVec3;
use num_complex::Complex64;
use rayon::prelude::*;
use tracing::debug;

use crate::error::EvaluationError;
use crate::resolution::ParameterGrid;

/// √5, the coefficient of `w³` in the denominator.
const SQRT_5: f64 = 2.236_067_977_499_79;

/// Image of the disk center `w = 0`: `g = (0, 0, −1/2)`, so the point is
/// `(0, 0, −2)` for every angle.
pub const POLE: DVec3 = DVec3::new(0.0, 0.0, -2.0);

/// Evaluates the immersion at polar disk coordinates `(radius, angle)`.
///
/// # Examples
/// ```
/// use boy_surface::surface::{evaluate, POLE};
///
/// assert_eq!(evaluate(0.0, 1.234).unwrap(), POLE);
/// let rim = evaluate(1.0, 0.0).unwrap();
/// assert!((rim.z + 10.0 / 41.0).abs() < 1e-12);
/// ```
pub fn evaluate(radius: f64, angle: f64) -> Result<DVec3, EvaluationError> {
    if !(0.0..=1.0).contains(&radius) {
        return Err(EvaluationError::RadiusOutOfDomain { radius });
    }
    if !angle.is_finite() {
        return Err(EvaluationError::NonFiniteAngle { angle });
    }
    if radius == 0.0 {
        return Ok(POLE);
    }

    let w = Complex64::from_polar(radius, angle);
    let w3 = w * w * w;
    let w4 = w3 * w;
    let w6 = w3 * w3;

    let denom = w6 + SQRT_5 * w3 - 1.0;
    let denom_norm = denom.norm_sqr();
    if denom_norm == 0.0 {
        // Pole of the rational map: the inverted surface passes through the origin.
        return Ok(DVec3::ZERO);
    }
    let denom_conj = denom.conj();

    let a = -1.5 * (w * (1.0 - w4) * denom_conj).im;
    let b = -1.5 * (w * (1.0 + w4) * denom_conj).re;
    let c = ((1.0 + w6) * denom_conj).im - 0.5 * denom_norm;

    let normalizer = a * a + b * b + c * c;
    if normalizer.is_nan() || normalizer <= 0.0 {
        return Err(EvaluationError::VanishingNormalizer { radius, angle });
    }

    let position = DVec3::new(a, b, c) * (denom_norm / normalizer);
    if !position.is_finite() {
        return Err(EvaluationError::NonFinitePosition { radius, angle });
    }
    Ok(position)
}

/// Evaluated positions for every non-pole grid sample.
///
/// Stored ring-major: ring `i` (1-based, as in the topology) occupies
/// `positions[(i - 1) * n .. i * n]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSamples {
    ring_count: usize,
    angular_count: usize,
    positions: Vec<DVec3>,
}

impl SurfaceSamples {
    #[cfg(test)]
    pub(crate) fn from_positions(
        ring_count: usize,
        angular_count: usize,
        positions: Vec<DVec3>,
    ) -> Self {
        assert_eq!(positions.len(), ring_count * angular_count);
        Self {
            ring_count,
            angular_count,
            positions,
        }
    }

    /// Position of the collapsed disk center.
    #[inline]
    pub fn pole(&self) -> DVec3 {
        POLE
    }

    /// Position of sample `(ring, angular)` with `ring` in `1..=ring_count`.
    #[inline]
    pub fn at(&self, ring: usize, angular: usize) -> DVec3 {
        self.positions[(ring - 1) * self.angular_count + angular]
    }

    /// All samples of one ring (`ring` is 1-based).
    pub fn ring(&self, ring: usize) -> &[DVec3] {
        let start = (ring - 1) * self.angular_count;
        &self.positions[start..start + self.angular_count]
    }

    /// Number of rings.
    #[inline]
    pub fn ring_count(&self) -> usize {
        self.ring_count
    }

    /// Samples per ring.
    #[inline]
    pub fn angular_count(&self) -> usize {
        self.angular_count
    }
}

/// Evaluates every `(r, φ)` sample of the grid.
///
/// Cells are independent, so the work is spread over the rayon pool; results
/// are collected in index order and are identical for any thread count.
pub fn evaluate_grid(grid: &ParameterGrid) -> Result<SurfaceSamples, EvaluationError> {
    let radii = grid.radii();
    let angles = grid.angles();
    let angular_count = angles.len();

    let positions = (0..radii.len() * angular_count)
        .into_par_iter()
        .map(|cell| evaluate(radii[cell / angular_count], angles[cell % angular_count]))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        rings = radii.len(),
        angular_count,
        samples = positions.len(),
        "Evaluated immersion over grid"
    );

    Ok(SurfaceSamples {
        ring_count: radii.len(),
        angular_count,
        positions,
    })
}
