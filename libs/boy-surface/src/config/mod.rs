//! Generator-level configuration building on the shared `config` crate.
//!
//! Values are validated once on construction and only read afterwards, so
//! pipeline stages never see a tolerance or smoothing group outside its
//! accepted range.

use ::config::constants::{GlobalConfig, SEAM_TOLERANCE};

use crate::error::ConfigurationError;

/// Pipeline configuration wrapper.
///
/// # Examples
/// ```
/// use boy_surface::config::GeneratorConfig;
/// let cfg = GeneratorConfig::default();
/// assert!(cfg.tolerance() > 0.0);
/// assert!(cfg.verify_topology());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Smallest distance at which two vertices count as distinct.
    tolerance: f64,
    /// Smoothing group stamped on the whole mesh.
    smoothing_group: u32,
    /// Largest gap allowed between two glued antipodal samples.
    seam_tolerance: f64,
    /// Run the closed-manifold and distinct-position checks after the seam
    /// is built.
    verify_topology: bool,
}

impl GeneratorConfig {
    /// Creates a new configuration from explicit values.
    ///
    /// # Examples
    /// ```
    /// use boy_surface::config::GeneratorConfig;
    /// let cfg = GeneratorConfig::new(1.0e-8, 2, 1.0e-7).unwrap();
    /// assert_eq!(cfg.smoothing_group(), 2);
    /// ```
    pub fn new(
        tolerance: f64,
        smoothing_group: u32,
        seam_tolerance: f64,
    ) -> Result<Self, ConfigurationError> {
        let global = GlobalConfig::new(tolerance, smoothing_group)?;
        if !seam_tolerance.is_finite() || seam_tolerance <= 0.0 {
            return Err(ConfigurationError::InvalidSeamTolerance(seam_tolerance));
        }
        Ok(Self {
            tolerance: global.tolerance,
            smoothing_group: global.smoothing_group,
            seam_tolerance,
            verify_topology: true,
        })
    }

    /// Returns a copy with the defensive topology check switched on or off.
    pub fn with_topology_check(mut self, enabled: bool) -> Self {
        self.verify_topology = enabled;
        self
    }

    /// Minimum distance between two distinct vertices.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Smoothing group applied to every face.
    #[inline]
    pub fn smoothing_group(&self) -> u32 {
        self.smoothing_group
    }

    /// Largest accepted gap between glued seam samples.
    #[inline]
    pub fn seam_tolerance(&self) -> f64 {
        self.seam_tolerance
    }

    /// Whether the built topology is verified.
    #[inline]
    pub fn verify_topology(&self) -> bool {
        self.verify_topology
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let global = GlobalConfig::default();
        Self {
            tolerance: global.tolerance,
            smoothing_group: global.smoothing_group,
            seam_tolerance: SEAM_TOLERANCE,
            verify_topology: true,
        }
    }
}
