//! Centralized configuration values shared across the Boy's surface pipeline.
//!
//! ## Categories
//!
//! - **Grid**: default resolution/ratio and the validation bounds
//! - **Precision**: floating-point comparison tolerances
//! - **Limits**: safety bounds on mesh size
//! - **Presentation**: smoothing and naming presets handed to a host

use std::fmt;

// =============================================================================
// GRID CONSTANTS
// =============================================================================

/// Default number of non-pole rings.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_RESOLUTION;
/// assert_eq!(DEFAULT_RESOLUTION, 64);
/// ```
pub const DEFAULT_RESOLUTION: u32 = 64;

/// Default angular-to-radial density multiplier.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_RATIO;
/// assert_eq!(DEFAULT_RATIO, 2.0);
/// ```
pub const DEFAULT_RATIO: f64 = 2.0;

/// Smallest accepted ring count.
pub const MIN_RESOLUTION: u32 = 2;

/// Smallest accepted number of samples per ring.
pub const MIN_ANGULAR_COUNT: u32 = 4;

/// Smallest number of distinct vertices on the glued outer ring.
///
/// With two slots every outer-ring edge lands on the same vertex pair, so the
/// half-turn identification needs at least three.
///
/// # Examples
/// ```
/// use config::constants::{MIN_ANGULAR_COUNT, MIN_SEAM_SLOTS};
/// assert!(MIN_SEAM_SLOTS * 2 > MIN_ANGULAR_COUNT);
/// ```
pub const MIN_SEAM_SLOTS: u32 = 3;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Numerical tolerance used for positional comparisons.
///
/// # Examples
/// ```
/// use config::constants::EPSILON_TOLERANCE;
/// assert!(EPSILON_TOLERANCE < 1.0e-6);
/// ```
pub const EPSILON_TOLERANCE: f64 = 1.0e-9;

/// Largest distance allowed between two antipodal outer-ring samples that
/// are glued into one vertex.
pub const SEAM_TOLERANCE: f64 = 1.0e-9;

/// Squared length under which a normal is treated as degenerate.
pub const NORMAL_EPSILON: f64 = 1.0e-24;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of vertices a single generation may produce.
///
/// Keeps every index well inside `u32` and bounds memory use.
pub const MAX_VERTICES: u64 = 50_000_000;

// =============================================================================
// PRESENTATION CONSTANTS
// =============================================================================

/// Smoothing group applied to every face of the generated mesh.
pub const DEFAULT_SMOOTHING_GROUP: u32 = 1;

/// Highest smoothing group id hosts commonly accept (groups are bit flags).
pub const MAX_SMOOTHING_GROUP: u32 = 32;

/// Deterministic name given to the object created in the host scene.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_MESH_NAME;
/// assert_eq!(DEFAULT_MESH_NAME, "Boy's Surface");
/// ```
pub const DEFAULT_MESH_NAME: &str = "Boy's Surface";

/// Rotation about the Y axis, in degrees, that turns the surface's opening
/// toward +Z for viewing.
pub const DISPLAY_ROTATION_Y_DEGREES: f64 = -90.0;

/// Immutable snapshot of global configuration settings that can be shared
/// between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Numeric tolerance for positional comparisons.
    pub tolerance: f64,
    /// Smoothing group assigned to the whole mesh.
    pub smoothing_group: u32,
}

impl GlobalConfig {
    /// Builds a configuration enforcing strict validation of the supplied
    /// tolerance and smoothing group.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-6, 4).expect("valid config");
    /// assert_eq!(cfg.smoothing_group, 4);
    /// ```
    pub fn new(tolerance: f64, smoothing_group: u32) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if smoothing_group == 0 || smoothing_group > MAX_SMOOTHING_GROUP {
            return Err(ConfigError::InvalidSmoothingGroup(smoothing_group));
        }
        Ok(Self {
            tolerance,
            smoothing_group,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            tolerance: EPSILON_TOLERANCE,
            smoothing_group: DEFAULT_SMOOTHING_GROUP,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Raised when tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the smoothing group is outside `1..=MAX_SMOOTHING_GROUP`.
    InvalidSmoothingGroup(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive and finite: {value}")
            }
            ConfigError::InvalidSmoothingGroup(value) => {
                write!(
                    f,
                    "smoothing_group must be within 1..={MAX_SMOOTHING_GROUP}: {value}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
