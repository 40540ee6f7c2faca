//! # Error Types
//!
//! Error types for surface generation. Every failure names the offending
//! parameter, grid index, vertex or edge so it can be diagnosed without
//! re-running the pipeline.
//!
//! ## Error Policy
//!
//! - NO fallback mechanisms when validation fails
//! - NO retries: generation is deterministic, a retry yields the same error
//! - Configuration errors are raised before any grid allocation

use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while generating or exporting the surface.
///
/// ## Example
///
/// ```rust
/// use boy_surface::{generate, ConfigurationError, SurfaceError};
///
/// match generate(5, 1.3) {
///     Err(SurfaceError::Configuration(ConfigurationError::OddAngularCount { angular_count, .. })) => {
///         assert_eq!(angular_count, 7);
///     }
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// Invalid `resolution` or `ratio`. Recoverable by adjusting the inputs.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The assembled connectivity is not a closed 2-manifold.
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    /// The immersion formula produced an unusable value.
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    /// The host rejected one of the export steps.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Invalid generation parameters, detected before any numeric work.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Fewer rings than the pole fan plus one quad ring need.
    #[error("resolution must be at least {min}, got {resolution}")]
    ResolutionTooSmall {
        /// Requested ring count
        resolution: u32,
        /// Smallest accepted ring count
        min: u32,
    },

    /// Ratio is zero, negative, NaN or infinite.
    #[error("ratio must be a positive finite number, got {ratio}")]
    InvalidRatio {
        /// Requested ratio
        ratio: f64,
    },

    /// `round(ratio * resolution)` is below the minimum ring size.
    #[error(
        "angular count round({ratio} * {resolution}) = {angular_count} is below the minimum of {min}"
    )]
    AngularCountTooSmall {
        /// Derived samples per ring
        angular_count: u64,
        /// Requested ratio
        ratio: f64,
        /// Requested ring count
        resolution: u32,
        /// Smallest accepted samples per ring
        min: u32,
    },

    /// The half-turn shift `angular_count / 2` would not be an integer.
    #[error(
        "angular count round({ratio} * {resolution}) = {angular_count} must be even for the half-turn seam"
    )]
    OddAngularCount {
        /// Derived samples per ring
        angular_count: u64,
        /// Requested ratio
        ratio: f64,
        /// Requested ring count
        resolution: u32,
    },

    /// The glued outer ring would have too few distinct vertices to form
    /// a manifold seam.
    #[error("angular count {angular_count} leaves {slots} seam slots, at least {min} are required")]
    SeamTooShort {
        /// Derived samples per ring
        angular_count: u64,
        /// Distinct outer-ring vertices after identification
        slots: u64,
        /// Smallest accepted slot count
        min: u32,
    },

    /// A stored angular count disagrees with `round(ratio * resolution)`.
    #[error("angular count {angular_count} does not match the derived count {expected}")]
    AngularCountMismatch {
        /// Stored samples per ring
        angular_count: u64,
        /// Count derived from ratio and resolution
        expected: u64,
    },

    /// The requested grid would overflow the vertex budget.
    #[error("Too many vertices: {count} (max: {max})")]
    TooManyVertices {
        /// Vertices the grid would produce
        count: u64,
        /// Configured maximum
        max: u64,
    },

    /// Generator settings were rejected by the shared configuration crate.
    #[error("invalid generator settings: {0}")]
    Settings(#[from] ::config::constants::ConfigError),

    /// Seam tolerance is zero, negative or not finite.
    #[error("seam tolerance must be positive and finite, got {0}")]
    InvalidSeamTolerance(f64),
}

/// Connectivity invariant violations found after seam identification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// An edge bordered by a single face.
    #[error("edge ({a}, {b}) is a boundary edge, incident to face {face} only")]
    OpenEdge {
        /// First endpoint (smaller index)
        a: u32,
        /// Second endpoint (larger index)
        b: u32,
        /// The only incident face
        face: usize,
    },

    /// An edge bordered by more than two faces.
    #[error("edge ({a}, {b}) is shared by {count} faces {faces:?}")]
    OverSharedEdge {
        /// First endpoint (smaller index)
        a: u32,
        /// Second endpoint (larger index)
        b: u32,
        /// Number of incident faces
        count: usize,
        /// Incident face indices
        faces: Vec<usize>,
    },

    /// A vertex whose incident faces do not form a single closed fan.
    #[error("vertex {vertex} is non-manifold: its faces form {fans} separate fans")]
    NonManifoldVertex {
        /// Offending vertex
        vertex: u32,
        /// Number of disconnected face fans around it
        fans: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index} but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        /// Offending face
        face: usize,
        /// Referenced index
        index: u32,
        /// Number of vertices in the mesh
        vertex_count: usize,
    },

    /// A face repeats a vertex index.
    #[error("face {face} repeats a vertex: {indices:?}")]
    DegenerateFace {
        /// Offending face
        face: usize,
        /// The face's indices
        indices: Vec<u32>,
    },

    /// `V - E + F` differs from the projective plane's value.
    #[error("Euler characteristic is {found}, expected {expected}")]
    EulerCharacteristic {
        /// Expected value
        expected: i64,
        /// Computed value
        found: i64,
    },

    /// Two distinct vertices landed on the same position.
    #[error("vertices {first} and {second} are {distance:e} apart (tolerance {tolerance:e})")]
    CoincidentVertices {
        /// Lower vertex index
        first: u32,
        /// Higher vertex index
        second: u32,
        /// Distance between them
        distance: f64,
        /// Smallest accepted distance
        tolerance: f64,
    },

    /// Two antipodal outer-ring samples glued into one slot do not coincide.
    #[error(
        "seam slot {slot}: outer samples {angular} and {partner} are {distance:e} apart (tolerance {tolerance:e})"
    )]
    SeamGap {
        /// Canonical outer-ring slot
        slot: u32,
        /// Angular index of the first sample
        angular: u32,
        /// Angular index of its antipodal partner
        partner: u32,
        /// Distance between the two evaluated positions
        distance: f64,
        /// Allowed distance
        tolerance: f64,
    },
}

/// Numeric failures of the immersion formula.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// Radius outside the closed unit interval or not finite.
    #[error("radius {radius} is outside the unit disk")]
    RadiusOutOfDomain {
        /// Offending radius
        radius: f64,
    },

    /// Angle is NaN or infinite.
    #[error("angle {angle} is not finite")]
    NonFiniteAngle {
        /// Offending angle
        angle: f64,
    },

    /// The normalizing sum of squares vanished away from a pole of the
    /// rational map.
    #[error("normalizer vanished at (r = {radius}, phi = {angle})")]
    VanishingNormalizer {
        /// Sample radius
        radius: f64,
        /// Sample angle
        angle: f64,
    },

    /// The formula produced NaN or infinity.
    #[error("non-finite position at (r = {radius}, phi = {angle})")]
    NonFinitePosition {
        /// Sample radius
        radius: f64,
        /// Sample angle
        angle: f64,
    },
}

/// Host-side failures while materializing the mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// A host capability call failed.
    #[error("host step '{step}' failed: {message}")]
    HostStep {
        /// Name of the failing capability
        step: &'static str,
        /// Host-provided message
        message: String,
    },

    /// A host step failed and removing the partially built object failed too.
    #[error("host step '{step}' failed ({message}); rollback failed: {rollback}")]
    RollbackFailed {
        /// Name of the failing capability
        step: &'static str,
        /// Host-provided message for the original failure
        message: String,
        /// Host-provided message for the rollback failure
        rollback: String,
    },
}

impl ExportError {
    /// Creates a failed host step error.
    pub fn host_step(step: &'static str, message: impl Into<String>) -> Self {
        Self::HostStep {
            step,
            message: message.into(),
        }
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for surface generation.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

// =============================================================================
// TESTS
// =============================================================================
