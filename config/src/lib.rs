//! # Config Crate
//!
//! Centralized configuration constants for the Boy's surface generator.
//! Grid defaults, validation bounds, tolerances and host-facing presets are
//! defined here so the pipeline crate never carries bare literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_RATIO, DEFAULT_RESOLUTION, EPSILON_TOLERANCE};
//!
//! let angular = (DEFAULT_RATIO * DEFAULT_RESOLUTION as f64).round() as u32;
//! assert_eq!(angular, 128);
//!
//! let value: f64 = 1e-12;
//! assert!(value.abs() < EPSILON_TOLERANCE);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Host Agnostic**: Presets describe intent, not a particular editor API
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
