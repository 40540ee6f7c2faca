//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// GRID TESTS
// =============================================================================

#[test]
fn test_default_resolution_is_valid() {
    assert!(DEFAULT_RESOLUTION >= MIN_RESOLUTION);
}

#[test]
fn test_default_angular_count_is_even() {
    let angular = (DEFAULT_RATIO * DEFAULT_RESOLUTION as f64).round() as u32;
    assert_eq!(angular % 2, 0);
    assert!(angular >= MIN_ANGULAR_COUNT);
    assert!(angular / 2 >= MIN_SEAM_SLOTS);
}

#[test]
fn test_min_resolution_matches_ring_requirement() {
    // One ring of pole triangles plus at least one ring of quads
    assert_eq!(MIN_RESOLUTION, 2);
}

#[test]
fn test_min_seam_slots_exceeds_doubled_edge_case() {
    // Two slots would fold every outer edge onto one vertex pair
    assert!(MIN_SEAM_SLOTS > 2);
}

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON_TOLERANCE > 0.0, "EPSILON_TOLERANCE must be positive");
}

#[test]
fn test_seam_tolerance_is_small() {
    assert!(SEAM_TOLERANCE > 0.0);
    assert!(SEAM_TOLERANCE < 1e-6, "seam samples coincide analytically");
}

#[test]
fn test_normal_epsilon_below_epsilon_squared() {
    assert!(NORMAL_EPSILON <= EPSILON_TOLERANCE * EPSILON_TOLERANCE);
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_max_vertices_fits_index_space() {
    assert!(MAX_VERTICES < u32::MAX as u64);
    assert!(MAX_VERTICES >= 1_000_000);
}

// =============================================================================
// PRESENTATION TESTS
// =============================================================================

#[test]
fn test_default_smoothing_group_in_range() {
    assert!(DEFAULT_SMOOTHING_GROUP >= 1);
    assert!(DEFAULT_SMOOTHING_GROUP <= MAX_SMOOTHING_GROUP);
}

#[test]
fn test_display_rotation_is_quarter_turn() {
    assert_eq!(DISPLAY_ROTATION_Y_DEGREES.abs(), 90.0);
}

#[test]
fn test_mesh_name_not_empty() {
    assert!(!DEFAULT_MESH_NAME.is_empty());
}
