//! End-to-end checks of the generated mesh.

use approx::assert_abs_diff_eq;
use boy_surface::export::steps;
use boy_surface::{
    build_in_host, generate, generate_with, ConfigurationError, ExportOptions, GeneratorConfig,
    InMemoryScene, Mesh, ResolutionSpec, SurfaceError, VertexRole,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

const CONFIGS: [(u32, f64); 6] = [(2, 3.0), (3, 2.0), (4, 2.0), (7, 2.0), (10, 1.2), (16, 0.75)];

// =============================================================================
// Counts and closure
// =============================================================================

#[test]
fn face_and_vertex_counts() {
    for (resolution, ratio) in CONFIGS {
        let mesh = generate(resolution, ratio).unwrap();
        let n = (ratio * f64::from(resolution)).round() as usize;
        let r = resolution as usize;
        assert_eq!(mesh.face_count(), n + (r - 1) * n, "{resolution}/{ratio}");
        assert_eq!(mesh.vertex_count(), 1 + (r - 1) * n + n / 2, "{resolution}/{ratio}");
    }
}

#[test]
fn closed_projective_plane() {
    init_logging();
    for (resolution, ratio) in CONFIGS {
        let mesh = generate(resolution, ratio).unwrap();
        let report = mesh.topology_report().unwrap();
        assert!(report.is_closed(), "{resolution}/{ratio}\n{report}");
        assert!(report.is_manifold(), "{resolution}/{ratio}\n{report}");
        assert_eq!(report.euler_characteristic, 1, "{resolution}/{ratio}");
    }
}

#[test]
fn resolution_four_ratio_two() {
    let mesh = generate(4, 2.0).unwrap();
    let report = mesh.topology_report().unwrap();
    assert_eq!(report.vertex_count, 29);
    assert_eq!(report.edge_count, 60);
    assert_eq!(report.face_count, 32);
    assert_eq!(mesh.faces().iter().filter(|f| f.is_triangle()).count(), 8);
    assert_eq!(
        mesh.roles().iter().filter(|r| **r == VertexRole::Seam).count(),
        4
    );
}

#[test]
fn no_coincident_vertices() {
    for (resolution, ratio) in [(4, 2.0), (6, 2.0), (10, 2.0)] {
        let mesh = generate(resolution, ratio).unwrap();
        let positions = mesh.positions();
        for (i, a) in positions.iter().enumerate() {
            for (j, b) in positions.iter().enumerate().skip(i + 1) {
                assert!(
                    a.distance(*b) > 1e-9,
                    "{resolution}/{ratio}: vertices {i} and {j} coincide"
                );
            }
        }
    }
}

// =============================================================================
// Geometry
// =============================================================================

#[test]
fn centroid_at_origin() {
    for (resolution, ratio) in CONFIGS {
        let centroid = generate(resolution, ratio).unwrap().centroid();
        assert_abs_diff_eq!(centroid.length(), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn pole_is_single_vertex_below_origin() {
    let mesh = generate(12, 2.0).unwrap();
    assert_eq!(mesh.roles()[0], VertexRole::Pole);
    assert_eq!(
        mesh.roles().iter().filter(|r| **r == VertexRole::Pole).count(),
        1
    );
    let pole = mesh.positions()[0] + mesh.centering_offset();
    assert_abs_diff_eq!(pole.z, -2.0, epsilon = 1e-12);
}

#[test]
fn bit_identical_reruns() {
    let first = generate(20, 2.0).unwrap();
    let second = generate(20, 2.0).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.positions_flat(), second.positions_flat());
}

#[test]
fn topology_check_does_not_change_output() {
    let spec = ResolutionSpec::new(9, 2.0).unwrap();
    let checked = generate_with(spec, &GeneratorConfig::default()).unwrap();
    let unchecked =
        generate_with(spec, &GeneratorConfig::default().with_topology_check(false)).unwrap();
    assert_eq!(checked, unchecked);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn odd_angular_count_rejected() {
    let err = generate(5, 1.3).unwrap_err();
    assert_eq!(
        err,
        SurfaceError::Configuration(ConfigurationError::OddAngularCount {
            angular_count: 7,
            ratio: 1.3,
            resolution: 5,
        })
    );
    assert!(err.to_string().contains('7'));
}

#[test]
fn degenerate_grids_rejected() {
    assert!(matches!(
        generate(0, 2.0),
        Err(SurfaceError::Configuration(ConfigurationError::ResolutionTooSmall { .. }))
    ));
    assert!(matches!(
        generate(4, -1.0),
        Err(SurfaceError::Configuration(ConfigurationError::InvalidRatio { .. }))
    ));
    assert!(matches!(
        generate(2, 2.0),
        Err(SurfaceError::Configuration(ConfigurationError::SeamTooShort { .. }))
    ));
}

// =============================================================================
// Host hand-off
// =============================================================================

#[test]
fn host_receives_one_named_object() {
    init_logging();
    let mut scene = InMemoryScene::default();
    let id = build_in_host(&mut scene, 6, 2.0, &ExportOptions::default()).unwrap();
    assert_eq!(scene.len(), 1);
    let object = scene.object(&id).unwrap();
    assert_eq!(object.name, "Boy's Surface");
    assert_eq!(object.positions.len(), 1 + 5 * 12 + 6);
    assert!(object.normals.is_some());
}

#[test]
fn host_untouched_by_failures() {
    let mut scene = InMemoryScene::default();
    assert!(build_in_host(&mut scene, 5, 1.3, &ExportOptions::default()).is_err());
    assert!(scene.is_empty());

    let mut scene = InMemoryScene::default().fail_on(steps::CENTER_PIVOT);
    assert!(build_in_host(&mut scene, 5, 2.0, &ExportOptions::default()).is_err());
    assert!(scene.is_empty());
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn mesh_json_round_trip() {
    let mesh = generate(5, 2.0).unwrap();
    let json = serde_json::to_string(&mesh).unwrap();
    let back: Mesh = serde_json::from_str(&json).unwrap();
    assert_eq!(back, mesh);

    let spec = ResolutionSpec::new(5, 2.0).unwrap();
    let back: ResolutionSpec = serde_json::from_str(&serde_json::to_string(&spec).unwrap()).unwrap();
    assert_eq!(back, spec);
}
