//! Grid topology tests.

use std::collections::HashSet;

use super::*;
use crate::surface::evaluate_grid;

fn build_for(resolution: u32, ratio: f64) -> (ResolutionSpec, GridTopology) {
    let spec = ResolutionSpec::new(resolution, ratio).unwrap();
    let samples = evaluate_grid(&spec.grid()).unwrap();
    let topology = build(&spec, &samples, &GeneratorConfig::default()).unwrap();
    (spec, topology)
}

#[test]
fn test_indexer_numbering() {
    let indexer = GridIndexer::new(&ResolutionSpec::new(4, 2.0).unwrap());
    assert_eq!(indexer.half_turn(), 4);
    assert_eq!(indexer.seam_base(), 25);
    assert_eq!(indexer.vertex(1, 0), 1);
    assert_eq!(indexer.vertex(1, 7), 8);
    assert_eq!(indexer.vertex(3, 7), 24);
    // wraps around the ring
    assert_eq!(indexer.vertex(2, 8), indexer.vertex(2, 0));
    for j in 0..4 {
        assert_eq!(indexer.vertex(4, j), 25 + j);
        assert_eq!(indexer.vertex(4, j + 4), 25 + j);
    }
    assert_eq!(indexer.vertex_count(), 29);
}

#[test]
fn test_counts_for_small_grid() {
    let (spec, topology) = build_for(4, 2.0);
    assert_eq!(topology.vertices().len(), 29);
    assert_eq!(topology.faces().len(), 32);
    assert_eq!(topology.vertices().len(), spec.vertex_count());
    assert_eq!(topology.faces().len(), spec.face_count());
    assert_eq!(validate::edge_faces(topology.faces()).len(), spec.edge_count());
}

#[test]
fn test_vertex_indices_and_roles() {
    let (_, topology) = build_for(3, 2.0);
    for (i, vertex) in topology.vertices().iter().enumerate() {
        assert_eq!(vertex.index as usize, i);
    }
    let roles: Vec<_> = topology.vertices().iter().map(|v| v.role).collect();
    assert_eq!(roles[0], VertexRole::Pole);
    assert_eq!(topology.vertices()[0].position, crate::surface::POLE);
    // 2 interior rings of 6, then 3 seam slots
    assert!(roles[1..13].iter().all(|r| *r == VertexRole::Interior));
    assert!(roles[13..].iter().all(|r| *r == VertexRole::Seam));
    assert_eq!(roles.len(), 16);
}

#[test]
fn test_pole_fan_then_quads() {
    let (spec, topology) = build_for(3, 2.0);
    let n = spec.angular_count() as usize;
    let faces = topology.faces();
    assert!(faces[..n].iter().all(Face::is_triangle));
    assert!(faces[n..].iter().all(|f| f.corner_count() == 4));
    assert_eq!(faces[0], Face::Triangle([0, 1, 2]));
    assert_eq!(faces[n - 1], Face::Triangle([0, 6, 1]));
    assert_eq!(faces[n], Face::Quad([1, 7, 8, 2]));
}

#[test]
fn test_outer_quads_use_seam_slots() {
    let (spec, topology) = build_for(3, 2.0);
    let indexer = GridIndexer::new(&spec);
    let last = topology.faces().last().copied().unwrap();
    // ring 2 → ring 3 at j = 5: outer samples 5 and 0 map to slots 2 and 0
    assert_eq!(
        last,
        Face::Quad([
            indexer.vertex(2, 5),
            indexer.seam_base() + 2,
            indexer.seam_base(),
            indexer.vertex(2, 0),
        ])
    );
}

#[test]
fn test_every_vertex_is_used() {
    let (_, topology) = build_for(5, 2.0);
    let used: HashSet<u32> = topology
        .faces()
        .iter()
        .flat_map(|f| f.indices().iter().copied())
        .collect();
    assert_eq!(used.len(), topology.vertices().len());
}

#[test]
fn test_closed_projective_plane_across_configurations() {
    for (resolution, ratio) in [(2, 3.0), (3, 2.0), (4, 2.0), (6, 1.0), (9, 4.0 / 3.0)] {
        let Ok(spec) = ResolutionSpec::new(resolution, ratio) else {
            continue;
        };
        let samples = evaluate_grid(&spec.grid()).unwrap();
        let topology = build(&spec, &samples, &GeneratorConfig::default()).unwrap();
        let report = validate::analyze(topology.vertices().len(), topology.faces()).unwrap();
        assert!(report.is_closed(), "{resolution}/{ratio}: {report}");
        assert!(report.is_manifold(), "{resolution}/{ratio}: {report}");
        assert_eq!(report.euler_characteristic, PROJECTIVE_PLANE_EULER);
    }
}

#[test]
fn test_interior_edges_have_opposite_orientation() {
    let (_, topology) = build_for(4, 2.0);
    let directed: HashSet<(u32, u32)> = topology
        .faces()
        .iter()
        .flat_map(|f| f.edges().collect::<Vec<_>>())
        .collect();
    // Spokes and ring edges inside the disk are walked both ways
    assert!(directed.contains(&(1, 2)) && directed.contains(&(2, 1)));
    assert!(directed.contains(&(0, 1)) && directed.contains(&(1, 0)));
    assert!(directed.contains(&(1, 9)) && directed.contains(&(9, 1)));
}

#[test]
fn test_seam_gap_rejected() {
    let spec = ResolutionSpec::new(2, 3.0).unwrap();
    let mut positions = vec![DVec3::ONE; 12];
    // outer ring sample 1 and its partner 4 disagree
    positions[6 + 4] = DVec3::new(1.0, 1.0, 1.5);
    let samples = SurfaceSamples::from_positions(2, 6, positions);

    let err = build(&spec, &samples, &GeneratorConfig::default()).unwrap_err();
    match err {
        TopologyError::SeamGap {
            slot,
            angular,
            partner,
            distance,
            ..
        } => {
            assert_eq!((slot, angular, partner), (1, 1, 4));
            assert!((distance - 0.5).abs() < 1e-12);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_topology_check_can_be_disabled() {
    let spec = ResolutionSpec::new(3, 2.0).unwrap();
    let samples = evaluate_grid(&spec.grid()).unwrap();
    let config = GeneratorConfig::default().with_topology_check(false);
    let unchecked = build(&spec, &samples, &config).unwrap();
    let checked = build(&spec, &samples, &GeneratorConfig::default()).unwrap();
    assert_eq!(unchecked, checked);
}

#[test]
fn test_coincident_vertices_rejected() {
    let spec = ResolutionSpec::new(2, 3.0).unwrap();
    let mut positions: Vec<DVec3> = (0..6).map(|j| DVec3::new(j as f64, 0.0, 0.0)).collect();
    positions.extend((0..6).map(|j| DVec3::new(10.0 + (j % 3) as f64, 1.0, 0.0)));
    // ring 1 samples 1 and 2 (vertices 2 and 3) collapse onto each other
    positions[2] = positions[1] + DVec3::new(1.0e-12, 0.0, 0.0);
    let samples = SurfaceSamples::from_positions(2, 6, positions);

    let err = build(&spec, &samples, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        TopologyError::CoincidentVertices { first: 2, second: 3, .. }
    ));

    // a coarser tolerance from the configuration is honored
    let samples = SurfaceSamples::from_positions(
        2,
        6,
        (0..6)
            .map(|j| DVec3::new(j as f64 * 1.0e-6, 0.0, 0.0))
            .chain((0..6).map(|j| DVec3::new(10.0 + (j % 3) as f64, 1.0, 0.0)))
            .collect(),
    );
    assert!(build(&spec, &samples, &GeneratorConfig::default()).is_ok());
    let coarse = GeneratorConfig::new(1.0e-5, 1, 1.0e-9).unwrap();
    assert!(matches!(
        build(&spec, &samples, &coarse),
        Err(TopologyError::CoincidentVertices { first: 1, second: 2, .. })
    ));

    let unchecked = GeneratorConfig::new(1.0e-5, 1, 1.0e-9)
        .unwrap()
        .with_topology_check(false);
    assert!(build(&spec, &samples, &unchecked).is_ok());
}

#[test]
fn test_face_edges_wrap() {
    let edges: Vec<_> = Face::Triangle([4, 5, 6]).edges().collect();
    assert_eq!(edges, vec![(4, 5), (5, 6), (6, 4)]);
    assert_eq!(Face::Quad([1, 2, 3, 4]).corner_count(), 4);
}
