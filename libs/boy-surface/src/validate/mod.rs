//! Combinatorial mesh checks.
//!
//! Counts edges by their unordered vertex pair and verifies that a face list
//! describes a closed 2-manifold: every edge bordered by exactly two faces and
//! the faces around every vertex forming one connected fan.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use glam::DVec3;

use crate::error::TopologyError;
use crate::topology::Face;

/// Euler characteristic of the real projective plane.
pub const PROJECTIVE_PLANE_EULER: i64 = 1;

/// Summary of a face list's connectivity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyReport {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Number of distinct undirected edges.
    pub edge_count: usize,
    /// Total number of faces.
    pub face_count: usize,
    /// Edges with only one adjacent face.
    pub boundary_edge_count: usize,
    /// Edges with more than two adjacent faces.
    pub over_shared_edge_count: usize,
    /// Vertices whose faces form more than one fan.
    pub non_manifold_vertex_count: usize,
    /// `V - E + F`.
    pub euler_characteristic: i64,
}

impl TopologyReport {
    /// True when no edge is a boundary edge.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.boundary_edge_count == 0
    }

    /// True when every edge has at most two faces and every vertex one fan.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.over_shared_edge_count == 0 && self.non_manifold_vertex_count == 0
    }
}

impl fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Topology Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Euler characteristic: {}", self.euler_characteristic)?;
        writeln!(
            f,
            "  Closed: {}",
            if self.is_closed() { "Yes" } else { "No" }
        )?;
        write!(
            f,
            "  Manifold: {}",
            if self.is_manifold() { "Yes" } else { "No" }
        )
    }
}

/// Maps each undirected edge `(min, max)` to the faces that contain it.
///
/// A `BTreeMap` keeps iteration order stable so the first reported defect is
/// the same on every run.
pub fn edge_faces(faces: &[Face]) -> BTreeMap<(u32, u32), Vec<usize>> {
    let mut edges: BTreeMap<(u32, u32), Vec<usize>> = BTreeMap::new();
    for (face_idx, face) in faces.iter().enumerate() {
        for (start, end) in face.edges() {
            let key = if start < end { (start, end) } else { (end, start) };
            edges.entry(key).or_default().push(face_idx);
        }
    }
    edges
}

/// Checks indices and counts connectivity defects without failing on them.
///
/// Only malformed faces (an index out of range or a repeated index) are
/// errors, since no edge structure can be derived from them.
pub fn analyze(vertex_count: usize, faces: &[Face]) -> Result<TopologyReport, TopologyError> {
    check_faces(vertex_count, faces)?;

    let edges = edge_faces(faces);
    let boundary_edge_count = edges.values().filter(|f| f.len() == 1).count();
    let over_shared_edge_count = edges.values().filter(|f| f.len() > 2).count();
    let non_manifold_vertex_count = vertex_fans(vertex_count, faces)
        .iter()
        .filter(|fans| **fans > 1)
        .count();

    Ok(TopologyReport {
        vertex_count,
        edge_count: edges.len(),
        face_count: faces.len(),
        boundary_edge_count,
        over_shared_edge_count,
        non_manifold_vertex_count,
        euler_characteristic: vertex_count as i64 - edges.len() as i64 + faces.len() as i64,
    })
}

/// Requires a closed 2-manifold with the given Euler characteristic and
/// reports the first offending edge or vertex otherwise.
pub fn check_closed_manifold(
    vertex_count: usize,
    faces: &[Face],
    expected_euler: i64,
) -> Result<TopologyReport, TopologyError> {
    check_faces(vertex_count, faces)?;

    let edges = edge_faces(faces);
    for (&(a, b), incident) in &edges {
        match incident.len() {
            2 => {}
            1 => {
                return Err(TopologyError::OpenEdge {
                    a,
                    b,
                    face: incident[0],
                })
            }
            count => {
                return Err(TopologyError::OverSharedEdge {
                    a,
                    b,
                    count,
                    faces: incident.clone(),
                })
            }
        }
    }

    for (vertex, fans) in vertex_fans(vertex_count, faces).into_iter().enumerate() {
        if fans != 1 {
            return Err(TopologyError::NonManifoldVertex {
                vertex: vertex as u32,
                fans,
            });
        }
    }

    let euler = vertex_count as i64 - edges.len() as i64 + faces.len() as i64;
    if euler != expected_euler {
        return Err(TopologyError::EulerCharacteristic {
            expected: expected_euler,
            found: euler,
        });
    }

    Ok(TopologyReport {
        vertex_count,
        edge_count: edges.len(),
        face_count: faces.len(),
        euler_characteristic: euler,
        ..TopologyReport::default()
    })
}

/// Requires every pair of vertices to be more than `tolerance` apart.
///
/// Positions are bucketed on a grid of cell size `tolerance`, so only the
/// 27 cells around each vertex are compared. The reported pair is the first
/// in index order.
pub fn check_distinct_positions(positions: &[DVec3], tolerance: f64) -> Result<(), TopologyError> {
    let cell_of = |p: DVec3| -> [i64; 3] {
        let c = (p / tolerance).floor();
        [c.x as i64, c.y as i64, c.z as i64]
    };

    let mut cells: HashMap<[i64; 3], Vec<u32>> = HashMap::new();
    for (second, &position) in positions.iter().enumerate() {
        let [cx, cy, cz] = cell_of(position);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = [cx.saturating_add(dx), cy.saturating_add(dy), cz.saturating_add(dz)];
                    let Some(bucket) = cells.get(&key) else {
                        continue;
                    };
                    for &first in bucket {
                        let distance = positions[first as usize].distance(position);
                        if distance <= tolerance {
                            return Err(TopologyError::CoincidentVertices {
                                first,
                                second: second as u32,
                                distance,
                                tolerance,
                            });
                        }
                    }
                }
            }
        }
        cells
            .entry([cx, cy, cz])
            .or_default()
            .push(second as u32);
    }
    Ok(())
}

fn check_faces(vertex_count: usize, faces: &[Face]) -> Result<(), TopologyError> {
    for (face_idx, face) in faces.iter().enumerate() {
        let indices = face.indices();
        if let Some(&index) = indices.iter().find(|i| **i as usize >= vertex_count) {
            return Err(TopologyError::IndexOutOfRange {
                face: face_idx,
                index,
                vertex_count,
            });
        }
        let repeated = indices
            .iter()
            .enumerate()
            .any(|(i, a)| indices[i + 1..].contains(a));
        if repeated {
            return Err(TopologyError::DegenerateFace {
                face: face_idx,
                indices: indices.to_vec(),
            });
        }
    }
    Ok(())
}

/// Number of connected face fans around each vertex (0 for unused vertices).
///
/// Each face contributes one link edge joining the two neighbours of the
/// vertex inside that face; the fans are the components of that link.
fn vertex_fans(vertex_count: usize, faces: &[Face]) -> Vec<usize> {
    let mut links: Vec<Vec<(u32, u32)>> = vec![Vec::new(); vertex_count];
    for face in faces {
        let indices = face.indices();
        let len = indices.len();
        for (i, &vertex) in indices.iter().enumerate() {
            let prev = indices[(i + len - 1) % len];
            let next = indices[(i + 1) % len];
            links[vertex as usize].push((prev, next));
        }
    }
    links.iter().map(|link| count_components(link)).collect()
}

fn count_components(link: &[(u32, u32)]) -> usize {
    let mut parent: HashMap<u32, u32> = HashMap::new();

    fn find(parent: &mut HashMap<u32, u32>, node: u32) -> u32 {
        let mut root = node;
        while let Some(&up) = parent.get(&root) {
            if up == root {
                break;
            }
            root = up;
        }
        // Path compression
        let mut current = node;
        while current != root {
            let up = parent.get(&current).copied().unwrap_or(root);
            parent.insert(current, root);
            current = up;
        }
        root
    }

    for &(a, b) in link {
        parent.entry(a).or_insert(a);
        parent.entry(b).or_insert(b);
        let root_a = find(&mut parent, a);
        let root_b = find(&mut parent, b);
        if root_a != root_b {
            parent.insert(root_a, root_b);
        }
    }

    let nodes: Vec<u32> = parent.keys().copied().collect();
    let mut roots: Vec<u32> = nodes.into_iter().map(|n| find(&mut parent, n)).collect();
    roots.sort_unstable();
    roots.dedup();
    roots.len()
}
