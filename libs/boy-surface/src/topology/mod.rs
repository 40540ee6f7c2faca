//! Grid topology: vertex numbering, face emission and the half-turn seam.
//!
//! Vertex layout:
//!
//! ```text
//! 0                                   pole (r = 0, one vertex for all angles)
//! 1 + (i - 1)·n + j                   ring i < resolution, angle j
//! 1 + (resolution - 1)·n + (j mod h)  outer ring, h = n / 2 seam slots
//! ```
//!
//! The outer ring is glued to itself by `j ~ j + h`. Both grid positions of
//! a pair resolve to the same slot through [`GridIndexer::vertex`], so the
//! last ring of quads closes the disk into a projective plane with no
//! boundary edges and no coincident vertices left to weld.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::TopologyError;
use crate::resolution::ResolutionSpec;
use crate::surface::SurfaceSamples;
use crate::validate::{self, PROJECTIVE_PLANE_EULER};

/// Where a vertex comes from on the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexRole {
    /// The collapsed disk center.
    Pole,
    /// A sample strictly inside the disk.
    Interior,
    /// An outer-ring slot standing for two antipodal boundary samples.
    Seam,
}

/// A mesh vertex with its index and role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Index into the vertex array.
    pub index: u32,
    /// 3D position.
    pub position: DVec3,
    /// Origin on the disk.
    pub role: VertexRole,
}

/// A polygon of the mesh; pole faces are triangles, all others quads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    /// Pole fan triangle.
    Triangle([u32; 3]),
    /// Ring quad.
    Quad([u32; 4]),
}

impl Face {
    /// Vertex indices in winding order.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        match self {
            Face::Triangle(indices) => indices,
            Face::Quad(indices) => indices,
        }
    }

    /// Number of corners (3 or 4).
    #[inline]
    pub fn corner_count(&self) -> usize {
        self.indices().len()
    }

    /// True for pole fan triangles.
    #[inline]
    pub fn is_triangle(&self) -> bool {
        matches!(self, Face::Triangle(_))
    }

    /// Directed edges `(start, end)` in winding order.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let indices = self.indices();
        let len = indices.len();
        (0..len).map(move |i| (indices[i], indices[(i + 1) % len]))
    }
}

/// Pure index arithmetic from grid cells to vertex slots.
///
/// # Examples
/// ```
/// use boy_surface::resolution::ResolutionSpec;
/// use boy_surface::topology::GridIndexer;
///
/// let indexer = GridIndexer::new(&ResolutionSpec::new(4, 2.0).unwrap());
/// assert_eq!(indexer.vertex(1, 0), 1);
/// // antipodal outer samples share one vertex
/// assert_eq!(indexer.vertex(4, 1), indexer.vertex(4, 5));
/// assert_eq!(indexer.vertex_count(), 29);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridIndexer {
    resolution: u32,
    angular_count: u32,
}

impl GridIndexer {
    /// Index of the pole vertex.
    pub const POLE: u32 = 0;

    /// Creates the indexer for validated grid dimensions.
    pub fn new(spec: &ResolutionSpec) -> Self {
        Self {
            resolution: spec.resolution(),
            angular_count: spec.angular_count(),
        }
    }

    /// Number of distinct outer-ring vertices.
    #[inline]
    pub fn half_turn(&self) -> u32 {
        self.angular_count / 2
    }

    /// Canonical slot of outer-ring sample `angular`: `j` and `j + n/2`
    /// share a slot.
    #[inline]
    pub fn seam_slot(&self, angular: u32) -> u32 {
        (angular % self.angular_count) % self.half_turn()
    }

    /// First vertex index of the outer ring.
    #[inline]
    pub fn seam_base(&self) -> u32 {
        1 + (self.resolution - 1) * self.angular_count
    }

    /// Vertex index of grid cell `(ring, angular)`, `ring` in `1..=resolution`.
    /// Angular indices wrap modulo the ring size.
    #[inline]
    pub fn vertex(&self, ring: u32, angular: u32) -> u32 {
        let angular = angular % self.angular_count;
        if ring < self.resolution {
            1 + (ring - 1) * self.angular_count + angular
        } else {
            self.seam_base() + self.seam_slot(angular)
        }
    }

    /// Total number of vertices after identification.
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.seam_base() + self.half_turn()
    }
}

/// Vertices and faces of the glued grid, before normals and centering.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTopology {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl GridTopology {
    /// All vertices, indexed by [`Vertex::index`].
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All faces: `n` pole triangles followed by the quad rings from the
    /// inside out.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Splits into vertex and face arrays.
    pub fn into_parts(self) -> (Vec<Vertex>, Vec<Face>) {
        (self.vertices, self.faces)
    }
}

/// Builds the glued grid from evaluated samples.
///
/// Faces are wound so that every edge inside the disk is walked in opposite
/// directions by its two faces: `(pole, (1, j), (1, j+1))` for the fan and
/// `((i, j), (i+1, j), (i+1, j+1), (i, j+1))` for quads.
pub fn build(
    spec: &ResolutionSpec,
    samples: &SurfaceSamples,
    config: &GeneratorConfig,
) -> Result<GridTopology, TopologyError> {
    let indexer = GridIndexer::new(spec);
    let resolution = spec.resolution();
    let n = spec.angular_count();

    check_seam(&indexer, samples, config.seam_tolerance())?;

    let vertices = build_vertices(&indexer, samples);
    let mut faces = Vec::with_capacity(spec.face_count());
    add_pole_fan(&indexer, n, &mut faces);
    add_quad_rings(&indexer, resolution, n, &mut faces);

    debug!(
        vertices = vertices.len(),
        faces = faces.len(),
        seam_slots = indexer.half_turn(),
        "Built grid topology"
    );

    if config.verify_topology() {
        let report =
            validate::check_closed_manifold(vertices.len(), &faces, PROJECTIVE_PLANE_EULER)?;
        let positions: Vec<DVec3> = vertices.iter().map(|v| v.position).collect();
        validate::check_distinct_positions(&positions, config.tolerance())?;
        debug!(
            edges = report.edge_count,
            euler = report.euler_characteristic,
            "Topology verified"
        );
    }

    Ok(GridTopology { vertices, faces })
}

/// Every glued pair must evaluate to the same point.
fn check_seam(
    indexer: &GridIndexer,
    samples: &SurfaceSamples,
    tolerance: f64,
) -> Result<(), TopologyError> {
    let outer = samples.ring(samples.ring_count());
    let half = indexer.half_turn() as usize;
    for slot in 0..half {
        let distance = outer[slot].distance(outer[slot + half]);
        if distance.is_nan() || distance > tolerance {
            return Err(TopologyError::SeamGap {
                slot: slot as u32,
                angular: slot as u32,
                partner: (slot + half) as u32,
                distance,
                tolerance,
            });
        }
    }
    Ok(())
}

fn build_vertices(indexer: &GridIndexer, samples: &SurfaceSamples) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(indexer.vertex_count() as usize);
    vertices.push(Vertex {
        index: GridIndexer::POLE,
        position: samples.pole(),
        role: VertexRole::Pole,
    });

    for ring in 1..samples.ring_count() {
        for (angular, position) in samples.ring(ring).iter().enumerate() {
            vertices.push(Vertex {
                index: indexer.vertex(ring as u32, angular as u32),
                position: *position,
                role: VertexRole::Interior,
            });
        }
    }

    let outer_ring = samples.ring_count();
    for slot in 0..indexer.half_turn() {
        vertices.push(Vertex {
            index: indexer.seam_base() + slot,
            position: samples.at(outer_ring, slot as usize),
            role: VertexRole::Seam,
        });
    }

    vertices
}

fn add_pole_fan(indexer: &GridIndexer, n: u32, faces: &mut Vec<Face>) {
    for j in 0..n {
        faces.push(Face::Triangle([
            GridIndexer::POLE,
            indexer.vertex(1, j),
            indexer.vertex(1, j + 1),
        ]));
    }
}

fn add_quad_rings(indexer: &GridIndexer, resolution: u32, n: u32, faces: &mut Vec<Face>) {
    for ring in 1..resolution {
        for j in 0..n {
            faces.push(Face::Quad([
                indexer.vertex(ring, j),
                indexer.vertex(ring + 1, j),
                indexer.vertex(ring + 1, j + 1),
                indexer.vertex(ring, j + 1),
            ]));
        }
    }
}

#[cfg(test)]
mod tests;
