//! # Mesh Assembly
//!
//! Turns the glued grid into the final mesh: face normals, averaged vertex
//! normals, one smoothing group and positions recentered on their centroid.
//!
//! The surface is non-orientable, so no global outward direction exists.
//! Faces on the two sides of the seam carry normals pointing in opposite
//! directions; seam vertices align them before averaging so they do not
//! cancel.

use glam::DVec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ::config::constants::NORMAL_EPSILON;

use crate::config::GeneratorConfig;
use crate::error::TopologyError;
use crate::topology::{Face, GridTopology, Vertex, VertexRole};
use crate::validate::{self, TopologyReport};

/// Final polygon mesh of the surface.
///
/// Per-vertex data is stored in parallel arrays indexed by vertex index.
///
/// # Example
///
/// ```rust
/// let mesh = boy_surface::generate(4, 2.0).unwrap();
/// assert_eq!(mesh.vertex_count(), 29);
/// assert_eq!(mesh.face_count(), 32);
/// assert!(mesh.centroid().length() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions, centered on the origin.
    positions: Vec<DVec3>,
    /// Disk origin of each vertex.
    roles: Vec<VertexRole>,
    /// Pole triangles followed by ring quads.
    faces: Vec<Face>,
    /// Unit normal per face (zero for a degenerate face).
    face_normals: Vec<DVec3>,
    /// Unit normal per vertex.
    vertex_normals: Vec<DVec3>,
    /// Smoothing group applied to every face.
    smoothing_group: u32,
    /// Translation that was subtracted from the raw positions.
    centering_offset: DVec3,
}

/// Assembles the final mesh from a built topology.
pub fn assemble(topology: GridTopology, config: &GeneratorConfig) -> Mesh {
    let (vertices, faces) = topology.into_parts();
    let roles: Vec<VertexRole> = vertices.iter().map(|v| v.role).collect();
    let mut positions: Vec<DVec3> = vertices.into_iter().map(|v| v.position).collect();

    let centering_offset = mean(&positions);
    for position in &mut positions {
        *position -= centering_offset;
    }
    debug!(
        x = centering_offset.x,
        y = centering_offset.y,
        z = centering_offset.z,
        "Recentered mesh on centroid"
    );

    let face_normals: Vec<DVec3> = faces
        .par_iter()
        .map(|face| face_normal(&positions, face))
        .collect();
    let vertex_normals = vertex_normals(&roles, &faces, &face_normals);
    debug!(
        faces = face_normals.len(),
        vertices = vertex_normals.len(),
        "Computed normals"
    );

    Mesh {
        positions,
        roles,
        faces,
        face_normals,
        vertex_normals,
        smoothing_group: config.smoothing_group(),
        centering_offset,
    }
}

/// Area-weighted normal of a planar or slightly warped polygon, normalized.
fn face_normal(positions: &[DVec3], face: &Face) -> DVec3 {
    let indices = face.indices();
    let origin = positions[indices[0] as usize];
    let mut normal = DVec3::ZERO;
    for pair in indices[1..].windows(2) {
        let a = positions[pair[0] as usize] - origin;
        let b = positions[pair[1] as usize] - origin;
        normal += a.cross(b);
    }
    normal.normalize_or_zero()
}

fn vertex_normals(roles: &[VertexRole], faces: &[Face], face_normals: &[DVec3]) -> Vec<DVec3> {
    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); roles.len()];
    for (face_idx, face) in faces.iter().enumerate() {
        for &vertex in face.indices() {
            incident[vertex as usize].push(face_idx);
        }
    }

    incident
        .par_iter()
        .enumerate()
        .map(|(vertex, around)| {
            let normals = around.iter().map(|&f| face_normals[f]);
            let first = normals.clone().find(|n| *n != DVec3::ZERO).unwrap_or(DVec3::ZERO);

            let sum: DVec3 = if roles[vertex] == VertexRole::Seam {
                normals
                    .map(|n| if n.dot(first) < 0.0 { -n } else { n })
                    .sum()
            } else {
                normals.sum()
            };

            if sum.length_squared() > NORMAL_EPSILON {
                sum.normalize()
            } else {
                warn!(
                    vertex,
                    faces = around.len(),
                    "Vertex normal degenerated, using first face normal"
                );
                first
            }
        })
        .collect()
}

fn mean(positions: &[DVec3]) -> DVec3 {
    if positions.is_empty() {
        return DVec3::ZERO;
    }
    positions.iter().copied().sum::<DVec3>() / positions.len() as f64
}

impl Mesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex positions.
    #[inline]
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Vertex roles, parallel to [`Mesh::positions`].
    #[inline]
    pub fn roles(&self) -> &[VertexRole] {
        &self.roles
    }

    /// Faces in emission order.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Unit face normals, parallel to [`Mesh::faces`].
    #[inline]
    pub fn face_normals(&self) -> &[DVec3] {
        &self.face_normals
    }

    /// Unit vertex normals, parallel to [`Mesh::positions`].
    #[inline]
    pub fn vertex_normals(&self) -> &[DVec3] {
        &self.vertex_normals
    }

    /// Smoothing group shared by all faces.
    #[inline]
    pub fn smoothing_group(&self) -> u32 {
        self.smoothing_group
    }

    /// Translation subtracted from the evaluated positions.
    #[inline]
    pub fn centering_offset(&self) -> DVec3 {
        self.centering_offset
    }

    /// Returns the vertex at `index`, if any.
    pub fn vertex(&self, index: u32) -> Option<Vertex> {
        let i = index as usize;
        Some(Vertex {
            index,
            position: *self.positions.get(i)?,
            role: *self.roles.get(i)?,
        })
    }

    /// Mean of all vertex positions (zero up to rounding after assembly).
    pub fn centroid(&self) -> DVec3 {
        mean(&self.positions)
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some((first, rest)) = self.positions.split_first() else {
            return (DVec3::ZERO, DVec3::ZERO);
        };
        rest.iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)))
    }

    /// Splits every quad `[a, b, c, d]` into `[a, b, c]` and `[a, c, d]`;
    /// triangles pass through unchanged.
    pub fn triangulate(&self) -> Vec<[u32; 3]> {
        let mut triangles = Vec::with_capacity(self.faces.len() * 2);
        for face in &self.faces {
            match *face {
                Face::Triangle(tri) => triangles.push(tri),
                Face::Quad([a, b, c, d]) => {
                    triangles.push([a, b, c]);
                    triangles.push([a, c, d]);
                }
            }
        }
        triangles
    }

    /// Positions as a flat array `[x, y, z, x, y, z, ...]`.
    pub fn positions_flat(&self) -> Vec<f64> {
        flatten(&self.positions)
    }

    /// Vertex normals as a flat array `[x, y, z, ...]`.
    pub fn normals_flat(&self) -> Vec<f64> {
        flatten(&self.vertex_normals)
    }

    /// Triangulated indices as a flat array `[i0, i1, i2, ...]`.
    pub fn indices_flat(&self) -> Vec<u32> {
        self.triangulate().into_iter().flatten().collect()
    }

    /// Exports GPU-friendly `f32` buffers of the triangulated mesh.
    pub fn to_mesh_buffers(&self) -> MeshBuffers {
        MeshBuffers {
            vertices: self.positions_flat().into_iter().map(|v| v as f32).collect(),
            normals: self.normals_flat().into_iter().map(|v| v as f32).collect(),
            indices: self.indices_flat(),
        }
    }

    /// Counts edges and connectivity defects of the face list.
    pub fn topology_report(&self) -> Result<TopologyReport, TopologyError> {
        validate::analyze(self.positions.len(), &self.faces)
    }
}

fn flatten(vectors: &[DVec3]) -> Vec<f64> {
    vectors.iter().flat_map(|v| v.to_array()).collect()
}

/// Triangle buffers suitable for GPU rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions as flat array [x, y, z, x, y, z, ...].
    pub vertices: Vec<f32>,
    /// Vertex normals, laid out like `vertices`.
    pub normals: Vec<f32>,
    /// Triangle indices as flat array [i0, i1, i2, i0, i1, i2, ...].
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
