//! Hand-off of the finished mesh to a host scene.
//!
//! The host is reached only through the [`MeshHost`] capability trait, so the
//! generation pipeline never depends on a particular application's object
//! model. [`InMemoryScene`] is the reference implementation used by tests.

use std::collections::BTreeMap;

use ::config::constants::{DEFAULT_MESH_NAME, DISPLAY_ROTATION_Y_DEGREES};
use glam::{DQuat, DVec3};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::ExportError;
use crate::mesh::Mesh;
use crate::topology::Face;

/// Capability names as reported in [`ExportError`].
pub mod steps {
    /// [`super::MeshHost::create_mesh`]
    pub const CREATE_MESH: &str = "create_mesh";
    /// [`super::MeshHost::set_normals`]
    pub const SET_NORMALS: &str = "set_normals";
    /// [`super::MeshHost::set_smoothing`]
    pub const SET_SMOOTHING: &str = "set_smoothing";
    /// [`super::MeshHost::center_pivot`]
    pub const CENTER_PIVOT: &str = "center_pivot";
    /// [`super::MeshHost::set_rotation`]
    pub const SET_ROTATION: &str = "set_rotation";
    /// [`super::MeshHost::delete_mesh`]
    pub const DELETE_MESH: &str = "delete_mesh";
}

/// Narrow interface to a scene that can hold polygon meshes.
///
/// # Examples
/// ```
/// use boy_surface::export::{InMemoryScene, MeshHost};
/// let mut scene = InMemoryScene::default();
/// let id = scene.create_mesh("empty", &[], &[]).unwrap();
/// scene.delete_mesh(&id).unwrap();
/// assert!(scene.is_empty());
/// ```
pub trait MeshHost {
    /// Reference to an object created in the host.
    type Handle: Clone + std::fmt::Debug;
    /// Host failure; only its message crosses into [`ExportError`].
    type Error: std::fmt::Display;

    /// Creates a named mesh object at the world origin.
    fn create_mesh(
        &mut self,
        name: &str,
        positions: &[DVec3],
        faces: &[Face],
    ) -> Result<Self::Handle, Self::Error>;

    /// Assigns one normal per vertex.
    fn set_normals(&mut self, handle: &Self::Handle, normals: &[DVec3])
        -> Result<(), Self::Error>;

    /// Puts every face in one smoothing group.
    fn set_smoothing(&mut self, handle: &Self::Handle, group: u32) -> Result<(), Self::Error>;

    /// Moves the object's pivot to the center of its geometry.
    fn center_pivot(&mut self, handle: &Self::Handle) -> Result<(), Self::Error>;

    /// Sets the object's orientation.
    fn set_rotation(&mut self, handle: &Self::Handle, rotation: DQuat) -> Result<(), Self::Error>;

    /// Removes an object created by [`MeshHost::create_mesh`].
    fn delete_mesh(&mut self, handle: &Self::Handle) -> Result<(), Self::Error>;
}

/// Presentation settings applied while exporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Object name in the host.
    pub name: String,
    /// Rotation about the Y axis in degrees; zero skips the rotation step.
    pub rotation_y_degrees: f64,
    /// Whether to center the object's pivot on its geometry.
    pub center_pivot: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_MESH_NAME.to_string(),
            rotation_y_degrees: DISPLAY_ROTATION_Y_DEGREES,
            center_pivot: true,
        }
    }
}

impl ExportOptions {
    /// Default options with a different object name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Creates the mesh in `host` and applies normals, smoothing and placement.
///
/// If any step after creation fails, the created object is deleted again so
/// the host is left as it was.
pub fn export<H: MeshHost>(
    host: &mut H,
    mesh: &Mesh,
    options: &ExportOptions,
) -> Result<H::Handle, ExportError> {
    if !options.rotation_y_degrees.is_finite() {
        return Err(ExportError::host_step(
            steps::SET_ROTATION,
            format!("rotation must be finite, got {}", options.rotation_y_degrees),
        ));
    }

    let handle = host
        .create_mesh(&options.name, mesh.positions(), mesh.faces())
        .map_err(|e| ExportError::host_step(steps::CREATE_MESH, e.to_string()))?;

    if let Err((step, err)) = finish(host, &handle, mesh, options) {
        let message = err.to_string();
        warn!(step, error = %message, name = %options.name, "Export failed, removing partial mesh");
        return match host.delete_mesh(&handle) {
            Ok(()) => Err(ExportError::HostStep { step, message }),
            Err(rollback) => Err(ExportError::RollbackFailed {
                step,
                message,
                rollback: rollback.to_string(),
            }),
        };
    }

    info!(
        name = %options.name,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Exported mesh to host"
    );
    Ok(handle)
}

fn finish<H: MeshHost>(
    host: &mut H,
    handle: &H::Handle,
    mesh: &Mesh,
    options: &ExportOptions,
) -> Result<(), (&'static str, H::Error)> {
    host.set_normals(handle, mesh.vertex_normals())
        .map_err(|e| (steps::SET_NORMALS, e))?;
    host.set_smoothing(handle, mesh.smoothing_group())
        .map_err(|e| (steps::SET_SMOOTHING, e))?;
    if options.center_pivot {
        host.center_pivot(handle)
            .map_err(|e| (steps::CENTER_PIVOT, e))?;
    }
    if options.rotation_y_degrees != 0.0 {
        let rotation = DQuat::from_rotation_y(options.rotation_y_degrees.to_radians());
        host.set_rotation(handle, rotation)
            .map_err(|e| (steps::SET_ROTATION, e))?;
    }
    Ok(())
}

// =============================================================================
// IN-MEMORY HOST
// =============================================================================

/// Identifier of an object in an [`InMemoryScene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u64);

/// A mesh object stored by [`InMemoryScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Unique object name.
    pub name: String,
    /// Vertex positions in object space.
    pub positions: Vec<DVec3>,
    /// Polygons.
    pub faces: Vec<Face>,
    /// Per-vertex normals, once assigned.
    pub normals: Option<Vec<DVec3>>,
    /// Smoothing group, once assigned.
    pub smoothing_group: Option<u32>,
    /// Pivot in object space.
    pub pivot: DVec3,
    /// World location of the pivot.
    pub location: DVec3,
    /// Orientation.
    pub rotation: DQuat,
}

/// Failures raised by [`InMemoryScene`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    /// The handle does not name a live object.
    #[error("unknown object {id}")]
    UnknownObject {
        /// Raw object id
        id: u64,
    },
    /// A face refers to a vertex the object does not have.
    #[error("face {face} refers to vertex {index} of {vertex_count}")]
    IndexOutOfRange {
        /// Face position
        face: usize,
        /// Offending index
        index: u32,
        /// Vertices in the object
        vertex_count: usize,
    },
    /// Per-vertex data of the wrong length.
    #[error("expected {expected} normals, got {found}")]
    LengthMismatch {
        /// Vertex count
        expected: usize,
        /// Provided count
        found: usize,
    },
    /// Failure requested through [`InMemoryScene::fail_on`].
    #[error("injected failure in {step}")]
    Injected {
        /// Failing capability
        step: &'static str,
    },
}

/// Scene that keeps objects in memory, for tests and headless use.
///
/// Duplicate names get a numeric suffix (`name.001`, `name.002`, ...).
///
/// # Examples
/// ```
/// use boy_surface::export::{InMemoryScene, MeshHost};
/// let mut scene = InMemoryScene::default();
/// let a = scene.create_mesh("surface", &[], &[]).unwrap();
/// let b = scene.create_mesh("surface", &[], &[]).unwrap();
/// assert_eq!(scene.object(&a).unwrap().name, "surface");
/// assert_eq!(scene.object(&b).unwrap().name, "surface.001");
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryScene {
    objects: BTreeMap<ObjectId, SceneObject>,
    next_id: u64,
    fail_on: Option<&'static str>,
    fail_rollback: bool,
}

impl InMemoryScene {
    /// Makes the named capability (see [`steps`]) fail on every call.
    pub fn fail_on(mut self, step: &'static str) -> Self {
        self.fail_on = Some(step);
        self
    }

    /// Makes [`MeshHost::delete_mesh`] fail as well.
    pub fn fail_rollback(mut self) -> Self {
        self.fail_rollback = true;
        self
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Looks up a live object.
    pub fn object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Finds a live object by name.
    pub fn find(&self, name: &str) -> Option<&SceneObject> {
        self.objects.values().find(|o| o.name == name)
    }

    fn check(&self, step: &'static str) -> Result<(), SceneError> {
        if self.fail_on == Some(step) {
            return Err(SceneError::Injected { step });
        }
        Ok(())
    }

    fn object_mut(&mut self, id: &ObjectId) -> Result<&mut SceneObject, SceneError> {
        self.objects
            .get_mut(id)
            .ok_or(SceneError::UnknownObject { id: id.0 })
    }

    fn unique_name(&self, name: &str) -> String {
        if self.find(name).is_none() {
            return name.to_string();
        }
        (1..)
            .map(|n| format!("{name}.{n:03}"))
            .find(|candidate| self.find(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }
}

impl MeshHost for InMemoryScene {
    type Handle = ObjectId;
    type Error = SceneError;

    fn create_mesh(
        &mut self,
        name: &str,
        positions: &[DVec3],
        faces: &[Face],
    ) -> Result<ObjectId, SceneError> {
        self.check(steps::CREATE_MESH)?;
        for (face, polygon) in faces.iter().enumerate() {
            if let Some(&index) = polygon
                .indices()
                .iter()
                .find(|i| **i as usize >= positions.len())
            {
                return Err(SceneError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count: positions.len(),
                });
            }
        }

        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let object = SceneObject {
            name: self.unique_name(name),
            positions: positions.to_vec(),
            faces: faces.to_vec(),
            normals: None,
            smoothing_group: None,
            pivot: DVec3::ZERO,
            location: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
        };
        self.objects.insert(id, object);
        Ok(id)
    }

    fn set_normals(&mut self, handle: &ObjectId, normals: &[DVec3]) -> Result<(), SceneError> {
        self.check(steps::SET_NORMALS)?;
        let object = self.object_mut(handle)?;
        if normals.len() != object.positions.len() {
            return Err(SceneError::LengthMismatch {
                expected: object.positions.len(),
                found: normals.len(),
            });
        }
        object.normals = Some(normals.to_vec());
        Ok(())
    }

    fn set_smoothing(&mut self, handle: &ObjectId, group: u32) -> Result<(), SceneError> {
        self.check(steps::SET_SMOOTHING)?;
        self.object_mut(handle)?.smoothing_group = Some(group);
        Ok(())
    }

    fn center_pivot(&mut self, handle: &ObjectId) -> Result<(), SceneError> {
        self.check(steps::CENTER_PIVOT)?;
        let object = self.object_mut(handle)?;
        if !object.positions.is_empty() {
            let sum: DVec3 = object.positions.iter().copied().sum();
            object.pivot = sum / object.positions.len() as f64;
        }
        Ok(())
    }

    fn set_rotation(&mut self, handle: &ObjectId, rotation: DQuat) -> Result<(), SceneError> {
        self.check(steps::SET_ROTATION)?;
        self.object_mut(handle)?.rotation = rotation;
        Ok(())
    }

    fn delete_mesh(&mut self, handle: &ObjectId) -> Result<(), SceneError> {
        if self.fail_rollback {
            return Err(SceneError::Injected {
                step: steps::DELETE_MESH,
            });
        }
        self.objects
            .remove(handle)
            .map(|_| ())
            .ok_or(SceneError::UnknownObject { id: handle.0 })
    }
}
