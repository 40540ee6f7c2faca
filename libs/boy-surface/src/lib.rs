//! Boy's surface mesh generator
//!
//! Builds a closed polygon mesh of the real projective plane from the
//! Bryant–Kusner immersion. The unit disk is sampled on a polar grid, the
//! center collapses to a single pole vertex and the outer ring is glued to
//! itself by a half turn, so the mesh is closed with no welding pass.
//!
//! Pipeline: [`resolution`] → [`surface`] → [`topology`] → [`mesh`] →
//! [`export`] (optional, into a [`MeshHost`]).
//!
//! ```rust
//! use boy_surface::{build_in_host, ExportOptions, InMemoryScene};
//!
//! let mut scene = InMemoryScene::default();
//! let id = build_in_host(&mut scene, 8, 2.0, &ExportOptions::default()).unwrap();
//! assert_eq!(scene.object(&id).unwrap().faces.len(), 16 * 8);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod mesh;
pub mod resolution;
pub mod surface;
pub mod topology;
pub mod validate;

pub use self::config::GeneratorConfig;
pub use error::{
    ConfigurationError, EvaluationError, ExportError, SurfaceError, SurfaceResult, TopologyError,
};
pub use export::{export, ExportOptions, InMemoryScene, MeshHost};
pub use mesh::Mesh;
pub use resolution::ResolutionSpec;
pub use topology::{Face, Vertex, VertexRole};
pub use validate::TopologyReport;

use tracing::info;

/// Generates the mesh for `resolution` rings and `ratio` angular samples per
/// ring, using the default configuration.
///
/// Invalid parameters fail before any sampling.
pub fn generate(resolution: u32, ratio: f64) -> SurfaceResult<Mesh> {
    let spec = ResolutionSpec::new(resolution, ratio)?;
    generate_with(spec, &GeneratorConfig::default())
}

/// Generates the mesh with `resolution = 64` and `ratio = 2.0`.
pub fn generate_default() -> SurfaceResult<Mesh> {
    generate_with(ResolutionSpec::default(), &GeneratorConfig::default())
}

/// Runs the pipeline for an already validated [`ResolutionSpec`].
pub fn generate_with(spec: ResolutionSpec, config: &GeneratorConfig) -> SurfaceResult<Mesh> {
    info!(
        resolution = spec.resolution(),
        ratio = spec.ratio(),
        angular_count = spec.angular_count(),
        "Generating Boy's surface"
    );

    let samples = surface::evaluate_grid(&spec.grid())?;
    let topology = topology::build(&spec, &samples, config)?;
    let mesh = mesh::assemble(topology, config);

    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Generated Boy's surface"
    );
    Ok(mesh)
}

/// Generates the mesh and exports it into `host`.
///
/// Nothing reaches the host when generation fails, and a failed export
/// removes the object it created.
pub fn build_in_host<H: MeshHost>(
    host: &mut H,
    resolution: u32,
    ratio: f64,
    options: &ExportOptions,
) -> SurfaceResult<H::Handle> {
    let mesh = generate(resolution, ratio)?;
    Ok(export::export(host, &mesh, options)?)
}
