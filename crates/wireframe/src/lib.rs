mod mesh;
mod obj;
mod snapshot;
mod surface;

pub use mesh::{generate, Domain, Edge, Interval, Mesh, MeshGenerator, Point3, Resolution};
pub use obj::write_obj;
pub use snapshot::ParameterSnapshot;
pub use surface::{Surface, TwistedRibbon};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("mesh resolution must be at least 2x2, got {u_count}x{v_count}")]
    InvalidResolution { u_count: usize, v_count: usize },
    #[error("{axis} range [{min}, {max}] must be finite with min < max")]
    InvalidDomain { axis: char, min: f64, max: f64 },
}
