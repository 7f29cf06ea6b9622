pub mod color;
pub mod corners;
mod error;
pub mod geometry;
pub mod intersect;
pub mod layout;
pub mod normals;
mod octahedron;
pub mod orbit;
pub mod recording;
pub mod surface;

pub use color::{ColorScheme, DEFAULT_PALETTE, Rgba};
pub use corners::{CornerMap, FACES_PER_CORNER, Occurrence};
pub use error::MeshError;
pub use geometry::{CORNER_COUNT, Corner, FACE_COUNT, VERTEX_COUNT, VERTICES_PER_FACE};
pub use intersect::{Circle, Intersections, circle_segment};
pub use layout::{Attribute, BufferLayout};
pub use normals::NormalAveraging;
pub use octahedron::{OctahedronOptions, RegularOctahedron, Shading};
pub use orbit::OrbitRig;
pub use recording::{Command, RecordedLayout, RecordingSurface};
pub use surface::{
    AttributeBinding, BufferHandle, BufferKind, GpuSurface, IndexFormat, LayoutHandle,
    Primitive, ProgramHandle, SurfaceError,
};
