//! Capability interface the mesh needs from a GPU backend.
//!
//! The mesh never talks to a graphics API directly. It allocates buffers,
//! uploads byte ranges, describes its attribute layout and issues indexed
//! draws through [`GpuSurface`]. The viewer implements it over wgpu and
//! [`RecordingSurface`](crate::RecordingSurface) implements it in memory.

/// Opaque handle to a buffer object owned by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(u32);

/// Opaque handle to a vertex layout (attribute bindings + index buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutHandle(u32);

/// Opaque handle to a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(u32);

macro_rules! impl_handle {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                pub const fn new(id: u32) -> Self {
                    Self(id)
                }

                pub const fn id(self) -> u32 {
                    self.0
                }
            }
        )*
    };
}

impl_handle!(BufferHandle, LayoutHandle, ProgramHandle);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    Uint16,
}

impl IndexFormat {
    pub const fn byte_size(self) -> u64 {
        match self {
            IndexFormat::Uint16 => 2,
        }
    }
}

/// Where one vertex attribute lives inside a buffer.
///
/// `stride` of 0 means the attribute is a tightly packed block of
/// `components` floats per vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeBinding {
    pub slot: u32,
    pub components: u32,
    pub stride: u64,
    pub offset: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("out of GPU memory: {requested} bytes requested, {available} available")]
    OutOfMemory { requested: u64, available: u64 },
    #[error("buffer limit of {limit} reached")]
    BufferLimit { limit: usize },
    #[error("layout limit of {limit} reached")]
    LayoutLimit { limit: usize },
    #[error("unknown buffer {0:?}")]
    UnknownBuffer(BufferHandle),
    #[error("unknown layout {0:?}")]
    UnknownLayout(LayoutHandle),
    #[error("buffer {buffer:?} has no storage yet")]
    Unallocated { buffer: BufferHandle },
    #[error("write of {len} bytes at offset {offset} overruns buffer of {size} bytes")]
    OutOfBounds { offset: u64, len: u64, size: u64 },
}

/// GPU resource surface consumed by [`RegularOctahedron`](crate::RegularOctahedron).
///
/// Calls are issued from a single thread and are fire-and-forget: the only
/// ordering the mesh relies on is that the last uploaded range is what the
/// next draw reads.
pub trait GpuSurface {
    /// Reserve a buffer object. Storage is created by [`GpuSurface::upload_buffer`].
    fn allocate_buffer(&mut self, kind: BufferKind) -> Result<BufferHandle, SurfaceError>;

    /// Give `buffer` `size` bytes of zeroed storage, replacing any previous contents.
    fn upload_buffer(&mut self, buffer: BufferHandle, size: u64) -> Result<(), SurfaceError>;

    /// Overwrite `data.len()` bytes of `buffer` starting at `offset`.
    fn upload_subrange(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> Result<(), SurfaceError>;

    fn create_layout(&mut self) -> Result<LayoutHandle, SurfaceError>;

    fn bind_attribute(
        &mut self,
        layout: LayoutHandle,
        buffer: BufferHandle,
        binding: AttributeBinding,
    ) -> Result<(), SurfaceError>;

    fn bind_index_buffer(
        &mut self,
        layout: LayoutHandle,
        buffer: BufferHandle,
        format: IndexFormat,
    ) -> Result<(), SurfaceError>;

    /// Make `program` the active shader for subsequent draws.
    fn use_program(&mut self, program: ProgramHandle);

    fn draw_indexed(
        &mut self,
        layout: LayoutHandle,
        primitive: Primitive,
        index_count: u32,
        format: IndexFormat,
    );

    fn release_buffer(&mut self, buffer: BufferHandle);

    fn release_layout(&mut self, layout: LayoutHandle);
}
