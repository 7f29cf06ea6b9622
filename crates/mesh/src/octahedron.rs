//! The regular octahedron mesh and its flat/smooth shading switch.

use crate::color::{ColorScheme, Rgba};
use crate::corners::CornerMap;
use crate::error::MeshError;
use crate::geometry::{self, VERTEX_COUNT};
use crate::layout::{Attribute, BufferLayout};
use crate::normals::{self, NormalAveraging};
use crate::surface::{BufferHandle, BufferKind, GpuSurface, IndexFormat, LayoutHandle, Primitive};

/// Which normal set is bound to the normal attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Shading {
    /// Face normals, one per triangle.
    #[default]
    Flat,
    /// Vertex normals averaged over each corner.
    Smooth,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OctahedronOptions {
    pub colors: ColorScheme,
    pub shading: Shading,
    pub averaging: NormalAveraging,
}

impl OctahedronOptions {
    pub fn with_uniform_color(color: Rgba) -> Self {
        Self {
            colors: ColorScheme::with_uniform_color(color),
            ..Default::default()
        }
    }
}

/// A regular octahedron living in one vertex buffer and one index buffer.
///
/// The vertex buffer holds position, normal, color and texture-coordinate
/// blocks back to back (see [`BufferLayout`]). Switching between flat and
/// smooth shading rewrites only the normal block.
///
/// The mesh does not bind a shader. Callers must call
/// [`GpuSurface::use_program`] before [`RegularOctahedron::draw`]; drawing
/// without one produces blank output.
#[derive(Debug)]
pub struct RegularOctahedron {
    positions: [[f32; 3]; VERTEX_COUNT],
    face_normals: [[f32; 3]; VERTEX_COUNT],
    vertex_normals: [[f32; 3]; VERTEX_COUNT],
    normals: [[f32; 3]; VERTEX_COUNT],
    colors: [Rgba; VERTEX_COUNT],
    tex_coords: [[f32; 2]; VERTEX_COUNT],
    indices: [u16; VERTEX_COUNT],
    corners: CornerMap,
    shading: Shading,
    averaging: NormalAveraging,
    layout: BufferLayout,
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
    vertex_layout: LayoutHandle,
}

/// Buffers and layout, released in reverse order if construction fails midway.
#[derive(Default)]
struct Allocation {
    vertex_buffer: Option<BufferHandle>,
    index_buffer: Option<BufferHandle>,
    vertex_layout: Option<LayoutHandle>,
}

impl Allocation {
    fn release(self, surface: &mut impl GpuSurface) {
        if let Some(layout) = self.vertex_layout {
            surface.release_layout(layout);
        }
        if let Some(buffer) = self.index_buffer {
            surface.release_buffer(buffer);
        }
        if let Some(buffer) = self.vertex_buffer {
            surface.release_buffer(buffer);
        }
    }
}

impl RegularOctahedron {
    pub fn new(
        surface: &mut impl GpuSurface,
        options: OctahedronOptions,
    ) -> Result<Self, MeshError> {
        let corners = CornerMap::new();
        let face_normals = geometry::face_normals();
        let vertex_normals =
            normals::compute_vertex_normals(&face_normals, &corners, options.averaging);
        let normals = match options.shading {
            Shading::Flat => face_normals,
            Shading::Smooth => vertex_normals,
        };

        let positions = geometry::positions();
        let colors = options.colors.expand();
        let tex_coords = geometry::tex_coords();
        let indices = geometry::indices();
        let layout = BufferLayout::new(VERTEX_COUNT);

        let mut allocation = Allocation::default();
        let handles = Self::upload_all(
            surface,
            &mut allocation,
            layout,
            &positions,
            &normals,
            &colors,
            &tex_coords,
            &indices,
        );

        let (vertex_buffer, index_buffer, vertex_layout) = match handles {
            Ok(handles) => handles,
            Err(e) => {
                log::error!("Octahedron construction failed: {}", e);
                allocation.release(surface);
                return Err(e);
            }
        };

        log::info!(
            "Octahedron uploaded ({} vertices, {} bytes, {:?} shading)",
            VERTEX_COUNT,
            layout.total_size(),
            options.shading
        );

        Ok(Self {
            positions,
            face_normals,
            vertex_normals,
            normals,
            colors,
            tex_coords,
            indices,
            corners,
            shading: options.shading,
            averaging: options.averaging,
            layout,
            vertex_buffer,
            index_buffer,
            vertex_layout,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn upload_all(
        surface: &mut impl GpuSurface,
        allocation: &mut Allocation,
        layout: BufferLayout,
        positions: &[[f32; 3]; VERTEX_COUNT],
        normals: &[[f32; 3]; VERTEX_COUNT],
        colors: &[Rgba; VERTEX_COUNT],
        tex_coords: &[[f32; 2]; VERTEX_COUNT],
        indices: &[u16; VERTEX_COUNT],
    ) -> Result<(BufferHandle, BufferHandle, LayoutHandle), MeshError> {
        let vertex_buffer = surface
            .allocate_buffer(BufferKind::Vertex)
            .map_err(MeshError::allocation("vertex buffer"))?;
        allocation.vertex_buffer = Some(vertex_buffer);
        surface
            .upload_buffer(vertex_buffer, layout.total_size())
            .map_err(MeshError::allocation("vertex buffer storage"))?;

        let blocks: [(Attribute, &[u8]); 4] = [
            (Attribute::Position, bytemuck::cast_slice(positions)),
            (Attribute::Normal, bytemuck::cast_slice(normals)),
            (Attribute::Color, bytemuck::cast_slice(colors)),
            (Attribute::TexCoord, bytemuck::cast_slice(tex_coords)),
        ];
        for (attribute, bytes) in blocks {
            debug_assert_eq!(bytes.len() as u64, layout.size_of(attribute));
            surface.upload_subrange(vertex_buffer, layout.offset_of(attribute), bytes)?;
        }

        let index_bytes: &[u8] = bytemuck::cast_slice(indices);
        let index_buffer = surface
            .allocate_buffer(BufferKind::Index)
            .map_err(MeshError::allocation("index buffer"))?;
        allocation.index_buffer = Some(index_buffer);
        surface
            .upload_buffer(index_buffer, indices.len() as u64 * IndexFormat::Uint16.byte_size())
            .map_err(MeshError::allocation("index buffer storage"))?;
        surface.upload_subrange(index_buffer, 0, index_bytes)?;

        let vertex_layout = surface
            .create_layout()
            .map_err(MeshError::allocation("vertex layout"))?;
        allocation.vertex_layout = Some(vertex_layout);
        for attribute in Attribute::ALL {
            surface.bind_attribute(vertex_layout, vertex_buffer, layout.binding(attribute))?;
        }
        surface.bind_index_buffer(vertex_layout, index_buffer, IndexFormat::Uint16)?;

        Ok((vertex_buffer, index_buffer, vertex_layout))
    }

    /// Rebuild the vertex normals from the face normals.
    ///
    /// Does not touch the active normal set or the GPU copy.
    pub fn compute_vertex_normals(&mut self) {
        self.vertex_normals =
            normals::compute_vertex_normals(&self.face_normals, &self.corners, self.averaging);
    }

    /// Switch to smooth shading and re-upload the normal block.
    ///
    /// On error the mesh keeps its previous shading and normal set.
    pub fn use_vertex_normals(&mut self, surface: &mut impl GpuSurface) -> Result<(), MeshError> {
        self.upload_normals(surface, Shading::Smooth, &self.vertex_normals)?;
        self.normals = self.vertex_normals;
        self.shading = Shading::Smooth;
        Ok(())
    }

    /// Switch to flat shading and re-upload the normal block.
    ///
    /// On error the mesh keeps its previous shading and normal set.
    pub fn use_face_normals(&mut self, surface: &mut impl GpuSurface) -> Result<(), MeshError> {
        self.upload_normals(surface, Shading::Flat, &self.face_normals)?;
        self.normals = self.face_normals;
        self.shading = Shading::Flat;
        Ok(())
    }

    pub fn set_shading(
        &mut self,
        shading: Shading,
        surface: &mut impl GpuSurface,
    ) -> Result<(), MeshError> {
        match shading {
            Shading::Flat => self.use_face_normals(surface),
            Shading::Smooth => self.use_vertex_normals(surface),
        }
    }

    /// Change how vertex normals are averaged. Re-uploads when smooth shading is active.
    ///
    /// On error the previous averaging and vertex normals stay in place.
    pub fn set_normal_averaging(
        &mut self,
        averaging: NormalAveraging,
        surface: &mut impl GpuSurface,
    ) -> Result<(), MeshError> {
        let vertex_normals =
            normals::compute_vertex_normals(&self.face_normals, &self.corners, averaging);

        if self.shading == Shading::Smooth {
            self.upload_normals(surface, Shading::Smooth, &vertex_normals)?;
            self.normals = vertex_normals;
        }
        self.vertex_normals = vertex_normals;
        self.averaging = averaging;
        Ok(())
    }

    fn upload_normals(
        &self,
        surface: &mut impl GpuSurface,
        shading: Shading,
        normals: &[[f32; 3]; VERTEX_COUNT],
    ) -> Result<(), MeshError> {
        let attribute = Attribute::Normal;
        let offset = self.layout.offset_of(attribute);
        log::debug!(
            "Uploading {:?} {} ({} bytes at offset {})",
            shading,
            attribute.name(),
            self.layout.size_of(attribute),
            offset
        );
        surface.upload_subrange(self.vertex_buffer, offset, bytemuck::cast_slice(normals))?;
        Ok(())
    }

    /// One indexed triangle-list draw of all 24 entries.
    ///
    /// A shader must already be active on `surface`.
    pub fn draw(&self, surface: &mut impl GpuSurface) {
        surface.draw_indexed(
            self.vertex_layout,
            Primitive::Triangles,
            self.indices.len() as u32,
            IndexFormat::Uint16,
        );
    }

    /// Release both buffers and the vertex layout.
    pub fn destroy(self, surface: &mut impl GpuSurface) {
        surface.release_buffer(self.vertex_buffer);
        surface.release_buffer(self.index_buffer);
        surface.release_layout(self.vertex_layout);
        log::info!("Octahedron released");
    }

    pub fn positions(&self) -> &[[f32; 3]; VERTEX_COUNT] {
        &self.positions
    }

    pub fn face_normals(&self) -> &[[f32; 3]; VERTEX_COUNT] {
        &self.face_normals
    }

    pub fn vertex_normals(&self) -> &[[f32; 3]; VERTEX_COUNT] {
        &self.vertex_normals
    }

    /// The normal set currently uploaded to the GPU.
    pub fn normals(&self) -> &[[f32; 3]; VERTEX_COUNT] {
        &self.normals
    }

    pub fn colors(&self) -> &[Rgba; VERTEX_COUNT] {
        &self.colors
    }

    pub fn tex_coords(&self) -> &[[f32; 2]; VERTEX_COUNT] {
        &self.tex_coords
    }

    pub fn indices(&self) -> &[u16; VERTEX_COUNT] {
        &self.indices
    }

    pub fn corner_map(&self) -> &CornerMap {
        &self.corners
    }

    pub fn shading(&self) -> Shading {
        self.shading
    }

    pub fn averaging(&self) -> NormalAveraging {
        self.averaging
    }

    pub fn layout(&self) -> BufferLayout {
        self.layout
    }

    pub fn vertex_buffer(&self) -> BufferHandle {
        self.vertex_buffer
    }

    pub fn index_buffer(&self) -> BufferHandle {
        self.index_buffer
    }

    pub fn vertex_layout(&self) -> LayoutHandle {
        self.vertex_layout
    }
}
