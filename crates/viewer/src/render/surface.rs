//! [`GpuSurface`] over wgpu.
//!
//! wgpu only accepts draws inside a render pass, so layouts are kept as
//! recorded bindings and draws are queued until [`WgpuSurface::replay`] runs
//! them in the frame's pass. Each attribute block becomes its own vertex
//! buffer slot, sliced at the block's byte offset.

use octa::{
    AttributeBinding, BufferHandle, BufferKind, GpuSurface, IndexFormat, LayoutHandle,
    Primitive, ProgramHandle, SurfaceError,
};

struct GpuBuffer {
    kind: BufferKind,
    buffer: Option<wgpu::Buffer>,
}

#[derive(Default)]
struct VertexLayout {
    attributes: Vec<(BufferHandle, AttributeBinding)>,
    index_buffer: Option<(BufferHandle, IndexFormat)>,
}

struct DrawCall {
    layout: LayoutHandle,
    program: Option<ProgramHandle>,
    index_count: u32,
    format: IndexFormat,
}

pub struct WgpuSurface {
    device: wgpu::Device,
    queue: wgpu::Queue,
    buffers: Vec<Option<GpuBuffer>>,
    layouts: Vec<Option<VertexLayout>>,
    programs: Vec<wgpu::RenderPipeline>,
    active_program: Option<ProgramHandle>,
    draws: Vec<DrawCall>,
}

impl WgpuSurface {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            buffers: Vec::new(),
            layouts: Vec::new(),
            programs: Vec::new(),
            active_program: None,
            draws: Vec::new(),
        }
    }

    /// Register a render pipeline so it can be selected with `use_program`.
    pub fn register_program(&mut self, pipeline: wgpu::RenderPipeline) -> ProgramHandle {
        self.programs.push(pipeline);
        ProgramHandle::new(self.programs.len() as u32 - 1)
    }

    /// Record every queued draw into `pass` and clear the queue.
    pub fn replay(&mut self, pass: &mut wgpu::RenderPass<'_>, scene_bind_group: &wgpu::BindGroup) {
        let draws = std::mem::take(&mut self.draws);

        for draw in draws {
            let Some(pipeline) = draw
                .program
                .and_then(|program| self.programs.get(program.id() as usize))
            else {
                log::warn!("Skipping draw on {:?}: no shader program bound", draw.layout);
                continue;
            };
            let Some(layout) = self.layout(draw.layout) else {
                log::warn!("Skipping draw on released layout {:?}", draw.layout);
                continue;
            };
            let Some(index_buffer) = layout
                .index_buffer
                .and_then(|(buffer, _)| self.gpu_buffer(buffer))
            else {
                log::warn!("Skipping draw on {:?}: no index buffer", draw.layout);
                continue;
            };

            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, scene_bind_group, &[]);
            for (buffer, binding) in &layout.attributes {
                if let Some(buffer) = self.gpu_buffer(*buffer) {
                    pass.set_vertex_buffer(binding.slot, buffer.slice(binding.offset..));
                }
            }
            pass.set_index_buffer(index_buffer.slice(..), index_format(draw.format));
            pass.draw_indexed(0..draw.index_count, 0, 0..1);
        }
    }

    fn slot(&self, buffer: BufferHandle) -> Result<&GpuBuffer, SurfaceError> {
        self.buffers
            .get(buffer.id() as usize)
            .and_then(Option::as_ref)
            .ok_or(SurfaceError::UnknownBuffer(buffer))
    }

    fn gpu_buffer(&self, buffer: BufferHandle) -> Option<&wgpu::Buffer> {
        self.slot(buffer).ok()?.buffer.as_ref()
    }

    fn layout(&self, layout: LayoutHandle) -> Option<&VertexLayout> {
        self.layouts.get(layout.id() as usize)?.as_ref()
    }

    fn layout_mut(&mut self, layout: LayoutHandle) -> Result<&mut VertexLayout, SurfaceError> {
        self.layouts
            .get_mut(layout.id() as usize)
            .and_then(Option::as_mut)
            .ok_or(SurfaceError::UnknownLayout(layout))
    }
}

fn index_format(format: IndexFormat) -> wgpu::IndexFormat {
    match format {
        IndexFormat::Uint16 => wgpu::IndexFormat::Uint16,
    }
}

impl GpuSurface for WgpuSurface {
    fn allocate_buffer(&mut self, kind: BufferKind) -> Result<BufferHandle, SurfaceError> {
        self.buffers.push(Some(GpuBuffer { kind, buffer: None }));
        Ok(BufferHandle::new(self.buffers.len() as u32 - 1))
    }

    fn upload_buffer(&mut self, buffer: BufferHandle, size: u64) -> Result<(), SurfaceError> {
        let kind = self.slot(buffer)?.kind;

        let available = self.device.limits().max_buffer_size;
        if size > available {
            return Err(SurfaceError::OutOfMemory {
                requested: size,
                available,
            });
        }

        let (label, usage) = match kind {
            BufferKind::Vertex => ("Mesh Vertex Buffer", wgpu::BufferUsages::VERTEX),
            BufferKind::Index => ("Mesh Index Buffer", wgpu::BufferUsages::INDEX),
        };
        let gpu = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: size.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT),
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        if let Some(Some(slot)) = self.buffers.get_mut(buffer.id() as usize) {
            slot.buffer = Some(gpu);
        }
        Ok(())
    }

    fn upload_subrange(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> Result<(), SurfaceError> {
        let gpu = self
            .slot(buffer)?
            .buffer
            .as_ref()
            .ok_or(SurfaceError::Unallocated { buffer })?;

        let len = data.len() as u64;
        let size = gpu.size();
        if offset.checked_add(len).is_none_or(|end| end > size) {
            return Err(SurfaceError::OutOfBounds { offset, len, size });
        }

        self.queue.write_buffer(gpu, offset, data);
        Ok(())
    }

    fn create_layout(&mut self) -> Result<LayoutHandle, SurfaceError> {
        self.layouts.push(Some(VertexLayout::default()));
        Ok(LayoutHandle::new(self.layouts.len() as u32 - 1))
    }

    fn bind_attribute(
        &mut self,
        layout: LayoutHandle,
        buffer: BufferHandle,
        binding: AttributeBinding,
    ) -> Result<(), SurfaceError> {
        self.slot(buffer)?;
        let layout = self.layout_mut(layout)?;
        layout.attributes.retain(|(_, b)| b.slot != binding.slot);
        layout.attributes.push((buffer, binding));
        Ok(())
    }

    fn bind_index_buffer(
        &mut self,
        layout: LayoutHandle,
        buffer: BufferHandle,
        format: IndexFormat,
    ) -> Result<(), SurfaceError> {
        self.slot(buffer)?;
        self.layout_mut(layout)?.index_buffer = Some((buffer, format));
        Ok(())
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.active_program = Some(program);
    }

    fn draw_indexed(
        &mut self,
        layout: LayoutHandle,
        primitive: Primitive,
        index_count: u32,
        format: IndexFormat,
    ) {
        // Pipelines are built for triangle lists.
        debug_assert_eq!(primitive, Primitive::Triangles);
        self.draws.push(DrawCall {
            layout,
            program: self.active_program,
            index_count,
            format,
        });
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        if let Some(slot) = self.buffers.get_mut(buffer.id() as usize) {
            if let Some(GpuBuffer {
                buffer: Some(gpu), ..
            }) = slot.take()
            {
                gpu.destroy();
            }
        }
    }

    fn release_layout(&mut self, layout: LayoutHandle) {
        if let Some(slot) = self.layouts.get_mut(layout.id() as usize) {
            *slot = None;
        }
    }
}
