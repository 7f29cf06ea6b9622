//! In-memory [`GpuSurface`] that keeps buffer contents and a command log.
//!
//! Used headless: by the test-suite to inspect exactly what a mesh uploaded
//! and drew, and by the viewer's `--headless` mode.

use std::collections::HashMap;

use crate::surface::{
    AttributeBinding, BufferHandle, BufferKind, GpuSurface, IndexFormat, LayoutHandle,
    Primitive, ProgramHandle, SurfaceError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AllocateBuffer {
        buffer: BufferHandle,
        kind: BufferKind,
    },
    UploadBuffer {
        buffer: BufferHandle,
        size: u64,
    },
    UploadSubrange {
        buffer: BufferHandle,
        offset: u64,
        len: u64,
    },
    CreateLayout {
        layout: LayoutHandle,
    },
    BindAttribute {
        layout: LayoutHandle,
        buffer: BufferHandle,
        binding: AttributeBinding,
    },
    BindIndexBuffer {
        layout: LayoutHandle,
        buffer: BufferHandle,
        format: IndexFormat,
    },
    UseProgram {
        program: ProgramHandle,
    },
    DrawIndexed {
        layout: LayoutHandle,
        program: Option<ProgramHandle>,
        primitive: Primitive,
        index_count: u32,
        format: IndexFormat,
    },
    ReleaseBuffer {
        buffer: BufferHandle,
    },
    ReleaseLayout {
        layout: LayoutHandle,
    },
}

#[derive(Debug)]
struct RecordedBuffer {
    kind: BufferKind,
    data: Option<Vec<u8>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordedLayout {
    pub attributes: Vec<(BufferHandle, AttributeBinding)>,
    pub index_buffer: Option<(BufferHandle, IndexFormat)>,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    buffers: HashMap<BufferHandle, RecordedBuffer>,
    layouts: HashMap<LayoutHandle, RecordedLayout>,
    commands: Vec<Command>,
    active_program: Option<ProgramHandle>,
    next_id: u32,
    next_program: u32,
    max_buffers: Option<usize>,
    max_bytes: Option<u64>,
    max_layouts: Option<usize>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `allocate_buffer` once `limit` buffers are alive.
    pub fn with_buffer_limit(mut self, limit: usize) -> Self {
        self.max_buffers = Some(limit);
        self
    }

    /// Fail `upload_buffer` once live storage would exceed `bytes`.
    pub fn with_memory_limit(mut self, bytes: u64) -> Self {
        self.max_bytes = Some(bytes);
        self
    }

    /// Fail `create_layout` once `limit` layouts are alive.
    pub fn with_layout_limit(mut self, limit: usize) -> Self {
        self.max_layouts = Some(limit);
        self
    }

    /// Hand out a program handle; no compilation happens here.
    pub fn register_program(&mut self) -> ProgramHandle {
        let program = ProgramHandle::new(self.next_program);
        self.next_program += 1;
        program
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_layouts(&self) -> usize {
        self.layouts.len()
    }

    pub fn buffer_kind(&self, buffer: BufferHandle) -> Option<BufferKind> {
        self.buffers.get(&buffer).map(|b| b.kind)
    }

    pub fn buffer_data(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer)?.data.as_deref()
    }

    pub fn layout(&self, layout: LayoutHandle) -> Option<&RecordedLayout> {
        self.layouts.get(&layout)
    }

    /// Read `count` floats starting at byte `offset`.
    pub fn read_f32s(&self, buffer: BufferHandle, offset: u64, count: usize) -> Option<Vec<f32>> {
        let bytes = self.read_bytes(buffer, offset, count * std::mem::size_of::<f32>())?;
        Some(
            bytes
                .chunks_exact(4)
                .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect(),
        )
    }

    pub fn read_u16s(&self, buffer: BufferHandle, offset: u64, count: usize) -> Option<Vec<u16>> {
        let bytes = self.read_bytes(buffer, offset, count * std::mem::size_of::<u16>())?;
        Some(
            bytes
                .chunks_exact(2)
                .map(|chunk| u16::from_ne_bytes([chunk[0], chunk[1]]))
                .collect(),
        )
    }

    fn read_bytes(&self, buffer: BufferHandle, offset: u64, len: usize) -> Option<&[u8]> {
        let data = self.buffer_data(buffer)?;
        let start = usize::try_from(offset).ok()?;
        data.get(start..start.checked_add(len)?)
    }

    fn allocated_bytes(&self) -> u64 {
        self.buffers
            .values()
            .filter_map(|b| b.data.as_ref())
            .map(|data| data.len() as u64)
            .sum()
    }

    fn next_handle(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl GpuSurface for RecordingSurface {
    fn allocate_buffer(&mut self, kind: BufferKind) -> Result<BufferHandle, SurfaceError> {
        if let Some(limit) = self.max_buffers {
            if self.buffers.len() >= limit {
                return Err(SurfaceError::BufferLimit { limit });
            }
        }

        let buffer = BufferHandle::new(self.next_handle());
        self.buffers.insert(buffer, RecordedBuffer { kind, data: None });
        self.commands.push(Command::AllocateBuffer { buffer, kind });
        Ok(buffer)
    }

    fn upload_buffer(&mut self, buffer: BufferHandle, size: u64) -> Result<(), SurfaceError> {
        let previous = match self.buffers.get(&buffer) {
            Some(b) => b.data.as_ref().map_or(0, |data| data.len() as u64),
            None => return Err(SurfaceError::UnknownBuffer(buffer)),
        };

        if let Some(limit) = self.max_bytes {
            let available = limit.saturating_sub(self.allocated_bytes() - previous);
            if size > available {
                return Err(SurfaceError::OutOfMemory {
                    requested: size,
                    available,
                });
            }
        }

        let len = usize::try_from(size).map_err(|_| SurfaceError::OutOfMemory {
            requested: size,
            available: usize::MAX as u64,
        })?;

        if let Some(recorded) = self.buffers.get_mut(&buffer) {
            recorded.data = Some(vec![0; len]);
        }
        self.commands.push(Command::UploadBuffer { buffer, size });
        Ok(())
    }

    fn upload_subrange(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> Result<(), SurfaceError> {
        let recorded = self
            .buffers
            .get_mut(&buffer)
            .ok_or(SurfaceError::UnknownBuffer(buffer))?;
        let storage = recorded
            .data
            .as_mut()
            .ok_or(SurfaceError::Unallocated { buffer })?;

        let len = data.len() as u64;
        let size = storage.len() as u64;
        if offset.checked_add(len).is_none_or(|end| end > size) {
            return Err(SurfaceError::OutOfBounds { offset, len, size });
        }

        let start = offset as usize;
        storage[start..start + data.len()].copy_from_slice(data);
        self.commands.push(Command::UploadSubrange {
            buffer,
            offset,
            len,
        });
        Ok(())
    }

    fn create_layout(&mut self) -> Result<LayoutHandle, SurfaceError> {
        if let Some(limit) = self.max_layouts {
            if self.layouts.len() >= limit {
                return Err(SurfaceError::LayoutLimit { limit });
            }
        }

        let layout = LayoutHandle::new(self.next_handle());
        self.layouts.insert(layout, RecordedLayout::default());
        self.commands.push(Command::CreateLayout { layout });
        Ok(layout)
    }

    fn bind_attribute(
        &mut self,
        layout: LayoutHandle,
        buffer: BufferHandle,
        binding: AttributeBinding,
    ) -> Result<(), SurfaceError> {
        if !self.buffers.contains_key(&buffer) {
            return Err(SurfaceError::UnknownBuffer(buffer));
        }
        let recorded = self
            .layouts
            .get_mut(&layout)
            .ok_or(SurfaceError::UnknownLayout(layout))?;

        recorded.attributes.retain(|(_, b)| b.slot != binding.slot);
        recorded.attributes.push((buffer, binding));
        self.commands.push(Command::BindAttribute {
            layout,
            buffer,
            binding,
        });
        Ok(())
    }

    fn bind_index_buffer(
        &mut self,
        layout: LayoutHandle,
        buffer: BufferHandle,
        format: IndexFormat,
    ) -> Result<(), SurfaceError> {
        if !self.buffers.contains_key(&buffer) {
            return Err(SurfaceError::UnknownBuffer(buffer));
        }
        let recorded = self
            .layouts
            .get_mut(&layout)
            .ok_or(SurfaceError::UnknownLayout(layout))?;

        recorded.index_buffer = Some((buffer, format));
        self.commands.push(Command::BindIndexBuffer {
            layout,
            buffer,
            format,
        });
        Ok(())
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.active_program = Some(program);
        self.commands.push(Command::UseProgram { program });
    }

    fn draw_indexed(
        &mut self,
        layout: LayoutHandle,
        primitive: Primitive,
        index_count: u32,
        format: IndexFormat,
    ) {
        self.commands.push(Command::DrawIndexed {
            layout,
            program: self.active_program,
            primitive,
            index_count,
            format,
        });
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        self.buffers.remove(&buffer);
        self.commands.push(Command::ReleaseBuffer { buffer });
    }

    fn release_layout(&mut self, layout: LayoutHandle) {
        self.layouts.remove(&layout);
        self.commands.push(Command::ReleaseLayout { layout });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subrange_writes_land_at_offset() {
        let mut surface = RecordingSurface::new();
        let buffer = surface.allocate_buffer(BufferKind::Vertex).unwrap();
        surface.upload_buffer(buffer, 16).unwrap();
        surface
            .upload_subrange(buffer, 8, bytemuck::cast_slice(&[1.5f32, -2.0]))
            .unwrap();

        assert_eq!(
            surface.read_f32s(buffer, 0, 4).unwrap(),
            vec![0.0, 0.0, 1.5, -2.0]
        );
    }

    #[test]
    fn test_subrange_out_of_bounds() {
        let mut surface = RecordingSurface::new();
        let buffer = surface.allocate_buffer(BufferKind::Vertex).unwrap();
        surface.upload_buffer(buffer, 4).unwrap();

        let err = surface.upload_subrange(buffer, 2, &[0; 4]).unwrap_err();
        assert!(matches!(
            err,
            SurfaceError::OutOfBounds {
                offset: 2,
                len: 4,
                size: 4
            }
        ));
    }

    #[test]
    fn test_subrange_before_storage() {
        let mut surface = RecordingSurface::new();
        let buffer = surface.allocate_buffer(BufferKind::Index).unwrap();
        assert!(matches!(
            surface.upload_subrange(buffer, 0, &[0; 2]),
            Err(SurfaceError::Unallocated { .. })
        ));
    }

    #[test]
    fn test_limits() {
        let mut surface = RecordingSurface::new()
            .with_buffer_limit(1)
            .with_memory_limit(8)
            .with_layout_limit(1);
        let buffer = surface.allocate_buffer(BufferKind::Vertex).unwrap();
        assert!(matches!(
            surface.allocate_buffer(BufferKind::Index),
            Err(SurfaceError::BufferLimit { limit: 1 })
        ));
        assert!(matches!(
            surface.upload_buffer(buffer, 16),
            Err(SurfaceError::OutOfMemory {
                requested: 16,
                available: 8
            })
        ));
        surface.upload_buffer(buffer, 8).unwrap();
        // Reallocating replaces the old storage instead of adding to it.
        surface.upload_buffer(buffer, 8).unwrap();

        let layout = surface.create_layout().unwrap();
        assert!(matches!(
            surface.create_layout(),
            Err(SurfaceError::LayoutLimit { limit: 1 })
        ));
        surface.release_layout(layout);
        surface.create_layout().unwrap();
    }

    #[test]
    fn test_draw_records_active_program() {
        let mut surface = RecordingSurface::new();
        let layout = surface.create_layout().unwrap();
        surface.draw_indexed(layout, Primitive::Triangles, 3, IndexFormat::Uint16);

        let program = surface.register_program();
        surface.use_program(program);
        surface.draw_indexed(layout, Primitive::Triangles, 3, IndexFormat::Uint16);

        let draws: Vec<_> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                Command::DrawIndexed { program, .. } => Some(*program),
                _ => None,
            })
            .collect();
        assert_eq!(draws, vec![None, Some(program)]);
    }
}
