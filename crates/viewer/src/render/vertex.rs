use octa::Attribute;
use wgpu::{VertexAttribute, VertexBufferLayout, VertexStepMode};

const POSITION_ATTRIBS: [VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const NORMAL_ATTRIBS: [VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const COLOR_ATTRIBS: [VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x4];
const TEX_COORD_ATTRIBS: [VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32x2];

/// Vertex buffer layout for one tightly packed attribute block.
///
/// Shader location equals the attribute's slot, so the buffer slot set by
/// `WgpuSurface::replay` and the pipeline layout line up.
pub fn block_layout(attribute: Attribute) -> VertexBufferLayout<'static> {
    let attributes: &'static [VertexAttribute] = match attribute {
        Attribute::Position => &POSITION_ATTRIBS,
        Attribute::Normal => &NORMAL_ATTRIBS,
        Attribute::Color => &COLOR_ATTRIBS,
        Attribute::TexCoord => &TEX_COORD_ATTRIBS,
    };

    VertexBufferLayout {
        array_stride: attribute.components() as wgpu::BufferAddress
            * std::mem::size_of::<f32>() as wgpu::BufferAddress,
        step_mode: VertexStepMode::Vertex,
        attributes,
    }
}

pub fn mesh_layouts() -> [VertexBufferLayout<'static>; 4] {
    Attribute::ALL.map(block_layout)
}
