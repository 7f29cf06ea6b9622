//! Byte layout of the combined vertex buffer.
//!
//! Attributes are stored as consecutive blocks, not interleaved per vertex:
//!
//! ```text
//! | position (V) | normal (N) | color (C) | tex_coord (T) |
//! 0              V            V+N         V+N+C           V+N+C+T
//! ```

use crate::surface::AttributeBinding;

const F32_SIZE: u64 = std::mem::size_of::<f32>() as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    Normal,
    Color,
    TexCoord,
}

impl Attribute {
    /// Upload order, which is also the order of the blocks in the buffer.
    pub const ALL: [Attribute; 4] = [
        Attribute::Position,
        Attribute::Normal,
        Attribute::Color,
        Attribute::TexCoord,
    ];

    pub const fn slot(self) -> u32 {
        match self {
            Attribute::Position => 0,
            Attribute::Normal => 1,
            Attribute::Color => 2,
            Attribute::TexCoord => 3,
        }
    }

    pub const fn components(self) -> u32 {
        match self {
            Attribute::Position | Attribute::Normal => 3,
            Attribute::Color => 4,
            Attribute::TexCoord => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Position => "position",
            Attribute::Normal => "normal",
            Attribute::Color => "color",
            Attribute::TexCoord => "tex_coord",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLayout {
    vertex_count: u64,
}

impl BufferLayout {
    pub const fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count: vertex_count as u64,
        }
    }

    pub const fn size_of(&self, attribute: Attribute) -> u64 {
        self.vertex_count * attribute.components() as u64 * F32_SIZE
    }

    pub const fn offset_of(&self, attribute: Attribute) -> u64 {
        match attribute {
            Attribute::Position => 0,
            Attribute::Normal => self.size_of(Attribute::Position),
            Attribute::Color => self.offset_of(Attribute::Normal) + self.size_of(Attribute::Normal),
            Attribute::TexCoord => {
                self.offset_of(Attribute::Color) + self.size_of(Attribute::Color)
            }
        }
    }

    pub const fn total_size(&self) -> u64 {
        self.offset_of(Attribute::TexCoord) + self.size_of(Attribute::TexCoord)
    }

    pub const fn binding(&self, attribute: Attribute) -> AttributeBinding {
        AttributeBinding {
            slot: attribute.slot(),
            components: attribute.components(),
            stride: 0,
            offset: self.offset_of(attribute),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_are_contiguous_and_ordered() {
        let layout = BufferLayout::new(24);

        let v = 24 * 3 * 4;
        let n = 24 * 3 * 4;
        let c = 24 * 4 * 4;
        let t = 24 * 2 * 4;

        assert_eq!(layout.offset_of(Attribute::Position), 0);
        assert_eq!(layout.offset_of(Attribute::Normal), v);
        assert_eq!(layout.offset_of(Attribute::Color), v + n);
        assert_eq!(layout.offset_of(Attribute::TexCoord), v + n + c);
        assert_eq!(layout.total_size(), v + n + c + t);
    }

    #[test]
    fn test_binding_slots() {
        let layout = BufferLayout::new(24);
        for (slot, attribute) in Attribute::ALL.into_iter().enumerate() {
            let binding = layout.binding(attribute);
            assert_eq!(binding.slot, slot as u32);
            assert_eq!(binding.stride, 0);
            assert_eq!(binding.offset, layout.offset_of(attribute));
        }
        assert_eq!(layout.binding(Attribute::Color).components, 4);
    }
}
