//! Per-face colors, either a palette or a single override color.

use crate::error::MeshError;
use crate::geometry::{FACE_COUNT, VERTEX_COUNT, VERTICES_PER_FACE};

pub type Rgba = [f32; 4];

pub const RED: Rgba = [1.0, 0.0, 0.0, 1.0];
pub const YELLOW: Rgba = [1.0, 1.0, 0.0, 1.0];
pub const CYAN: Rgba = [0.0, 1.0, 1.0, 1.0];
pub const MAGENTA: Rgba = [1.0, 0.0, 1.0, 1.0];

/// Front, right, left, back on the top half, repeated on the bottom half.
pub const DEFAULT_PALETTE: [Rgba; FACE_COUNT] =
    [RED, YELLOW, CYAN, MAGENTA, RED, YELLOW, CYAN, MAGENTA];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorScheme {
    Palette([Rgba; FACE_COUNT]),
    Uniform(Rgba),
}

impl ColorScheme {
    /// One color per face, in face order.
    pub fn with_palette(colors: &[Rgba]) -> Result<Self, MeshError> {
        let palette: [Rgba; FACE_COUNT] =
            colors.try_into().map_err(|_| MeshError::InvalidPalette {
                expected: FACE_COUNT,
                actual: colors.len(),
            })?;
        Ok(ColorScheme::Palette(palette))
    }

    pub fn with_uniform_color(color: Rgba) -> Self {
        ColorScheme::Uniform(color)
    }

    pub fn face_color(&self, face: usize) -> Rgba {
        match self {
            ColorScheme::Palette(palette) => palette[face],
            ColorScheme::Uniform(color) => *color,
        }
    }

    /// Expand to one color per vertex entry.
    pub fn expand(&self) -> [Rgba; VERTEX_COUNT] {
        std::array::from_fn(|entry| self.face_color(entry / VERTICES_PER_FACE))
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::Palette(DEFAULT_PALETTE)
    }
}

impl From<Option<Rgba>> for ColorScheme {
    fn from(color: Option<Rgba>) -> Self {
        color.map_or_else(ColorScheme::default, ColorScheme::Uniform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_requires_eight_colors() {
        let err = ColorScheme::with_palette(&[RED, CYAN]).unwrap_err();
        assert!(matches!(
            err,
            MeshError::InvalidPalette {
                expected: 8,
                actual: 2
            }
        ));
        assert!(ColorScheme::with_palette(&DEFAULT_PALETTE).is_ok());
    }

    #[test]
    fn test_expand_repeats_face_color() {
        let colors = ColorScheme::default().expand();
        assert_eq!(colors[0], RED);
        assert_eq!(colors[2], RED);
        assert_eq!(colors[3], YELLOW);
        assert_eq!(colors[11], MAGENTA);
        assert_eq!(colors[21], MAGENTA);
    }

    #[test]
    fn test_option_override() {
        let green = [0.0, 1.0, 0.0, 1.0];
        assert_eq!(ColorScheme::from(Some(green)), ColorScheme::Uniform(green));
        assert_eq!(ColorScheme::from(None), ColorScheme::default());
    }
}
