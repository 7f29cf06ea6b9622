//! Vertex normals from face normals over the shared-corner map.

use glam::Vec3;

use crate::corners::{CornerMap, FACES_PER_CORNER};
use crate::geometry::VERTEX_COUNT;

/// How the face normals meeting at a corner are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NormalAveraging {
    /// Arithmetic mean, left at its natural length (≈0.577 on this mesh).
    /// Matches the reference renders.
    #[default]
    Mean,
    /// Arithmetic mean scaled back to unit length.
    Renormalized,
}

impl NormalAveraging {
    pub fn toggled(self) -> Self {
        match self {
            NormalAveraging::Mean => NormalAveraging::Renormalized,
            NormalAveraging::Renormalized => NormalAveraging::Mean,
        }
    }
}

/// Average the face normals of the four entries on each corner and write the
/// result to all four of them.
///
/// Deterministic: the same input always yields bit-identical output.
pub fn compute_vertex_normals(
    face_normals: &[[f32; 3]; VERTEX_COUNT],
    corners: &CornerMap,
    averaging: NormalAveraging,
) -> [[f32; 3]; VERTEX_COUNT] {
    let mut out = [[0.0; 3]; VERTEX_COUNT];

    for (_, occurrences) in corners.iter() {
        let sum = occurrences
            .iter()
            .fold(Vec3::ZERO, |acc, o| acc + Vec3::from(face_normals[o.entry()]));
        let mean = sum / FACES_PER_CORNER as f32;

        let normal = match averaging {
            NormalAveraging::Mean => mean,
            NormalAveraging::Renormalized => mean.normalize_or_zero(),
        };

        for occurrence in occurrences {
            out[occurrence.entry()] = normal.to_array();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Corner, face_normals};

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_apex_mean_points_straight_up() {
        let normals =
            compute_vertex_normals(&face_normals(), &CornerMap::new(), NormalAveraging::Mean);
        let expected = Vec3::new(0.0, 1.0 / 3.0_f32.sqrt(), 0.0);

        for index in [0, 3, 6, 9] {
            assert!(Vec3::from(normals[index]).abs_diff_eq(expected, EPSILON));
        }
    }

    #[test]
    fn test_equator_mean_is_not_unit_length() {
        let map = CornerMap::new();
        let normals = compute_vertex_normals(&face_normals(), &map, NormalAveraging::Mean);

        let b = 2.0_f32.sqrt() / 3.0_f32.sqrt();
        let expected = Vec3::new(-b / 2.0, 0.0, b / 2.0);
        for index in map.entries(Corner::FrontLeft) {
            let normal = Vec3::from(normals[index]);
            assert!(normal.abs_diff_eq(expected, EPSILON));
            assert!((normal.length() - 1.0 / 3.0_f32.sqrt()).abs() < EPSILON);
        }
    }

    #[test]
    fn test_renormalized_is_unit_length() {
        let normals = compute_vertex_normals(
            &face_normals(),
            &CornerMap::new(),
            NormalAveraging::Renormalized,
        );

        for normal in normals {
            assert!((Vec3::from(normal).length() - 1.0).abs() < EPSILON);
        }
        assert!(Vec3::from(normals[12]).abs_diff_eq(Vec3::NEG_Y, EPSILON));
    }

    #[test]
    fn test_toggled() {
        assert_eq!(NormalAveraging::Mean.toggled(), NormalAveraging::Renormalized);
        assert_eq!(NormalAveraging::Renormalized.toggled(), NormalAveraging::Mean);
    }
}
