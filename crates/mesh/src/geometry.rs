//! Fixed geometry of the regular octahedron.
//!
//! Eight triangles between an apex at `(0, ±√2/2, 0)` and the four equator
//! points `(±0.5, 0, ±0.5)`. Faces never share vertex entries, so the mesh
//! has `8 × 3 = 24` entries and the index list is the identity.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec3;

pub const FACE_COUNT: usize = 8;
pub const VERTICES_PER_FACE: usize = 3;
pub const VERTEX_COUNT: usize = FACE_COUNT * VERTICES_PER_FACE;
pub const CORNER_COUNT: usize = 6;

/// Apex height above the equator plane.
pub const APEX_HEIGHT: f32 = FRAC_1_SQRT_2;

/// One of the six distinct points of the octahedron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    Top,
    FrontLeft,
    FrontRight,
    BackRight,
    BackLeft,
    Bottom,
}

impl Corner {
    pub const ALL: [Corner; CORNER_COUNT] = [
        Corner::Top,
        Corner::FrontLeft,
        Corner::FrontRight,
        Corner::BackRight,
        Corner::BackLeft,
        Corner::Bottom,
    ];

    pub const fn index(self) -> usize {
        match self {
            Corner::Top => 0,
            Corner::FrontLeft => 1,
            Corner::FrontRight => 2,
            Corner::BackRight => 3,
            Corner::BackLeft => 4,
            Corner::Bottom => 5,
        }
    }

    pub const fn position(self) -> [f32; 3] {
        match self {
            Corner::Top => [0.0, APEX_HEIGHT, 0.0],
            Corner::FrontLeft => [-0.5, 0.0, 0.5],
            Corner::FrontRight => [0.5, 0.0, 0.5],
            Corner::BackRight => [0.5, 0.0, -0.5],
            Corner::BackLeft => [-0.5, 0.0, -0.5],
            Corner::Bottom => [0.0, -APEX_HEIGHT, 0.0],
        }
    }
}

/// Corners of each face in vertex-entry order. Apex first.
///
/// Faces 0..4 are top front/right/left/back, faces 4..8 the same on the bottom.
pub const FACE_CORNERS: [[Corner; VERTICES_PER_FACE]; FACE_COUNT] = {
    use Corner::*;
    [
        [Top, FrontLeft, FrontRight],
        [Top, FrontRight, BackRight],
        [Top, BackLeft, FrontLeft],
        [Top, BackRight, BackLeft],
        [Bottom, FrontLeft, FrontRight],
        [Bottom, FrontRight, BackRight],
        [Bottom, BackLeft, FrontLeft],
        [Bottom, BackRight, BackLeft],
    ]
};

/// Texture coordinates of one top face; bottom faces mirror the apex to v = 0.
#[rustfmt::skip]
const ATLAS: [[[f32; 2]; VERTICES_PER_FACE]; 4] = [
    [[0.5, 1.0], [0.25, 0.5], [0.5, 0.5]],  // front
    [[0.5, 1.0], [0.5, 0.5],  [0.75, 0.5]], // right
    [[0.5, 1.0], [0.0, 0.5],  [0.25, 0.5]], // left
    [[0.5, 1.0], [0.75, 0.5], [1.0, 0.5]],  // back
];

/// Vertex entry index of `local` (0..3) within `face`.
pub const fn entry(face: usize, local: usize) -> usize {
    face * VERTICES_PER_FACE + local
}

pub fn positions() -> [[f32; 3]; VERTEX_COUNT] {
    let mut out = [[0.0; 3]; VERTEX_COUNT];
    for (face, corners) in FACE_CORNERS.iter().enumerate() {
        for (local, corner) in corners.iter().enumerate() {
            out[entry(face, local)] = corner.position();
        }
    }
    out
}

/// Outward unit normal of every face.
pub fn face_normal(face: usize) -> Vec3 {
    let [a, b, c] = FACE_CORNERS[face].map(|corner| Vec3::from(corner.position()));
    let normal = (b - a).cross(c - a).normalize();
    let centroid = (a + b + c) / 3.0;

    // Bottom faces are wound the other way round; flip towards the outside.
    if normal.dot(centroid) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// Face normals repeated for each of the face's three entries.
pub fn face_normals() -> [[f32; 3]; VERTEX_COUNT] {
    let mut out = [[0.0; 3]; VERTEX_COUNT];
    for face in 0..FACE_COUNT {
        let normal = face_normal(face).to_array();
        for local in 0..VERTICES_PER_FACE {
            out[entry(face, local)] = normal;
        }
    }
    out
}

pub fn tex_coords() -> [[f32; 2]; VERTEX_COUNT] {
    let mut out = [[0.0; 2]; VERTEX_COUNT];
    for face in 0..FACE_COUNT {
        let mut coords = ATLAS[face % 4];
        if face >= 4 {
            coords[0][1] = 0.0;
        }
        for (local, uv) in coords.into_iter().enumerate() {
            out[entry(face, local)] = uv;
        }
    }
    out
}

pub fn indices() -> [u16; VERTEX_COUNT] {
    std::array::from_fn(|i| i as u16)
}
