//! Shared-corner map: which vertex entries sit on the same geometric point.

use crate::geometry::{CORNER_COUNT, Corner, FACE_CORNERS, entry};

/// Every corner of the octahedron touches exactly four faces.
pub const FACES_PER_CORNER: usize = 4;

/// One appearance of a corner inside a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub face: usize,
    pub local: usize,
}

impl Occurrence {
    pub const fn entry(self) -> usize {
        entry(self.face, self.local)
    }
}

/// Corner → the four (face, local vertex) pairs that reference it, in face order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerMap {
    occurrences: [[Occurrence; FACES_PER_CORNER]; CORNER_COUNT],
}

impl CornerMap {
    pub fn new() -> Self {
        let placeholder = Occurrence { face: 0, local: 0 };
        let mut occurrences = [[placeholder; FACES_PER_CORNER]; CORNER_COUNT];
        let mut filled = [0usize; CORNER_COUNT];

        for (face, corners) in FACE_CORNERS.iter().enumerate() {
            for (local, corner) in corners.iter().enumerate() {
                let slot = corner.index();
                occurrences[slot][filled[slot]] = Occurrence { face, local };
                filled[slot] += 1;
            }
        }

        debug_assert!(filled.iter().all(|&n| n == FACES_PER_CORNER));

        Self { occurrences }
    }

    pub fn occurrences(&self, corner: Corner) -> &[Occurrence; FACES_PER_CORNER] {
        &self.occurrences[corner.index()]
    }

    /// Flat vertex-entry indices of `corner`.
    pub fn entries(&self, corner: Corner) -> [usize; FACES_PER_CORNER] {
        self.occurrences[corner.index()].map(Occurrence::entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Corner, &[Occurrence; FACES_PER_CORNER])> {
        Corner::ALL
            .into_iter()
            .map(move |corner| (corner, self.occurrences(corner)))
    }
}

impl Default for CornerMap {
    fn default() -> Self {
        Self::new()
    }
}
