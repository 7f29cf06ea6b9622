//! Circle / line-segment intersection in the plane.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersections {
    None,
    One(Vec2),
    Two(Vec2, Vec2),
}

impl Intersections {
    pub fn count(&self) -> usize {
        match self {
            Intersections::None => 0,
            Intersections::One(_) => 1,
            Intersections::Two(..) => 2,
        }
    }

    pub fn points(&self) -> Vec<Vec2> {
        match *self {
            Intersections::None => Vec::new(),
            Intersections::One(p) => vec![p],
            Intersections::Two(p, q) => vec![p, q],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Circle centered at `center` passing through `rim`.
    pub fn through(center: Vec2, rim: Vec2) -> Self {
        Self::new(center, center.distance(rim))
    }

    /// `segments` chords approximating the outline, as line-list endpoint pairs.
    pub fn outline(&self, segments: u32) -> Vec<Vec2> {
        let step = std::f32::consts::TAU / segments as f32;
        (0..segments)
            .flat_map(|i| {
                let (s0, c0) = (i as f32 * step).sin_cos();
                let (s1, c1) = ((i + 1) as f32 * step).sin_cos();
                [
                    self.center + self.radius * Vec2::new(c0, s0),
                    self.center + self.radius * Vec2::new(c1, s1),
                ]
            })
            .collect()
    }
}

/// Points where segment `a..b` meets the circle, ordered along the segment.
///
/// Uses `p(t) = a + t (b - a)` and keeps roots with `t` in `[0, 1]`.
/// A zero-length segment never intersects.
pub fn circle_segment(circle: &Circle, a: Vec2, b: Vec2) -> Intersections {
    let d = b - a;
    let f = a - circle.center;

    let qa = d.length_squared();
    if qa == 0.0 {
        return Intersections::None;
    }
    let qb = 2.0 * f.dot(d);
    let qc = f.length_squared() - circle.radius * circle.radius;

    let discriminant = qb * qb - 4.0 * qa * qc;
    let on_segment = |t: f32| (0.0..=1.0).contains(&t);

    if discriminant < 0.0 {
        Intersections::None
    } else if discriminant == 0.0 {
        let t = -qb / (2.0 * qa);
        if on_segment(t) {
            Intersections::One(a + t * d)
        } else {
            Intersections::None
        }
    } else {
        let root = discriminant.sqrt();
        let t1 = (-qb - root) / (2.0 * qa);
        let t2 = (-qb + root) / (2.0 * qa);

        match (on_segment(t1), on_segment(t2)) {
            (true, true) => Intersections::Two(a + t1 * d, a + t2 * d),
            (true, false) => Intersections::One(a + t1 * d),
            (false, true) => Intersections::One(a + t2 * d),
            (false, false) => Intersections::None,
        }
    }
}
