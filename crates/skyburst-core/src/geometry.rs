use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Width/height of an axis-aligned box centered on an entity's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    pub fn half_extents(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Rectangular playfield limits. Anything outside is off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vec2::new(0.0, 0.0),
            max: Vec2::new(1024.0, 768.0),
        }
    }
}

/// Circle-vs-box overlap. The box is centered on `center` with extents from `size`.
pub fn circle_overlaps_box(point: Vec2, radius: f32, center: Vec2, size: Size) -> bool {
    let half = size.half_extents();
    let closest = point.clamp(center - half, center + half);
    closest.distance_squared(point) <= radius * radius
}

/// Axis-aligned overlap between two centered boxes.
pub fn boxes_overlap(a: Vec2, a_size: Size, b: Vec2, b_size: Size) -> bool {
    let reach = a_size.half_extents() + b_size.half_extents();
    let gap = (a - b).abs();
    gap.x < reach.x && gap.y < reach.y
}

/// Point on a quadratic Bezier curve at parameter `t` in `[0, 1]`.
pub fn quadratic_point(start: Vec2, control: Vec2, end: Vec2, t: f32) -> Vec2 {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;
    start * (u * u) + control * (2.0 * u * t) + end * (t * t)
}

/// Approximate arc length of a quadratic Bezier by sampling `segments` chords.
pub fn quadratic_length(start: Vec2, control: Vec2, end: Vec2, segments: u32) -> f32 {
    let segments = segments.max(1);
    let mut length = 0.0;
    let mut prev = start;
    for i in 1..=segments {
        let p = quadratic_point(start, control, end, i as f32 / segments as f32);
        length += prev.distance(p);
        prev = p;
    }
    length
}
