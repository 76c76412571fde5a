use std::ops::{Add, AddAssign, Mul, Sub};

/// x is the row (grows downward), y is the column (grows rightward).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Nearest grid cell, halves rounded away from zero.
    pub fn to_cell(self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, k: f64) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, o: Vec2) {
        self.x += o.x;
        self.y += o.y;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2, // arena units
    pub vel: Vec2, // arena units per second
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arena {
    pub width: u16,
    pub height: u16,
}

impl Arena {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box standing in for the ball during wall tests.
///
/// A terminal cell is roughly twice as tall as it is wide, so a ball of
/// `radius` rows spans `2 * radius` columns on each side of its center.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collider {
    pub height: u32,
    pub width: u32,
}

impl Collider {
    pub fn from_radius(radius: u16) -> Self {
        let r = radius as u32;
        Self {
            height: 2 * r + 1,
            width: 4 * r + 1,
        }
    }

    /// Real-valued half extents used by the collision tests.
    pub fn half_height(self) -> f64 {
        self.height as f64 / 2.0
    }

    pub fn half_width(self) -> f64 {
        self.width as f64 / 2.0
    }

    /// Whole cells on each side of the center covered by the raster box.
    pub fn cell_reach(self) -> (i64, i64) {
        ((self.height / 2) as i64, (self.width / 2) as i64)
    }

    pub fn fits_inside(self, arena: Arena) -> bool {
        self.height < arena.height as u32 && self.width < arena.width as u32
    }
}
