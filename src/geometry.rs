use std::ops::{Add, AddAssign, Mul, Sub};

/// 2D vector used for node positions and speeds.
///
/// Positions are in pixels, speeds in pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Width and height of a node. Only used for culling bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self::new(width, height)
    }
}

/// A position where each component is optional.
///
/// Used by [`Tree::set_absolute`](crate::Tree::set_absolute) to move a node along
/// one axis only.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PartialPosition {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl PartialPosition {
    pub fn x(x: f32) -> Self {
        Self {
            x: Some(x),
            y: None,
        }
    }

    pub fn y(y: f32) -> Self {
        Self {
            x: None,
            y: Some(y),
        }
    }

    pub fn xy(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

impl From<Vec2> for PartialPosition {
    fn from(v: Vec2) -> Self {
        Self::xy(v.x, v.y)
    }
}

/// Axis-aligned rectangle, top-left origin, +Y down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Vec2, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Half-open containment: `[min, max)`.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Whether `other` shares any area with this rect.
    ///
    /// Boxes that only touch an edge do not overlap. A zero-extent axis of `other` is
    /// treated as a point, so zero-sized boxes overlap when they lie inside (or on the
    /// top-left edge of) this rect.
    pub fn overlaps(&self, other: &Rect) -> bool {
        span_overlaps(self.x, self.width, other.x, other.width)
            && span_overlaps(self.y, self.height, other.y, other.height)
    }
}

fn span_overlaps(min: f32, len: f32, other_min: f32, other_len: f32) -> bool {
    if other_min >= min + len {
        return false;
    }
    if other_len > 0.0 {
        other_min + other_len > min
    } else {
        other_min >= min
    }
}
