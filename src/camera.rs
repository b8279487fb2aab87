use crate::geometry::{Rect, Size, Vec2};

/// Visibility test against the current view.
///
/// The traversals only ever ask one question of a camera: does a box at this absolute
/// position with this size fall inside the view? Projection and scrolling belong to
/// the implementor.
pub trait Camera {
    fn in_bound(&self, position: Vec2, size: Size) -> bool;
}

impl<F> Camera for F
where
    F: Fn(Vec2, Size) -> bool,
{
    fn in_bound(&self, position: Vec2, size: Size) -> bool {
        self(position, size)
    }
}

/// A rectangular window onto the scene, in absolute scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub rect: Rect,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }

    pub fn origin(&self) -> Vec2 {
        self.rect.origin()
    }

    /// Move the viewport so its top-left corner sits at `origin`.
    pub fn scroll_to(&mut self, origin: Vec2) {
        self.rect.x = origin.x;
        self.rect.y = origin.y;
    }

    /// Move the viewport so `target` sits at its centre.
    pub fn center_on(&mut self, target: Vec2) {
        self.rect.x = target.x - self.rect.width / 2.0;
        self.rect.y = target.y - self.rect.height / 2.0;
    }
}

impl Camera for Viewport {
    fn in_bound(&self, position: Vec2, size: Size) -> bool {
        self.rect.overlaps(&Rect::from_origin_size(position, size))
    }
}

/// Camera that never culls anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Camera for Unbounded {
    fn in_bound(&self, _position: Vec2, _size: Size) -> bool {
        true
    }
}
