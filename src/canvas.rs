//! Node-local pixel addressing.
//!
//! During a render pass every node sees a [`Canvas`] whose `(0, 0)` is the node's own
//! position. The canvas holds the chain of local offsets from the node that bound the
//! current buffer down to the node being drawn, and composes them on every write, one
//! level at a time, the same way nested pixel-setter closures would.

use crate::color::Color;
use crate::geometry::Vec2;
use crate::pixels::{DrawTarget, PixelSink};
use crate::sprite::Sprite;

/// Where rounding to the pixel grid happens while composing offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelRounding {
    /// Round after adding each ancestor's offset. Fractional positions can drift by a
    /// pixel per level, but every level lands on the grid.
    #[default]
    PerLevel,
    /// Sum all offsets first and round once at the buffer.
    AtTarget,
}

/// Round half up, matching the usual pixel-snapping convention (`-0.5` goes to `0`).
fn snap(v: f32) -> f32 {
    (v + 0.5).floor()
}

/// Pixel setter relative to the node being drawn.
pub struct Canvas<'a> {
    sink: &'a mut dyn PixelSink,
    offsets: &'a [Vec2],
    rounding: PixelRounding,
    target: DrawTarget,
}

impl<'a> Canvas<'a> {
    /// `offsets` runs from the outermost composing node to the node being drawn.
    pub fn new(
        sink: &'a mut dyn PixelSink,
        offsets: &'a [Vec2],
        rounding: PixelRounding,
        target: DrawTarget,
    ) -> Self {
        Self {
            sink,
            offsets,
            rounding,
            target,
        }
    }

    pub fn target(&self) -> DrawTarget {
        self.target
    }

    /// Unrounded buffer coordinate of this canvas' `(0, 0)`.
    pub fn origin(&self) -> Vec2 {
        self.offsets.iter().fold(Vec2::ZERO, |acc, &o| acc + o)
    }

    /// Map a node-local coordinate to a buffer coordinate.
    pub fn compose(&self, x: f32, y: f32) -> (i32, i32) {
        let (x, y) = match self.rounding {
            PixelRounding::PerLevel => {
                self.offsets
                    .iter()
                    .rev()
                    .fold((x, y), |(x, y), o| (snap(o.x + x), snap(o.y + y)))
            }
            PixelRounding::AtTarget => {
                let origin = self.origin();
                (origin.x + x, origin.y + y)
            }
        };
        (snap(x) as i32, snap(y) as i32)
    }

    pub fn set_pixel(&mut self, x: f32, y: f32, color: Color) {
        let (x, y) = self.compose(x, y);
        self.sink.set_pixel(x, y, color);
    }

    /// Blit `sprite` with its top-left corner at this canvas' origin.
    pub fn draw_sprite(&mut self, sprite: &Sprite) {
        for (col, row, color) in sprite.iter() {
            self.set_pixel(col as f32, row as f32, color);
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: u32, height: u32, color: Color) {
        for row in 0..height {
            for col in 0..width {
                self.set_pixel(x + col as f32, y + row as f32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Color = Color(0xFF00_000A);
    const B: Color = Color(0xFF00_000B);
    const C: Color = Color(0xFF00_000C);
    const D: Color = Color(0xFF00_000D);

    fn record(
        offsets: &[Vec2],
        rounding: PixelRounding,
        f: impl FnOnce(&mut Canvas<'_>),
    ) -> Vec<(i32, i32, Color)> {
        let mut calls = Vec::new();
        {
            let mut sink = |x: i32, y: i32, c: Color| calls.push((x, y, c));
            let mut canvas = Canvas::new(&mut sink, offsets, rounding, DrawTarget::Scene);
            f(&mut canvas);
        }
        calls
    }

    #[test]
    fn test_snap_matches_half_up() {
        assert_eq!(snap(0.5), 1.0);
        assert_eq!(snap(1.4), 1.0);
        assert_eq!(snap(-0.5), 0.0);
        assert_eq!(snap(-1.6), -2.0);
    }

    #[test]
    fn test_single_level_offset() {
        let calls = record(&[Vec2::new(10.0, 20.0)], PixelRounding::PerLevel, |c| {
            c.set_pixel(1.0, 2.0, A)
        });
        assert_eq!(calls, vec![(11, 22, A)]);
    }

    #[test]
    fn test_nested_offsets_accumulate() {
        let offsets = [Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0)];
        let calls = record(&offsets, PixelRounding::PerLevel, |c| c.set_pixel(0.0, 0.0, A));
        assert_eq!(calls, vec![(6, 6, A)]);
    }

    #[test]
    fn test_per_level_rounding_drifts() {
        // 0.5 + 0.5 + 0.5: per level gives 1, 2, 3; once at the end gives round(1.5) = 2.
        let offsets = [Vec2::new(0.5, 0.0), Vec2::new(0.5, 0.0), Vec2::new(0.5, 0.0)];
        let per_level = record(&offsets, PixelRounding::PerLevel, |c| c.set_pixel(0.0, 0.0, A));
        let at_target = record(&offsets, PixelRounding::AtTarget, |c| c.set_pixel(0.0, 0.0, A));
        assert_eq!(per_level, vec![(3, 0, A)]);
        assert_eq!(at_target, vec![(2, 0, A)]);
    }

    #[test]
    fn test_draw_sprite_row_major() {
        let sprite = Sprite::new(2, vec![A, B, C, D]).unwrap();
        let calls = record(&[Vec2::new(10.0, 20.0)], PixelRounding::PerLevel, |c| {
            c.draw_sprite(&sprite)
        });
        assert_eq!(calls, vec![(10, 20, A), (11, 20, B), (10, 21, C), (11, 21, D)]);
    }

    #[test]
    fn test_fill_rect() {
        let calls = record(&[Vec2::new(5.0, 5.0)], PixelRounding::PerLevel, |c| {
            c.fill_rect(0.0, 0.0, 2, 1, A)
        });
        assert_eq!(calls, vec![(5, 5, A), (6, 5, A)]);
    }

    #[test]
    fn test_origin_sums_offsets() {
        let mut sink = |_: i32, _: i32, _: Color| {};
        let offsets = [Vec2::new(1.5, 2.0), Vec2::new(2.0, -1.0)];
        let canvas = Canvas::new(&mut sink, &offsets, PixelRounding::PerLevel, DrawTarget::Overlay);
        assert_eq!(canvas.origin(), Vec2::new(3.5, 1.0));
        assert_eq!(canvas.target(), DrawTarget::Overlay);
    }
}
