//! Already-decoded bitmap sprites.
//!
//! A sprite is a row-major run of colors plus a row width. Decoding image files is the
//! caller's job; [`Sprite::from_rgba_image`] accepts an image that has already been
//! decoded with the `image` crate.

use image::RgbaImage;
use thiserror::Error;

use crate::color::Color;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpriteError {
    #[error("Sprite width must be greater than zero")]
    ZeroWidth,
    #[error("Pixel count {len} is not a multiple of sprite width {width}")]
    PartialRow { width: usize, len: usize },
}

/// Row-major bitmap. `pixels.len()` is always a multiple of `width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: usize,
    pixels: Vec<Color>,
}

impl Sprite {
    /// Create a sprite, rejecting data whose last row would be incomplete.
    pub fn new(width: usize, pixels: Vec<Color>) -> Result<Self, SpriteError> {
        if width == 0 {
            return Err(SpriteError::ZeroWidth);
        }
        if pixels.len() % width != 0 {
            return Err(SpriteError::PartialRow {
                width,
                len: pixels.len(),
            });
        }
        Ok(Self { width, pixels })
    }

    /// Create a sprite, dropping a partial trailing row instead of failing.
    pub fn truncated(width: usize, mut pixels: Vec<Color>) -> Result<Self, SpriteError> {
        if width == 0 {
            return Err(SpriteError::ZeroWidth);
        }
        let whole = pixels.len() - pixels.len() % width;
        if whole != pixels.len() {
            log::debug!(
                "Truncating sprite data from {} to {} pixels (width {})",
                pixels.len(),
                whole,
                width
            );
            pixels.truncate(whole);
        }
        Ok(Self { width, pixels })
    }

    /// A `width` x `height` block of one color.
    pub fn filled(width: usize, height: usize, color: Color) -> Result<Self, SpriteError> {
        Self::new(width, vec![color; width * height])
    }

    pub fn from_rgba_image(image: &RgbaImage) -> Result<Self, SpriteError> {
        let pixels = image.pixels().map(|p| Color::from_rgba8(p.0)).collect();
        Self::new(image.width() as usize, pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.pixels.len() / self.width
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Iterate `(col, row, color)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Color)> + '_ {
        let width = self.width;
        self.pixels.iter().enumerate().map(move |(i, &color)| {
            let row = i / width;
            let col = i - row * width;
            (col, row, color)
        })
    }
}
