//! Pixel buffers the render traversal paints into.
//!
//! The core only needs [`PixelSink::set_pixel`]. [`PixelBuffer`] is a simple owned
//! implementation used by the demos and the visual tests; engines with their own
//! framebuffer implement the trait directly.

use image::RgbaImage;

use crate::color::Color;
use crate::geometry::Vec2;
use crate::node::RenderMode;

/// Anything that accepts individual pixel writes in integer buffer coordinates.
pub trait PixelSink {
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);
}

impl<F> PixelSink for F
where
    F: FnMut(i32, i32, Color),
{
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self(x, y, color)
    }
}

/// Fixed-size row-major color buffer.
///
/// Writes outside the buffer are ignored. Fully transparent colors are skipped so
/// sprites can carry holes; anything else overwrites the destination.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Paint `top` over this buffer, skipping its transparent pixels.
    ///
    /// Used to flatten the overlay buffer onto the scene buffer for presentation.
    pub fn composite(&mut self, top: &PixelBuffer) {
        for y in 0..top.height.min(self.height) {
            for x in 0..top.width.min(self.width) {
                let color = top.pixels[y as usize * top.width as usize + x as usize];
                self.set_pixel(x as i32, y as i32, color);
            }
        }
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width, self.height);
        for (pixel, color) in image.pixels_mut().zip(&self.pixels) {
            pixel.0 = color.to_rgba8();
        }
        image
    }
}

impl PixelSink for PixelBuffer {
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if color.is_transparent() {
            return;
        }
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }
}

/// Shifts writes by a camera origin, mapping scene coordinates to screen coordinates.
///
/// The traversals never apply the camera themselves; wrap the scene buffer in this when
/// the camera has scrolled.
pub struct Scrolled<'a> {
    inner: &'a mut dyn PixelSink,
    dx: i32,
    dy: i32,
}

impl<'a> Scrolled<'a> {
    pub fn new(inner: &'a mut dyn PixelSink, origin: Vec2) -> Self {
        Self {
            inner,
            dx: (origin.x + 0.5).floor() as i32,
            dy: (origin.y + 0.5).floor() as i32,
        }
    }
}

impl PixelSink for Scrolled<'_> {
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.inner.set_pixel(x - self.dx, y - self.dy, color);
    }
}

/// Which buffer a node paints into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTarget {
    /// Camera-relative scene buffer.
    Scene,
    /// Screen-fixed overlay (HUD) buffer.
    Overlay,
}

impl DrawTarget {
    /// Resolve the target for a node.
    ///
    /// Overlay nodes always rebind to the overlay buffer. Camera-relative nodes keep
    /// painting wherever their parent painted.
    pub fn resolve(mode: RenderMode, inherited: DrawTarget) -> DrawTarget {
        match mode {
            RenderMode::Overlay => DrawTarget::Overlay,
            RenderMode::CameraRelative => inherited,
        }
    }
}

/// The buffers available to one render pass.
pub struct Targets<'a> {
    pub scene: &'a mut dyn PixelSink,
    pub overlay: Option<&'a mut dyn PixelSink>,
}

impl<'a> Targets<'a> {
    pub fn new(scene: &'a mut dyn PixelSink) -> Self {
        Self {
            scene,
            overlay: None,
        }
    }

    pub fn with_overlay(scene: &'a mut dyn PixelSink, overlay: &'a mut dyn PixelSink) -> Self {
        Self {
            scene,
            overlay: Some(overlay),
        }
    }

    /// The sink for `target`. Without an overlay buffer, overlay writes land in the scene.
    pub fn sink(&mut self, target: DrawTarget) -> &mut dyn PixelSink {
        match target {
            DrawTarget::Overlay => match self.overlay {
                Some(ref mut overlay) => &mut **overlay,
                None => &mut *self.scene,
            },
            DrawTarget::Scene => &mut *self.scene,
        }
    }
}
