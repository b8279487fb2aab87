use crate::{Result, VisualTestError};
use image::RgbaImage;
use sprig::prelude::*;
use std::path::PathBuf;

/// Configuration for rendering a fixture scene to a PNG
pub struct CaptureConfig {
    /// Path where the image will be saved
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Number of tick + render frames to run before capturing
    pub frames: u32,
    /// Frame delta in milliseconds
    pub delta_ms: f32,
    /// Scene buffer clear color
    pub background: Color,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::new(),
            width: 64,
            height: 48,
            frames: 1,
            delta_ms: 16.0,
            background: Color::BLACK,
        }
    }
}

/// Drive `scene` for `config.frames` frames and return the final picture.
///
/// The scene buffer is viewed through `camera` (scrolled by its origin) and the
/// overlay buffer is composited on top, the way a presenter would show it.
pub fn render_scene(scene: &mut Scene, camera: &Viewport, config: &CaptureConfig) -> RgbaImage {
    let mut buffer = PixelBuffer::filled(config.width, config.height, config.background);
    let mut overlay = PixelBuffer::new(config.width, config.height);

    for _ in 0..config.frames {
        buffer.clear(config.background);
        overlay.clear(Color::TRANSPARENT);

        let mut scrolled = Scrolled::new(&mut buffer, camera.origin());
        let frame = Frame::new(config.delta_ms, camera);
        scene.frame(&frame, &mut Targets::with_overlay(&mut scrolled, &mut overlay));
    }

    buffer.composite(&overlay);
    buffer.to_rgba_image()
}

/// Render a scene and save it to `config.output_path`.
pub fn capture_scene(scene: &mut Scene, camera: &Viewport, config: &CaptureConfig) -> Result<()> {
    let image = render_scene(scene, camera, config);

    if let Some(parent) = config.output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    image.save(&config.output_path)?;

    if !config.output_path.exists() {
        return Err(VisualTestError::Capture(format!(
            "Image was not created at {}",
            config.output_path.display()
        )));
    }

    log::debug!("Captured {}", config.output_path.display());
    Ok(())
}
