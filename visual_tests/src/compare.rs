use crate::{Result, VisualTestError};
use image::{Rgba, RgbaImage};
use image_compare::Algorithm;
use std::path::Path;

/// Result of comparing a captured image against its reference
pub struct CompareResult {
    /// SSIM score from 0.0 to 1.0
    pub similarity: f64,
    /// Number of pixels whose RGBA value differs at all
    pub differing_pixels: usize,
}

fn load_pair(reference: &Path, captured: &Path) -> Result<(RgbaImage, RgbaImage)> {
    let ref_img = image::open(reference)?.to_rgba8();
    let cap_img = image::open(captured)?.to_rgba8();

    if ref_img.dimensions() != cap_img.dimensions() {
        return Err(VisualTestError::Compare(format!(
            "Image dimensions don't match: reference {:?} vs captured {:?}",
            ref_img.dimensions(),
            cap_img.dimensions()
        )));
    }
    Ok((ref_img, cap_img))
}

/// Compare two images with SSIM.
///
/// Pixel-exact matches short-circuit to a score of 1.0.
pub fn compare_images(reference: &Path, captured: &Path) -> Result<CompareResult> {
    let (ref_img, cap_img) = load_pair(reference, captured)?;

    let differing_pixels = ref_img
        .pixels()
        .zip(cap_img.pixels())
        .filter(|(a, b)| a != b)
        .count();
    if differing_pixels == 0 {
        return Ok(CompareResult {
            similarity: 1.0,
            differing_pixels,
        });
    }

    let ref_rgb = image::DynamicImage::ImageRgba8(ref_img).to_rgb8();
    let cap_rgb = image::DynamicImage::ImageRgba8(cap_img).to_rgb8();
    let result =
        image_compare::rgb_similarity_structure(&Algorithm::MSSIMSimple, &ref_rgb, &cap_rgb)
            .map_err(|e| VisualTestError::Compare(format!("SSIM comparison failed: {}", e)))?;

    log::debug!(
        "{} differing pixels, SSIM {:.5}",
        differing_pixels,
        result.score
    );
    Ok(CompareResult {
        similarity: result.score,
        differing_pixels,
    })
}

/// Write an image that marks every differing pixel in magenta over a dimmed capture.
pub fn generate_diff_image(reference: &Path, captured: &Path, output: &Path) -> Result<()> {
    let (ref_img, cap_img) = load_pair(reference, captured)?;

    let diff_img = RgbaImage::from_fn(ref_img.width(), ref_img.height(), |x, y| {
        let cap_pixel = cap_img.get_pixel(x, y);
        if ref_img.get_pixel(x, y) != cap_pixel {
            Rgba([0xFF, 0x00, 0xFF, 0xFF])
        } else {
            let [r, g, b, _] = cap_pixel.0;
            Rgba([r / 3, g / 3, b / 3, 0xFF])
        }
    });

    diff_img.save(output)?;
    Ok(())
}
