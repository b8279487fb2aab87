mod capture;
mod compare;
pub mod fixtures;

pub use capture::{capture_scene, render_scene, CaptureConfig};
pub use compare::{compare_images, generate_diff_image, CompareResult};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualTestError {
    #[error("Failed to capture scene: {0}")]
    Capture(String),
    #[error("Failed to compare images: {0}")]
    Compare(String),
    #[error("Reference image not found: {0}")]
    ReferenceNotFound(PathBuf),
    #[error("Unknown fixture: {0}")]
    UnknownFixture(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, VisualTestError>;

/// Configuration for a visual test
#[derive(Clone)]
pub struct VisualTestConfig {
    /// Name of the fixture scene to render
    pub fixture_name: String,
    /// Similarity threshold (0.0 to 1.0, default 0.99)
    pub similarity_threshold: f64,
}

impl Default for VisualTestConfig {
    fn default() -> Self {
        Self {
            fixture_name: String::new(),
            similarity_threshold: 0.99,
        }
    }
}

/// Result of a visual test
pub struct VisualTestResult {
    /// Whether the test passed (similarity >= threshold)
    pub passed: bool,
    /// The similarity score (0.0 to 1.0)
    pub similarity: f64,
    /// Path to the captured image
    pub captured_path: PathBuf,
    /// Path to the reference image
    pub reference_path: PathBuf,
    /// Path to diff image (if generated on failure)
    pub diff_path: Option<PathBuf>,
}

/// Get the path to the references directory
pub fn references_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("references")
}

/// Get the path to a reference image for a fixture
pub fn reference_path(fixture_name: &str) -> PathBuf {
    references_dir().join(format!("{}.png", fixture_name))
}

/// Get the path to the output directory for test artifacts
pub fn output_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("output")
}

/// Get the path to a captured image
pub fn captured_path(fixture_name: &str) -> PathBuf {
    output_dir().join(format!("{}_captured.png", fixture_name))
}

/// Get the path to a diff image
pub fn diff_path(fixture_name: &str) -> PathBuf {
    output_dir().join(format!("{}_diff.png", fixture_name))
}

fn capture_fixture(fixture_name: &str, output_path: PathBuf) -> Result<()> {
    let mut fixture = fixtures::fixture(fixture_name)
        .ok_or_else(|| VisualTestError::UnknownFixture(fixture_name.to_string()))?;

    let capture_config = CaptureConfig {
        output_path,
        frames: fixture.frames,
        ..CaptureConfig::default()
    };
    capture_scene(&mut fixture.scene, &fixture.camera, &capture_config)
}

/// Run a visual regression test.
///
/// References are only written by [`update_reference`]; a missing one is an error.
pub fn run_visual_test(config: &VisualTestConfig) -> Result<VisualTestResult> {
    std::fs::create_dir_all(output_dir())?;

    let ref_path = reference_path(&config.fixture_name);
    let cap_path = captured_path(&config.fixture_name);

    if !ref_path.exists() {
        return Err(VisualTestError::ReferenceNotFound(ref_path));
    }

    capture_fixture(&config.fixture_name, cap_path.clone())?;

    let compare_result = compare_images(&ref_path, &cap_path)?;
    let passed = compare_result.similarity >= config.similarity_threshold;

    let diff = if !passed {
        let diff_file = diff_path(&config.fixture_name);
        generate_diff_image(&ref_path, &cap_path, &diff_file)?;
        Some(diff_file)
    } else {
        None
    };

    Ok(VisualTestResult {
        passed,
        similarity: compare_result.similarity,
        captured_path: cap_path,
        reference_path: ref_path,
        diff_path: diff,
    })
}

/// Re-render the reference image for a fixture
pub fn update_reference(fixture_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(references_dir())?;

    let ref_path = reference_path(fixture_name);
    capture_fixture(fixture_name, ref_path.clone())?;

    println!("Updated reference: {}", ref_path.display());
    Ok(ref_path)
}

/// Check if we're in update references mode
pub fn should_update_references() -> bool {
    std::env::var("UPDATE_REFERENCES").is_ok()
}
