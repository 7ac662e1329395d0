use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use foodsnap::{BoundingBox, Detection, DetectorError, ModelLoader, ObjectModel};
use image::{DynamicImage, ImageBuffer, Rgb};

/// Creates a 100x100 red test image.
pub fn create_test_image() -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(100, 100, |_, _| Rgb([255u8, 0u8, 0u8])))
}

/// Writes the red test image to a temp PNG file and returns the file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image_file() -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    create_test_image()
        .save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Detection with a fixed box
pub fn det(label: &str, confidence: f32) -> Detection {
    Detection::new(label, confidence, BoundingBox::new(10.0, 10.0, 50.0, 50.0))
}

/// Model that always returns the same detections, or always fails
pub struct FakeModel {
    pub output: Result<Vec<Detection>, String>,
}

impl ObjectModel for FakeModel {
    fn predict(&self, _image: &DynamicImage) -> Result<Vec<Detection>, DetectorError> {
        self.output
            .clone()
            .map_err(DetectorError::DetectionFailed)
    }
}

/// Loader that counts how often it is asked to load
///
/// Fails the first `failures` loads, then succeeds.
pub struct CountingLoader {
    pub loads: Arc<AtomicUsize>,
    pub delay: Duration,
    pub failures: usize,
    pub output: Result<Vec<Detection>, String>,
}

impl CountingLoader {
    pub fn returning(output: Vec<Detection>) -> Self {
        Self {
            loads: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
            failures: 0,
            output: Ok(output),
        }
    }

    pub fn failing_inference(message: &str) -> Self {
        Self {
            output: Err(message.to_string()),
            ..Self::returning(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_failures(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }
}

impl ModelLoader for CountingLoader {
    type Model = FakeModel;

    async fn load(&self) -> Result<FakeModel, DetectorError> {
        let attempt = self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if attempt < self.failures {
            return Err(DetectorError::ModelUnavailable("weights not found".into()));
        }
        Ok(FakeModel {
            output: self.output.clone(),
        })
    }
}
