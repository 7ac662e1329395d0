//! Randomized stand-in for the model-backed detector.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use image::DynamicImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::detection::DetectionSource;
use crate::error::DetectorError;
use crate::models::{BoundingBox, Detection};
use crate::nutrition;

/// Frame the mock boxes are placed in
const FRAME_WIDTH: f32 = 640.0;
const FRAME_HEIGHT: f32 = 480.0;

/// Confidence band for mock detections
pub const MOCK_CONFIDENCE_MIN: f32 = 0.85;
pub const MOCK_CONFIDENCE_MAX: f32 = 0.98;

/// Generate plausible detections for one or several food types.
///
/// A coin flip picks one food type or two to three distinct ones, drawn from
/// the foods that have nutrition facts. Each type gets one to three
/// detections sharing a confidence in `[0.85, 0.98)`.
pub fn generate_mock_detections<R: Rng + ?Sized>(rng: &mut R) -> Vec<Detection> {
    let candidates: Vec<&str> = nutrition::labels_with_nutrition().collect();

    let kinds = if rng.random_bool(0.5) {
        rng.random_range(2..=3)
    } else {
        1
    };

    let mut detections = Vec::new();
    for index in rand::seq::index::sample(rng, candidates.len(), kinds) {
        let label = candidates[index];
        let count = rng.random_range(1..=3);
        let confidence = rng.random_range(MOCK_CONFIDENCE_MIN..MOCK_CONFIDENCE_MAX);

        for _ in 0..count {
            detections.push(Detection::new(label, confidence, random_box(rng)));
        }
    }

    detections
}

fn random_box<R: Rng + ?Sized>(rng: &mut R) -> BoundingBox {
    let width = rng.random_range(60.0..200.0);
    let height = rng.random_range(60.0..200.0);
    BoundingBox::new(
        rng.random_range(0.0..FRAME_WIDTH - width),
        rng.random_range(0.0..FRAME_HEIGHT - height),
        width,
        height,
    )
}

/// [`DetectionSource`] that ignores the image and returns mock detections
pub struct MockDetector {
    rng: Mutex<StdRng>,
    delay: Duration,
}

impl MockDetector {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Reproducible detector for tests and demos
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            delay: Duration::ZERO,
        }
    }

    /// Simulate model latency before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for MockDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionSource for MockDetector {
    async fn detect(&self, _image: &DynamicImage) -> Result<Vec<Detection>, DetectorError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let detections = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            generate_mock_detections(&mut *rng)
        };

        debug!(count = detections.len(), "Generated mock detections");
        Ok(detections)
    }
}
