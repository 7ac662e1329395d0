use image::DynamicImage;
use tracing::{debug, warn};

use crate::compose::compose;
use crate::detection::{DetectionSource, MockDetector};
use crate::error::DetectorError;
use crate::models::AnalysisResult;

/// Runs a detection source and composes its output into an [`AnalysisResult`]
pub struct Analyzer<S> {
    source: S,
    fallback: Option<MockDetector>,
}

impl<S: DetectionSource> Analyzer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            fallback: None,
        }
    }

    /// Answer with mock detections when the source fails instead of erroring
    pub fn with_mock_fallback(mut self, mock: MockDetector) -> Self {
        self.fallback = Some(mock);
        self
    }

    /// Detect food in an image and build the result record
    pub async fn analyze(&self, image: &DynamicImage) -> Result<AnalysisResult, DetectorError> {
        let detections = match self.source.detect(image).await {
            Ok(detections) => detections,
            Err(e) => match &self.fallback {
                Some(mock) => {
                    warn!(error = %e, "Detection failed, using mock detections");
                    mock.detect(image).await?
                }
                None => return Err(e),
            },
        };

        debug!(count = detections.len(), "Composing analysis result");
        Ok(compose(&detections))
    }

    /// Decode an encoded image and analyze it
    pub async fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisResult, DetectorError> {
        let image = image::load_from_memory(bytes)?;
        self.analyze(&image).await
    }
}
