pub mod coco;
pub mod mock;

use std::sync::Arc;

use image::DynamicImage;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::DetectorConfig;
use crate::error::DetectorError;
use crate::models::Detection;
use crate::nutrition;

pub use coco::{CocoModel, CocoModelLoader};
pub use mock::{MockDetector, generate_mock_detections};

/// Anything that can turn an image into food detections
///
/// Both the model-backed [`FoodDetector`] and the [`MockDetector`] implement
/// this, so callers can swap one for the other.
pub trait DetectionSource {
    fn detect(
        &self,
        image: &DynamicImage,
    ) -> impl Future<Output = Result<Vec<Detection>, DetectorError>>;
}

/// A loaded detection model
///
/// `predict` may report any class the model knows about; vocabulary
/// filtering happens in [`FoodDetector`].
pub trait ObjectModel: Send + Sync + 'static {
    fn predict(&self, image: &DynamicImage) -> Result<Vec<Detection>, DetectorError>;
}

/// Loads an [`ObjectModel`], usually from disk
pub trait ModelLoader {
    type Model: ObjectModel;

    fn load(&self) -> impl Future<Output = Result<Self::Model, DetectorError>>;
}

/// Food detector backed by a lazily loaded model
///
/// The model is loaded on first use and shared by every later call. Callers
/// that overlap with an in-flight load wait for it instead of starting their
/// own. A failed load is not remembered, so the next call tries again.
pub struct FoodDetector<L: ModelLoader> {
    loader: L,
    model: OnceCell<Arc<L::Model>>,
    min_score: f32,
}

impl FoodDetector<CocoModelLoader> {
    /// Detector using the bundled COCO model loader
    pub fn from_config(config: DetectorConfig) -> Self {
        let min_score = config.min_score;
        Self::new(CocoModelLoader::new(config)).with_min_score(min_score)
    }
}

impl<L: ModelLoader> FoodDetector<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
            min_score: DetectorConfig::default().min_score,
        }
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Whether the model has been loaded successfully
    pub fn is_initialized(&self) -> bool {
        self.model.initialized()
    }

    /// Load the model if needed and return the shared instance
    pub async fn initialize(&self) -> Result<Arc<L::Model>, DetectorError> {
        let model = self
            .model
            .get_or_try_init(|| async {
                info!("Loading detection model");
                let model = self.loader.load().await.map_err(|e| {
                    warn!(error = %e, "Detection model failed to load");
                    match e {
                        DetectorError::ModelUnavailable(msg) => {
                            DetectorError::ModelUnavailable(msg)
                        }
                        other => DetectorError::ModelUnavailable(other.to_string()),
                    }
                })?;
                info!("Detection model loaded");
                Ok::<_, DetectorError>(Arc::new(model))
            })
            .await?;

        Ok(Arc::clone(model))
    }

    /// Decode an encoded image (PNG, JPEG, ...) and detect food in it
    pub async fn detect_bytes(&self, bytes: &[u8]) -> Result<Vec<Detection>, DetectorError> {
        let image = image::load_from_memory(bytes)?;
        self.detect(&image).await
    }
}

impl<L: ModelLoader> DetectionSource for FoodDetector<L> {
    async fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>, DetectorError> {
        let model = self.initialize().await?;

        debug!(width = image.width(), height = image.height(), "Running inference");
        let input = image.clone();
        let raw = tokio::task::spawn_blocking(move || model.predict(&input))
            .await
            .map_err(|e| DetectorError::DetectionFailed(format!("inference task aborted: {e}")))??;

        Ok(retain_food(raw, self.min_score))
    }
}

/// Drop detections outside the food vocabulary or below `min_score`
pub fn retain_food(raw: Vec<Detection>, min_score: f32) -> Vec<Detection> {
    let total = raw.len();
    let food: Vec<Detection> = raw
        .into_iter()
        .filter(|d| nutrition::is_food(&d.class_label) && d.confidence >= min_score)
        .collect();

    if food.len() < total {
        debug!(kept = food.len(), dropped = total - food.len(), "Filtered non-food detections");
    }

    food
}
