pub mod analyzer;
pub mod compose;
pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod nutrition;

pub use analyzer::Analyzer;
pub use compose::{compose, display_name, pluralize_unit};
pub use config::DetectorConfig;
pub use detection::{
    DetectionSource, FoodDetector, MockDetector, ModelLoader, ObjectModel,
    generate_mock_detections,
};
pub use error::DetectorError;
pub use models::{AnalysisResult, BoundingBox, Detection, FoodQuantityEntry};
pub use nutrition::{DebloatRating, NutritionRecord};
