//! Detector configuration

use std::path::{Path, PathBuf};

/// File name of the detection model inside the cache directory
pub const MODEL_FILE_NAME: &str = "coco-detector.rten";

/// Parameters for loading and running the detection model
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Path to the `.rten` detection model
    pub model_path: PathBuf,

    /// Minimum model score for a detection to be kept (default: 0.5)
    pub min_score: f32,

    /// Square input size the model expects (default: 640)
    pub input_size: u32,

    /// IoU above which same-class boxes are suppressed (default: 0.45)
    pub iou_threshold: f32,

    /// Upper bound on detections returned per image (default: 20)
    pub max_detections: usize,
}

impl DetectorConfig {
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            min_score: 0.5,
            input_size: 640,
            iou_threshold: 0.45,
            max_detections: 20,
        }
    }
}

/// `~/.cache/foodsnap/coco-detector.rten`, or a relative path when no home directory is set
pub fn default_model_path() -> PathBuf {
    match std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
        Ok(home) => Path::new(&home)
            .join(".cache/foodsnap")
            .join(MODEL_FILE_NAME),
        Err(_) => PathBuf::from(MODEL_FILE_NAME),
    }
}
