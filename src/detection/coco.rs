//! COCO object detector running on `rten`.
//!
//! Expects a YOLO-style export: one `[1, 3, S, S]` RGB input scaled to 0..1 and
//! one `[1, 4 + 80, N]` output holding center-format boxes followed by per-class
//! scores for each of the `N` anchors.

use image::DynamicImage;
use image::imageops::FilterType;
use rten::Model;
use rten_tensor::NdTensor;
use rten_tensor::prelude::*;
use tracing::debug;

use crate::config::DetectorConfig;
use crate::detection::{ModelLoader, ObjectModel};
use crate::error::DetectorError;
use crate::models::{BoundingBox, Detection};

/// COCO class names in model output order
pub const COCO_LABELS: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange",
    "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch", "potted plant",
    "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote", "keyboard", "cell phone",
    "microwave", "oven", "toaster", "sink", "refrigerator", "book", "clock", "vase", "scissors",
    "teddy bear", "hair drier", "toothbrush",
];

/// Number of box coordinates preceding the class scores
const BOX_ATTRS: usize = 4;

/// Loads a [`CocoModel`] from the configured model path
#[derive(Debug, Clone)]
pub struct CocoModelLoader {
    config: DetectorConfig,
}

impl CocoModelLoader {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }
}

impl ModelLoader for CocoModelLoader {
    type Model = CocoModel;

    async fn load(&self) -> Result<CocoModel, DetectorError> {
        let path = self.config.model_path.clone();
        if !path.exists() {
            return Err(DetectorError::ModelUnavailable(format!(
                "model file not found at {}",
                path.display()
            )));
        }

        debug!(path = %path.display(), "Reading detection model");
        let model = tokio::task::spawn_blocking(move || Model::load_file(&path))
            .await
            .map_err(|e| DetectorError::ModelUnavailable(format!("model load task aborted: {e}")))?
            .map_err(|e| DetectorError::ModelUnavailable(e.to_string()))?;

        Ok(CocoModel {
            model,
            config: self.config.clone(),
        })
    }
}

/// A loaded COCO detector
pub struct CocoModel {
    model: Model,
    config: DetectorConfig,
}

impl ObjectModel for CocoModel {
    fn predict(&self, image: &DynamicImage) -> Result<Vec<Detection>, DetectorError> {
        let size = self.config.input_size;
        let input = preprocess(image, size);

        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|e| DetectorError::DetectionFailed(e.to_string()))?;
        let output: NdTensor<f32, 3> = output.try_into().map_err(|_| {
            DetectorError::DetectionFailed("model output is not a float tensor".into())
        })?;

        let [batch, attrs, anchors] = output.shape();
        if batch != 1 || attrs != BOX_ATTRS + COCO_LABELS.len() {
            return Err(DetectorError::DetectionFailed(format!(
                "unexpected output shape [{batch}, {attrs}, {anchors}]"
            )));
        }

        let mut data = Vec::with_capacity(attrs * anchors);
        for a in 0..attrs {
            for i in 0..anchors {
                data.push(output[[0, a, i]]);
            }
        }

        let candidates = decode_predictions(&data, anchors, self.config.min_score);
        let mut kept = non_max_suppression(candidates, self.config.iou_threshold);
        kept.truncate(self.config.max_detections);

        let sx = image.width() as f32 / size as f32;
        let sy = image.height() as f32 / size as f32;
        let detections = kept
            .into_iter()
            .map(|c| {
                Detection::new(
                    COCO_LABELS[c.class_index],
                    c.score,
                    c.bbox.rescale(sx, sy, image.width() as f32, image.height() as f32),
                )
            })
            .collect::<Vec<_>>();

        debug!(count = detections.len(), "Model produced detections");
        Ok(detections)
    }
}

/// Resize to the model's square input and lay out as normalized NCHW
fn preprocess(image: &DynamicImage, size: u32) -> NdTensor<f32, 4> {
    let rgb = image::imageops::resize(&image.to_rgb8(), size, size, FilterType::Triangle);
    let plane = (size * size) as usize;
    let mut data = vec![0f32; 3 * plane];

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let offset = (y * size + x) as usize;
        for c in 0..3 {
            data[c * plane + offset] = pixel[c] as f32 / 255.0;
        }
    }

    NdTensor::from_data([1, 3, size as usize, size as usize], data)
}

/// A scored box before suppression, in model input coordinates
#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    class_index: usize,
    score: f32,
    bbox: BoundingBox,
}

/// Pick the best class for every anchor and keep those scoring at least `min_score`.
///
/// `data` is attribute-major: value `a` of anchor `i` lives at `a * anchors + i`.
fn decode_predictions(data: &[f32], anchors: usize, min_score: f32) -> Vec<Candidate> {
    if anchors == 0 || data.len() < (BOX_ATTRS + 1) * anchors {
        return Vec::new();
    }
    let at = |attr: usize, anchor: usize| data[attr * anchors + anchor];
    let classes = data.len() / anchors - BOX_ATTRS;

    (0..anchors)
        .filter_map(|i| {
            let (class_index, score) = (0..classes)
                .map(|c| (c, at(BOX_ATTRS + c, i)))
                .max_by(|a, b| a.1.total_cmp(&b.1))?;

            if score < min_score {
                return None;
            }

            Some(Candidate {
                class_index,
                score,
                bbox: BoundingBox::from_center(at(0, i), at(1, i), at(2, i), at(3, i)),
            })
        })
        .collect()
}

/// Greedy per-class suppression, highest score first
fn non_max_suppression(mut candidates: Vec<Candidate>, iou_threshold: f32) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        let overlaps = kept.iter().any(|k| {
            k.class_index == candidate.class_index && k.bbox.iou(&candidate.bbox) > iou_threshold
        });
        if !overlaps {
            kept.push(candidate);
        }
    }

    kept
}
