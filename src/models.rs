use serde::Serialize;

use crate::nutrition::NutritionRecord;

/// Axis-aligned box in source image pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Build from center coordinates, as YOLO-style heads emit them
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Intersection over union with another box
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let ix = (self.max_x().min(other.max_x()) - self.x.max(other.x)).max(0.0);
        let iy = (self.max_y().min(other.max_y()) - self.y.max(other.y)).max(0.0);
        let intersection = ix * iy;
        let union = self.area() + other.area() - intersection;

        if union <= 0.0 {
            return 0.0;
        }

        intersection / union
    }

    /// Scale coordinates and clamp them to an image of the given size
    pub fn rescale(&self, sx: f32, sy: f32, max_width: f32, max_height: f32) -> Self {
        let x = (self.x * sx).clamp(0.0, max_width);
        let y = (self.y * sy).clamp(0.0, max_height);
        let max_x = (self.max_x() * sx).clamp(0.0, max_width);
        let max_y = (self.max_y() * sy).clamp(0.0, max_height);
        Self {
            x,
            y,
            width: max_x - x,
            height: max_y - y,
        }
    }
}

/// One labeled, scored object found in an image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub class_label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(class_label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            class_label: class_label.into(),
            confidence,
            bbox,
        }
    }
}

/// Per-class summary of what was detected
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodQuantityEntry {
    pub name: String,
    pub display_name: String,
    pub quantity: u32,
    pub unit: String,
    pub confidence: f32,
}

impl FoodQuantityEntry {
    /// e.g. "2 slices of Pizza"
    pub fn describe(&self) -> String {
        format!(
            "{} {} of {}",
            self.quantity,
            crate::compose::pluralize_unit(&self.unit, self.quantity),
            self.display_name
        )
    }
}

/// The record handed to the display layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub food_name: String,
    pub confidence: f32,
    pub quantity_description: String,
    pub food_quantities: Vec<FoodQuantityEntry>,
    #[serde(flatten)]
    pub nutrition: NutritionRecord,
}
