//! Turns a set of detections into the single record shown to the user.

use std::collections::HashMap;

use crate::models::{AnalysisResult, Detection, FoodQuantityEntry};
use crate::nutrition::{DEFAULT_NUTRITION, nutrition_for, unit_for};

pub const UNKNOWN_FOOD: &str = "Unknown Food";
pub const UNKNOWN_QUANTITY: &str = "Unknown quantity";

/// Units that never take a plural "s"
const INVARIANT_UNITS: &[&str] = &["oz", "fish"];

/// Pluralize a serving unit for the given count
pub fn pluralize_unit(unit: &str, count: u32) -> String {
    if count > 1 && !INVARIANT_UNITS.contains(&unit) {
        format!("{unit}s")
    } else {
        unit.to_string()
    }
}

/// Capitalize the first character of a class label ("hot dog" -> "Hot dog")
pub fn display_name(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Group, rank and describe detections, then attach the primary food's nutrition.
///
/// Never fails: an empty slice yields the "Unknown Food" result.
pub fn compose(detections: &[Detection]) -> AnalysisResult {
    // Buckets in first-seen order of their class label
    let mut order: Vec<&str> = Vec::new();
    let mut buckets: HashMap<&str, (u32, f32)> = HashMap::new();

    for detection in detections {
        let label = detection.class_label.as_str();
        match buckets.get_mut(label) {
            Some((count, best)) => {
                *count += 1;
                *best = best.max(detection.confidence);
            }
            None => {
                order.push(label);
                buckets.insert(label, (1, detection.confidence));
            }
        }
    }

    if order.is_empty() {
        return AnalysisResult {
            food_name: UNKNOWN_FOOD.to_string(),
            confidence: 0.0,
            quantity_description: UNKNOWN_QUANTITY.to_string(),
            food_quantities: Vec::new(),
            nutrition: DEFAULT_NUTRITION,
        };
    }

    let mut food_quantities: Vec<FoodQuantityEntry> = order
        .iter()
        .map(|label| {
            let (count, confidence) = buckets[label];
            FoodQuantityEntry {
                name: label.to_string(),
                display_name: display_name(label),
                quantity: count,
                unit: unit_for(label).to_string(),
                confidence,
            }
        })
        .collect();

    // Strict comparison keeps the first-seen class on ties
    let mut primary = &food_quantities[0];
    for entry in &food_quantities[1..] {
        if entry.confidence > primary.confidence {
            primary = entry;
        }
    }
    let primary_label = primary.name.clone();
    let food_name = primary.display_name.clone();
    let confidence = primary.confidence;

    // sort_by is stable, so equal confidences keep grouping order
    food_quantities.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let quantity_description = food_quantities
        .iter()
        .map(FoodQuantityEntry::describe)
        .collect::<Vec<_>>()
        .join(", ");

    AnalysisResult {
        food_name,
        confidence,
        quantity_description,
        food_quantities,
        nutrition: nutrition_for(&primary_label).clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize_unit() {
        assert_eq!(pluralize_unit("slice", 1), "slice");
        assert_eq!(pluralize_unit("slice", 3), "slices");
        assert_eq!(pluralize_unit("oz", 4), "oz");
        assert_eq!(pluralize_unit("fish", 2), "fish");
        assert_eq!(pluralize_unit("fillet", 2), "fillets");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("apple"), "Apple");
        assert_eq!(display_name("hot dog"), "Hot dog");
        assert_eq!(display_name(""), "");
    }
}
