//! Static food vocabulary, serving units and nutrition facts.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

/// Class labels the detector is allowed to report
pub const FOOD_CATEGORIES: &[&str] = &[
    "apple", "banana", "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake",
    "sandwich", "salad", "bread", "chicken", "rice", "pasta", "beef", "fish", "egg", "avocado",
    "tomato",
];

/// Unit used when a class has no entry in the unit table
pub const DEFAULT_UNIT: &str = "serving";

const FOOD_UNITS: &[(&str, &str)] = &[
    ("apple", "whole"),
    ("banana", "whole"),
    ("orange", "whole"),
    ("broccoli", "cup"),
    ("carrot", "whole"),
    ("hot dog", "whole"),
    ("pizza", "slice"),
    ("donut", "whole"),
    ("cake", "slice"),
    ("sandwich", "whole"),
    ("salad", "bowl"),
    ("bread", "slice"),
    ("chicken", "piece"),
    ("rice", "cup"),
    ("pasta", "cup"),
    ("beef", "oz"),
    ("fish", "fillet"),
    ("egg", "whole"),
    ("avocado", "whole"),
    ("tomato", "whole"),
];

/// Nutrition facts for one serving of a food class
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    pub calories: f32,
    pub protein: f32,
    pub carbs: f32,
    pub fat: f32,
    pub fiber: f32,
    pub sugar: f32,
    pub vitamins: &'static [&'static str],
    pub minerals: &'static [&'static str],
    pub saturated_fat: f32,
    pub trans_fat: f32,
    pub cholesterol: f32,
    pub sodium: f32,
    pub potassium: f32,
    pub glycemic_index: Option<u32>,
    pub allergens: &'static [&'static str],
    pub processed_level: &'static str,
    pub additives: &'static [&'static str],
    pub anti_inflammatory: &'static [&'static str],
    pub antioxidants: &'static [&'static str],
}

/// Record used for any class missing from the table
pub const DEFAULT_NUTRITION: NutritionRecord = NutritionRecord {
    calories: 250.0,
    protein: 12.0,
    carbs: 30.0,
    fat: 10.0,
    fiber: 3.0,
    sugar: 5.0,
    vitamins: &["A", "C"],
    minerals: &["Iron", "Calcium"],
    saturated_fat: 3.0,
    trans_fat: 0.0,
    cholesterol: 15.0,
    sodium: 300.0,
    potassium: 250.0,
    glycemic_index: Some(50),
    allergens: &[],
    processed_level: "Minimally Processed",
    additives: &[],
    anti_inflammatory: &["Omega-3", "Polyphenols"],
    antioxidants: &["Vitamin C", "Vitamin E"],
};

const NUTRITION_TABLE: &[(&str, NutritionRecord)] = &[
    (
        "apple",
        NutritionRecord {
            calories: 95.0,
            protein: 0.5,
            carbs: 25.0,
            fat: 0.3,
            fiber: 4.0,
            sugar: 19.0,
            vitamins: &["C", "K"],
            minerals: &["Potassium"],
            saturated_fat: 0.1,
            trans_fat: 0.0,
            cholesterol: 0.0,
            sodium: 2.0,
            potassium: 195.0,
            glycemic_index: Some(36),
            allergens: &[],
            processed_level: "Unprocessed",
            additives: &[],
            anti_inflammatory: &["Quercetin", "Catechin"],
            antioxidants: &["Vitamin C", "Polyphenols"],
        },
    ),
    (
        "banana",
        NutritionRecord {
            calories: 105.0,
            protein: 1.3,
            carbs: 27.0,
            fat: 0.4,
            fiber: 3.1,
            sugar: 14.0,
            vitamins: &["B6", "C"],
            minerals: &["Potassium", "Magnesium"],
            saturated_fat: 0.1,
            trans_fat: 0.0,
            cholesterol: 0.0,
            sodium: 1.0,
            potassium: 422.0,
            glycemic_index: Some(51),
            allergens: &[],
            processed_level: "Unprocessed",
            additives: &[],
            anti_inflammatory: &["Dopamine", "Catechin"],
            antioxidants: &["Dopamine", "Vitamin C"],
        },
    ),
    (
        "orange",
        NutritionRecord {
            calories: 69.0,
            protein: 1.3,
            carbs: 17.0,
            fat: 0.2,
            fiber: 3.4,
            sugar: 12.0,
            vitamins: &["C"],
            minerals: &["Potassium", "Calcium"],
            saturated_fat: 0.0,
            trans_fat: 0.0,
            cholesterol: 0.0,
            sodium: 0.0,
            potassium: 237.0,
            glycemic_index: Some(40),
            allergens: &["Citrus"],
            processed_level: "Unprocessed",
            additives: &[],
            anti_inflammatory: &["Flavonoids", "Hesperidin"],
            antioxidants: &["Vitamin C", "Carotenoids"],
        },
    ),
    (
        "broccoli",
        NutritionRecord {
            calories: 31.0,
            protein: 2.5,
            carbs: 6.0,
            fat: 0.4,
            fiber: 2.4,
            sugar: 1.5,
            vitamins: &["C", "K"],
            minerals: &["Potassium", "Iron"],
            saturated_fat: 0.1,
            trans_fat: 0.0,
            cholesterol: 0.0,
            sodium: 33.0,
            potassium: 288.0,
            glycemic_index: Some(15),
            allergens: &[],
            processed_level: "Unprocessed",
            additives: &[],
            anti_inflammatory: &["Sulforaphane", "Kaempferol"],
            antioxidants: &["Vitamin C", "Lutein"],
        },
    ),
    (
        "pizza",
        NutritionRecord {
            calories: 285.0,
            protein: 12.0,
            carbs: 36.0,
            fat: 10.0,
            fiber: 2.5,
            sugar: 3.8,
            vitamins: &["A", "B12"],
            minerals: &["Calcium", "Iron"],
            saturated_fat: 4.5,
            trans_fat: 0.2,
            cholesterol: 18.0,
            sodium: 640.0,
            potassium: 184.0,
            glycemic_index: Some(60),
            allergens: &["Gluten", "Dairy"],
            processed_level: "Processed",
            additives: &["MSG", "Sodium Nitrate"],
            anti_inflammatory: &[],
            antioxidants: &["Lycopene"],
        },
    ),
    (
        "sandwich",
        NutritionRecord {
            calories: 320.0,
            protein: 18.0,
            carbs: 35.0,
            fat: 12.0,
            fiber: 4.0,
            sugar: 5.0,
            vitamins: &["B3", "B12"],
            minerals: &["Iron", "Zinc"],
            saturated_fat: 3.5,
            trans_fat: 0.1,
            cholesterol: 45.0,
            sodium: 730.0,
            potassium: 320.0,
            glycemic_index: Some(55),
            allergens: &["Gluten"],
            processed_level: "Moderately Processed",
            additives: &[],
            anti_inflammatory: &[],
            antioxidants: &[],
        },
    ),
    (
        "salad",
        NutritionRecord {
            calories: 150.0,
            protein: 6.0,
            carbs: 12.0,
            fat: 8.0,
            fiber: 4.0,
            sugar: 3.0,
            vitamins: &["A", "C", "K"],
            minerals: &["Iron", "Calcium", "Potassium"],
            saturated_fat: 1.5,
            trans_fat: 0.0,
            cholesterol: 0.0,
            sodium: 120.0,
            potassium: 350.0,
            glycemic_index: Some(15),
            allergens: &[],
            processed_level: "Minimally Processed",
            additives: &[],
            anti_inflammatory: &["Omega-3", "Flavonoids"],
            antioxidants: &["Vitamin C", "Vitamin E", "Carotenoids"],
        },
    ),
    (
        "chicken",
        NutritionRecord {
            calories: 220.0,
            protein: 33.0,
            carbs: 0.0,
            fat: 8.0,
            fiber: 0.0,
            sugar: 0.0,
            vitamins: &["B6", "B12"],
            minerals: &["Phosphorus", "Selenium"],
            saturated_fat: 2.5,
            trans_fat: 0.0,
            cholesterol: 88.0,
            sodium: 122.0,
            potassium: 302.0,
            glycemic_index: Some(0),
            allergens: &[],
            processed_level: "Minimally Processed",
            additives: &[],
            anti_inflammatory: &[],
            antioxidants: &[],
        },
    ),
];

static UNIT_LOOKUP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| FOOD_UNITS.iter().copied().collect());

static NUTRITION_LOOKUP: LazyLock<HashMap<&'static str, &'static NutritionRecord>> =
    LazyLock::new(|| {
        NUTRITION_TABLE
            .iter()
            .map(|(label, record)| (*label, record))
            .collect()
    });

/// Whether the detector should keep a class label
pub fn is_food(label: &str) -> bool {
    FOOD_CATEGORIES.contains(&label)
}

/// Serving unit for a class, `"serving"` when unknown
pub fn unit_for(label: &str) -> &'static str {
    UNIT_LOOKUP.get(label).copied().unwrap_or(DEFAULT_UNIT)
}

/// Nutrition facts for a class, falling back to [`DEFAULT_NUTRITION`]
pub fn nutrition_for(label: &str) -> &'static NutritionRecord {
    NUTRITION_LOOKUP
        .get(label)
        .copied()
        .unwrap_or(&DEFAULT_NUTRITION)
}

/// Class labels that have their own nutrition record, in table order
pub fn labels_with_nutrition() -> impl Iterator<Item = &'static str> {
    NUTRITION_TABLE.iter().map(|(label, _)| *label)
}

/// Rough digestive-comfort grade derived from a [`NutritionRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DebloatRating {
    Excellent,
    Good,
    Moderate,
    Poor,
    VeryPoor,
}

impl DebloatRating {
    pub fn from_score(score: f32) -> Self {
        if score >= 80.0 {
            DebloatRating::Excellent
        } else if score >= 65.0 {
            DebloatRating::Good
        } else if score >= 50.0 {
            DebloatRating::Moderate
        } else if score >= 35.0 {
            DebloatRating::Poor
        } else {
            DebloatRating::VeryPoor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DebloatRating::Excellent => "Excellent",
            DebloatRating::Good => "Good",
            DebloatRating::Moderate => "Moderate",
            DebloatRating::Poor => "Poor",
            DebloatRating::VeryPoor => "Very Poor",
        }
    }
}

impl std::fmt::Display for DebloatRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl NutritionRecord {
    /// Grams of a 100 g serving not accounted for by macronutrients
    pub fn approximate_water_content(&self) -> f32 {
        100.0 - (self.protein + self.carbs + self.fat)
    }

    /// Score in [0, 100]: fiber and water raise it, sodium and sugar lower it
    pub fn debloat_score(&self) -> f32 {
        let raw = 50.0 + self.fiber * 5.0 + self.approximate_water_content() * 0.5
            - self.sodium * 0.02
            - self.sugar * 2.0;
        raw.clamp(0.0, 100.0)
    }

    pub fn debloat_rating(&self) -> DebloatRating {
        DebloatRating::from_score(self.debloat_score())
    }
}

/// Confidence as a rounded percentage, e.g. `0.926` -> `"93%"`
pub fn format_confidence(confidence: f32) -> String {
    format!("{}%", (confidence * 100.0).round() as i32)
}
