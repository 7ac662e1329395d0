use foodsnap::{BoundingBox, Detection, compose, display_name, pluralize_unit};
use proptest::prelude::*;

const LABELS: &[&str] = &[
    "apple", "banana", "beef", "fish", "pizza", "salad", "carrot", "dumpling",
];

fn arb_detection() -> impl Strategy<Value = Detection> {
    (prop::sample::select(LABELS), 0u32..=100).prop_map(|(label, pct)| {
        // Coarse confidences so ties actually happen
        Detection::new(label, pct as f32 / 100.0, BoundingBox::new(0.0, 0.0, 1.0, 1.0))
    })
}

fn first_seen_labels(detections: &[Detection]) -> Vec<&str> {
    let mut labels: Vec<&str> = Vec::new();
    for d in detections {
        if !labels.contains(&d.class_label.as_str()) {
            labels.push(&d.class_label);
        }
    }
    labels
}

proptest! {
    #[test]
    fn primary_is_first_class_with_max_confidence(
        detections in prop::collection::vec(arb_detection(), 1..24)
    ) {
        let result = compose(&detections);

        let best = detections.iter().map(|d| d.confidence).fold(f32::MIN, f32::max);
        let class_best = |label: &str| {
            detections
                .iter()
                .filter(|d| d.class_label == label)
                .map(|d| d.confidence)
                .fold(f32::MIN, f32::max)
        };
        let expected = first_seen_labels(&detections)
            .into_iter()
            .find(|label| class_best(*label) == best)
            .map(display_name)
            .unwrap();

        prop_assert_eq!(result.food_name, expected);
        prop_assert_eq!(result.confidence, best);
    }

    #[test]
    fn quantities_sorted_and_described_in_same_order(
        detections in prop::collection::vec(arb_detection(), 0..24)
    ) {
        let result = compose(&detections);

        for pair in result.food_quantities.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
        }

        if result.food_quantities.is_empty() {
            prop_assert_eq!(result.quantity_description, "Unknown quantity");
        } else {
            let parts: Vec<&str> = result.quantity_description.split(", ").collect();
            prop_assert_eq!(parts.len(), result.food_quantities.len());
            for (part, entry) in parts.iter().zip(&result.food_quantities) {
                prop_assert_eq!(part.to_string(), entry.describe());
            }
        }
    }

    #[test]
    fn quantities_count_every_detection_once(
        detections in prop::collection::vec(arb_detection(), 0..24)
    ) {
        let result = compose(&detections);

        let total: u32 = result.food_quantities.iter().map(|e| e.quantity).sum();
        prop_assert_eq!(total as usize, detections.len());
        prop_assert_eq!(result.food_quantities.len(), first_seen_labels(&detections).len());
    }

    #[test]
    fn equal_confidences_keep_first_seen_order(
        detections in prop::collection::vec(arb_detection(), 0..24)
    ) {
        let result = compose(&detections);
        let seen = first_seen_labels(&detections);

        for pair in result.food_quantities.windows(2) {
            if pair[0].confidence == pair[1].confidence {
                let a = seen.iter().position(|l| *l == pair[0].name).unwrap();
                let b = seen.iter().position(|l| *l == pair[1].name).unwrap();
                prop_assert!(a < b);
            }
        }
    }

    #[test]
    fn pluralization_rules(unit in "[a-z]{1,8}", count in 1u32..10) {
        let oz = pluralize_unit("oz", count);
        let fish = pluralize_unit("fish", count);
        prop_assert_eq!(oz, "oz");
        prop_assert_eq!(fish, "fish");

        let plural = pluralize_unit(&unit, count);
        if unit == "oz" || unit == "fish" {
            prop_assert_eq!(plural, unit);
        } else if count > 1 {
            prop_assert_eq!(plural, format!("{unit}s"));
        } else {
            prop_assert_eq!(plural, unit);
        }
    }
}
