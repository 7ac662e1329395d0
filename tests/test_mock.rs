//! Tests for the mock detector and the analyzer built on top of detection sources.

mod common;

use std::collections::HashSet;

use foodsnap::detection::mock::{MOCK_CONFIDENCE_MAX, MOCK_CONFIDENCE_MIN};
use foodsnap::nutrition::{DEFAULT_NUTRITION, labels_with_nutrition, nutrition_for};
use foodsnap::{
    Analyzer, DetectionSource, DetectorError, FoodDetector, MockDetector, generate_mock_detections,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use common::*;

#[test]
fn test_mock_detections_stay_in_bounds() {
    let known: HashSet<&str> = labels_with_nutrition().collect();

    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let detections = generate_mock_detections(&mut rng);

        let mut per_class: Vec<(String, usize, f32)> = Vec::new();
        for d in &detections {
            assert!(known.contains(d.class_label.as_str()), "unexpected {}", d.class_label);
            assert!(d.confidence >= MOCK_CONFIDENCE_MIN && d.confidence < MOCK_CONFIDENCE_MAX);
            assert!(d.bbox.x >= 0.0 && d.bbox.max_x() <= 640.0);
            assert!(d.bbox.y >= 0.0 && d.bbox.max_y() <= 480.0);

            match per_class.iter_mut().find(|(label, _, _)| *label == d.class_label) {
                Some((_, count, confidence)) => {
                    *count += 1;
                    assert_eq!(*confidence, d.confidence);
                }
                None => per_class.push((d.class_label.clone(), 1, d.confidence)),
            }
        }

        assert!((1..=3).contains(&per_class.len()), "seed {seed}: {per_class:?}");
        for (_, count, _) in &per_class {
            assert!((1..=3).contains(count));
        }
    }
}

#[test]
fn test_mock_produces_both_scenarios() {
    let mut single = 0;
    let mut multiple = 0;

    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let classes: HashSet<String> = generate_mock_detections(&mut rng)
            .into_iter()
            .map(|d| d.class_label)
            .collect();
        if classes.len() == 1 {
            single += 1;
        } else {
            multiple += 1;
        }
    }

    assert!(single > 0);
    assert!(multiple > 0);
}

#[tokio::test]
async fn test_seeded_mock_is_reproducible() -> anyhow::Result<()> {
    let image = create_test_image();

    let a = MockDetector::seeded(42).detect(&image).await?;
    let b = MockDetector::seeded(42).detect(&image).await?;

    assert_eq!(a, b);
    Ok(())
}

#[tokio::test]
async fn test_analyzer_composes_mock_detections() -> anyhow::Result<()> {
    let analyzer = Analyzer::new(MockDetector::seeded(7));

    let result = analyzer.analyze(&create_test_image()).await?;

    assert!(!result.food_quantities.is_empty());
    assert_eq!(result.food_name, result.food_quantities[0].display_name);
    assert_eq!(&result.nutrition, nutrition_for(&result.food_quantities[0].name));
    assert_ne!(result.food_name, "Unknown Food");
    Ok(())
}

#[tokio::test]
async fn test_analyzer_surfaces_detector_errors() {
    let analyzer = Analyzer::new(FoodDetector::new(
        CountingLoader::returning(Vec::new()).with_failures(1),
    ));

    let err = analyzer.analyze(&create_test_image()).await.unwrap_err();

    assert!(matches!(err, DetectorError::ModelUnavailable(_)));
}

#[tokio::test]
async fn test_analyzer_falls_back_to_mock_when_asked() -> anyhow::Result<()> {
    let analyzer = Analyzer::new(FoodDetector::new(
        CountingLoader::returning(Vec::new()).with_failures(1),
    ))
    .with_mock_fallback(MockDetector::seeded(3));

    let result = analyzer.analyze(&create_test_image()).await?;

    assert!(!result.food_quantities.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_analyzer_with_no_food_gives_unknown() -> anyhow::Result<()> {
    let analyzer = Analyzer::new(FoodDetector::new(CountingLoader::returning(vec![
        det("person", 0.97),
        det("laptop", 0.91),
    ])));

    let result = analyzer.analyze(&create_test_image()).await?;

    assert_eq!(result.food_name, "Unknown Food");
    assert_eq!(result.nutrition, DEFAULT_NUTRITION);
    Ok(())
}

#[tokio::test]
async fn test_analyze_bytes_decodes_before_detecting() -> anyhow::Result<()> {
    let analyzer = Analyzer::new(FoodDetector::new(CountingLoader::returning(vec![
        det("apple", 0.9),
        det("apple", 0.8),
        det("banana", 0.95),
    ])));

    let file = create_test_image_file();
    let result = analyzer.analyze_bytes(&std::fs::read(file.path())?).await?;
    assert_eq!(result.quantity_description, "1 whole of Banana, 2 wholes of Apple");

    let err = analyzer.analyze_bytes(b"\x00\x01garbage").await.unwrap_err();
    assert!(matches!(err, DetectorError::InvalidImage(_)));
    Ok(())
}
