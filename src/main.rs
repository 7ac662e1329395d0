use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use image::ImageReader;
use tracing_subscriber::EnvFilter;

use foodsnap::config::{DetectorConfig, default_model_path};
use foodsnap::nutrition::format_confidence;
use foodsnap::{AnalysisResult, Analyzer, DetectionSource, FoodDetector, MockDetector};

#[derive(Parser)]
#[command(name = "foodsnap")]
#[command(about = "Guess the food in a photo and show its nutrition facts")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect food in an image file
    Analyze {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Path to the .rten detection model
        #[arg(
            long,
            value_name = "PATH",
            env = "FOODSNAP_MODEL",
            default_value_os_t = default_model_path()
        )]
        model: PathBuf,

        /// Minimum detection score
        #[arg(long, default_value_t = 0.5)]
        min_score: f32,

        /// Fall back to mock detections if the model fails
        #[arg(long)]
        mock_fallback: bool,

        /// Give up after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
    },

    /// Produce a result from randomly generated detections
    Mock {
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Simulated processing time in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose {
        "foodsnap=debug"
    } else {
        "foodsnap=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match args.command {
        Command::Analyze {
            image_path,
            model,
            min_score,
            mock_fallback,
            timeout_secs,
        } => {
            tracing::info!(path = %image_path.display(), "Loading image");
            let img = ImageReader::open(&image_path)?
                .decode()
                .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
            tracing::info!(width = img.width(), height = img.height(), "Image loaded");

            let config = DetectorConfig::default()
                .with_model_path(model)
                .with_min_score(min_score);
            let mut analyzer = Analyzer::new(FoodDetector::from_config(config));
            if mock_fallback {
                analyzer = analyzer.with_mock_fallback(MockDetector::new());
            }

            match timeout_secs {
                Some(secs) => {
                    tokio::time::timeout(Duration::from_secs(secs), analyzer.analyze(&img))
                        .await
                        .map_err(|_| anyhow::anyhow!("Analysis timed out after {}s", secs))??
                }
                None => analyzer.analyze(&img).await?,
            }
        }
        Command::Mock { seed, delay_ms } => {
            let mock = match seed {
                Some(seed) => MockDetector::seeded(seed),
                None => MockDetector::new(),
            }
            .with_delay(Duration::from_millis(delay_ms));

            // The mock never looks at the image
            let placeholder = image::DynamicImage::new_rgb8(1, 1);
            let detections = mock.detect(&placeholder).await?;
            foodsnap::compose(&detections)
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(())
}

fn print_result(result: &AnalysisResult) {
    println!("\n=== {} ===", result.food_name);
    if !result.food_quantities.is_empty() {
        println!("Confidence: {}", format_confidence(result.confidence));
    }
    println!("Detected: {}", result.quantity_description);

    if result.food_quantities.len() > 1 {
        println!("\nIndividual items:");
        for item in &result.food_quantities {
            println!("  {} ({})", item.describe(), format_confidence(item.confidence));
        }
    }

    let n = &result.nutrition;
    println!("\nCalories: {} kcal", n.calories);
    println!(
        "Protein: {}g  Carbs: {}g  Fat: {}g  Fiber: {}g  Sugar: {}g",
        n.protein, n.carbs, n.fat, n.fiber, n.sugar
    );
    println!(
        "Saturated fat: {}g  Trans fat: {}g  Cholesterol: {}mg  Sodium: {}mg  Potassium: {}mg",
        n.saturated_fat, n.trans_fat, n.cholesterol, n.sodium, n.potassium
    );
    if let Some(gi) = n.glycemic_index {
        println!("Glycemic index: {}", gi);
    }
    println!("Vitamins: {}", n.vitamins.join(", "));
    println!("Minerals: {}", n.minerals.join(", "));
    println!("Processing: {}", n.processed_level);
    if !n.allergens.is_empty() {
        println!("Allergens: {}", n.allergens.join(", "));
    }
    if !n.additives.is_empty() {
        println!("Additives: {}", n.additives.join(", "));
    }
    if !n.antioxidants.is_empty() {
        println!("Antioxidants: {}", n.antioxidants.join(", "));
    }
    if !n.anti_inflammatory.is_empty() {
        println!("Anti-inflammatory: {}", n.anti_inflammatory.join(", "));
    }
    println!("Debloat score: {:.0}/100 ({})", n.debloat_score(), n.debloat_rating());
}
