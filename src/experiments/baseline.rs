use std::error::Error;
use std::path::Path;

use crate::data::{train_test_split, FEATURE_NAMES};
use crate::linear::LogisticRegression;
use crate::metrics::confusion_counts;
use crate::preprocess::StandardScaler;
use crate::Classifier;

use super::visualization::{plot_line_series, LineSeriesData};

/// Training hyperparameters
pub const TEST_FRACTION: f64 = 0.2;
pub const LEARNING_RATE: f64 = 0.1;
pub const MAX_ITER: usize = 2000;
pub const SPLIT_SEED: u64 = 42;

/// Runs the baseline survival-prediction experiment
///
/// This is the main orchestrator function that:
/// 1. Downloads and encodes the Titanic dataset
/// 2. Splits into stratified train/test sets
/// 3. Standardizes features using training statistics only
/// 4. Trains a logistic regression classifier
/// 5. Reports accuracy, confusion counts and coefficients
///
/// # Returns
/// Ok(()) on success, or an error if any step fails
pub fn run_baseline_experiment(data_dir: &Path, plots_dir: &Path) -> Result<(), Box<dyn Error>> {
    println!("Loading Titanic dataset...");
    let data = super::load_dataset(data_dir)?;
    println!(
        "Dataset loaded: {} passengers, {} features",
        data.features.nrows(),
        data.features.ncols()
    );
    println!(
        "Survival rate: {:.1}%",
        data.labels.mean().unwrap_or(0.0) * 100.0
    );

    println!("Splitting into train/test sets (80/20)...");
    let ((train_x, train_y), (test_x, test_y)) =
        train_test_split(&data.features, &data.labels, TEST_FRACTION, SPLIT_SEED)?;
    println!(
        "Train samples: {}, Test samples: {}",
        train_x.nrows(),
        test_x.nrows()
    );

    println!("Standardizing features with training-set statistics...");
    let mut scaler = StandardScaler::new();
    let train_x = scaler.fit_transform(&train_x)?;
    let test_x = scaler.transform(&test_x)?;

    println!(
        "Training logistic regression (lr: {}, max iterations: {})...",
        LEARNING_RATE, MAX_ITER
    );
    let mut model = LogisticRegression::new()
        .with_learning_rate(LEARNING_RATE)
        .with_max_iter(MAX_ITER);
    model.fit(&train_x, &train_y)?;
    println!("Stopped after {} iterations", model.loss_history().len());

    let train_accuracy = model.score(&train_x, &train_y)?;
    let test_accuracy = model.score(&test_x, &test_y)?;
    println!("\nTrain accuracy: {:.4}", train_accuracy);
    println!("Test accuracy:  {:.4}", test_accuracy);

    println!("\nTest set confusion matrix (threshold 0.5):");
    let counts = confusion_counts(&model.predict_proba(&test_x)?, &test_y, 0.5);
    counts.print_table();
    println!("  Sensitivity: {:.4}", counts.sensitivity());
    println!("  Specificity: {:.4}", counts.specificity());
    println!("  Precision:   {:.4}", counts.precision());

    println!("\nCoefficients on standardized features:");
    let weights = model.weights()?;
    for (name, weight) in FEATURE_NAMES.iter().zip(weights.iter()) {
        println!("  {name:>12}: {weight:>8.4}");
    }
    println!("  {:>12}: {:>8.4}", "intercept", model.intercept());

    std::fs::create_dir_all(plots_dir)?;
    println!("\nPlotting training loss...");
    let loss_series = [LineSeriesData {
        label: "Training loss".to_string(),
        points: model
            .loss_history()
            .iter()
            .enumerate()
            .map(|(i, &loss)| (i as f64, loss))
            .collect(),
    }];
    plot_line_series(
        &loss_series,
        "Logistic Regression Training Loss",
        "Iteration",
        "Loss",
        plots_dir,
        "baseline_loss.png",
    )?;

    println!("Plots saved to: {}", plots_dir.display());
    Ok(())
}
