use std::error::Error;
use std::path::Path;

use ndarray::Array1;

use crate::calibrate::{Calibrator, IsotonicRegression, PlattScaling};
use crate::data::train_test_split;
use crate::linear::LogisticRegression;
use crate::metrics::{brier_score, calibration_curve, expected_calibration_error, log_loss};
use crate::preprocess::StandardScaler;
use crate::Classifier;

use super::visualization::{plot_line_series, LineSeriesData};

/// Calibration hyperparameters
pub const TEST_FRACTION: f64 = 0.2;
pub const CALIBRATION_FRACTION: f64 = 0.25;
pub const LEARNING_RATE: f64 = 0.1;
pub const MAX_ITER: usize = 2000;
pub const N_BINS: usize = 10;
pub const SPLIT_SEED: u64 = 42;

fn report_metrics(name: &str, probabilities: &Array1<f64>, targets: &Array1<f64>) -> Result<(), Box<dyn Error>> {
    println!(
        "  {:>9}   {:>7.4}   {:>8.4}   {:>7.4}",
        name,
        brier_score(probabilities, targets),
        log_loss(probabilities, targets),
        expected_calibration_error(probabilities, targets, N_BINS)?
    );
    Ok(())
}

fn reliability_series(
    name: &str,
    probabilities: &Array1<f64>,
    targets: &Array1<f64>,
) -> Result<LineSeriesData, Box<dyn Error>> {
    let bins = calibration_curve(probabilities, targets, N_BINS)?;
    Ok(LineSeriesData {
        label: name.to_string(),
        points: bins
            .iter()
            .map(|b| (b.mean_predicted, b.fraction_positive))
            .collect(),
    })
}

/// Runs the probability-calibration experiment
///
/// Splits the data three ways (train / calibration / test), fits Platt
/// scaling and isotonic regression on the held-out calibration slice,
/// and compares raw against calibrated probabilities on the test set
/// with Brier score, log loss, expected calibration error and a
/// reliability diagram.
///
/// # Returns
/// Ok(()) on success, or an error if any step fails
pub fn run_calibration_experiment(data_dir: &Path, plots_dir: &Path) -> Result<(), Box<dyn Error>> {
    println!("Loading Titanic dataset...");
    let data = super::load_dataset(data_dir)?;
    println!("Dataset loaded: {} passengers", data.features.nrows());

    // 60/20/20: carve off the test set first, then a calibration
    // slice from what remains.
    println!("Splitting into train/calibration/test sets (60/20/20)...");
    let ((rest_x, rest_y), (test_x, test_y)) =
        train_test_split(&data.features, &data.labels, TEST_FRACTION, SPLIT_SEED)?;
    let ((train_x, train_y), (calib_x, calib_y)) =
        train_test_split(&rest_x, &rest_y, CALIBRATION_FRACTION, SPLIT_SEED + 1)?;
    println!(
        "Train: {}, Calibration: {}, Test: {}",
        train_x.nrows(),
        calib_x.nrows(),
        test_x.nrows()
    );

    let mut scaler = StandardScaler::new();
    let train_x = scaler.fit_transform(&train_x)?;
    let calib_x = scaler.transform(&calib_x)?;
    let test_x = scaler.transform(&test_x)?;

    println!("Training logistic regression...");
    let mut model = LogisticRegression::new()
        .with_learning_rate(LEARNING_RATE)
        .with_max_iter(MAX_ITER);
    model.fit(&train_x, &train_y)?;

    let calib_probs = model.predict_proba(&calib_x)?;
    let test_probs = model.predict_proba(&test_x)?;

    println!("Fitting Platt scaling on the calibration slice...");
    let mut platt = PlattScaling::new();
    platt.fit(&calib_probs, &calib_y)?;
    let (slope, offset) = platt.coefficients();
    println!("  log-odds map: {slope:.4} * z + {offset:.4}");

    println!("Fitting isotonic regression on the calibration slice...");
    let mut isotonic = IsotonicRegression::new();
    isotonic.fit(&calib_probs, &calib_y)?;
    println!("  step function with {} pieces", isotonic.n_steps());

    let platt_probs = platt.calibrate(&test_probs)?;
    let isotonic_probs = isotonic.calibrate(&test_probs)?;

    println!("\nTest-set calibration metrics:");
    println!("               Brier   Log loss       ECE");
    report_metrics("Raw", &test_probs, &test_y)?;
    report_metrics("Platt", &platt_probs, &test_y)?;
    report_metrics("Isotonic", &isotonic_probs, &test_y)?;

    std::fs::create_dir_all(plots_dir)?;
    println!("\nPlotting reliability diagram...");
    let series = [
        LineSeriesData {
            label: "Perfectly calibrated".to_string(),
            points: vec![(0.0, 0.0), (1.0, 1.0)],
        },
        reliability_series("Raw", &test_probs, &test_y)?,
        reliability_series("Platt", &platt_probs, &test_y)?,
        reliability_series("Isotonic", &isotonic_probs, &test_y)?,
    ];
    plot_line_series(
        &series,
        "Reliability Diagram",
        "Mean predicted probability",
        "Fraction of positives",
        plots_dir,
        "calibration_reliability.png",
    )?;

    println!("Plots saved to: {}", plots_dir.display());
    Ok(())
}
