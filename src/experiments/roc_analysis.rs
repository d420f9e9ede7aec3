use std::error::Error;
use std::path::Path;

use crate::data::train_test_split;
use crate::linear::LogisticRegression;
use crate::metrics::{threshold_sweep, RocCurve};
use crate::preprocess::StandardScaler;
use crate::Classifier;

use super::visualization::{plot_line_series, LineSeriesData};

/// Analysis hyperparameters
pub const TEST_FRACTION: f64 = 0.2;
pub const LEARNING_RATE: f64 = 0.1;
pub const MAX_ITER: usize = 2000;
pub const N_THRESHOLDS: usize = 101;
pub const SPLIT_SEED: u64 = 42;

/// Runs the decision-threshold experiment
///
/// Sweeps the classification threshold over the test-set
/// probabilities, reports the sensitivity/specificity trade-off, and
/// traces the ROC curve with its area.
///
/// # Returns
/// Ok(()) on success, or an error if any step fails
pub fn run_roc_analysis_experiment(
    data_dir: &Path,
    plots_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    println!("Loading Titanic dataset...");
    let data = super::load_dataset(data_dir)?;
    println!("Dataset loaded: {} passengers", data.features.nrows());

    println!("Splitting into train/test sets (80/20)...");
    let ((train_x, train_y), (test_x, test_y)) =
        train_test_split(&data.features, &data.labels, TEST_FRACTION, SPLIT_SEED)?;

    let mut scaler = StandardScaler::new();
    let train_x = scaler.fit_transform(&train_x)?;
    let test_x = scaler.transform(&test_x)?;

    println!("Training logistic regression...");
    let mut model = LogisticRegression::new()
        .with_learning_rate(LEARNING_RATE)
        .with_max_iter(MAX_ITER);
    model.fit(&train_x, &train_y)?;
    let probabilities = model.predict_proba(&test_x)?;

    println!("Sweeping {} thresholds from 1.0 down to 0.0...", N_THRESHOLDS);
    let sweep = threshold_sweep(&probabilities, &test_y, N_THRESHOLDS)?;

    println!("\n  Threshold  Sensitivity  Specificity  Accuracy");
    for metrics in sweep.iter().step_by(10) {
        println!(
            "  {:>9.2}  {:>11.4}  {:>11.4}  {:>8.4}",
            metrics.threshold, metrics.sensitivity, metrics.specificity, metrics.accuracy
        );
    }

    // The sweep runs from high thresholds to low, so ties keep the
    // most conservative threshold.
    let mut best = &sweep[0];
    for metrics in &sweep {
        if metrics.accuracy > best.accuracy {
            best = metrics;
        }
    }
    println!(
        "\nBest accuracy {:.4} at threshold {:.2} (sensitivity {:.4}, specificity {:.4})",
        best.accuracy, best.threshold, best.sensitivity, best.specificity
    );

    let curve = RocCurve::from_predictions(&probabilities, &test_y, N_THRESHOLDS)?;
    let auc = curve.auc();
    println!("Area under the ROC curve: {auc:.4}");

    std::fs::create_dir_all(plots_dir)?;
    println!("\nPlotting threshold trade-off and ROC curve...");
    let tradeoff_series = [
        LineSeriesData {
            label: "Sensitivity".to_string(),
            points: sweep.iter().map(|m| (m.threshold, m.sensitivity)).collect(),
        },
        LineSeriesData {
            label: "Specificity".to_string(),
            points: sweep.iter().map(|m| (m.threshold, m.specificity)).collect(),
        },
        LineSeriesData {
            label: "Accuracy".to_string(),
            points: sweep.iter().map(|m| (m.threshold, m.accuracy)).collect(),
        },
    ];
    plot_line_series(
        &tradeoff_series,
        "Metrics Across Decision Thresholds",
        "Threshold",
        "Rate",
        plots_dir,
        "roc_threshold_tradeoff.png",
    )?;

    let roc_series = [
        LineSeriesData {
            label: format!("Model (AUC = {auc:.3})"),
            points: curve
                .points
                .iter()
                .map(|p| (p.false_positive_rate, p.true_positive_rate))
                .collect(),
        },
        LineSeriesData {
            label: "Chance".to_string(),
            points: vec![(0.0, 0.0), (1.0, 1.0)],
        },
    ];
    plot_line_series(
        &roc_series,
        "ROC Curve",
        "False positive rate",
        "True positive rate",
        plots_dir,
        "roc_curve.png",
    )?;

    println!("Plots saved to: {}", plots_dir.display());
    Ok(())
}
