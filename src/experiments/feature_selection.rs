use std::error::Error;
use std::path::Path;

use crate::data::FEATURE_NAMES;
use crate::model_selection::forward_selection;
use crate::preprocess::StandardScaler;

use super::visualization::{plot_line_series, LineSeriesData};

/// Selection hyperparameters
pub const N_FOLDS: usize = 5;
pub const MAX_ITER: usize = 500;
pub const FOLD_SEED: u64 = 42;

/// Runs the greedy forward-selection experiment
///
/// Adds features one at a time, keeping whichever raises the
/// cross-validated accuracy most, and stops when nothing improves it.
/// The resulting ranking shows which passenger attributes carry the
/// survival signal and which are dead weight.
///
/// # Returns
/// Ok(()) on success, or an error if any step fails
pub fn run_feature_selection_experiment(
    data_dir: &Path,
    plots_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    println!("Loading Titanic dataset...");
    let data = super::load_dataset(data_dir)?;
    println!(
        "Dataset loaded: {} passengers, {} candidate features",
        data.features.nrows(),
        data.features.ncols()
    );

    println!("Standardizing features...");
    let mut scaler = StandardScaler::new();
    let features = scaler.fit_transform(&data.features)?;

    println!("Running greedy forward selection ({}-fold CV)...\n", N_FOLDS);
    let steps = forward_selection(
        &features,
        &data.labels,
        &FEATURE_NAMES,
        N_FOLDS,
        MAX_ITER,
        FOLD_SEED,
    )?;

    for (rank, step) in steps.iter().enumerate() {
        println!(
            "  {}. {:<12} cv accuracy {:.4}",
            rank + 1,
            step.feature_name,
            step.cv_accuracy
        );
    }

    let selected: Vec<usize> = steps.iter().map(|s| s.feature_index).collect();
    let rejected: Vec<&str> = FEATURE_NAMES
        .iter()
        .enumerate()
        .filter(|(i, _)| !selected.contains(i))
        .map(|(_, &name)| name)
        .collect();
    if rejected.is_empty() {
        println!("\nEvery feature earned its place.");
    } else {
        println!("\nLeft out: {}", rejected.join(", "));
    }

    std::fs::create_dir_all(plots_dir)?;
    println!("\nPlotting accuracy against subset size...");
    let series = [LineSeriesData {
        label: "CV accuracy".to_string(),
        points: steps
            .iter()
            .enumerate()
            .map(|(i, step)| ((i + 1) as f64, step.cv_accuracy))
            .collect(),
    }];
    plot_line_series(
        &series,
        "Forward Selection",
        "Number of features",
        "CV accuracy",
        plots_dir,
        "feature_selection_accuracy.png",
    )?;

    println!("Plots saved to: {}", plots_dir.display());
    Ok(())
}
