use std::error::Error;
use std::path::Path;

use crate::model_selection::{grid_search, random_search, ParamGrid, ParamRanges};
use crate::preprocess::StandardScaler;

use super::visualization::{plot_line_series, LineSeriesData};

/// Search hyperparameters
pub const LEARNING_RATES: [f64; 4] = [0.01, 0.05, 0.1, 0.5];
pub const L2_PENALTIES: [f64; 5] = [0.001, 0.01, 0.1, 1.0, 10.0];
pub const N_FOLDS: usize = 5;
pub const MAX_ITER: usize = 500;
pub const N_RANDOM_SAMPLES: usize = 20;
pub const SEARCH_SEED: u64 = 42;

/// Runs the hyperparameter search experiment
///
/// Scores a full learning-rate by L2 grid with stratified k-fold
/// accuracy, then spends the same fold budget on a log-uniform random
/// search over wider ranges to compare the two strategies.
///
/// # Returns
/// Ok(()) on success, or an error if any step fails
pub fn run_grid_search_experiment(data_dir: &Path, plots_dir: &Path) -> Result<(), Box<dyn Error>> {
    println!("Loading Titanic dataset...");
    let data = super::load_dataset(data_dir)?;
    println!("Dataset loaded: {} passengers", data.features.nrows());

    println!("Standardizing features...");
    let mut scaler = StandardScaler::new();
    let features = scaler.fit_transform(&data.features)?;

    let grid = ParamGrid {
        learning_rates: LEARNING_RATES.to_vec(),
        l2_penalties: L2_PENALTIES.to_vec(),
    };
    println!(
        "Grid search over {} combinations ({}-fold CV)...",
        LEARNING_RATES.len() * L2_PENALTIES.len(),
        N_FOLDS
    );
    let grid_result = grid_search(
        &grid,
        &features,
        &data.labels,
        N_FOLDS,
        MAX_ITER,
        SEARCH_SEED,
    )?;

    println!("\nTop grid combinations:");
    grid_result.print_top(5);
    println!(
        "\nBest grid: lr = {}, l2 = {}, accuracy = {:.4} +/- {:.4}",
        grid_result.best.learning_rate,
        grid_result.best.l2,
        grid_result.best.mean_score,
        grid_result.best.std_score
    );

    let ranges = ParamRanges {
        learning_rate: (0.005, 1.0),
        l2: (0.0005, 20.0),
    };
    println!("\nRandom search with {} samples...", N_RANDOM_SAMPLES);
    let random_result = random_search(
        &ranges,
        N_RANDOM_SAMPLES,
        &features,
        &data.labels,
        N_FOLDS,
        MAX_ITER,
        SEARCH_SEED,
    )?;

    println!("\nTop random combinations:");
    random_result.print_top(5);
    println!(
        "\nBest random: lr = {:.4}, l2 = {:.4}, accuracy = {:.4} +/- {:.4}",
        random_result.best.learning_rate,
        random_result.best.l2,
        random_result.best.mean_score,
        random_result.best.std_score
    );

    std::fs::create_dir_all(plots_dir)?;
    println!("\nPlotting grid accuracy against the L2 penalty...");
    let series: Vec<LineSeriesData> = LEARNING_RATES
        .iter()
        .map(|&learning_rate| LineSeriesData {
            label: format!("lr = {learning_rate}"),
            points: grid_result
                .outcomes
                .iter()
                .filter(|o| o.learning_rate == learning_rate)
                .map(|o| (o.l2.log10(), o.mean_score))
                .collect(),
        })
        .collect();
    plot_line_series(
        &series,
        "Grid Search Accuracy",
        "log10(L2 penalty)",
        "CV accuracy",
        plots_dir,
        "grid_search_accuracy.png",
    )?;

    println!("Plots saved to: {}", plots_dir.display());
    Ok(())
}
