use std::error::Error;
use std::path::Path;

use crate::data::{KFold, StratifiedKFold};
use crate::linear::LogisticRegression;
use crate::model_selection::{cross_validate, mean_and_std};
use crate::preprocess::StandardScaler;

use super::visualization::plot_grouped_bars;

/// Training hyperparameters
pub const N_FOLDS: usize = 5;
pub const LEARNING_RATE: f64 = 0.1;
pub const MAX_ITER: usize = 1000;
pub const FOLD_SEED: u64 = 42;

/// Runs the cross-validation experiment
///
/// Compares plain k-fold with stratified k-fold accuracy for the same
/// logistic regression, showing how stratification stabilizes fold
/// scores on a class-imbalanced dataset.
///
/// # Returns
/// Ok(()) on success, or an error if any step fails
pub fn run_cross_validation_experiment(
    data_dir: &Path,
    plots_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    println!("Loading Titanic dataset...");
    let data = super::load_dataset(data_dir)?;
    println!("Dataset loaded: {} passengers", data.features.nrows());

    println!("Standardizing features...");
    let mut scaler = StandardScaler::new();
    let features = scaler.fit_transform(&data.features)?;

    let build_model = || {
        LogisticRegression::new()
            .with_learning_rate(LEARNING_RATE)
            .with_max_iter(MAX_ITER)
    };

    println!("Running {}-fold cross-validation...", N_FOLDS);
    let kfold = KFold::new(N_FOLDS, FOLD_SEED).split(data.labels.len())?;
    let kfold_scores = cross_validate(build_model, &features, &data.labels, &kfold)?;

    println!("Running stratified {}-fold cross-validation...", N_FOLDS);
    let stratified = StratifiedKFold::new(N_FOLDS, FOLD_SEED).split(&data.labels)?;
    let stratified_scores = cross_validate(build_model, &features, &data.labels, &stratified)?;

    println!("\n  Fold     K-fold  Stratified");
    for fold in 0..N_FOLDS {
        println!(
            "  {:>4}   {:>8.4}    {:>8.4}",
            fold + 1,
            kfold_scores[fold],
            stratified_scores[fold]
        );
    }

    let (kfold_mean, kfold_std) = mean_and_std(&kfold_scores);
    let (strat_mean, strat_std) = mean_and_std(&stratified_scores);
    println!("\nK-fold:     {kfold_mean:.4} +/- {kfold_std:.4}");
    println!("Stratified: {strat_mean:.4} +/- {strat_std:.4}");

    std::fs::create_dir_all(plots_dir)?;
    println!("\nPlotting fold accuracies...");
    let series = [
        ("K-fold".to_string(), kfold_scores),
        ("Stratified".to_string(), stratified_scores),
    ];
    plot_grouped_bars(
        &series,
        "Cross-Validation Accuracy per Fold",
        "Fold",
        "Accuracy",
        plots_dir,
        "cross_validation_accuracy.png",
    )?;

    println!("Plots saved to: {}", plots_dir.display());
    Ok(())
}
