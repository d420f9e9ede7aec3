use std::error::Error;
use std::path::Path;

use tensorboard_rs::summary_writer::SummaryWriter;

use crate::data::train_test_split;
use crate::metrics::calculate_accuracy;
use crate::nn::MlpClassifier;
use crate::preprocess::StandardScaler;
use crate::Classifier;

use super::visualization::{plot_histogram, plot_line_series, plot_scatter_groups, LineSeriesData};

/// Training hyperparameters
pub const TEST_FRACTION: f64 = 0.2;
pub const HIDDEN_SIZE: usize = 16;
pub const NUM_HIDDEN_LAYERS: usize = 1;
pub const LEARNING_RATE: f64 = 0.001;
pub const NUM_EPOCHS: usize = 100;
pub const BATCH_SIZE: usize = 16;
pub const DROPOUT_RATE: f64 = 0.2;
pub const MC_PASSES: usize = 200;
pub const SPLIT_SEED: u64 = 42;
pub const MC_SEED: u64 = 7;

/// Runs the Monte Carlo dropout experiment
///
/// Trains a small MLP with dropout, then keeps dropout active at
/// prediction time: averaging many stochastic passes gives a mean
/// probability per passenger, and the spread across passes serves as
/// an uncertainty estimate. The experiment checks whether that spread
/// is larger on the passengers the model gets wrong.
///
/// # Returns
/// Ok(()) on success, or an error if any step fails
pub fn run_mc_dropout_experiment(data_dir: &Path, plots_dir: &Path) -> Result<(), Box<dyn Error>> {
    println!("Loading Titanic dataset...");
    let data = super::load_dataset(data_dir)?;
    println!("Dataset loaded: {} passengers", data.features.nrows());

    println!("Splitting into train/test sets (80/20)...");
    let ((train_x, train_y), (test_x, test_y)) =
        train_test_split(&data.features, &data.labels, TEST_FRACTION, SPLIT_SEED)?;

    let mut scaler = StandardScaler::new();
    let train_x = scaler.fit_transform(&train_x)?;
    let test_x = scaler.transform(&test_x)?;

    println!("Creating MLP classifier...");
    println!(
        "  Architecture: {} -> {} (x{} layers) -> 1",
        train_x.ncols(),
        HIDDEN_SIZE,
        NUM_HIDDEN_LAYERS + 1
    );
    let mut model = MlpClassifier::new()
        .with_hidden_size(HIDDEN_SIZE)
        .with_n_hidden_layers(NUM_HIDDEN_LAYERS)
        .with_dropout(DROPOUT_RATE)
        .with_learning_rate(LEARNING_RATE)
        .with_n_epochs(NUM_EPOCHS)
        .with_batch_size(BATCH_SIZE)
        .with_seed(SPLIT_SEED);

    let mut writer = SummaryWriter::new(&("./logdir_mc_dropout".to_string()));
    println!(
        "Starting training for {} epochs (batch size: {}, lr: {}, dropout: {})...",
        NUM_EPOCHS, BATCH_SIZE, LEARNING_RATE, DROPOUT_RATE
    );
    let epoch_losses = model.train(&train_x, &train_y, Some(&mut writer))?;
    writer.flush();

    let deterministic_accuracy = model.score(&test_x, &test_y)?;
    println!("\nDeterministic test accuracy: {deterministic_accuracy:.4}");

    println!("Running {} stochastic passes with dropout left on...", MC_PASSES);
    let (mean_probs, std_probs) = model.mc_predict_proba(&test_x, MC_PASSES, MC_SEED)?;
    let mc_predictions = mean_probs.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 });
    let mc_accuracy = calculate_accuracy(&mc_predictions, &test_y);
    println!("MC-averaged test accuracy:   {mc_accuracy:.4}");

    let mut correct_points = Vec::new();
    let mut incorrect_points = Vec::new();
    for i in 0..test_y.len() {
        let point = (mean_probs[i], std_probs[i]);
        if mc_predictions[i] == test_y[i] {
            correct_points.push(point);
        } else {
            incorrect_points.push(point);
        }
    }

    let mean_std = |points: &[(f64, f64)]| {
        if points.is_empty() {
            0.0
        } else {
            points.iter().map(|p| p.1).sum::<f64>() / points.len() as f64
        }
    };
    println!(
        "Average uncertainty: {:.4} on correct, {:.4} on incorrect predictions",
        mean_std(&correct_points),
        mean_std(&incorrect_points)
    );

    std::fs::create_dir_all(plots_dir)?;
    println!("\nPlotting training loss, uncertainty histogram and scatter...");
    let loss_series = [LineSeriesData {
        label: "Training loss".to_string(),
        points: epoch_losses
            .iter()
            .enumerate()
            .map(|(i, &loss)| (i as f64, loss))
            .collect(),
    }];
    plot_line_series(
        &loss_series,
        "MLP Training Loss",
        "Epoch",
        "Loss",
        plots_dir,
        "mc_dropout_loss.png",
    )?;

    let std_values: Vec<f64> = std_probs.iter().copied().collect();
    plot_histogram(
        &std_values,
        20,
        "Predictive Uncertainty",
        "Std of MC probabilities",
        plots_dir,
        "mc_dropout_uncertainty.png",
    )?;

    let groups = [
        ("Correct".to_string(), correct_points),
        ("Incorrect".to_string(), incorrect_points),
    ];
    plot_scatter_groups(
        &groups,
        "Uncertainty by Prediction Outcome",
        "Mean MC probability",
        "Std of MC probabilities",
        plots_dir,
        "mc_dropout_scatter.png",
    )?;

    println!("Plots saved to: {}", plots_dir.display());
    Ok(())
}
