use std::error::Error;
use std::path::Path;

use ndarray::Array2;

use crate::data::StratifiedKFold;
use crate::linear::LogisticRegression;
use crate::model_selection::{cross_validate, mean_and_std};
use crate::preprocess::{PolynomialFeatures, StandardScaler};

use super::visualization::{plot_line_series, LineSeriesData};

/// Expansion hyperparameters
pub const MAX_DEGREE: usize = 3;
pub const L2_PENALTIES: [f64; 4] = [0.001, 0.1, 1.0, 10.0];
pub const N_FOLDS: usize = 5;
pub const LEARNING_RATE: f64 = 0.1;
pub const MAX_ITER: usize = 500;
pub const FOLD_SEED: u64 = 42;

/// Degree-`degree` design matrix: the expanded feature matrix with
/// every monomial column standardized.
fn design_matrix(features: &Array2<f64>, degree: usize) -> Result<Array2<f64>, Box<dyn Error>> {
    let expanded = PolynomialFeatures::new(degree).transform(features)?;
    let mut scaler = StandardScaler::new();
    Ok(scaler.fit_transform(&expanded)?)
}

/// Runs the polynomial-features experiment
///
/// Expands the feature matrix with interaction and power terms at
/// increasing degrees and cross-validates a regularized logistic
/// regression at each degree, showing where extra capacity tips into
/// overfitting and how the L2 penalty pushes that point back.
///
/// # Returns
/// Ok(()) on success, or an error if any step fails
pub fn run_polynomial_experiment(data_dir: &Path, plots_dir: &Path) -> Result<(), Box<dyn Error>> {
    println!("Loading Titanic dataset...");
    let data = super::load_dataset(data_dir)?;
    println!("Dataset loaded: {} passengers", data.features.nrows());

    let folds = StratifiedKFold::new(N_FOLDS, FOLD_SEED).split(&data.labels)?;

    let mut series: Vec<LineSeriesData> = L2_PENALTIES
        .iter()
        .map(|&l2| LineSeriesData {
            label: format!("l2 = {l2}"),
            points: Vec::new(),
        })
        .collect();

    println!("\n  Degree  Columns        l2   accuracy        std");
    for degree in 1..=MAX_DEGREE {
        let features = design_matrix(&data.features, degree)?;

        for (idx, &l2) in L2_PENALTIES.iter().enumerate() {
            let scores = cross_validate(
                || {
                    LogisticRegression::new()
                        .with_learning_rate(LEARNING_RATE)
                        .with_max_iter(MAX_ITER)
                        .with_l2(l2)
                },
                &features,
                &data.labels,
                &folds,
            )?;
            let (mean_score, std_score) = mean_and_std(&scores);
            println!(
                "  {:>6}  {:>7}  {:>8}   {:>8.4}   {:>8.4}",
                degree,
                features.ncols(),
                l2,
                mean_score,
                std_score
            );
            series[idx].points.push((degree as f64, mean_score));
        }
    }

    std::fs::create_dir_all(plots_dir)?;
    println!("\nPlotting accuracy against polynomial degree...");
    plot_line_series(
        &series,
        "Polynomial Degree vs CV Accuracy",
        "Degree",
        "CV accuracy",
        plots_dir,
        "polynomial_accuracy.png",
    )?;

    println!("Plots saved to: {}", plots_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Axis};

    #[test]
    fn test_design_matrix_standardizes_the_expanded_columns() {
        let x = array![[1.0, 100.0], [2.0, 200.0], [3.0, 300.0], [4.0, 400.0]];
        let design = design_matrix(&x, 2).unwrap();
        // a, b, a^2, a*b, b^2
        assert_eq!(design.ncols(), 5);

        // Every monomial column comes out centered and unit-scale, the
        // power terms included.
        for column in design.axis_iter(Axis(1)) {
            let mean = column.mean().unwrap_or(f64::NAN);
            let std = column.std(0.0);
            assert!(mean.abs() < 1e-9, "column mean was {mean}");
            assert!((std - 1.0).abs() < 1e-9, "column std was {std}");
        }
    }
}
