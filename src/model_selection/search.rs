use itertools::Itertools;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::StratifiedKFold;
use crate::error::{Result, TitanicError};
use crate::linear::LogisticRegression;
use crate::model_selection::cross_validation::{cross_validate, mean_and_std};

/// Exhaustive grid of logistic-regression hyperparameters.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    pub learning_rates: Vec<f64>,
    pub l2_penalties: Vec<f64>,
}

/// Continuous ranges sampled by [`random_search`].
///
/// Both ranges are sampled log-uniformly, so each decade is equally
/// likely. Bounds must be positive.
#[derive(Debug, Clone)]
pub struct ParamRanges {
    pub learning_rate: (f64, f64),
    pub l2: (f64, f64),
}

/// Cross-validated score of one hyperparameter combination.
#[derive(Debug, Clone, Copy)]
pub struct SearchOutcome {
    pub learning_rate: f64,
    pub l2: f64,
    pub mean_score: f64,
    pub std_score: f64,
}

/// All evaluated combinations plus the winner.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Outcomes in evaluation order.
    pub outcomes: Vec<SearchOutcome>,
    /// The outcome with the highest mean score. Ties keep the earliest
    /// evaluated combination.
    pub best: SearchOutcome,
}

impl SearchResult {
    fn from_outcomes(outcomes: Vec<SearchOutcome>) -> Result<Self> {
        let mut best: Option<SearchOutcome> = None;
        for outcome in &outcomes {
            let improved = match best {
                None => true,
                Some(current) => outcome.mean_score > current.mean_score,
            };
            if improved {
                best = Some(*outcome);
            }
        }
        let best = best.ok_or_else(|| {
            TitanicError::EmptyData("search evaluated no combinations".to_string())
        })?;
        Ok(SearchResult { outcomes, best })
    }

    /// Prints the top `n` combinations by mean score.
    pub fn print_top(&self, n: usize) {
        let mut ranked = self.outcomes.clone();
        ranked.sort_by(|a, b| b.mean_score.total_cmp(&a.mean_score));
        println!("    learning_rate        l2   accuracy        std");
        for outcome in ranked.iter().take(n) {
            println!(
                "    {:>13.4}  {:>8.4}   {:>8.4}   {:>8.4}",
                outcome.learning_rate, outcome.l2, outcome.mean_score, outcome.std_score
            );
        }
    }
}

fn evaluate_combination(
    learning_rate: f64,
    l2: f64,
    features: &Array2<f64>,
    labels: &Array1<f64>,
    folds: &[(Vec<usize>, Vec<usize>)],
    max_iter: usize,
) -> Result<SearchOutcome> {
    let scores = cross_validate(
        || {
            LogisticRegression::new()
                .with_learning_rate(learning_rate)
                .with_l2(l2)
                .with_max_iter(max_iter)
        },
        features,
        labels,
        folds,
    )?;
    let (mean_score, std_score) = mean_and_std(&scores);
    Ok(SearchOutcome {
        learning_rate,
        l2,
        mean_score,
        std_score,
    })
}

/// Scores every grid combination with stratified k-fold accuracy.
///
/// # Arguments
/// * `grid` - Learning rates and L2 penalties to combine
/// * `features` - Full feature matrix
/// * `labels` - Full label vector
/// * `n_folds` - Folds for the stratified splitter
/// * `max_iter` - Gradient-descent iterations per fit
/// * `seed` - Seed for the fold shuffling
pub fn grid_search(
    grid: &ParamGrid,
    features: &Array2<f64>,
    labels: &Array1<f64>,
    n_folds: usize,
    max_iter: usize,
    seed: u64,
) -> Result<SearchResult> {
    if grid.learning_rates.is_empty() || grid.l2_penalties.is_empty() {
        return Err(TitanicError::InvalidParameter(
            "grid axes must be non-empty".to_string(),
        ));
    }

    let folds = StratifiedKFold::new(n_folds, seed).split(labels)?;
    let mut outcomes = Vec::with_capacity(grid.learning_rates.len() * grid.l2_penalties.len());
    for (&learning_rate, &l2) in grid
        .learning_rates
        .iter()
        .cartesian_product(grid.l2_penalties.iter())
    {
        outcomes.push(evaluate_combination(
            learning_rate,
            l2,
            features,
            labels,
            &folds,
            max_iter,
        )?);
    }
    SearchResult::from_outcomes(outcomes)
}

/// Draws one value log-uniformly from `(low, high)`.
fn sample_log_uniform(range: (f64, f64), rng: &mut StdRng) -> f64 {
    let (low, high) = range;
    let exponent = rng.gen_range(low.ln()..=high.ln());
    exponent.exp()
}

/// Samples random hyperparameter combinations and scores each with
/// stratified k-fold accuracy.
///
/// Unlike [`grid_search`] the two axes are drawn independently, so
/// `n_samples` draws explore `n_samples` distinct values per axis.
pub fn random_search(
    ranges: &ParamRanges,
    n_samples: usize,
    features: &Array2<f64>,
    labels: &Array1<f64>,
    n_folds: usize,
    max_iter: usize,
    seed: u64,
) -> Result<SearchResult> {
    if n_samples == 0 {
        return Err(TitanicError::InvalidParameter(
            "n_samples must be positive".to_string(),
        ));
    }
    for (name, (low, high)) in [("learning_rate", ranges.learning_rate), ("l2", ranges.l2)] {
        if !(low > 0.0 && high > low) {
            return Err(TitanicError::InvalidParameter(format!(
                "{name} range must satisfy 0 < low < high, got ({low}, {high})"
            )));
        }
    }

    let folds = StratifiedKFold::new(n_folds, seed).split(labels)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut outcomes = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let learning_rate = sample_log_uniform(ranges.learning_rate, &mut rng);
        let l2 = sample_log_uniform(ranges.l2, &mut rng);
        outcomes.push(evaluate_combination(
            learning_rate,
            l2,
            features,
            labels,
            &folds,
            max_iter,
        )?);
    }
    SearchResult::from_outcomes(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn noisy_dataset(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array::from_shape_fn((n, 2), |(i, j)| {
            let signal = if i % 2 == 0 { -1.0 } else { 1.0 };
            signal + 0.1 * ((i * 7 + j * 3) % 5) as f64
        });
        let y = Array::from_shape_fn(n, |i| (i % 2) as f64);
        (x, y)
    }

    #[test]
    fn test_grid_search_covers_all_combinations() {
        let (x, y) = noisy_dataset(40);
        let grid = ParamGrid {
            learning_rates: vec![0.05, 0.1],
            l2_penalties: vec![0.01, 0.1, 1.0],
        };
        let result = grid_search(&grid, &x, &y, 4, 100, 42).unwrap();

        assert_eq!(result.outcomes.len(), 6);
        assert!(result.best.mean_score > 0.8);
        assert!(result
            .outcomes
            .iter()
            .all(|o| o.mean_score <= result.best.mean_score));
    }

    #[test]
    fn test_grid_search_rejects_empty_axis() {
        let (x, y) = noisy_dataset(20);
        let grid = ParamGrid {
            learning_rates: vec![],
            l2_penalties: vec![0.1],
        };
        assert!(grid_search(&grid, &x, &y, 4, 10, 0).is_err());
    }

    #[test]
    fn test_random_search_respects_ranges() {
        let (x, y) = noisy_dataset(40);
        let ranges = ParamRanges {
            learning_rate: (0.01, 1.0),
            l2: (0.001, 10.0),
        };
        let result = random_search(&ranges, 8, &x, &y, 4, 50, 7).unwrap();

        assert_eq!(result.outcomes.len(), 8);
        for outcome in &result.outcomes {
            assert!(outcome.learning_rate >= 0.01 && outcome.learning_rate <= 1.0);
            assert!(outcome.l2 >= 0.001 && outcome.l2 <= 10.0);
        }
    }

    #[test]
    fn test_random_search_is_deterministic() {
        let (x, y) = noisy_dataset(30);
        let ranges = ParamRanges {
            learning_rate: (0.01, 1.0),
            l2: (0.01, 1.0),
        };
        let a = random_search(&ranges, 4, &x, &y, 3, 20, 5).unwrap();
        let b = random_search(&ranges, 4, &x, &y, 3, 20, 5).unwrap();
        for (left, right) in a.outcomes.iter().zip(b.outcomes.iter()) {
            assert_eq!(left.learning_rate, right.learning_rate);
            assert_eq!(left.l2, right.l2);
        }
    }

    #[test]
    fn test_random_search_rejects_bad_range() {
        let (x, y) = noisy_dataset(20);
        let ranges = ParamRanges {
            learning_rate: (0.0, 1.0),
            l2: (0.01, 1.0),
        };
        assert!(random_search(&ranges, 3, &x, &y, 3, 10, 0).is_err());
    }
}
