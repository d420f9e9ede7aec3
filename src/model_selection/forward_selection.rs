use ndarray::{Array1, Array2, Axis};

use crate::data::StratifiedKFold;
use crate::error::{Result, TitanicError};
use crate::linear::LogisticRegression;
use crate::model_selection::cross_validation::{cross_validate, mean_and_std};

/// One accepted feature during greedy forward selection.
#[derive(Debug, Clone)]
pub struct ForwardSelectionStep {
    pub feature_index: usize,
    pub feature_name: String,
    /// Mean cross-validated accuracy of the subset up to this step.
    pub cv_accuracy: f64,
}

/// Greedy forward feature selection with a logistic-regression scorer.
///
/// Starts from the empty set and repeatedly adds the feature whose
/// inclusion gives the highest mean stratified-k-fold accuracy. Stops
/// as soon as no remaining feature strictly improves the score, so the
/// returned subset can be smaller than the full feature set. The same
/// folds are reused for every evaluation, keeping scores comparable
/// across steps.
///
/// # Arguments
/// * `features` - Full feature matrix
/// * `labels` - Full label vector
/// * `feature_names` - One name per feature column
/// * `n_folds` - Folds for the stratified splitter
/// * `max_iter` - Gradient-descent iterations per fit
/// * `seed` - Seed for the fold shuffling
///
/// # Returns
/// Accepted features in selection order
pub fn forward_selection(
    features: &Array2<f64>,
    labels: &Array1<f64>,
    feature_names: &[&str],
    n_folds: usize,
    max_iter: usize,
    seed: u64,
) -> Result<Vec<ForwardSelectionStep>> {
    if features.ncols() != feature_names.len() {
        return Err(TitanicError::DimensionMismatch(format!(
            "{} feature columns but {} names",
            features.ncols(),
            feature_names.len()
        )));
    }
    if features.ncols() == 0 {
        return Err(TitanicError::EmptyData(
            "no candidate features to select from".to_string(),
        ));
    }

    let folds = StratifiedKFold::new(n_folds, seed).split(labels)?;

    let mut selected: Vec<usize> = Vec::new();
    let mut steps: Vec<ForwardSelectionStep> = Vec::new();
    let mut best_so_far = f64::NEG_INFINITY;

    loop {
        let mut best_candidate: Option<(usize, f64)> = None;
        for candidate in 0..features.ncols() {
            if selected.contains(&candidate) {
                continue;
            }
            let mut columns = selected.clone();
            columns.push(candidate);
            let subset = features.select(Axis(1), &columns);
            let scores = cross_validate(
                || LogisticRegression::new().with_max_iter(max_iter),
                &subset,
                labels,
                &folds,
            )?;
            let (mean_score, _) = mean_and_std(&scores);
            // Ties keep the lowest candidate index.
            let improved = match best_candidate {
                None => true,
                Some((_, current)) => mean_score > current,
            };
            if improved {
                best_candidate = Some((candidate, mean_score));
            }
        }

        match best_candidate {
            Some((index, score)) if score > best_so_far => {
                selected.push(index);
                steps.push(ForwardSelectionStep {
                    feature_index: index,
                    feature_name: feature_names[index].to_string(),
                    cv_accuracy: score,
                });
                best_so_far = score;
            }
            _ => break,
        }
    }

    Ok(steps)
}
