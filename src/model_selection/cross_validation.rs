use ndarray::{Array1, Array2, Axis};

use crate::error::{Result, TitanicError};
use crate::Classifier;

/// Scores a model over precomputed cross-validation folds.
///
/// A fresh model is built per fold so no state leaks between folds.
///
/// # Arguments
/// * `build_model` - Constructor for an unfitted model
/// * `features` - Full feature matrix
/// * `labels` - Full label vector
/// * `folds` - `(train_indices, test_indices)` pairs from a splitter
///
/// # Returns
/// Held-out accuracy per fold, in fold order
pub fn cross_validate<M, F>(
    build_model: F,
    features: &Array2<f64>,
    labels: &Array1<f64>,
    folds: &[(Vec<usize>, Vec<usize>)],
) -> Result<Vec<f64>>
where
    M: Classifier,
    F: Fn() -> M,
{
    if features.nrows() != labels.len() {
        return Err(TitanicError::DimensionMismatch(format!(
            "{} feature rows but {} labels",
            features.nrows(),
            labels.len()
        )));
    }
    if folds.is_empty() {
        return Err(TitanicError::InvalidParameter(
            "no folds to evaluate".to_string(),
        ));
    }

    let mut scores = Vec::with_capacity(folds.len());
    for (train_indices, test_indices) in folds {
        let train_x = features.select(Axis(0), train_indices);
        let train_y = labels.select(Axis(0), train_indices);
        let test_x = features.select(Axis(0), test_indices);
        let test_y = labels.select(Axis(0), test_indices);

        let mut model = build_model();
        model.fit(&train_x, &train_y)?;
        scores.push(model.score(&test_x, &test_y)?);
    }
    Ok(scores)
}

/// Mean and population standard deviation of a score list.
pub fn mean_and_std(scores: &[f64]) -> (f64, f64) {
    if scores.is_empty() {
        return (0.0, 0.0);
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StratifiedKFold;
    use crate::linear::LogisticRegression;
    use ndarray::Array;

    fn separable_dataset(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array::from_shape_fn((n, 1), |(i, _)| {
            if i % 2 == 0 {
                -2.0 - (i as f64) * 0.01
            } else {
                2.0 + (i as f64) * 0.01
            }
        });
        let y = Array::from_shape_fn(n, |i| (i % 2) as f64);
        (x, y)
    }

    #[test]
    fn test_cross_validate_separable_data() {
        let (x, y) = separable_dataset(60);
        let folds = StratifiedKFold::new(5, 42).split(&y).unwrap();
        let scores = cross_validate(
            || LogisticRegression::new().with_max_iter(300),
            &x,
            &y,
            &folds,
        )
        .unwrap();

        assert_eq!(scores.len(), 5);
        for score in &scores {
            assert!(*score > 0.9, "fold score was {score}");
        }
    }

    #[test]
    fn test_cross_validate_rejects_empty_folds() {
        let (x, y) = separable_dataset(10);
        let result =
            cross_validate(|| LogisticRegression::new(), &x, &y, &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mean_and_std() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_and_std_empty() {
        assert_eq!(mean_and_std(&[]), (0.0, 0.0));
    }
}
