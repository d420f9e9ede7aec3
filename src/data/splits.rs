use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Result, TitanicError};

/// Splits a dataset into train and test partitions, stratified by label.
///
/// Indices are shuffled within each class before the cut so both partitions
/// keep the overall survival rate.
///
/// # Arguments
/// * `features` - Feature matrix of shape `(n, d)`
/// * `labels` - Binary labels of length `n`
/// * `test_fraction` - Fraction of each class held out, in `(0, 1)`
/// * `seed` - Seed for the shuffling RNG
///
/// # Returns
/// `((train_x, train_y), (test_x, test_y))`
#[allow(clippy::type_complexity)]
pub fn train_test_split(
    features: &Array2<f64>,
    labels: &Array1<f64>,
    test_fraction: f64,
    seed: u64,
) -> Result<((Array2<f64>, Array1<f64>), (Array2<f64>, Array1<f64>))> {
    if features.nrows() != labels.len() {
        return Err(TitanicError::DimensionMismatch(format!(
            "{} feature rows but {} labels",
            features.nrows(),
            labels.len()
        )));
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TitanicError::InvalidParameter(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    if labels.is_empty() {
        return Err(TitanicError::EmptyData(
            "cannot split an empty dataset".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_indices = Vec::new();
    let mut test_indices = Vec::new();

    for class in [0.0, 1.0] {
        let mut class_indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &y)| y == class)
            .map(|(i, _)| i)
            .collect();
        class_indices.shuffle(&mut rng);
        let n_test = (class_indices.len() as f64 * test_fraction).round() as usize;
        let n_train = class_indices.len() - n_test;
        train_indices.extend_from_slice(&class_indices[..n_train]);
        test_indices.extend_from_slice(&class_indices[n_train..]);
    }

    train_indices.sort_unstable();
    test_indices.sort_unstable();

    let train = (
        features.select(Axis(0), &train_indices),
        labels.select(Axis(0), &train_indices),
    );
    let test = (
        features.select(Axis(0), &test_indices),
        labels.select(Axis(0), &test_indices),
    );
    Ok((train, test))
}

/// Plain k-fold splitter over shuffled row indices.
#[derive(Debug, Clone)]
pub struct KFold {
    pub n_splits: usize,
    pub seed: u64,
}

impl KFold {
    pub fn new(n_splits: usize, seed: u64) -> Self {
        KFold { n_splits, seed }
    }

    /// Produces `(train_indices, test_indices)` pairs, one per fold.
    ///
    /// The first `n_samples % n_splits` folds receive one extra sample so
    /// fold sizes differ by at most one.
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(TitanicError::InvalidParameter(format!(
                "n_splits must be at least 2, got {}",
                self.n_splits
            )));
        }
        if n_samples < self.n_splits {
            return Err(TitanicError::InvalidParameter(format!(
                "cannot split {} samples into {} folds",
                n_samples, self.n_splits
            )));
        }

        let mut order: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        order.shuffle(&mut rng);

        let base = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;
        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < remainder);
            let mut test: Vec<usize> = order[start..start + size].to_vec();
            let mut train: Vec<usize> = order[..start]
                .iter()
                .chain(order[start + size..].iter())
                .copied()
                .collect();
            test.sort_unstable();
            train.sort_unstable();
            folds.push((train, test));
            start += size;
        }
        Ok(folds)
    }
}

/// K-fold splitter that keeps each fold's class balance close to the
/// full dataset's.
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    pub n_splits: usize,
    pub seed: u64,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize, seed: u64) -> Self {
        StratifiedKFold { n_splits, seed }
    }

    /// Produces `(train_indices, test_indices)` pairs, one per fold.
    ///
    /// Each class's indices are shuffled then dealt round-robin across
    /// folds, so per-fold class counts differ by at most one.
    pub fn split(&self, labels: &Array1<f64>) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(TitanicError::InvalidParameter(format!(
                "n_splits must be at least 2, got {}",
                self.n_splits
            )));
        }
        if labels.len() < self.n_splits {
            return Err(TitanicError::InvalidParameter(format!(
                "cannot split {} samples into {} folds",
                labels.len(),
                self.n_splits
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut fold_members: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];

        for class in [0.0, 1.0] {
            let mut class_indices: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|(_, &y)| y == class)
                .map(|(i, _)| i)
                .collect();
            class_indices.shuffle(&mut rng);
            for (position, index) in class_indices.into_iter().enumerate() {
                fold_members[position % self.n_splits].push(index);
            }
        }

        let mut folds = Vec::with_capacity(self.n_splits);
        for fold in 0..self.n_splits {
            let mut test = fold_members[fold].clone();
            let mut train: Vec<usize> = fold_members
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != fold)
                .flat_map(|(_, members)| members.iter().copied())
                .collect();
            test.sort_unstable();
            train.sort_unstable();
            folds.push((train, test));
        }
        Ok(folds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn toy_dataset(n: usize) -> (Array2<f64>, Array1<f64>) {
        let features = Array::from_shape_fn((n, 3), |(i, j)| (i * 3 + j) as f64);
        // 40% positives.
        let labels = Array::from_shape_fn(n, |i| if i % 5 < 2 { 1.0 } else { 0.0 });
        (features, labels)
    }

    #[test]
    fn test_train_test_split_sizes_and_stratification() {
        let (x, y) = toy_dataset(100);
        let ((train_x, train_y), (test_x, test_y)) =
            train_test_split(&x, &y, 0.2, 42).unwrap();

        assert_eq!(train_x.nrows(), 80);
        assert_eq!(test_x.nrows(), 20);
        assert_eq!(train_y.len(), 80);
        assert_eq!(test_y.len(), 20);

        // Both partitions keep the 40% positive rate.
        assert!((train_y.sum() - 32.0).abs() < 1e-12);
        assert!((test_y.sum() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_train_test_split_rows_follow_indices() {
        let (x, y) = toy_dataset(20);
        let ((train_x, _), (test_x, _)) = train_test_split(&x, &y, 0.25, 7).unwrap();
        // Every row of x appears exactly once across the partitions.
        let mut first_columns: Vec<f64> = train_x
            .column(0)
            .iter()
            .chain(test_x.column(0).iter())
            .copied()
            .collect();
        first_columns.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f64> = (0..20).map(|i| (i * 3) as f64).collect();
        assert_eq!(first_columns, expected);
    }

    #[test]
    fn test_train_test_split_rejects_bad_fraction() {
        let (x, y) = toy_dataset(10);
        assert!(train_test_split(&x, &y, 0.0, 0).is_err());
        assert!(train_test_split(&x, &y, 1.0, 0).is_err());
    }

    #[test]
    fn test_kfold_partitions_all_samples() {
        let folds = KFold::new(4, 3).split(22).unwrap();
        assert_eq!(folds.len(), 4);

        let mut all_test: Vec<usize> = Vec::new();
        for (train, test) in &folds {
            assert_eq!(train.len() + test.len(), 22);
            // Sizes differ by at most one: 22 = 6 + 6 + 5 + 5.
            assert!(test.len() == 5 || test.len() == 6);
            for i in test {
                assert!(!train.contains(i));
            }
            all_test.extend_from_slice(test);
        }
        all_test.sort_unstable();
        assert_eq!(all_test, (0..22).collect::<Vec<_>>());
    }

    #[test]
    fn test_kfold_is_deterministic() {
        let a = KFold::new(5, 11).split(50).unwrap();
        let b = KFold::new(5, 11).split(50).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stratified_kfold_balances_classes() {
        let (_, y) = toy_dataset(50);
        let folds = StratifiedKFold::new(5, 42).split(&y).unwrap();
        assert_eq!(folds.len(), 5);

        let mut all_test: Vec<usize> = Vec::new();
        for (_, test) in &folds {
            let positives = test.iter().filter(|&&i| y[i] == 1.0).count();
            // 20 positives over 5 folds leaves exactly 4 per fold.
            assert_eq!(positives, 4);
            all_test.extend_from_slice(test);
        }
        all_test.sort_unstable();
        assert_eq!(all_test, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_stratified_kfold_spreads_rare_class_one_per_fold() {
        // 3 positives among 15 samples, fewer than the 5 folds.
        let y = Array::from_shape_fn(15, |i| if i % 5 == 4 { 1.0 } else { 0.0 });
        let folds = StratifiedKFold::new(5, 7).split(&y).unwrap();
        assert_eq!(folds.len(), 5);

        let mut all_test: Vec<usize> = Vec::new();
        let mut positives_per_fold: Vec<usize> = Vec::new();
        for (train, test) in &folds {
            assert_eq!(train.len() + test.len(), 15);
            positives_per_fold.push(test.iter().filter(|&&i| y[i] == 1.0).count());
            all_test.extend_from_slice(test);
        }
        all_test.sort_unstable();
        assert_eq!(all_test, (0..15).collect::<Vec<_>>());

        // The rare class is dealt one per fold until it runs out.
        positives_per_fold.sort_unstable();
        assert_eq!(positives_per_fold, vec![0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_kfold_rejects_too_few_samples() {
        assert!(KFold::new(5, 0).split(3).is_err());
        assert!(KFold::new(1, 0).split(10).is_err());
    }
}
