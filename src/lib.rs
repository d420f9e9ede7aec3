//! Classical machine-learning workflow steps on the Kaggle Titanic dataset.
//!
//! Each module covers one building block of the tutorial lineage: fetching
//! and encoding the passenger table, standardization and polynomial
//! expansion, logistic regression, a small dropout MLP, evaluation metrics
//! (accuracy, ROC, calibration), post-hoc recalibration, and model
//! selection (k-fold CV, grid/random search, greedy feature selection).
//! The `experiments` module strings them into runnable end-to-end
//! experiments, one per binary under `src/bin/`.

pub mod calibrate;
pub mod data;
pub mod error;
pub mod experiments;
pub mod linear;
pub mod metrics;
pub mod model_selection;
pub mod nn;
pub mod optim;
pub mod preprocess;

use ndarray::{Array1, Array2};

pub use error::{Result, TitanicError};

/// Common interface for the crate's binary classifiers.
///
/// Labels are 0.0/1.0; probabilities refer to the positive class
/// (survival). Implemented by [`linear::LogisticRegression`] and
/// [`nn::MlpClassifier`] so cross-validation and the search routines can
/// train either one.
pub trait Classifier {
    /// Fits the model to the given features and labels.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predicted probability of the positive class for each row.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Hard 0.0/1.0 predictions at the 0.5 decision boundary.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self
            .predict_proba(x)?
            .mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    /// Accuracy of the hard predictions against the given labels.
    fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        Ok(metrics::calculate_accuracy(&self.predict(x)?, y))
    }
}
