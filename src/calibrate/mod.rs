//! Post-hoc probability calibration.
//!
//! Calibrators learn a monotone map from raw model probabilities to
//! corrected ones on a held-out set, leaving the underlying classifier
//! untouched.

pub mod isotonic;
pub mod platt;

pub use isotonic::IsotonicRegression;
pub use platt::PlattScaling;

use ndarray::Array1;

use crate::error::Result;

/// A post-hoc probability calibrator.
pub trait Calibrator {
    /// Learns the correction from predicted probabilities and their
    /// true labels on a held-out calibration set.
    fn fit(&mut self, probabilities: &Array1<f64>, targets: &Array1<f64>) -> Result<()>;

    /// Maps raw probabilities to calibrated ones.
    fn calibrate(&self, probabilities: &Array1<f64>) -> Result<Array1<f64>>;
}
