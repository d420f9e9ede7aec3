use ndarray::Array1;

use crate::calibrate::Calibrator;
use crate::error::{Result, TitanicError};
use crate::linear::{logit, sigmoid};

/// Platt scaling: a one-dimensional logistic fit on the log-odds.
///
/// Learns `sigmoid(a * logit(p) + b)` by gradient descent on the
/// cross-entropy of the calibration set. With `a = 1, b = 0` the map is
/// the identity, which is also the starting point of the fit.
#[derive(Debug, Clone)]
pub struct PlattScaling {
    pub learning_rate: f64,
    pub max_iter: usize,
    slope: f64,
    offset: f64,
    fitted: bool,
}

impl Default for PlattScaling {
    fn default() -> Self {
        Self::new()
    }
}

impl PlattScaling {
    pub fn new() -> Self {
        PlattScaling {
            learning_rate: 0.1,
            max_iter: 2000,
            slope: 1.0,
            offset: 0.0,
            fitted: false,
        }
    }

    /// Learned `(slope, offset)` of the log-odds map.
    pub fn coefficients(&self) -> (f64, f64) {
        (self.slope, self.offset)
    }
}

impl Calibrator for PlattScaling {
    fn fit(&mut self, probabilities: &Array1<f64>, targets: &Array1<f64>) -> Result<()> {
        if probabilities.is_empty() {
            return Err(TitanicError::EmptyData(
                "cannot calibrate on zero samples".to_string(),
            ));
        }
        if probabilities.len() != targets.len() {
            return Err(TitanicError::DimensionMismatch(format!(
                "{} probabilities but {} targets",
                probabilities.len(),
                targets.len()
            )));
        }

        let scores = probabilities.mapv(logit);
        let n = scores.len() as f64;
        let mut slope = 1.0;
        let mut offset = 0.0;

        for _ in 0..self.max_iter {
            let calibrated = scores.mapv(|z| sigmoid(slope * z + offset));
            let errors = &calibrated - targets;
            let grad_slope = (&errors * &scores).sum() / n;
            let grad_offset = errors.sum() / n;
            slope -= self.learning_rate * grad_slope;
            offset -= self.learning_rate * grad_offset;
        }

        self.slope = slope;
        self.offset = offset;
        self.fitted = true;
        Ok(())
    }

    fn calibrate(&self, probabilities: &Array1<f64>) -> Result<Array1<f64>> {
        if !self.fitted {
            return Err(TitanicError::NotFitted(
                "Platt scaling has not been fitted".to_string(),
            ));
        }
        Ok(probabilities.mapv(|p| sigmoid(self.slope * logit(p) + self.offset)))
    }
}
