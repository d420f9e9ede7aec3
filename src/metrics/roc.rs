use ndarray::Array1;

use crate::error::{Result, TitanicError};
use crate::metrics::classification::confusion_counts;

/// Classification rates measured at one decision threshold.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdMetrics {
    pub threshold: f64,
    pub sensitivity: f64,
    pub specificity: f64,
    pub accuracy: f64,
}

/// Evaluates sensitivity, specificity and accuracy over a grid of
/// decision thresholds.
///
/// Thresholds run from 1.0 down to 0.0 inclusive, evenly spaced, so the
/// implied ROC curve starts at `(0, 0)` and ends at `(1, 1)`.
///
/// # Arguments
/// * `probabilities` - Predicted positive-class probabilities
/// * `targets` - Ground-truth labels
/// * `n_thresholds` - Number of grid points, at least 2
///
/// # Returns
/// One [`ThresholdMetrics`] per grid point, in sweep order
pub fn threshold_sweep(
    probabilities: &Array1<f64>,
    targets: &Array1<f64>,
    n_thresholds: usize,
) -> Result<Vec<ThresholdMetrics>> {
    if n_thresholds < 2 {
        return Err(TitanicError::InvalidParameter(format!(
            "need at least 2 thresholds, got {n_thresholds}"
        )));
    }
    if probabilities.len() != targets.len() {
        return Err(TitanicError::DimensionMismatch(format!(
            "{} probabilities but {} targets",
            probabilities.len(),
            targets.len()
        )));
    }

    let mut metrics = Vec::with_capacity(n_thresholds);
    for step in 0..n_thresholds {
        let threshold = 1.0 - step as f64 / (n_thresholds - 1) as f64;
        let counts = confusion_counts(probabilities, targets, threshold);
        metrics.push(ThresholdMetrics {
            threshold,
            sensitivity: counts.sensitivity(),
            specificity: counts.specificity(),
            accuracy: counts.accuracy(),
        });
    }
    Ok(metrics)
}

/// One point on a ROC curve.
#[derive(Debug, Clone, Copy)]
pub struct RocPoint {
    pub false_positive_rate: f64,
    pub true_positive_rate: f64,
}

/// ROC curve traced by sweeping the decision threshold from 1 to 0.
#[derive(Debug, Clone)]
pub struct RocCurve {
    pub points: Vec<RocPoint>,
}

impl RocCurve {
    /// Builds the curve from predicted probabilities and targets.
    pub fn from_predictions(
        probabilities: &Array1<f64>,
        targets: &Array1<f64>,
        n_thresholds: usize,
    ) -> Result<Self> {
        let sweep = threshold_sweep(probabilities, targets, n_thresholds)?;
        let points = sweep
            .iter()
            .map(|m| RocPoint {
                false_positive_rate: 1.0 - m.specificity,
                true_positive_rate: m.sensitivity,
            })
            .collect();
        Ok(RocCurve { points })
    }

    /// Area under the curve by the trapezoid rule.
    pub fn auc(&self) -> f64 {
        let mut area = 0.0;
        for pair in self.points.windows(2) {
            let width = pair[1].false_positive_rate - pair[0].false_positive_rate;
            let height = (pair[0].true_positive_rate + pair[1].true_positive_rate) / 2.0;
            area += width * height;
        }
        area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sweep_endpoints() {
        let probs = array![0.8, 0.3, 0.6, 0.1];
        let targets = array![1.0, 0.0, 1.0, 0.0];
        let sweep = threshold_sweep(&probs, &targets, 11).unwrap();

        assert_eq!(sweep.len(), 11);
        assert!((sweep[0].threshold - 1.0).abs() < 1e-12);
        assert!(sweep[10].threshold.abs() < 1e-12);

        // Threshold 0 predicts everything positive.
        assert!((sweep[10].sensitivity - 1.0).abs() < 1e-12);
        assert!(sweep[10].specificity.abs() < 1e-12);
    }

    #[test]
    fn test_sweep_rejects_single_threshold() {
        let probs = array![0.5];
        let targets = array![1.0];
        assert!(threshold_sweep(&probs, &targets, 1).is_err());
    }

    #[test]
    fn test_perfect_classifier_auc_is_one() {
        let probs = array![0.9, 0.8, 0.2, 0.1];
        let targets = array![1.0, 1.0, 0.0, 0.0];
        let curve = RocCurve::from_predictions(&probs, &targets, 101).unwrap();
        assert!((curve.auc() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_random_classifier_auc_near_half() {
        // Identical probabilities carry no ranking information.
        let probs = array![0.5, 0.5, 0.5, 0.5];
        let targets = array![1.0, 0.0, 1.0, 0.0];
        let curve = RocCurve::from_predictions(&probs, &targets, 101).unwrap();
        assert!((curve.auc() - 0.5).abs() < 0.02);
    }

    #[test]
    fn test_curve_spans_unit_square() {
        let probs = array![0.7, 0.4, 0.6, 0.3];
        let targets = array![1.0, 0.0, 0.0, 1.0];
        let curve = RocCurve::from_predictions(&probs, &targets, 51).unwrap();
        let first = curve.points.first().unwrap();
        let last = curve.points.last().unwrap();
        assert!(first.false_positive_rate.abs() < 1e-12);
        assert!(first.true_positive_rate.abs() < 1e-12);
        assert!((last.false_positive_rate - 1.0).abs() < 1e-12);
        assert!((last.true_positive_rate - 1.0).abs() < 1e-12);
    }
}
