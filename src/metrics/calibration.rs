use ndarray::Array1;

use crate::error::{Result, TitanicError};

/// Summary of one probability bin in a reliability diagram.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationBin {
    /// Mean predicted probability of the samples in the bin.
    pub mean_predicted: f64,
    /// Observed fraction of positives in the bin.
    pub fraction_positive: f64,
    /// Number of samples in the bin.
    pub count: usize,
}

/// Bins predictions into equal-width probability intervals and reports
/// predicted versus observed positive rates per bin.
///
/// Empty bins are skipped. A probability of exactly 1.0 lands in the
/// last bin.
///
/// # Arguments
/// * `probabilities` - Predicted positive-class probabilities
/// * `targets` - Ground-truth labels
/// * `n_bins` - Number of equal-width bins over `[0, 1]`
///
/// # Returns
/// Non-empty bins ordered by probability interval
pub fn calibration_curve(
    probabilities: &Array1<f64>,
    targets: &Array1<f64>,
    n_bins: usize,
) -> Result<Vec<CalibrationBin>> {
    if n_bins == 0 {
        return Err(TitanicError::InvalidParameter(
            "n_bins must be positive".to_string(),
        ));
    }
    if probabilities.len() != targets.len() {
        return Err(TitanicError::DimensionMismatch(format!(
            "{} probabilities but {} targets",
            probabilities.len(),
            targets.len()
        )));
    }

    let mut sums = vec![0.0; n_bins];
    let mut positives = vec![0.0; n_bins];
    let mut counts = vec![0usize; n_bins];
    for (&p, &t) in probabilities.iter().zip(targets.iter()) {
        let bin = ((p * n_bins as f64) as usize).min(n_bins - 1);
        sums[bin] += p;
        positives[bin] += t;
        counts[bin] += 1;
    }

    let bins = (0..n_bins)
        .filter(|&b| counts[b] > 0)
        .map(|b| CalibrationBin {
            mean_predicted: sums[b] / counts[b] as f64,
            fraction_positive: positives[b] / counts[b] as f64,
            count: counts[b],
        })
        .collect();
    Ok(bins)
}

/// Expected calibration error: the count-weighted mean gap between each
/// bin's predicted and observed positive rates.
pub fn expected_calibration_error(
    probabilities: &Array1<f64>,
    targets: &Array1<f64>,
    n_bins: usize,
) -> Result<f64> {
    let bins = calibration_curve(probabilities, targets, n_bins)?;
    let total: usize = bins.iter().map(|b| b.count).sum();
    if total == 0 {
        return Ok(0.0);
    }
    let error = bins
        .iter()
        .map(|b| {
            (b.count as f64 / total as f64) * (b.mean_predicted - b.fraction_positive).abs()
        })
        .sum();
    Ok(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfectly_calibrated_bins() {
        // 0.25-bin has one positive in four samples, 0.75-bin three.
        let probs = array![0.25, 0.25, 0.25, 0.25, 0.75, 0.75, 0.75, 0.75];
        let targets = array![1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0];
        let bins = calibration_curve(&probs, &targets, 2).unwrap();

        assert_eq!(bins.len(), 2);
        assert!((bins[0].mean_predicted - 0.25).abs() < 1e-12);
        assert!((bins[0].fraction_positive - 0.25).abs() < 1e-12);
        assert!((bins[1].fraction_positive - 0.75).abs() < 1e-12);

        let ece = expected_calibration_error(&probs, &targets, 2).unwrap();
        assert!(ece < 1e-12);
    }

    #[test]
    fn test_empty_bins_are_skipped() {
        let probs = array![0.05, 0.95];
        let targets = array![0.0, 1.0];
        let bins = calibration_curve(&probs, &targets, 10).unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 1);
    }

    #[test]
    fn test_probability_one_lands_in_last_bin() {
        let probs = array![1.0];
        let targets = array![1.0];
        let bins = calibration_curve(&probs, &targets, 10).unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 1);
        assert!((bins[0].mean_predicted - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_overconfident_predictions_have_high_ece() {
        // Predicts near-certainty but is right only half the time.
        let probs = array![0.99, 0.99, 0.99, 0.99];
        let targets = array![1.0, 0.0, 1.0, 0.0];
        let ece = expected_calibration_error(&probs, &targets, 10).unwrap();
        assert!((ece - 0.49).abs() < 1e-12);
    }

    #[test]
    fn test_zero_bins_fails() {
        let probs = array![0.5];
        let targets = array![1.0];
        assert!(calibration_curve(&probs, &targets, 0).is_err());
    }
}
