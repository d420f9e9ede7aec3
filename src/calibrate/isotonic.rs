use ndarray::Array1;

use crate::calibrate::Calibrator;
use crate::error::{Result, TitanicError};

/// Running block of pooled samples during the isotonic fit.
struct Block {
    start: f64,
    sum: f64,
    count: f64,
}

impl Block {
    fn mean(&self) -> f64 {
        self.sum / self.count
    }
}

/// Isotonic regression via pool-adjacent-violators.
///
/// Fits the best non-decreasing step function from predicted
/// probabilities to observed labels. Unlike [`PlattScaling`] it assumes
/// no parametric shape, at the cost of needing more calibration data.
///
/// [`PlattScaling`]: crate::calibrate::PlattScaling
#[derive(Debug, Clone, Default)]
pub struct IsotonicRegression {
    /// Left edge of each step, ascending.
    steps: Vec<f64>,
    /// Calibrated value of each step, non-decreasing.
    values: Vec<f64>,
}

impl IsotonicRegression {
    pub fn new() -> Self {
        IsotonicRegression {
            steps: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Number of constant pieces in the fitted step function.
    pub fn n_steps(&self) -> usize {
        self.steps.len()
    }
}

impl Calibrator for IsotonicRegression {
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

        let mut pairs: Vec<(f64, f64)> = probabilities
            .iter()
            .copied()
            .zip(targets.iter().copied())
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        // Pool adjacent violators: push each sample as its own block,
        // then merge backwards while the means decrease.
        let mut blocks: Vec<Block> = Vec::with_capacity(pairs.len());
        for (x, y) in pairs {
            blocks.push(Block {
                start: x,
                sum: y,
                count: 1.0,
            });
            while blocks.len() >= 2 {
                let last = blocks.len() - 1;
                if blocks[last - 1].mean() <= blocks[last].mean() {
                    break;
                }
                let violator = blocks.remove(last);
                let previous = &mut blocks[last - 1];
                previous.sum += violator.sum;
                previous.count += violator.count;
            }
        }

        self.steps = blocks.iter().map(|b| b.start).collect();
        self.values = blocks.iter().map(|b| b.mean()).collect();
        Ok(())
    }

    fn calibrate(&self, probabilities: &Array1<f64>) -> Result<Array1<f64>> {
        if self.steps.is_empty() {
            return Err(TitanicError::NotFitted(
                "isotonic regression has not been fitted".to_string(),
            ));
        }
        Ok(probabilities.mapv(|p| {
            // Last step whose left edge is at or below p; probabilities
            // below every edge clamp to the first step.
            let index = self.steps.partition_point(|&edge| edge <= p);
            if index == 0 {
                self.values[0]
            } else {
                self.values[index - 1]
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_pools_violating_neighbours() {
        let probs = array![0.1, 0.2, 0.3, 0.4];
        let targets = array![0.0, 1.0, 0.0, 1.0];
        let mut isotonic = IsotonicRegression::new();
        isotonic.fit(&probs, &targets).unwrap();

        // The 1-then-0 violation in the middle pools to 0.5.
        assert_eq!(isotonic.n_steps(), 3);
        let calibrated = isotonic.calibrate(&array![0.1, 0.25, 0.4]).unwrap();
        assert_eq!(calibrated, array![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_monotone_data_is_preserved() {
        let probs = array![0.1, 0.4, 0.9];
        let targets = array![0.0, 0.0, 1.0];
        let mut isotonic = IsotonicRegression::new();
        isotonic.fit(&probs, &targets).unwrap();
        let calibrated = isotonic.calibrate(&probs).unwrap();
        assert_eq!(calibrated, targets);
    }

    #[test]
    fn test_output_is_monotone() {
        let probs = array![0.9, 0.1, 0.5, 0.3, 0.7, 0.2, 0.8, 0.4, 0.6];
        let targets = array![1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let mut isotonic = IsotonicRegression::new();
        isotonic.fit(&probs, &targets).unwrap();

        let grid = Array1::linspace(0.0, 1.0, 21);
        let calibrated = isotonic.calibrate(&grid).unwrap();
        for pair in calibrated.as_slice().unwrap().windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_out_of_range_inputs_clamp() {
        let probs = array![0.4, 0.6];
        let targets = array![0.0, 1.0];
        let mut isotonic = IsotonicRegression::new();
        isotonic.fit(&probs, &targets).unwrap();

        let calibrated = isotonic.calibrate(&array![0.0, 1.0]).unwrap();
        assert_eq!(calibrated, array![0.0, 1.0]);
    }

    #[test]
    fn test_calibrate_before_fit_fails() {
        let isotonic = IsotonicRegression::new();
        assert!(isotonic.calibrate(&array![0.5]).is_err());
    }
}
