use ndarray::{Array1, Array2};

use crate::error::{Result, TitanicError};
use crate::Classifier;

/// Logistic sigmoid, numerically safe at the extremes.
///
/// Inputs are clamped to +/-36 so the result stays strictly inside
/// `(0, 1)` in f64, which keeps downstream `ln` calls finite.
pub fn sigmoid(z: f64) -> f64 {
    let z = z.clamp(-36.0, 36.0);
    1.0 / (1.0 + (-z).exp())
}

/// Inverse of [`sigmoid`] on probabilities clamped away from 0 and 1.
pub fn logit(p: f64) -> f64 {
    let p = p.clamp(1e-15, 1.0 - 1e-15);
    (p / (1.0 - p)).ln()
}

/// Binary logistic regression trained by full-batch gradient descent.
///
/// Minimizes mean cross-entropy plus an optional L2 penalty on the
/// weights (the intercept is never penalized). Training stops early
/// once the loss improves by less than `tolerance` between iterations.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub learning_rate: f64,
    pub max_iter: usize,
    pub l2: f64,
    pub tolerance: f64,
    weights: Option<Array1<f64>>,
    intercept: f64,
    loss_history: Vec<f64>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        LogisticRegression {
            learning_rate: 0.1,
            max_iter: 1000,
            l2: 0.0,
            tolerance: 1e-6,
            weights: None,
            intercept: 0.0,
            loss_history: Vec::new(),
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Fitted weight vector, one entry per feature column.
    pub fn weights(&self) -> Result<&Array1<f64>> {
        self.weights
            .as_ref()
            .ok_or_else(|| TitanicError::NotFitted("model has no weights yet".to_string()))
    }

    /// Fitted intercept term.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Mean training loss recorded at every gradient step.
    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    /// Raw linear scores `x . w + b` before the sigmoid.
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self.weights()?;
        if x.ncols() != weights.len() {
            return Err(TitanicError::DimensionMismatch(format!(
                "model has {} weights but input has {} columns",
                weights.len(),
                x.ncols()
            )));
        }
        Ok(x.dot(weights) + self.intercept)
    }

    fn validate_training_input(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() == 0 {
            return Err(TitanicError::EmptyData(
                "cannot fit on zero samples".to_string(),
            ));
        }
        if x.nrows() != y.len() {
            return Err(TitanicError::DimensionMismatch(format!(
                "{} feature rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if self.learning_rate <= 0.0 {
            return Err(TitanicError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.l2 < 0.0 {
            return Err(TitanicError::InvalidParameter(format!(
                "l2 must be non-negative, got {}",
                self.l2
            )));
        }
        Ok(())
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.validate_training_input(x, y)?;

        let n = x.nrows() as f64;
        let mut weights = Array1::zeros(x.ncols());
        let mut intercept = 0.0;
        self.loss_history.clear();
        self.loss_history.reserve(self.max_iter);

        for _ in 0..self.max_iter {
            let probs = (x.dot(&weights) + intercept).mapv(sigmoid);

            let mut loss = -probs
                .iter()
                .zip(y.iter())
                .map(|(&p, &t)| t * p.ln() + (1.0 - t) * (1.0 - p).ln())
                .sum::<f64>()
                / n;
            loss += self.l2 / (2.0 * n) * weights.mapv(|w| w * w).sum();

            let errors = &probs - y;
            let mut grad_w = x.t().dot(&errors) / n;
            grad_w.scaled_add(self.l2 / n, &weights);
            let grad_b = errors.mean().unwrap_or(0.0);

            weights.scaled_add(-self.learning_rate, &grad_w);
            intercept -= self.learning_rate * grad_b;

            let converged = self
                .loss_history
                .last()
                .is_some_and(|&previous| (previous - loss).abs() < self.tolerance);
            self.loss_history.push(loss);
            if converged {
                break;
            }
        }

        self.weights = Some(weights);
        self.intercept = intercept;
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self.decision_function(x)?.mapv(sigmoid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array};

    fn separable_dataset() -> (Array2<f64>, Array1<f64>) {
        // One informative feature: negatives below zero, positives above.
        let x = Array::from_shape_fn((40, 1), |(i, _)| {
            if i < 20 {
                -1.0 - (i as f64) * 0.05
            } else {
                1.0 + ((i - 20) as f64) * 0.05
            }
        });
        let y = Array::from_shape_fn(40, |i| if i < 20 { 0.0 } else { 1.0 });
        (x, y)
    }

    #[test]
    fn test_sigmoid_bounds() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(1000.0) < 1.0);
        assert!(sigmoid(-1000.0) > 0.0);
    }

    #[test]
    fn test_logit_inverts_sigmoid() {
        for &z in &[-3.0, -0.5, 0.0, 0.5, 3.0] {
            assert!((logit(sigmoid(z)) - z).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fit_learns_separable_data() {
        let (x, y) = separable_dataset();
        let mut model = LogisticRegression::new()
            .with_learning_rate(0.5)
            .with_max_iter(500);
        model.fit(&x, &y).unwrap();

        let accuracy = model.score(&x, &y).unwrap();
        assert!(accuracy > 0.95, "accuracy was {accuracy}");
        // The decision direction must be positive.
        assert!(model.weights().unwrap()[0] > 0.0);
    }

    #[test]
    fn test_loss_decreases() {
        let (x, y) = separable_dataset();
        let mut model = LogisticRegression::new().with_max_iter(200);
        model.fit(&x, &y).unwrap();
        let history = model.loss_history();
        assert!(history.len() > 1);
        assert!(history[history.len() - 1] < history[0]);
    }

    #[test]
    fn test_l2_shrinks_weights() {
        let (x, y) = separable_dataset();
        let mut plain = LogisticRegression::new().with_max_iter(500);
        let mut penalized = LogisticRegression::new().with_max_iter(500).with_l2(10.0);
        plain.fit(&x, &y).unwrap();
        penalized.fit(&x, &y).unwrap();
        assert!(
            penalized.weights().unwrap()[0].abs() < plain.weights().unwrap()[0].abs()
        );
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = LogisticRegression::new();
        assert!(model.predict_proba(&array![[1.0]]).is_err());
    }

    #[test]
    fn test_dimension_mismatch_fails() {
        let (x, y) = separable_dataset();
        let mut model = LogisticRegression::new().with_max_iter(10);
        model.fit(&x, &y).unwrap();
        assert!(model.predict_proba(&array![[1.0, 2.0]]).is_err());
    }

    #[test]
    fn test_probabilities_are_valid() {
        let (x, y) = separable_dataset();
        let mut model = LogisticRegression::new().with_max_iter(100);
        model.fit(&x, &y).unwrap();
        let probs = model.predict_proba(&x).unwrap();
        assert!(probs.iter().all(|&p| p > 0.0 && p < 1.0));
    }
}
