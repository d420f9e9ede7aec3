use ndarray::Array1;

/// Fraction of predictions that exactly match their targets.
///
/// Returns 0.0 for empty inputs rather than dividing by zero.
///
/// # Arguments
/// * `predictions` - Hard class predictions, 0.0 or 1.0
/// * `targets` - Ground-truth labels of the same length
///
/// # Returns
/// Accuracy in `[0, 1]`
pub fn calculate_accuracy(predictions: &Array1<f64>, targets: &Array1<f64>) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(targets.iter())
        .filter(|(p, t)| p == t)
        .count();
    correct as f64 / predictions.len() as f64
}

/// The four cells of a binary confusion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionCounts {
    /// True positive rate, 0.0 when there are no positives.
    pub fn sensitivity(&self) -> f64 {
        let positives = self.true_positive + self.false_negative;
        if positives == 0 {
            return 0.0;
        }
        self.true_positive as f64 / positives as f64
    }

    /// True negative rate, 0.0 when there are no negatives.
    pub fn specificity(&self) -> f64 {
        let negatives = self.true_negative + self.false_positive;
        if negatives == 0 {
            return 0.0;
        }
        self.true_negative as f64 / negatives as f64
    }

    /// Fraction of predicted positives that are real, 0.0 when none are
    /// predicted.
    pub fn precision(&self) -> f64 {
        let predicted = self.true_positive + self.false_positive;
        if predicted == 0 {
            return 0.0;
        }
        self.true_positive as f64 / predicted as f64
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.true_positive + self.true_negative) as f64 / total as f64
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Prints the counts as a 2x2 table with predicted classes as rows.
    pub fn print_table(&self) {
        println!("                 Actual 1   Actual 0");
        println!(
            "  Predicted 1  {:>9}  {:>9}",
            self.true_positive, self.false_positive
        );
        println!(
            "  Predicted 0  {:>9}  {:>9}",
            self.false_negative, self.true_negative
        );
    }
}

/// Tallies confusion counts at a decision threshold.
///
/// A probability greater than or equal to `threshold` counts as a
/// positive prediction.
pub fn confusion_counts(
    probabilities: &Array1<f64>,
    targets: &Array1<f64>,
    threshold: f64,
) -> ConfusionCounts {
    let mut counts = ConfusionCounts {
        true_positive: 0,
        false_positive: 0,
        true_negative: 0,
        false_negative: 0,
    };
    for (&p, &t) in probabilities.iter().zip(targets.iter()) {
        let predicted_positive = p >= threshold;
        let actually_positive = t == 1.0;
        match (predicted_positive, actually_positive) {
            (true, true) => counts.true_positive += 1,
            (true, false) => counts.false_positive += 1,
            (false, false) => counts.true_negative += 1,
            (false, true) => counts.false_negative += 1,
        }
    }
    counts
}

/// Mean negative log-likelihood of the targets under the predicted
/// probabilities. Probabilities are clamped away from 0 and 1 first.
pub fn log_loss(probabilities: &Array1<f64>, targets: &Array1<f64>) -> f64 {
    if probabilities.is_empty() {
        return 0.0;
    }
    let total: f64 = probabilities
        .iter()
        .zip(targets.iter())
        .map(|(&p, &t)| {
            let p = p.clamp(1e-15, 1.0 - 1e-15);
            t * p.ln() + (1.0 - t) * (1.0 - p).ln()
        })
        .sum();
    -total / probabilities.len() as f64
}

/// Mean squared difference between predicted probabilities and targets.
pub fn brier_score(probabilities: &Array1<f64>, targets: &Array1<f64>) -> f64 {
    if probabilities.is_empty() {
        return 0.0;
    }
    probabilities
        .iter()
        .zip(targets.iter())
        .map(|(&p, &t)| (p - t) * (p - t))
        .sum::<f64>()
        / probabilities.len() as f64
}
