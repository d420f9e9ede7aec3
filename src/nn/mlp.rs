use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tensorboard_rs::summary_writer::SummaryWriter;

use crate::error::{Result, TitanicError};
use crate::linear::sigmoid;
use crate::nn::dense::DenseLayer;
use crate::nn::dropout::Dropout;
use crate::optim::{AdamOptimizer, Optimizer, ParamMut};
use crate::Classifier;

/// The layer stack behind [`MlpClassifier`]: an input layer, a run of
/// hidden layers with dropout after each ReLU, and a linear output
/// layer producing one logit per sample.
struct Network {
    first: DenseLayer,
    hidden: Vec<DenseLayer>,
    output: DenseLayer,
    dropouts: Vec<Dropout>,
}

impl Network {
    fn new(
        d_in: usize,
        hidden_size: usize,
        n_hidden_layers: usize,
        dropout: f64,
        rng: &mut StdRng,
    ) -> Network {
        let first = DenseLayer::new(d_in, hidden_size, true, rng);
        let hidden = (0..n_hidden_layers)
            .map(|_| DenseLayer::new(hidden_size, hidden_size, true, rng))
            .collect();
        let output = DenseLayer::new(hidden_size, 1, false, rng);
        let dropouts = (0..n_hidden_layers + 1).map(|_| Dropout::new(dropout)).collect();
        Network {
            first,
            hidden,
            output,
            dropouts,
        }
    }

    fn input_dim(&self) -> usize {
        self.first.input_dim()
    }

    /// Deterministic forward pass, dropout disabled.
    fn forward(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut h = self.first.forward(x);
        for layer in &self.hidden {
            h = layer.forward(&h);
        }
        self.output.forward(&h)
    }

    /// Forward pass with dropout masks sampled but not cached, used
    /// for Monte Carlo dropout at prediction time.
    fn forward_stochastic(&self, x: &Array2<f64>, rng: &mut StdRng) -> Array2<f64> {
        let mut h = self.first.forward(x);
        h *= &self.dropouts[0].sample_mask(h.dim(), rng);
        for (i, layer) in self.hidden.iter().enumerate() {
            h = layer.forward(&h);
            h *= &self.dropouts[i + 1].sample_mask(h.dim(), rng);
        }
        self.output.forward(&h)
    }

    /// Caching forward pass for training.
    fn forward_train(&mut self, x: &Array2<f64>, rng: &mut StdRng) -> Array2<f64> {
        let mut h = self.first.forward_train(x);
        h = self.dropouts[0].forward_train(&h, rng);
        for (i, layer) in self.hidden.iter_mut().enumerate() {
            h = layer.forward_train(&h);
            h = self.dropouts[i + 1].forward_train(&h, rng);
        }
        self.output.forward_train(&h)
    }

    /// Backpropagates the loss gradient of the output logits through
    /// every layer, accumulating parameter gradients.
    fn backward(&mut self, delta: &Array2<f64>) -> Result<()> {
        let mut delta = self.output.backward(delta)?;
        for i in (0..self.hidden.len()).rev() {
            delta = self.dropouts[i + 1].backward(&delta)?;
            delta = self.hidden[i].backward(&delta)?;
        }
        delta = self.dropouts[0].backward(&delta)?;
        self.first.backward(&delta)?;
        Ok(())
    }

    fn params_mut(&mut self) -> Vec<ParamMut<'_>> {
        let mut params = self.first.params_mut();
        for layer in self.hidden.iter_mut() {
            params.extend(layer.params_mut());
        }
        params.extend(self.output.params_mut());
        params
    }
}

/// Binary MLP classifier trained with Adam on mini-batches.
///
/// Dropout stays available after training, which is what makes the
/// Monte Carlo uncertainty estimate of [`mc_predict_proba`] possible.
///
/// [`mc_predict_proba`]: MlpClassifier::mc_predict_proba
pub struct MlpClassifier {
    pub hidden_size: usize,
    pub n_hidden_layers: usize,
    pub dropout: f64,
    pub learning_rate: f64,
    pub n_epochs: usize,
    pub batch_size: usize,
    pub seed: u64,
    net: Option<Network>,
}

impl Default for MlpClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MlpClassifier {
    pub fn new() -> Self {
        MlpClassifier {
            hidden_size: 16,
            n_hidden_layers: 1,
            dropout: 0.2,
            learning_rate: 0.001,
            n_epochs: 100,
            batch_size: 16,
            seed: 42,
            net: None,
        }
    }

    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    pub fn with_n_hidden_layers(mut self, n_hidden_layers: usize) -> Self {
        self.n_hidden_layers = n_hidden_layers;
        self
    }

    pub fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_n_epochs(mut self, n_epochs: usize) -> Self {
        self.n_epochs = n_epochs;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate_training_input(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() == 0 {
            return Err(TitanicError::EmptyData(
                "cannot train on zero samples".to_string(),
            ));
        }
        if x.nrows() != y.len() {
            return Err(TitanicError::DimensionMismatch(format!(
                "{} feature rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if self.batch_size == 0 || self.batch_size > x.nrows() {
            return Err(TitanicError::InvalidParameter(format!(
                "batch_size must be in 1..={}, got {}",
                x.nrows(),
                self.batch_size
            )));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(TitanicError::InvalidParameter(format!(
                "dropout must be in [0, 1), got {}",
                self.dropout
            )));
        }
        if self.hidden_size == 0 {
            return Err(TitanicError::InvalidParameter(
                "hidden_size must be positive".to_string(),
            ));
        }
        if self.learning_rate <= 0.0 {
            return Err(TitanicError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Trains the network, optionally streaming per-batch losses to a
    /// TensorBoard writer. Progress lines are printed only when a
    /// writer is attached, keeping repeated fits inside
    /// cross-validation quiet.
    ///
    /// # Arguments
    /// * `x` - Feature matrix
    /// * `y` - Binary labels
    /// * `writer` - Optional TensorBoard summary writer
    ///
    /// # Returns
    /// Mean training loss per epoch
    pub fn train(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        mut writer: Option<&mut SummaryWriter>,
    ) -> Result<Vec<f64>> {
        self.validate_training_input(x, y)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut net = Network::new(
            x.ncols(),
            self.hidden_size,
            self.n_hidden_layers,
            self.dropout,
            &mut rng,
        );
        let mut optimiser = AdamOptimizer::new_with_defaults(self.learning_rate);

        let n = x.nrows();
        let mut epoch_losses = Vec::with_capacity(self.n_epochs);
        let mut total_steps = 0;

        for epoch in 0..self.n_epochs {
            let mut order: Vec<usize> = (0..n).collect();
            let mut shuffle_rng = StdRng::seed_from_u64(self.seed.wrapping_add(epoch as u64 + 1));
            order.shuffle(&mut shuffle_rng);

            let mut epoch_loss = 0.0;
            let mut batches = 0u64;

            for batch in order.chunks(self.batch_size) {
                // Ragged tail batches are skipped; shuffling brings the
                // left-out rows back in later epochs.
                if batch.len() < self.batch_size {
                    continue;
                }
                let batch_x = x.select(Axis(0), batch);
                let batch_y = y.select(Axis(0), batch);

                let logits = net.forward_train(&batch_x, &mut rng);
                let probs = logits.mapv(sigmoid);
                let targets = batch_y.insert_axis(Axis(1));

                let loss = -probs
                    .iter()
                    .zip(targets.iter())
                    .map(|(&p, &t)| t * p.ln() + (1.0 - t) * (1.0 - p).ln())
                    .sum::<f64>()
                    / self.batch_size as f64;
                epoch_loss += loss;
                batches += 1;

                if let Some(w) = writer.as_deref_mut() {
                    w.add_scalar("loss", loss as f32, total_steps);
                }
                total_steps += 1;

                let delta = (&probs - &targets) / self.batch_size as f64;
                {
                    let mut params = net.params_mut();
                    optimiser.zero_grad(&mut params);
                }
                net.backward(&delta)?;
                {
                    let mut params = net.params_mut();
                    optimiser.step(&mut params);
                }
            }

            let avg_loss = epoch_loss / batches as f64;
            epoch_losses.push(avg_loss);

            if writer.is_some() && ((epoch + 1) % 10 == 0 || epoch == 0) {
                println!("Epoch {}/{}, Loss: {:.4}", epoch + 1, self.n_epochs, avg_loss);
            }
        }

        self.net = Some(net);
        Ok(epoch_losses)
    }

    fn fitted_net(&self) -> Result<&Network> {
        self.net
            .as_ref()
            .ok_or_else(|| TitanicError::NotFitted("network has not been trained".to_string()))
    }

    fn check_input(&self, net: &Network, x: &Array2<f64>) -> Result<()> {
        if x.ncols() != net.input_dim() {
            return Err(TitanicError::DimensionMismatch(format!(
                "network takes {} features but input has {} columns",
                net.input_dim(),
                x.ncols()
            )));
        }
        Ok(())
    }

    /// Monte Carlo dropout prediction: averages `n_passes` stochastic
    /// forward passes with dropout left on.
    ///
    /// # Arguments
    /// * `x` - Feature matrix
    /// * `n_passes` - Number of stochastic passes, nonzero
    /// * `seed` - Seed for the mask sampling
    ///
    /// # Returns
    /// Per-sample mean probability paired with its standard deviation
    /// across passes
    pub fn mc_predict_proba(
        &self,
        x: &Array2<f64>,
        n_passes: usize,
        seed: u64,
    ) -> Result<(Array1<f64>, Array1<f64>)> {
        if n_passes == 0 {
            return Err(TitanicError::InvalidParameter(
                "need at least one stochastic pass".to_string(),
            ));
        }
        let net = self.fitted_net()?;
        self.check_input(net, x)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut sum = Array1::<f64>::zeros(x.nrows());
        let mut sum_sq = Array1::<f64>::zeros(x.nrows());
        for _ in 0..n_passes {
            let probs = net
                .forward_stochastic(x, &mut rng)
                .mapv(sigmoid)
                .index_axis_move(Axis(1), 0);
            sum += &probs;
            sum_sq += &probs.mapv(|p| p * p);
        }

        let mean = sum / n_passes as f64;
        let variance = (sum_sq / n_passes as f64 - mean.mapv(|m| m * m)).mapv(|v| v.max(0.0));
        Ok((mean, variance.mapv(f64::sqrt)))
    }
}

impl Classifier for MlpClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.train(x, y, None)?;
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let net = self.fitted_net()?;
        self.check_input(net, x)?;
        Ok(net.forward(x).mapv(sigmoid).index_axis_move(Axis(1), 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn two_cluster_dataset(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array::from_shape_fn((n, 2), |(i, j)| {
            let centre = if i % 2 == 0 { -1.5 } else { 1.5 };
            centre + 0.1 * ((i * 5 + j * 3) % 7) as f64
        });
        let y = Array::from_shape_fn(n, |i| (i % 2) as f64);
        (x, y)
    }

    fn trained_classifier() -> (MlpClassifier, Array2<f64>, Array1<f64>) {
        let (x, y) = two_cluster_dataset(64);
        let mut model = MlpClassifier::new()
            .with_hidden_size(8)
            .with_dropout(0.1)
            .with_learning_rate(0.01)
            .with_n_epochs(150)
            .with_batch_size(16)
            .with_seed(7);
        model.fit(&x, &y).unwrap();
        (model, x, y)
    }

    #[test]
    fn test_learns_separable_clusters() {
        let (model, x, y) = trained_classifier();
        let accuracy = model.score(&x, &y).unwrap();
        assert!(accuracy > 0.9, "accuracy was {accuracy}");
    }

    #[test]
    fn test_training_loss_decreases() {
        let (x, y) = two_cluster_dataset(64);
        let mut model = MlpClassifier::new()
            .with_hidden_size(8)
            .with_dropout(0.0)
            .with_learning_rate(0.01)
            .with_n_epochs(100)
            .with_batch_size(16)
            .with_seed(3);
        let losses = model.train(&x, &y, None).unwrap();
        assert_eq!(losses.len(), 100);
        assert!(losses[99] < losses[0]);
    }

    #[test]
    fn test_mc_predictions_are_deterministic_per_seed() {
        let (model, x, _) = trained_classifier();
        let (mean_a, std_a) = model.mc_predict_proba(&x, 30, 11).unwrap();
        let (mean_b, std_b) = model.mc_predict_proba(&x, 30, 11).unwrap();
        assert_eq!(mean_a, mean_b);
        assert_eq!(std_a, std_b);
    }

    #[test]
    fn test_mc_outputs_are_valid() {
        let (model, x, _) = trained_classifier();
        let (mean, std) = model.mc_predict_proba(&x, 30, 5).unwrap();
        assert!(mean.iter().all(|&p| p > 0.0 && p < 1.0));
        assert!(std.iter().all(|&s| s >= 0.0));
        // Dropout noise must produce some spread somewhere.
        assert!(std.iter().any(|&s| s > 0.0));
    }

    #[test]
    fn test_single_pass_has_zero_spread() {
        let (model, x, _) = trained_classifier();
        let (mean, std) = model.mc_predict_proba(&x, 1, 13).unwrap();
        assert!(mean.iter().all(|&p| p > 0.0 && p < 1.0));
        // A single pass has no spread to measure.
        assert!(std.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_zero_passes_fails() {
        let (model, x, _) = trained_classifier();
        assert!(model.mc_predict_proba(&x, 0, 13).is_err());
    }

    #[test]
    fn test_zero_dropout_collapses_mc_spread() {
        let (x, y) = two_cluster_dataset(64);
        let mut model = MlpClassifier::new()
            .with_hidden_size(8)
            .with_dropout(0.0)
            .with_learning_rate(0.01)
            .with_n_epochs(50)
            .with_batch_size(16)
            .with_seed(9);
        model.fit(&x, &y).unwrap();
        // With no dropout every stochastic pass is the same forward pass.
        let deterministic = model.predict_proba(&x).unwrap();
        let (mean, std) = model.mc_predict_proba(&x, 10, 3).unwrap();
        for (m, d) in mean.iter().zip(deterministic.iter()) {
            assert!((m - d).abs() < 1e-12);
        }
        assert!(std.iter().all(|&s| s < 1e-6));
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = MlpClassifier::new();
        let x = Array2::<f64>::zeros((2, 2));
        assert!(model.predict_proba(&x).is_err());
    }

    #[test]
    fn test_batch_size_larger_than_dataset_fails() {
        let (x, y) = two_cluster_dataset(8);
        let mut model = MlpClassifier::new().with_batch_size(16);
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_feature_count_mismatch_fails() {
        let (model, _, _) = trained_classifier();
        let wrong = Array2::<f64>::zeros((4, 5));
        assert!(model.predict_proba(&wrong).is_err());
    }
}
