use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;

use crate::error::{Result, TitanicError};
use crate::optim::ParamMut;

/// Fully connected layer with an optional ReLU activation.
///
/// Gradients are accumulated into `grad_weight` and `grad_bias` by
/// [`backward`], matching the parameter order of [`params_mut`].
///
/// [`backward`]: DenseLayer::backward
/// [`params_mut`]: DenseLayer::params_mut
#[derive(Debug, Clone)]
pub struct DenseLayer {
    weight: Array2<f64>,
    bias: Array1<f64>,
    grad_weight: Array2<f64>,
    grad_bias: Array1<f64>,
    non_linearity: bool,
    input_cache: Option<Array2<f64>>,
    pre_activation_cache: Option<Array2<f64>>,
}

impl DenseLayer {
    /// Creates a layer with He-initialized weights and zero bias.
    pub fn new(d_in: usize, d_out: usize, non_linearity: bool, rng: &mut StdRng) -> DenseLayer {
        let std = (2.0 / d_in as f64).sqrt();
        let weight: Array2<f64> = Array2::random_using((d_in, d_out), StandardNormal, rng) * std;
        DenseLayer {
            weight,
            bias: Array1::zeros(d_out),
            grad_weight: Array2::zeros((d_in, d_out)),
            grad_bias: Array1::zeros(d_out),
            non_linearity,
            input_cache: None,
            pre_activation_cache: None,
        }
    }

    pub fn input_dim(&self) -> usize {
        self.weight.nrows()
    }

    pub fn weight(&self) -> &Array2<f64> {
        &self.weight
    }

    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    pub fn grad_weight(&self) -> &Array2<f64> {
        &self.grad_weight
    }

    pub fn grad_bias(&self) -> &Array1<f64> {
        &self.grad_bias
    }

    /// Inference-only forward pass, caches nothing.
    pub fn forward(&self, x: &Array2<f64>) -> Array2<f64> {
        let z = x.dot(&self.weight) + &self.bias;
        if self.non_linearity {
            z.mapv(|v| v.max(0.0))
        } else {
            z
        }
    }

    /// Forward pass that caches the input and pre-activation for a
    /// following [`backward`] call.
    ///
    /// [`backward`]: DenseLayer::backward
    pub fn forward_train(&mut self, x: &Array2<f64>) -> Array2<f64> {
        let z = x.dot(&self.weight) + &self.bias;
        self.input_cache = Some(x.clone());
        self.pre_activation_cache = Some(z.clone());
        if self.non_linearity {
            z.mapv(|v| v.max(0.0))
        } else {
            z
        }
    }

    /// Accumulates parameter gradients from the loss gradient of this
    /// layer's output and returns the loss gradient of its input.
    pub fn backward(&mut self, delta: &Array2<f64>) -> Result<Array2<f64>> {
        let x = self.input_cache.as_ref().ok_or_else(|| {
            TitanicError::NotFitted("backward called before forward_train".to_string())
        })?;
        let z = self.pre_activation_cache.as_ref().ok_or_else(|| {
            TitanicError::NotFitted("backward called before forward_train".to_string())
        })?;

        let mut delta = delta.clone();
        if self.non_linearity {
            delta.zip_mut_with(z, |d, &pre| {
                if pre <= 0.0 {
                    *d = 0.0;
                }
            });
        }

        self.grad_weight += &x.t().dot(&delta);
        self.grad_bias += &delta.sum_axis(Axis(0));
        Ok(delta.dot(&self.weight.t()))
    }

    /// Parameter and gradient views in a stable order: weight, bias.
    pub fn params_mut(&mut self) -> Vec<ParamMut<'_>> {
        vec![
            ParamMut {
                value: self.weight.view_mut().into_dyn(),
                grad: self.grad_weight.view_mut().into_dyn(),
            },
            ParamMut {
                value: self.bias.view_mut().into_dyn(),
                grad: self.grad_bias.view_mut().into_dyn(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    #[test]
    fn test_forward_matches_manual_computation() {
        let mut rng = StdRng::seed_from_u64(0);
        let layer = DenseLayer::new(2, 3, false, &mut rng);
        let x = array![[1.0, -2.0], [0.5, 0.25]];

        let expected = x.dot(layer.weight()) + layer.bias();
        assert_eq!(layer.forward(&x), expected);
    }

    #[test]
    fn test_relu_clamps_negative_outputs() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = DenseLayer::new(4, 8, true, &mut rng);
        let x = array![[1.0, -1.0, 2.0, -2.0]];
        let out = layer.forward(&x);
        assert!(out.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_backward_gradients_match_manual_computation() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut layer = DenseLayer::new(2, 2, false, &mut rng);
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let delta = array![[0.5, -0.5], [1.0, 0.0]];

        layer.forward_train(&x);
        let input_grad = layer.backward(&delta).unwrap();

        let expected_weight_grad = x.t().dot(&delta);
        let expected_bias_grad = delta.sum_axis(Axis(0));
        assert_eq!(layer.grad_weight(), &expected_weight_grad);
        assert_eq!(layer.grad_bias(), &expected_bias_grad);
        assert_eq!(input_grad, delta.dot(&layer.weight().t()));
    }

    #[test]
    fn test_relu_blocks_gradient_where_inactive() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut layer = DenseLayer::new(1, 1, true, &mut rng);
        // Find an input with a negative pre-activation.
        let sign = if layer.weight()[[0, 0]] > 0.0 { -1.0 } else { 1.0 };
        let x = array![[sign * 10.0]];

        layer.forward_train(&x);
        let input_grad = layer.backward(&array![[1.0]]).unwrap();

        assert_eq!(input_grad[[0, 0]], 0.0);
        assert_eq!(layer.grad_weight()[[0, 0]], 0.0);
    }

    #[test]
    fn test_backward_without_forward_train_fails() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut layer = DenseLayer::new(2, 2, false, &mut rng);
        assert!(layer.backward(&array![[1.0, 1.0]]).is_err());
    }

    #[test]
    fn test_gradients_accumulate_across_calls() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut layer = DenseLayer::new(2, 1, false, &mut rng);
        let x = array![[1.0, 1.0]];
        let delta = array![[1.0]];

        layer.forward_train(&x);
        layer.backward(&delta).unwrap();
        let first = layer.grad_weight().clone();
        layer.forward_train(&x);
        layer.backward(&delta).unwrap();

        assert_eq!(layer.grad_weight(), &(&first * 2.0));
    }
}
