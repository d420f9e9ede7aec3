use ndarray::Array2;
use rand::rngs::StdRng;
use rand::Rng;

use crate::error::{Result, TitanicError};

/// Inverted dropout over a batch of activations.
///
/// Kept units are scaled by `1 / (1 - p)` during training so the
/// expected activation is unchanged and inference needs no rescaling.
/// The same layer doubles as the noise source for Monte Carlo dropout,
/// where masks are sampled at prediction time via [`sample_mask`].
///
/// [`sample_mask`]: Dropout::sample_mask
#[derive(Debug, Clone)]
pub struct Dropout {
    pub p: f64,
    mask_cache: Option<Array2<f64>>,
}

impl Dropout {
    pub fn new(p: f64) -> Dropout {
        Dropout {
            p,
            mask_cache: None,
        }
    }

    /// Draws a fresh mask with entries `0` or `1 / (1 - p)`.
    pub fn sample_mask(&self, shape: (usize, usize), rng: &mut StdRng) -> Array2<f64> {
        let keep = 1.0 - self.p;
        Array2::from_shape_fn(shape, |_| {
            if rng.gen::<f64>() < keep {
                1.0 / keep
            } else {
                0.0
            }
        })
    }

    /// Applies a fresh mask and caches it for [`backward`].
    ///
    /// [`backward`]: Dropout::backward
    pub fn forward_train(&mut self, x: &Array2<f64>, rng: &mut StdRng) -> Array2<f64> {
        let mask = self.sample_mask(x.dim(), rng);
        let out = x * &mask;
        self.mask_cache = Some(mask);
        out
    }

    /// Passes the gradient through the cached training mask.
    pub fn backward(&mut self, delta: &Array2<f64>) -> Result<Array2<f64>> {
        let mask = self.mask_cache.as_ref().ok_or_else(|| {
            TitanicError::NotFitted("backward called before forward_train".to_string())
        })?;
        Ok(delta * mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use rand::SeedableRng;

    #[test]
    fn test_zero_rate_is_identity() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut dropout = Dropout::new(0.0);
        let x = Array2::from_elem((4, 4), 2.5);
        assert_eq!(dropout.forward_train(&x, &mut rng), x);
    }

    #[test]
    fn test_mask_entries_are_zero_or_scaled() {
        let mut rng = StdRng::seed_from_u64(1);
        let dropout = Dropout::new(0.5);
        let mask = dropout.sample_mask((10, 10), &mut rng);
        assert!(mask.iter().all(|&m| m == 0.0 || (m - 2.0).abs() < 1e-12));
        // With 100 draws at p = 0.5 both outcomes occur.
        assert!(mask.iter().any(|&m| m == 0.0));
        assert!(mask.iter().any(|&m| m > 0.0));
    }

    #[test]
    fn test_scaling_keeps_mean_activation() {
        let mut rng = StdRng::seed_from_u64(2);
        let dropout = Dropout::new(0.2);
        let mask = dropout.sample_mask((100, 100), &mut rng);
        let mean = mask.mean().unwrap_or(0.0);
        assert!((mean - 1.0).abs() < 0.05, "mask mean was {mean}");
    }

    #[test]
    fn test_backward_reuses_forward_mask() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut dropout = Dropout::new(0.5);
        let x = Array2::from_elem((3, 5), 1.0);

        let out = dropout.forward_train(&x, &mut rng);
        let grad = dropout.backward(&Array2::from_elem((3, 5), 1.0)).unwrap();

        // Units dropped forward must also block the gradient.
        assert_eq!(out, grad);
    }

    #[test]
    fn test_backward_without_forward_fails() {
        let mut dropout = Dropout::new(0.5);
        assert!(dropout.backward(&Array2::zeros((1, 1))).is_err());
    }
}
