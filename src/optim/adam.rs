use ndarray::ArrayD;

use crate::optim::optimizer::{Optimizer, ParamMut};

pub struct AdamOptimizer {
    lr: f64,
    current_beta1: f64,
    beta1: f64,
    current_beta2: f64,
    beta2: f64,
    epsilon: f64,
    m: Vec<ArrayD<f64>>, // First moment vector
    v: Vec<ArrayD<f64>>, // Second moment vector
}

impl AdamOptimizer {
    pub fn new(lr: f64, beta1: f64, beta2: f64, epsilon: f64) -> AdamOptimizer {
        AdamOptimizer {
            lr,
            current_beta1: beta1,
            beta1,
            current_beta2: beta2,
            beta2,
            epsilon,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    pub fn new_with_defaults(lr: f64) -> AdamOptimizer {
        AdamOptimizer::new(lr, 0.9, 0.999, 1e-8)
    }
}

impl Optimizer for AdamOptimizer {
    fn step(&mut self, params: &mut [ParamMut<'_>]) {
        // Moment buffers take their shapes from the first step.
        if self.m.is_empty() {
            self.m = params
                .iter()
                .map(|p| ArrayD::zeros(p.value.raw_dim()))
                .collect();
            self.v = params
                .iter()
                .map(|p| ArrayD::zeros(p.value.raw_dim()))
                .collect();
        } else {
            self.current_beta1 *= self.beta1;
            self.current_beta2 *= self.beta2;
        }

        for (idx, param) in params.iter_mut().enumerate() {
            let grad = &param.grad;
            self.m[idx] = self.beta1 * &self.m[idx] + (1.0 - self.beta1) * grad;
            self.v[idx] = self.beta2 * &self.v[idx] + (1.0 - self.beta2) * grad.mapv(|g| g * g);

            let m_hat = &self.m[idx] / (1.0 - self.current_beta1);
            let v_hat = &self.v[idx] / (1.0 - self.current_beta2);

            let update = -self.lr * m_hat / (v_hat.mapv(f64::sqrt) + self.epsilon);
            param.value += &update;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    #[test]
    fn test_first_step_is_a_full_learning_rate_step() {
        let mut value = ArrayD::from_elem(IxDyn(&[2]), 1.0);
        let mut grad = ArrayD::from_elem(IxDyn(&[2]), 0.5);

        let mut optimiser = AdamOptimizer::new_with_defaults(0.001);
        {
            let mut params = vec![ParamMut {
                value: value.view_mut(),
                grad: grad.view_mut(),
            }];
            optimiser.step(&mut params);
        }

        // Bias correction makes the first update -lr * g / |g|.
        for &v in value.iter() {
            assert!((v - 0.999).abs() < 1e-6);
        }
    }

    #[test]
    fn test_minimises_a_quadratic() {
        // f(w) = (w - 3)^2, gradient 2(w - 3).
        let mut value = ArrayD::from_elem(IxDyn(&[1]), 0.0);
        let mut grad = ArrayD::zeros(IxDyn(&[1]));

        let mut optimiser = AdamOptimizer::new_with_defaults(0.1);
        for _ in 0..1000 {
            grad[0] = 2.0 * (value[0] - 3.0);
            let mut params = vec![ParamMut {
                value: value.view_mut(),
                grad: grad.view_mut(),
            }];
            optimiser.step(&mut params);
        }

        assert!((value[0] - 3.0).abs() < 0.1, "ended at {}", value[0]);
    }

    #[test]
    fn test_moments_track_parameter_shapes() {
        let mut w = ArrayD::zeros(IxDyn(&[2, 3]));
        let mut gw = ArrayD::from_elem(IxDyn(&[2, 3]), 1.0);
        let mut b = ArrayD::zeros(IxDyn(&[3]));
        let mut gb = ArrayD::from_elem(IxDyn(&[3]), 1.0);

        let mut optimiser = AdamOptimizer::new_with_defaults(0.01);
        let mut params = vec![
            ParamMut {
                value: w.view_mut(),
                grad: gw.view_mut(),
            },
            ParamMut {
                value: b.view_mut(),
                grad: gb.view_mut(),
            },
        ];
        optimiser.step(&mut params);
        optimiser.step(&mut params);
        drop(params);

        assert!(w.iter().all(|&v| v < 0.0));
        assert!(b.iter().all(|&v| v < 0.0));
    }
}
