use crate::optim::optimizer::{Optimizer, ParamMut};

pub struct SGDOptimizer {
    lr: f64,
}

impl SGDOptimizer {
    pub fn new(lr: f64) -> SGDOptimizer {
        SGDOptimizer { lr }
    }
}

impl Optimizer for SGDOptimizer {
    fn step(&mut self, params: &mut [ParamMut<'_>]) {
        for param in params.iter_mut() {
            let ParamMut { value, grad } = param;
            value.zip_mut_with(grad, |w, &g| *w -= self.lr * g);
        }
    }
}
