use ndarray::ArrayViewMutD;

/// Mutable view of one parameter array and its gradient.
pub struct ParamMut<'a> {
    pub value: ArrayViewMutD<'a, f64>,
    pub grad: ArrayViewMutD<'a, f64>,
}

pub trait Optimizer {
    fn step(&mut self, params: &mut [ParamMut<'_>]);

    fn zero_grad(&self, params: &mut [ParamMut<'_>]) {
        for param in params.iter_mut() {
            param.grad.fill(0.0);
        }
    }
}
