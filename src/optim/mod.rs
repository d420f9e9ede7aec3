//! Gradient-descent optimizers over raw parameter views.

pub mod adam;
pub mod optimizer;
pub mod sgd;

pub use adam::AdamOptimizer;
pub use optimizer::{Optimizer, ParamMut};
pub use sgd::SGDOptimizer;
