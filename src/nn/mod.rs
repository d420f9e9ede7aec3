//! A small feed-forward network with explicit forward and backward
//! passes, used for dropout-based uncertainty estimates.

pub mod dense;
pub mod dropout;
pub mod mlp;

pub use dense::DenseLayer;
pub use dropout::Dropout;
pub use mlp::MlpClassifier;
