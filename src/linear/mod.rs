//! Linear models trained by batch gradient descent.

pub mod logistic;

pub use logistic::{logit, sigmoid, LogisticRegression};
