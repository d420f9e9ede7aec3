//! Feature preprocessing: standardization and polynomial expansion.

pub mod polynomial;
pub mod scaler;

pub use polynomial::PolynomialFeatures;
pub use scaler::StandardScaler;
