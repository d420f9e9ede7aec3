use itertools::Itertools;
use ndarray::Array2;

use crate::error::{Result, TitanicError};

/// Expands a feature matrix with all monomials up to a fixed degree.
///
/// For inputs `a, b` and degree 2 the output columns are
/// `a, b, a^2, a*b, b^2`. The constant term is left out since the models
/// downstream carry their own intercept.
#[derive(Debug, Clone)]
pub struct PolynomialFeatures {
    pub degree: usize,
}

/// Binomial coefficient `C(n, k)` computed without overflow for the
/// small values used here.
fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result = 1usize;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

impl PolynomialFeatures {
    pub fn new(degree: usize) -> Self {
        PolynomialFeatures { degree }
    }

    /// Number of output columns for `n_input` input columns.
    pub fn n_output_features(&self, n_input: usize) -> usize {
        // All monomials of degree <= D over n variables, minus the constant.
        binomial(n_input + self.degree, self.degree) - 1
    }

    /// Human-readable names for the expanded columns, in output order.
    ///
    /// Repeated factors collapse to powers: `["age", "age^2", "age*fare"]`.
    pub fn feature_names(&self, input_names: &[&str]) -> Vec<String> {
        let n = input_names.len();
        let mut names = Vec::new();
        for degree in 1..=self.degree {
            for combo in (0..n).combinations_with_replacement(degree) {
                let mut parts = Vec::new();
                for (index, group) in &combo.iter().chunk_by(|&&i| i) {
                    let power = group.count();
                    if power == 1 {
                        parts.push(input_names[index].to_string());
                    } else {
                        parts.push(format!("{}^{}", input_names[index], power));
                    }
                }
                names.push(parts.join("*"));
            }
        }
        names
    }

    /// Builds the expanded matrix from `features`.
    ///
    /// Column order is all degree-1 monomials, then degree-2, and so on,
    /// each block in lexicographic order of the factor indices.
    pub fn transform(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        if self.degree < 1 {
            return Err(TitanicError::InvalidParameter(
                "polynomial degree must be at least 1".to_string(),
            ));
        }
        let (n_rows, n_input) = features.dim();
        if n_input == 0 {
            return Err(TitanicError::EmptyData(
                "cannot expand a matrix with zero columns".to_string(),
            ));
        }

        let n_output = self.n_output_features(n_input);
        let mut expanded = Array2::zeros((n_rows, n_output));
        let mut column = 0;
        for degree in 1..=self.degree {
            for combo in (0..n_input).combinations_with_replacement(degree) {
                for row in 0..n_rows {
                    let mut value = 1.0;
                    for &index in &combo {
                        value *= features[[row, index]];
                    }
                    expanded[[row, column]] = value;
                }
                column += 1;
            }
        }
        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_degree_one_is_identity() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let expanded = PolynomialFeatures::new(1).transform(&x).unwrap();
        assert_eq!(expanded, x);
    }

    #[test]
    fn test_degree_two_columns() {
        let x = array![[2.0, 3.0]];
        let expanded = PolynomialFeatures::new(2).transform(&x).unwrap();
        // a, b, a^2, a*b, b^2
        assert_eq!(expanded, array![[2.0, 3.0, 4.0, 6.0, 9.0]]);
    }

    #[test]
    fn test_output_count_matches_formula() {
        let poly = PolynomialFeatures::new(3);
        let x = Array2::<f64>::ones((4, 2));
        let expanded = poly.transform(&x).unwrap();
        // C(5, 3) - 1 = 9 monomials over two variables up to degree 3.
        assert_eq!(poly.n_output_features(2), 9);
        assert_eq!(expanded.ncols(), 9);
    }

    #[test]
    fn test_feature_names() {
        let poly = PolynomialFeatures::new(2);
        let names = poly.feature_names(&["age", "fare"]);
        assert_eq!(names, vec!["age", "fare", "age^2", "age*fare", "fare^2"]);
        assert_eq!(names.len(), poly.n_output_features(2));
    }

    #[test]
    fn test_degree_zero_fails() {
        let x = array![[1.0]];
        assert!(PolynomialFeatures::new(0).transform(&x).is_err());
    }
}
