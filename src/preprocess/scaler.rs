use ndarray::{Array1, Array2, Axis};

use crate::error::{Result, TitanicError};

/// Standard deviations below this are treated as constant columns.
const MIN_STD: f64 = 1e-6;

/// Per-column zero-mean unit-variance scaler.
///
/// Statistics are learned from the training partition with [`fit`] and
/// applied unchanged to any later partition with [`transform`], so test
/// rows never leak into the learned means.
///
/// [`fit`]: StandardScaler::fit
/// [`transform`]: StandardScaler::transform
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    stats: Option<(Array1<f64>, Array1<f64>)>,
}

impl StandardScaler {
    pub fn new() -> Self {
        StandardScaler { stats: None }
    }

    /// Learns per-column mean and standard deviation from `features`.
    ///
    /// Columns with near-zero spread store a divisor of 1.0, so constant
    /// columns pass through centred but unscaled.
    pub fn fit(&mut self, features: &Array2<f64>) -> Result<()> {
        if features.nrows() == 0 {
            return Err(TitanicError::EmptyData(
                "cannot fit a scaler on zero rows".to_string(),
            ));
        }
        let mean = features
            .mean_axis(Axis(0))
            .ok_or_else(|| TitanicError::EmptyData("mean over zero rows".to_string()))?;
        let std = features
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s < MIN_STD { 1.0 } else { s });
        self.stats = Some((mean, std));
        Ok(())
    }

    /// Applies the learned statistics to `features`.
    pub fn transform(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        let (mean, std) = self.stats.as_ref().ok_or_else(|| {
            TitanicError::NotFitted("call fit before transform".to_string())
        })?;
        if features.ncols() != mean.len() {
            return Err(TitanicError::DimensionMismatch(format!(
                "scaler was fitted on {} columns, got {}",
                mean.len(),
                features.ncols()
            )));
        }
        let mut scaled = features - mean;
        for (mut column, &s) in scaled.columns_mut().into_iter().zip(std.iter()) {
            column /= s;
        }
        Ok(scaled)
    }

    /// Fits on `features` and transforms them in one call.
    pub fn fit_transform(&mut self, features: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(features)?;
        self.transform(features)
    }

    /// Learned `(mean, std)` per column, if fitted.
    pub fn stats(&self) -> Option<(&Array1<f64>, &Array1<f64>)> {
        self.stats.as_ref().map(|(m, s)| (m, s))
    }
}
