use std::path::Path;

use ndarray::{Array1, Array2};
use serde::Deserialize;

use crate::error::{Result, TitanicError};

/// Number of numeric features produced by [`encode_features`].
pub const NUM_FEATURES: usize = 7;

/// Column names of the encoded feature matrix, in order.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "pclass",
    "sex",
    "age",
    "fare",
    "family_size",
    "embarked_c",
    "embarked_q",
];

/// One row of the raw Kaggle Titanic CSV.
///
/// Optional fields map empty CSV cells to `None` so imputation decisions
/// stay out of the parsing layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPassenger {
    pub passenger_id: u32,
    pub survived: u8,
    pub pclass: u8,
    pub name: String,
    pub sex: String,
    pub age: Option<f64>,
    pub sib_sp: u32,
    pub parch: u32,
    pub ticket: String,
    pub fare: Option<f64>,
    pub cabin: Option<String>,
    pub embarked: Option<String>,
}

/// Encoded dataset ready for model training.
#[derive(Debug, Clone)]
pub struct TitanicData {
    /// One row per passenger, one column per entry of [`FEATURE_NAMES`].
    pub features: Array2<f64>,
    /// Survival labels, 0.0 or 1.0.
    pub labels: Array1<f64>,
}

/// Parses the Titanic CSV at `path` into raw passenger records.
///
/// # Arguments
/// * `path` - Location of the CSV file on disk
///
/// # Returns
/// All passenger rows in file order
pub fn load_titanic_dataset(path: &Path) -> Result<Vec<RawPassenger>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut passengers = Vec::new();
    for record in reader.deserialize() {
        let passenger: RawPassenger = record?;
        passengers.push(passenger);
    }
    if passengers.is_empty() {
        return Err(TitanicError::EmptyData(format!(
            "no passenger rows in {}",
            path.display()
        )));
    }
    Ok(passengers)
}

/// Mean over the present values of an optional column.
fn mean_present(values: impl Iterator<Item = Option<f64>>, column: &str) -> Result<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values.flatten() {
        sum += value;
        count += 1;
    }
    if count == 0 {
        return Err(TitanicError::EmptyData(format!(
            "column {column} has no present values to impute from"
        )));
    }
    Ok(sum / count as f64)
}

/// Encodes raw passengers into the numeric feature matrix and label vector.
///
/// Encoding choices:
/// * `sex` becomes 1.0 for female, 0.0 for male
/// * missing `age` and `fare` are filled with the column mean
/// * `family_size` is `SibSp + Parch`
/// * `embarked` is one-hot over C and Q with S (the majority port, also the
///   fill value for missing entries) as the reference category
///
/// # Arguments
/// * `passengers` - Raw rows from [`load_titanic_dataset`]
///
/// # Returns
/// Feature matrix of shape `(n, NUM_FEATURES)` paired with labels
pub fn encode_features(passengers: &[RawPassenger]) -> Result<TitanicData> {
    if passengers.is_empty() {
        return Err(TitanicError::EmptyData(
            "cannot encode an empty passenger list".to_string(),
        ));
    }

    let mean_age = mean_present(passengers.iter().map(|p| p.age), "Age")?;
    let mean_fare = mean_present(passengers.iter().map(|p| p.fare), "Fare")?;

    let n = passengers.len();
    let mut features = Array2::zeros((n, NUM_FEATURES));
    let mut labels = Array1::zeros(n);

    for (i, passenger) in passengers.iter().enumerate() {
        let embarked = passenger.embarked.as_deref().unwrap_or("S");
        features[[i, 0]] = passenger.pclass as f64;
        features[[i, 1]] = if passenger.sex == "female" { 1.0 } else { 0.0 };
        features[[i, 2]] = passenger.age.unwrap_or(mean_age);
        features[[i, 3]] = passenger.fare.unwrap_or(mean_fare);
        features[[i, 4]] = (passenger.sib_sp + passenger.parch) as f64;
        features[[i, 5]] = if embarked == "C" { 1.0 } else { 0.0 };
        features[[i, 6]] = if embarked == "Q" { 1.0 } else { 0.0 };
        labels[i] = passenger.survived as f64;
    }

    Ok(TitanicData { features, labels })
}
