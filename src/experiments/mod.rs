/// Experiments over the Titanic survival dataset
///
/// Each module is a self-contained study with its own binary entry
/// point: a shared pipeline (download, encode, standardize) feeds a
/// model, and results land on stdout plus PNG charts in a plots
/// directory.
pub mod baseline;
pub mod calibration;
pub mod cross_validation;
pub mod feature_selection;
pub mod grid_search;
pub mod mc_dropout;
pub mod polynomial;
pub mod roc_analysis;
pub mod visualization;

pub use baseline::run_baseline_experiment;
pub use calibration::run_calibration_experiment;
pub use cross_validation::run_cross_validation_experiment;
pub use feature_selection::run_feature_selection_experiment;
pub use grid_search::run_grid_search_experiment;
pub use mc_dropout::run_mc_dropout_experiment;
pub use polynomial::run_polynomial_experiment;
pub use roc_analysis::run_roc_analysis_experiment;

use std::error::Error;
use std::path::Path;

use crate::data::{encode_features, fetch_titanic_csv, load_titanic_dataset, TitanicData};

/// Fetches, parses and encodes the dataset in one step.
pub(crate) fn load_dataset(data_dir: &Path) -> Result<TitanicData, Box<dyn Error>> {
    let csv_path = fetch_titanic_csv(data_dir)?;
    let passengers = load_titanic_dataset(&csv_path)?;
    Ok(encode_features(&passengers)?)
}
