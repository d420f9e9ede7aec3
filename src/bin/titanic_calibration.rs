use std::error::Error;
use std::path::Path;

use titanic_ml::experiments::calibration::run_calibration_experiment;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Starting Titanic Calibration Experiment");
    run_calibration_experiment(Path::new("data"), Path::new("plots"))?;
    println!("Experiment completed successfully");
    Ok(())
}
