use std::error::Error;
use std::path::Path;

use titanic_ml::experiments::cross_validation::run_cross_validation_experiment;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Starting Titanic Cross-Validation Experiment");
    run_cross_validation_experiment(Path::new("data"), Path::new("plots"))?;
    println!("Experiment completed successfully");
    Ok(())
}
