use std::error::Error;
use std::path::Path;

use titanic_ml::experiments::feature_selection::run_feature_selection_experiment;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Starting Titanic Feature Selection Experiment");
    println!("=============================================\n");
    run_feature_selection_experiment(Path::new("data"), Path::new("plots"))?;
    println!("\nExperiment completed successfully!");
    Ok(())
}
