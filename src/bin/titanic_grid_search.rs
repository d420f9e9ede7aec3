use std::error::Error;
use std::path::Path;

use titanic_ml::experiments::grid_search::run_grid_search_experiment;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Starting Titanic Hyperparameter Search Experiment");
    println!("=================================================\n");
    run_grid_search_experiment(Path::new("data"), Path::new("plots"))?;
    println!("\nExperiment completed successfully!");
    Ok(())
}
