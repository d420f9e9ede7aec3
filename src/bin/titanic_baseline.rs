use std::error::Error;
use std::path::Path;

use titanic_ml::experiments::baseline::run_baseline_experiment;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Starting Titanic Baseline Experiment");
    println!("====================================\n");
    run_baseline_experiment(Path::new("data"), Path::new("plots"))?;
    println!("\nExperiment completed successfully!");
    Ok(())
}
