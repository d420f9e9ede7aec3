use std::error::Error;
use std::path::Path;

use titanic_ml::experiments::mc_dropout::run_mc_dropout_experiment;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Starting Titanic Monte Carlo Dropout Experiment");
    println!("===============================================\n");
    run_mc_dropout_experiment(Path::new("data"), Path::new("plots"))?;
    println!("\nExperiment completed successfully!");
    Ok(())
}
