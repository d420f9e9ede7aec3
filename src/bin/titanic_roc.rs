use std::error::Error;
use std::path::Path;

use titanic_ml::experiments::roc_analysis::run_roc_analysis_experiment;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Starting Titanic ROC Analysis Experiment");
    println!("========================================\n");
    run_roc_analysis_experiment(Path::new("data"), Path::new("plots"))?;
    println!("\nExperiment completed successfully!");
    Ok(())
}
