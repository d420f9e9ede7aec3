use std::error::Error;
use std::path::Path;

use titanic_ml::experiments::polynomial::run_polynomial_experiment;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Starting Titanic Polynomial Features Experiment");
    run_polynomial_experiment(Path::new("data"), Path::new("plots"))?;
    println!("Experiment completed successfully");
    Ok(())
}
