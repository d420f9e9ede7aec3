use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Fixed source for the Titanic training table (Kaggle column layout).
pub const DATASET_URL: &str =
    "https://raw.githubusercontent.com/datasciencedojo/datasets/master/titanic.csv";

/// Name of the cached file inside the data directory.
pub const DATASET_FILE: &str = "titanic.csv";

/// Returns the path of the cached Titanic CSV, downloading it on first use.
///
/// The file is fetched once with a plain HTTP GET and then reused from
/// `data_dir` on every later run. There is no schema versioning; deleting
/// the cached file forces a fresh download.
///
/// # Arguments
/// * `data_dir` - Directory the CSV is cached in (created if missing)
///
/// # Returns
/// Path to the cached CSV file
pub fn fetch_titanic_csv(data_dir: &Path) -> Result<PathBuf> {
    let path = data_dir.join(DATASET_FILE);
    if path.is_file() {
        return Ok(path);
    }

    fs::create_dir_all(data_dir)?;

    let body = reqwest::blocking::Client::new()
        .get(DATASET_URL)
        .send()?
        .error_for_status()?
        .text()?;
    fs::write(&path, body)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_file_is_reused() {
        // A pre-existing file must short-circuit the download entirely.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATASET_FILE);
        fs::write(&path, "PassengerId,Survived\n1,0\n").unwrap();

        let returned = fetch_titanic_csv(dir.path()).unwrap();
        assert_eq!(returned, path);

        let content = fs::read_to_string(&returned).unwrap();
        assert!(content.starts_with("PassengerId"));
    }
}
