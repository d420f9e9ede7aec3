pub mod download;
pub mod splits;
pub mod titanic;

pub use download::fetch_titanic_csv;
pub use splits::{train_test_split, KFold, StratifiedKFold};
pub use titanic::{encode_features, load_titanic_dataset, RawPassenger, TitanicData};
pub use titanic::{FEATURE_NAMES, NUM_FEATURES};
