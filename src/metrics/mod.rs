//! Evaluation metrics for binary classifiers.

pub mod calibration;
pub mod classification;
pub mod roc;

pub use calibration::{calibration_curve, expected_calibration_error, CalibrationBin};
pub use classification::{
    brier_score, calculate_accuracy, confusion_counts, log_loss, ConfusionCounts,
};
pub use roc::{threshold_sweep, RocCurve, RocPoint, ThresholdMetrics};
