//! Model evaluation and hyperparameter selection.

pub mod cross_validation;
pub mod forward_selection;
pub mod search;

pub use cross_validation::{cross_validate, mean_and_std};
pub use forward_selection::{forward_selection, ForwardSelectionStep};
pub use search::{grid_search, random_search, ParamGrid, ParamRanges, SearchOutcome, SearchResult};
