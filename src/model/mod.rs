//! Model definitions for historic yield samples and the store contract.
//!
//! This module provides the sample data structures, the sample type
//! classification and the traits every concrete store implements.

pub mod sample;
pub mod traits;
pub mod types;
pub mod utilities;

// Re-export commonly used items at the module level
pub use sample::{truncate_to_second, HistoricSample};
pub use traits::{HistoricStore, SampleStore};
pub use types::SampleType;
pub use utilities::{age_in_days, latest_yields, record_samples};
