//! Historic yield store for solar inverter monitoring.
//!
//! Records the cumulative energy yield of each inverter, keyed by serial
//! number and timestamp, and answers two questions about it: what was the
//! yield at exactly this time, and what is the latest recorded yield.
//!
//! # Components
//!
//! - [`HistoricStore`]: the storage contract every store implements
//! - [`SampleStore`]: recording for every [`SampleType`], not only inverter-fast
//! - [`MemoryStore`] / [`SqliteStore`]: concrete stores
//! - [`Error`]: failures, with [`Error::WrongSchema`] kept distinct so callers
//!   can choose to migrate

pub mod config;
pub mod error;
pub mod model;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use error::{ConfigError, Error, Result};
pub use model::{HistoricSample, HistoricStore, SampleStore, SampleType};
pub use store::{MemoryStore, SqliteStore};
