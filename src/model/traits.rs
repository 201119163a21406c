use crate::error::Result;
use crate::model::{HistoricSample, SampleType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage of cumulative yield readings keyed by inverter serial and time.
///
/// Implementors must be thread-safe (Send + Sync) so a single store can be
/// shared between tasks. A missing record is always `Ok(None)`, never an error.
///
/// Every implementation in this crate rejects a second write for the same
/// `(serial, timestamp)` with [`crate::Error::Duplicate`] and keeps the
/// original value.
#[async_trait]
pub trait HistoricStore: Send + Sync {
    /// Records an inverter-fast sample.
    ///
    /// # Arguments
    /// * `serial` - Inverter serial, must not be empty
    /// * `timestamp` - Reading time, truncated to whole seconds
    /// * `total_yield` - Cumulative yield in Wh, finite and non-negative
    ///
    /// # Returns
    /// - `Ok(())` once the sample is visible to the getters
    /// - `Err(Error::WrongSchema)` if the storage schema does not match
    /// - `Err` for any other condition preventing the write
    async fn add_historic(
        &self,
        serial: &str,
        timestamp: DateTime<Utc>,
        total_yield: f64,
    ) -> Result<()>;

    /// Looks up the yield recorded at exactly `timestamp`.
    async fn get_one_historic(
        &self,
        serial: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<f64>>;

    /// Returns the sample with the greatest timestamp for `serial`.
    async fn get_last_historic(&self, serial: &str) -> Result<Option<HistoricSample>>;
}

/// Recording of samples of any [`SampleType`].
///
/// Historic samples are the [`SampleType::InverterFast`] samples, so
/// `add_historic(s, t, y)` is the same as
/// `add_sample(s, t, SampleType::InverterFast, y)`.
#[async_trait]
pub trait SampleStore: HistoricStore {
    /// Records a sample of `sample_type`, rejecting duplicates per type.
    async fn add_sample(
        &self,
        serial: &str,
        timestamp: DateTime<Utc>,
        sample_type: SampleType,
        total_yield: f64,
    ) -> Result<()>;

    /// Returns the latest sample of `sample_type` for `serial`.
    async fn get_last_sample(
        &self,
        serial: &str,
        sample_type: SampleType,
    ) -> Result<Option<HistoricSample>>;
}
