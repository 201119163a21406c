use crate::error::{Error, Result};
use crate::model::sample::{from_unix_seconds, validate_serial};
use crate::model::{HistoricSample, HistoricStore, SampleStore, SampleType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

type Series = BTreeMap<i64, f64>;

/// Process-local historic store.
///
/// All series live behind one `RwLock`, so a reader sees a write either
/// fully or not at all. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    series: RwLock<HashMap<(String, SampleType), Series>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        tracing::debug!("Creating in-memory historic store");
        Self::default()
    }

    /// Number of samples held across all serials and sample types.
    pub async fn len(&self) -> usize {
        self.series.read().await.values().map(BTreeMap::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl HistoricStore for MemoryStore {
    async fn add_historic(
        &self,
        serial: &str,
        timestamp: DateTime<Utc>,
        total_yield: f64,
    ) -> Result<()> {
        self.add_sample(serial, timestamp, SampleType::InverterFast, total_yield)
            .await
    }

    async fn get_one_historic(
        &self,
        serial: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<f64>> {
        validate_serial(serial)?;
        let series = self.series.read().await;
        Ok(series
            .get(&(serial.to_string(), SampleType::InverterFast))
            .and_then(|s| s.get(&timestamp.timestamp()))
            .copied())
    }

    async fn get_last_historic(&self, serial: &str) -> Result<Option<HistoricSample>> {
        self.get_last_sample(serial, SampleType::InverterFast).await
    }
}

#[async_trait]
impl SampleStore for MemoryStore {
    async fn add_sample(
        &self,
        serial: &str,
        timestamp: DateTime<Utc>,
        sample_type: SampleType,
        total_yield: f64,
    ) -> Result<()> {
        let sample = HistoricSample::new(serial, timestamp, total_yield);
        sample.validate()?;

        let mut series = self.series.write().await;
        let entry = series
            .entry((sample.serial.clone(), sample_type))
            .or_default();
        let key = sample.timestamp.timestamp();
        if entry.contains_key(&key) {
            tracing::warn!(
                "Rejected duplicate {} sample for {} at {}",
                sample_type,
                sample.serial,
                sample.timestamp
            );
            return Err(Error::duplicate(sample.serial, sample.timestamp));
        }
        entry.insert(key, sample.total_yield);
        tracing::debug!(
            "Recorded {} sample for {} at {}: {}",
            sample_type,
            sample.serial,
            sample.timestamp,
            sample.total_yield
        );
        Ok(())
    }

    async fn get_last_sample(
        &self,
        serial: &str,
        sample_type: SampleType,
    ) -> Result<Option<HistoricSample>> {
        validate_serial(serial)?;
        let series = self.series.read().await;
        let last = series
            .get(&(serial.to_string(), sample_type))
            .and_then(|s| s.last_key_value());

        let Some((&seconds, &total_yield)) = last else {
            return Ok(None);
        };
        let timestamp = from_unix_seconds(seconds)
            .ok_or_else(|| Error::invalid_sample(format!("timestamp {} out of range", seconds)))?;
        Ok(Some(HistoricSample {
            serial: serial.to_string(),
            timestamp,
            total_yield,
        }))
    }
}
