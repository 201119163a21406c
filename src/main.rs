//! Inverter historic store reporter
//!
//! Opens the configured SQLite historic store, creating or migrating its
//! schema as configured, and logs the latest recorded yield of every
//! configured inverter.
//!
//! # Environment
//!
//! - `LOG_LEVEL`: tracing level, default `info`
//! - `STORE_PATH`: SQLite database file (required)
//! - `STORE_CREATE_IF_MISSING`, `STORE_AUTO_MIGRATE`, `STORE_MAX_CONNECTIONS`
//! - `INVERTER_SERIALS`: comma separated serial numbers

use anyhow::Context;
use chrono::{DateTime, Utc};
use inverter_historic_store::config;
use inverter_historic_store::model::{age_in_days, latest_yields};
use inverter_historic_store::{HistoricStore, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::load_app_config()?;
    tracing_subscriber::fmt()
        .with_max_level(app_config.log_level())
        .init();

    let store_config = config::load_store_config()?;
    let inverter_config = config::load_inverter_config()?;

    let store = SqliteStore::from_config(&store_config)
        .await
        .with_context(|| format!("Failed to open historic store at {}", store_config.path))?;

    if inverter_config.serials.is_empty() {
        tracing::warn!("No inverters configured, set INVERTER_SERIALS to report yields");
    }
    let reported = report_latest(&store, &inverter_config.serials, Utc::now()).await;
    tracing::info!(
        "Reported {} of {} inverters",
        reported,
        inverter_config.serials.len()
    );

    store.close().await;
    Ok(())
}

/// Logs the latest historic yield for each serial.
///
/// # Returns
/// The number of serials that have at least one recorded sample
async fn report_latest(
    store: &dyn HistoricStore,
    serials: &[String],
    now: DateTime<Utc>,
) -> usize {
    let mut reported = 0;
    for (serial, latest) in latest_yields(store, serials).await {
        match latest {
            Some(sample) => {
                tracing::info!(
                    "{}: {} Wh at {} ({} days ago)",
                    serial,
                    sample.total_yield,
                    sample.timestamp,
                    age_in_days(&sample, now)
                );
                reported += 1;
            }
            None => tracing::info!("{}: no historic samples", serial),
        }
    }
    reported
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use inverter_historic_store::{Error, HistoricSample, MemoryStore, Result};

    /// Store whose database connection is gone.
    struct ClosedStore;

    #[async_trait]
    impl HistoricStore for ClosedStore {
        async fn add_historic(&self, _: &str, _: DateTime<Utc>, _: f64) -> Result<()> {
            Err(Error::Database(sqlx::Error::PoolClosed))
        }

        async fn get_one_historic(&self, _: &str, _: DateTime<Utc>) -> Result<Option<f64>> {
            Err(Error::Database(sqlx::Error::PoolClosed))
        }

        async fn get_last_historic(&self, _: &str) -> Result<Option<HistoricSample>> {
            Err(Error::Database(sqlx::Error::PoolClosed))
        }
    }

    mod report_latest {
        use super::*;

        #[tokio::test]
        async fn succeeds() {
            let store = MemoryStore::new();
            let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
            store.add_historic("INV001", ts, 100.0).await.unwrap();
            store.add_historic("INV002", ts, 50.0).await.unwrap();

            let serials = vec![
                "INV001".to_string(),
                "INV002".to_string(),
                "INV003".to_string(),
            ];
            let reported = report_latest(&store, &serials, ts + Duration::days(1)).await;

            assert_eq!(reported, 2);
        }

        #[tokio::test]
        async fn fails() {
            let serials = vec!["INV001".to_string(), "INV002".to_string()];
            let reported = report_latest(&ClosedStore, &serials, Utc::now()).await;

            assert_eq!(reported, 0);
        }
    }
}
