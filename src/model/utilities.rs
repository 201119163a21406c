use chrono::{DateTime, Utc};
use futures::future::join_all;

use super::sample::HistoricSample;
use super::traits::HistoricStore;

/// Records many historic samples concurrently.
///
/// Failed writes are logged but don't stop the other samples.
///
/// # Returns
/// The number of samples that were recorded
pub async fn record_samples(store: &dyn HistoricStore, samples: &[HistoricSample]) -> usize {
    let results = join_all(
        samples
            .iter()
            .map(|s| store.add_historic(&s.serial, s.timestamp, s.total_yield)),
    )
    .await;

    results
        .into_iter()
        .zip(samples)
        .filter(|(res, sample)| match res {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    "Failed to record sample for {} at {}: {:?}",
                    sample.serial,
                    sample.timestamp,
                    e
                );
                false
            }
        })
        .count()
}

/// Fetches the latest historic sample for each serial concurrently.
///
/// Lookup failures are logged and reported as absent.
pub async fn latest_yields(
    store: &dyn HistoricStore,
    serials: &[String],
) -> Vec<(String, Option<HistoricSample>)> {
    let results = join_all(serials.iter().map(|s| store.get_last_historic(s))).await;

    serials
        .iter()
        .cloned()
        .zip(results)
        .map(|(serial, res)| match res {
            Ok(latest) => (serial, latest),
            Err(e) => {
                tracing::error!("Failed to get last historic for {}: {:?}", serial, e);
                (serial, None)
            }
        })
        .collect()
}

/// Elapsed whole days between a sample and `now`, for reporting stale devices.
pub fn age_in_days(sample: &HistoricSample, now: DateTime<Utc>) -> i64 {
    (now - sample.timestamp).num_days()
}
