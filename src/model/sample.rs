use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};

/// A single recorded cumulative yield reading for one device.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricSample {
    /// Inverter serial number
    pub serial: String,
    /// When the reading was taken, at whole-second resolution
    pub timestamp: DateTime<Utc>,
    /// Cumulative energy produced up to `timestamp`, in Wh
    pub total_yield: f64,
}

impl HistoricSample {
    /// Creates a sample, truncating the timestamp to whole seconds.
    pub fn new(serial: impl Into<String>, timestamp: DateTime<Utc>, total_yield: f64) -> Self {
        Self {
            serial: serial.into(),
            timestamp: truncate_to_second(timestamp),
            total_yield,
        }
    }

    /// Checks the sample can be stored.
    ///
    /// # Returns
    /// - `Ok(())` for a non-empty serial and a finite, non-negative yield
    /// - `Err(Error::InvalidSample)` otherwise
    pub fn validate(&self) -> Result<()> {
        validate_serial(&self.serial)?;
        if !self.total_yield.is_finite() {
            return Err(Error::invalid_sample(format!(
                "total yield for '{}' is not finite",
                self.serial
            )));
        }
        if self.total_yield < 0.0 {
            return Err(Error::invalid_sample(format!(
                "total yield for '{}' is negative: {}",
                self.serial, self.total_yield
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_serial(serial: &str) -> Result<()> {
    if serial.trim().is_empty() {
        return Err(Error::invalid_sample("serial must not be empty"));
    }
    Ok(())
}

/// Drops the sub-second part of a timestamp.
pub fn truncate_to_second(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    from_unix_seconds(timestamp.timestamp()).unwrap_or(timestamp)
}

pub(crate) fn from_unix_seconds(seconds: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{t1, test_serial};
    use chrono::Duration;

    mod succeeds {
        use super::*;

        #[test]
        fn test_new_truncates_subseconds() {
            let ts = t1() + Duration::milliseconds(750);
            let sample = HistoricSample::new(test_serial(), ts, 100.0);
            assert_eq!(sample.timestamp, t1());
        }

        #[test]
        fn test_validate_accepts_zero_yield() {
            let sample = HistoricSample::new(test_serial(), t1(), 0.0);
            assert!(sample.validate().is_ok());
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_validate_empty_serial() {
            let sample = HistoricSample::new("  ", t1(), 100.0);
            let err = sample.validate().unwrap_err();
            assert!(matches!(err, Error::InvalidSample(_)));
        }

        #[test]
        fn test_validate_negative_yield() {
            let sample = HistoricSample::new(test_serial(), t1(), -1.0);
            let err = sample.validate().unwrap_err();
            assert!(err.to_string().contains("negative"));
        }

        #[test]
        fn test_validate_nan_yield() {
            let sample = HistoricSample::new(test_serial(), t1(), f64::NAN);
            assert!(matches!(sample.validate(), Err(Error::InvalidSample(_))));
        }
    }
}
