//! Mock stores for exercising error paths.

use crate::error::{Error, Result};
use crate::model::{HistoricSample, HistoricStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy)]
enum Failure {
    WrongSchema,
    Database,
}

/// Store whose every operation fails with the same kind of error.
pub struct FailingStore {
    failure: Failure,
}

impl FailingStore {
    /// Fails as if the persisted schema were from another version.
    pub fn wrong_schema() -> Self {
        Self {
            failure: Failure::WrongSchema,
        }
    }

    /// Fails as if the database connection were gone.
    pub fn database() -> Self {
        Self {
            failure: Failure::Database,
        }
    }

    fn error(&self) -> Error {
        match self.failure {
            Failure::WrongSchema => Error::wrong_schema("version 1", "version 0"),
            Failure::Database => Error::Database(sqlx::Error::PoolClosed),
        }
    }
}

#[async_trait]
impl HistoricStore for FailingStore {
    async fn add_historic(&self, _: &str, _: DateTime<Utc>, _: f64) -> Result<()> {
        Err(self.error())
    }

    async fn get_one_historic(&self, _: &str, _: DateTime<Utc>) -> Result<Option<f64>> {
        Err(self.error())
    }

    async fn get_last_historic(&self, _: &str) -> Result<Option<HistoricSample>> {
        Err(self.error())
    }
}
