use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::model::sample::{from_unix_seconds, validate_serial};
use crate::model::{HistoricSample, HistoricStore, SampleStore, SampleType};
use crate::store::schema;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::time::Duration;

/// Historic store persisted in a SQLite database.
///
/// One pool is opened per store and released by [`SqliteStore::close`].
/// Each write is a single `INSERT`, so concurrent readers see it fully or not
/// at all. Writers for different serials share SQLite's database-level lock.
pub struct SqliteStore {
    pool: SqlitePool,
    path: String,
}

impl SqliteStore {
    /// Opens an existing database at the current schema version.
    ///
    /// # Errors
    /// - `Error::WrongSchema` if the database is empty, foreign or at another version
    /// - `Error::Database` if the file cannot be opened
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        let store = Self::connect(config, false).await?;
        if let Err(e) = schema::verify(&store.pool).await {
            store.close().await;
            return Err(e);
        }
        tracing::info!("Opened historic store at {}", store.path);
        Ok(store)
    }

    /// Creates a new database with the current schema.
    ///
    /// Always creates a missing file. Fails with `Error::WrongSchema` if the
    /// database already has tables.
    pub async fn create(config: &StoreConfig) -> Result<Self> {
        let store = Self::connect(config, true).await?;
        if let Err(e) = schema::create(&store.pool).await {
            store.close().await;
            return Err(e);
        }
        tracing::info!("Created historic store at {}", store.path);
        Ok(store)
    }

    /// Creates the schema in an empty database, otherwise behaves like [`SqliteStore::open`].
    pub async fn open_or_create(config: &StoreConfig) -> Result<Self> {
        let store = Self::connect(config, config.create_if_missing).await?;
        let result = match schema::inspect(&store.pool).await {
            Ok(schema::SchemaState::Empty) => schema::create(&store.pool).await,
            Ok(_) => schema::verify(&store.pool).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            store.close().await;
            return Err(e);
        }
        tracing::info!("Opened historic store at {}", store.path);
        Ok(store)
    }

    /// Upgrades an older database to the current schema and opens it.
    ///
    /// Databases already at the current version are opened unchanged.
    pub async fn migrate(config: &StoreConfig) -> Result<Self> {
        let store = Self::connect(config, false).await?;
        if let Err(e) = schema::migrate(&store.pool).await {
            store.close().await;
            return Err(e);
        }
        Ok(store)
    }

    /// Opens the store the way `config` asks for.
    ///
    /// Creates the schema in an empty database when `create_if_missing` is
    /// set. A schema mismatch is retried through [`SqliteStore::migrate`] when
    /// `auto_migrate` is set; a database migration cannot fix still fails with
    /// `Error::WrongSchema`. An invalid `config` fails with `Error::Config`.
    pub async fn from_config(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let opened = if config.create_if_missing {
            Self::open_or_create(config).await
        } else {
            Self::open(config).await
        };

        match opened {
            Err(e) if e.is_wrong_schema() && config.auto_migrate => {
                tracing::warn!("{}, migrating {}", e, config.path);
                Self::migrate(config).await
            }
            other => other,
        }
    }

    /// Releases every pooled connection.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::debug!("Closed historic store at {}", self.path);
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    async fn connect(config: &StoreConfig, create_if_missing: bool) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(create_if_missing)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool,
            path: config.path.clone(),
        })
    }
}

/// SQLite messages raised when a statement meets a table of another layout.
const SCHEMA_DRIFT_MESSAGES: [&str; 3] = [
    "no such table",
    "no such column",
    "has no column named",
];

/// Reports SQLite errors caused by a missing table or column as a schema mismatch.
fn storage_error(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db) = &err {
        let message = db.message();
        if SCHEMA_DRIFT_MESSAGES.iter().any(|m| message.contains(m)) {
            return Error::wrong_schema(schema::expected(), message.to_string());
        }
    }
    Error::Database(err)
}

#[async_trait]
impl HistoricStore for SqliteStore {
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
        sqlx::query_scalar::<_, f64>(
            "SELECT total_yield FROM generation
             WHERE inverter_serial = ? AND timestamp = ? AND sample_type = ?",
        )
        .bind(serial)
        .bind(timestamp.timestamp())
        .bind(SampleType::InverterFast.code())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn get_last_historic(&self, serial: &str) -> Result<Option<HistoricSample>> {
        self.get_last_sample(serial, SampleType::InverterFast).await
    }
}

#[async_trait]
impl SampleStore for SqliteStore {
    async fn add_sample(
        &self,
        serial: &str,
        timestamp: DateTime<Utc>,
        sample_type: SampleType,
        total_yield: f64,
    ) -> Result<()> {
        let sample = HistoricSample::new(serial, timestamp, total_yield);
        sample.validate()?;

        let result = sqlx::query(
            "INSERT INTO generation (inverter_serial, timestamp, sample_type, total_yield)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&sample.serial)
        .bind(sample.timestamp.timestamp())
        .bind(sample_type.code())
        .bind(sample.total_yield)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::debug!(
                    "Recorded {} sample for {} at {}: {}",
                    sample_type,
                    sample.serial,
                    sample.timestamp,
                    sample.total_yield
                );
                Ok(())
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                tracing::warn!(
                    "Rejected duplicate {} sample for {} at {}",
                    sample_type,
                    sample.serial,
                    sample.timestamp
                );
                Err(Error::duplicate(sample.serial, sample.timestamp))
            }
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn get_last_sample(
        &self,
        serial: &str,
        sample_type: SampleType,
    ) -> Result<Option<HistoricSample>> {
        validate_serial(serial)?;
        let row: Option<(i64, f64)> = sqlx::query_as(
            "SELECT timestamp, total_yield FROM generation
             WHERE inverter_serial = ? AND sample_type = ?
             ORDER BY timestamp DESC LIMIT 1",
        )
        .bind(serial)
        .bind(sample_type.code())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        let Some((seconds, total_yield)) = row else {
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
