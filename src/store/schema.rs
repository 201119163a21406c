//! On-disk layout of the SQLite historic store.
//!
//! The `schema` table holds exactly one `(magic, version)` row. Version 0 is
//! the legacy layout without a `sample_type` column; every row in it is an
//! inverter-fast sample.

use crate::error::{Error, Result};
use crate::model::SampleType;
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Identifies a database as belonging to this store.
pub const SCHEMA_MAGIC: i64 = 0x7153_4d41;

/// Schema version this build reads and writes.
pub const SCHEMA_VERSION: i64 = 1;

const CREATE_SCHEMA_TABLE: &str =
    "CREATE TABLE schema (magic INTEGER NOT NULL, version INTEGER NOT NULL)";

const CREATE_GENERATION_TABLE: &str = "CREATE TABLE generation (
    inverter_serial TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    sample_type INTEGER NOT NULL,
    total_yield REAL NOT NULL,
    PRIMARY KEY (inverter_serial, timestamp, sample_type)
)";

/// What was found when inspecting a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaState {
    /// No tables at all
    Empty,
    /// A recognised schema row with this version
    Version(i64),
    /// Tables exist but are not ours
    Unrecognised(String),
}

impl SchemaState {
    pub fn describe(&self) -> String {
        match self {
            SchemaState::Empty => "empty database".to_string(),
            SchemaState::Version(v) => format!("version {}", v),
            SchemaState::Unrecognised(reason) => reason.clone(),
        }
    }
}

pub(crate) fn expected() -> String {
    SchemaState::Version(SCHEMA_VERSION).describe()
}

pub(crate) async fn inspect(pool: &SqlitePool) -> Result<SchemaState> {
    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(pool)
            .await?;

    if tables.is_empty() {
        return Ok(SchemaState::Empty);
    }
    if !tables.iter().any(|t| t == "schema") {
        return Ok(SchemaState::Unrecognised("no schema table".to_string()));
    }

    let rows: Vec<(i64, i64)> = sqlx::query_as("SELECT magic, version FROM schema")
        .fetch_all(pool)
        .await?;

    Ok(match rows.as_slice() {
        [(magic, version)] if *magic == SCHEMA_MAGIC => SchemaState::Version(*version),
        [(magic, _)] => SchemaState::Unrecognised(format!("magic {:#x}", magic)),
        _ => SchemaState::Unrecognised(format!("{} schema rows", rows.len())),
    })
}

/// Fails with `WrongSchema` unless the database is at the current version.
pub(crate) async fn verify(pool: &SqlitePool) -> Result<()> {
    match inspect(pool).await? {
        SchemaState::Version(SCHEMA_VERSION) => Ok(()),
        other => Err(Error::wrong_schema(expected(), other.describe())),
    }
}

pub(crate) async fn create(pool: &SqlitePool) -> Result<()> {
    let state = inspect(pool).await?;
    if state != SchemaState::Empty {
        return Err(Error::wrong_schema(SchemaState::Empty.describe(), state.describe()));
    }

    let mut tx = pool.begin().await?;
    sqlx::query(CREATE_SCHEMA_TABLE).execute(&mut *tx).await?;
    sqlx::query("INSERT INTO schema (magic, version) VALUES (?, ?)")
        .bind(SCHEMA_MAGIC)
        .bind(SCHEMA_VERSION)
        .execute(&mut *tx)
        .await?;
    sqlx::query(CREATE_GENERATION_TABLE).execute(&mut *tx).await?;
    tx.commit().await?;

    tracing::info!("Created historic store schema version {}", SCHEMA_VERSION);
    Ok(())
}

/// Brings a recognised older database up to [`SCHEMA_VERSION`].
///
/// # Returns
/// The version the database was at before migrating
pub(crate) async fn migrate(pool: &SqlitePool) -> Result<i64> {
    let from = match inspect(pool).await? {
        SchemaState::Version(v) if (0..=SCHEMA_VERSION).contains(&v) => v,
        other => return Err(Error::wrong_schema(expected(), other.describe())),
    };

    if from == SCHEMA_VERSION {
        tracing::debug!("Historic store schema already at version {}", from);
        return Ok(from);
    }

    let mut tx = pool.begin().await?;
    if from == 0 {
        migrate_v0_to_v1(&mut tx).await?;
    }
    sqlx::query("UPDATE schema SET version = ?")
        .bind(SCHEMA_VERSION)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(
        "Migrated historic store schema from version {} to {}",
        from,
        SCHEMA_VERSION
    );
    Ok(from)
}

async fn migrate_v0_to_v1(tx: &mut Transaction<'_, Sqlite>) -> Result<()> {
    sqlx::query(&CREATE_GENERATION_TABLE.replacen("generation", "generation_v1", 1))
        .execute(&mut **tx)
        .await?;
    sqlx::query(
        "INSERT INTO generation_v1 (inverter_serial, timestamp, sample_type, total_yield)
         SELECT inverter_serial, timestamp, ?, total_yield FROM generation",
    )
    .bind(SampleType::InverterFast.code())
    .execute(&mut **tx)
    .await?;
    sqlx::query("DROP TABLE generation").execute(&mut **tx).await?;
    sqlx::query("ALTER TABLE generation_v1 RENAME TO generation")
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Creates a version 0 database, as written by older releases.
#[cfg(test)]
pub(crate) async fn create_legacy_v0(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_SCHEMA_TABLE).execute(pool).await?;
    sqlx::query("INSERT INTO schema (magic, version) VALUES (?, 0)")
        .bind(SCHEMA_MAGIC)
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE TABLE generation (
            inverter_serial TEXT NOT NULL,
            timestamp INTEGER NOT NULL,
            total_yield REAL NOT NULL,
            PRIMARY KEY (inverter_serial, timestamp)
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}
