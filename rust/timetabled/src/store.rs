use crate::db;
use crate::model::Snapshot;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no snapshot stored under {0:?}")]
    Missing(String),
    #[error("snapshot under {key:?} could not be parsed: {source}")]
    Unparsable {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read snapshot storage: {0}")]
    Storage(#[from] rusqlite::Error),
}

#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub snapshot: Snapshot,
    /// Hex SHA-256 of the stored text.
    pub digest: String,
    pub loaded_at: DateTime<Utc>,
}

pub fn parse_snapshot(raw: &str) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_str(raw)
}

pub fn digest_hex(raw: &str) -> String {
    format!("{:x}", Sha256::digest(raw.as_bytes()))
}

/// Read and parse the snapshot stored under `key`.
///
/// Failures are logged here and handed back as values; callers decide how to
/// word "no data" to the user.
pub fn load(conn: &Connection, key: &str) -> Result<LoadedSnapshot, LoadError> {
    let result = read(conn, key);
    match &result {
        Ok(loaded) => info!(
            students = loaded.snapshot.students.len(),
            entries = loaded.snapshot.schedule.len(),
            "snapshot loaded"
        ),
        Err(LoadError::Missing(_)) => info!(key, "no snapshot stored"),
        Err(e) => warn!(key, error = %e, "snapshot load failed"),
    }
    result
}

fn read(conn: &Connection, key: &str) -> Result<LoadedSnapshot, LoadError> {
    let raw = db::storage_get(conn, key)?.ok_or_else(|| LoadError::Missing(key.to_string()))?;
    let snapshot = parse_snapshot(&raw).map_err(|source| LoadError::Unparsable {
        key: key.to_string(),
        source,
    })?;
    Ok(LoadedSnapshot {
        snapshot,
        digest: digest_hex(&raw),
        loaded_at: Utc::now(),
    })
}
