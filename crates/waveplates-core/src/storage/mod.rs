mod config;
pub mod migrations;
pub mod tracker_db;

pub use config::{Config, DefaultsConfig, DeltasConfig, DisplayConfig};
pub use tracker_db::TrackerDb;

use std::path::PathBuf;

use crate::error::{CoreError, Result};
use crate::stamina::{NewTracker, Tracker};

/// Returns the data directory, creating it if needed.
///
/// `WAVEPLATES_DATA_DIR` wins when set. Otherwise `~/.config/waveplates/`,
/// or `~/.config/waveplates-dev/` with WAVEPLATES_ENV=dev.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("WAVEPLATES_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("WAVEPLATES_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("waveplates-dev")
            } else {
                base_dir.join("waveplates")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Collection of trackers keyed by an opaque id.
///
/// A write is durable once the call returns, and `list_trackers` always
/// reflects the last successful write. A single writer is assumed.
pub trait TrackerStore {
    /// All trackers, ordered by name (case-insensitive) then id.
    fn list_trackers(&self) -> Result<Vec<Tracker>>;

    fn get_tracker(&self, id: &str) -> Result<Option<Tracker>>;

    /// Store a new tracker under a freshly generated id.
    fn insert_tracker(&self, tracker: NewTracker) -> Result<Tracker>;

    /// Replace the tracker with the same id. Fails with `NotFound` if absent.
    fn update_tracker(&self, tracker: &Tracker) -> Result<Tracker>;

    /// Fails with `NotFound` if absent.
    fn delete_tracker(&self, id: &str) -> Result<()>;

    /// Resolve a full id or a unique id prefix.
    fn resolve_id(&self, prefix: &str) -> Result<String> {
        if prefix.is_empty() {
            return Err(CoreError::NotFound { id: String::new() });
        }
        let matches: Vec<String> = self
            .list_trackers()?
            .into_iter()
            .map(|t| t.id)
            .filter(|id| id.starts_with(prefix))
            .collect();
        if let Some(exact) = matches.iter().find(|id| id.as_str() == prefix) {
            return Ok(exact.clone());
        }
        match matches.len() {
            0 => Err(CoreError::NotFound {
                id: prefix.to_string(),
            }),
            1 => Ok(matches.into_iter().next().unwrap_or_default()),
            n => Err(CoreError::AmbiguousId {
                prefix: prefix.to_string(),
                matches: n,
            }),
        }
    }
}
