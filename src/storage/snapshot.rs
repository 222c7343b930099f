use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AccountStore;
use crate::domain::Account;

const SNAPSHOT_VERSION: &str = "1";

/// Whole-store state as persisted to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub accounts: Vec<Account>,
}

impl AccountStore {
    /// Load a store from a JSON snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read store file {}", path.display()))?;
        let snapshot: StoreSnapshot = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse store file {}", path.display()))?;
        let store = Self::from_accounts(snapshot.accounts)
            .context("Failed to rebuild store from snapshot")?;
        Ok(store)
    }

    /// Persist the store as a JSON snapshot. The file is written to a
    /// temporary sibling and renamed into place, so a crash mid-write leaves
    /// the previous snapshot intact rather than a half-written one.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let snapshot = StoreSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            saved_at: Utc::now(),
            accounts: self.list().context("Failed to snapshot accounts")?,
        };

        let data = serde_json::to_string_pretty(&snapshot).context("Failed to encode snapshot")?;

        // Append rather than swap the extension, so sibling stores like
        // "a.json" and "a.dat" never share a temp file.
        let mut tmp = path.as_os_str().to_os_string();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);
        fs::write(&tmp, data)
            .with_context(|| format!("Failed to write store file {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace store file {}", path.display()))?;
        Ok(())
    }
}
