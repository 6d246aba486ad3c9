//! JSON ledger file.
//!
//! Saves go to a temporary file next to the ledger that is then renamed over
//! it, so a reader sees either the previous snapshot or the new one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use anyhow::Context;
use divvy_core::ledger::LedgerSnapshot;
use tempfile::NamedTempFile;

/// Loads the snapshot at `path`, or an empty one if the file does not exist.
pub fn load(path: &Path) -> anyhow::Result<LedgerSnapshot> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "ledger file missing, starting empty");
            return Ok(LedgerSnapshot::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading ledger {}", path.display()));
        }
    };

    let snapshot: LedgerSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parsing ledger {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        users = snapshot.users.len(),
        expenses = snapshot.expenses.len(),
        "ledger loaded"
    );
    Ok(snapshot)
}

/// Writes `snapshot` to `path`.
///
/// Each call stages into its own temporary file in the ledger's directory,
/// syncs it, then renames it over the ledger.
pub fn save(path: &Path, snapshot: &LedgerSnapshot) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("serializing ledger")?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staging = NamedTempFile::new_in(dir)
        .with_context(|| format!("staging ledger in {}", dir.display()))?;
    staging
        .write_all(json.as_bytes())
        .and_then(|()| staging.as_file().sync_all())
        .with_context(|| format!("writing ledger {}", staging.path().display()))?;
    staging
        .persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("replacing ledger {}", path.display()))?;

    tracing::debug!(path = %path.display(), "ledger saved");
    Ok(())
}
