//! Snapshot writer: pretty-printed UTF-8 JSON at the configured output path.

use std::fs;
use std::path::Path;

use anyhow::Context as _;

use tokdash_core::Snapshot;

/// Writes the snapshot as pretty-printed JSON, creating the parent directory
/// if needed. `serde_json` emits non-ASCII characters literally, which the
/// dashboard expects (nicknames and captions are full of them).
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written. Write failures are fatal to the run.
pub(crate) fn write_snapshot(path: &Path, snapshot: &Snapshot) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(snapshot).context("serializing snapshot")?;
    fs::write(path, json).with_context(|| format!("writing snapshot to {}", path.display()))?;

    tracing::info!(path = %path.display(), "snapshot written");
    Ok(())
}
