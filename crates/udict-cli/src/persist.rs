use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use tempfile::NamedTempFile;
use tracing::debug;

/// Read the dictionary file. A missing file reads as empty.
pub fn read_existing(path: &Path) -> anyhow::Result<Vec<u8>> {
    match fs::read(path) {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "dictionary file absent; starting empty");
            Ok(Vec::new())
        }
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// `<file>.bak.<stamp>` next to `path`.
pub fn backup_path_for(path: &Path, stamp: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".bak.{stamp}"));
    path.with_file_name(name)
}

/// Replace `path` with `data` atomically, optionally copying the old file
/// aside first. Returns the backup path if one was written.
///
/// The new content goes to a temporary file in the same directory, takes on
/// the old file's permissions, and is renamed over the target.
pub fn write_atomic(path: &Path, data: &[u8], make_backup: bool) -> anyhow::Result<Option<PathBuf>> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let existing = fs::metadata(path).ok();

    let backup = match (&existing, make_backup) {
        (Some(_), true) => {
            let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
            let backup = backup_path_for(path, &stamp);
            fs::copy(path, &backup)
                .with_context(|| format!("failed to back up to {}", backup.display()))?;
            debug!(backup = %backup.display(), "backup written");
            Some(backup)
        }
        _ => None,
    };

    let mut tmp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    if let Some(meta) = &existing {
        // Permission copy failures are not fatal.
        if let Err(e) = fs::set_permissions(tmp.path(), meta.permissions()) {
            debug!(error = %e, "could not copy permissions");
        }
    }
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    Ok(backup)
}
