//! Timestamped backups of the rates file.
//!
//! A crawl rewrites the output file from scratch, so the previous
//! version is copied aside first.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::StoreError;

/// Copies `path` to a sibling suffixed with `.bak` and the current
/// local time in ISO-8601 format, returning the backup path.
///
/// # Errors
///
/// Propagates the copy failure; backups are not best-effort.
pub fn backup(path: &Path) -> Result<PathBuf, StoreError> {
    let stamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f");
    let file_name = path.file_name().and_then(OsStr::to_str).unwrap_or_default();
    let target = path.with_file_name(format!("{file_name}.bak{stamp}"));

    log::info!("Backing up rates file to {}", target.display());
    std::fs::copy(path, &target)?;

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_copies_bytes_to_timestamped_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imho_rates_films_someuser.json");
        std::fs::write(&path, "[{}]").unwrap();

        let target = backup(&path).unwrap();

        let name = target.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("imho_rates_films_someuser.json.bak"));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "[{}]");
        // The original stays in place for the merge pass.
        assert!(path.exists());
    }

    #[test]
    fn backup_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(backup(&dir.path().join("absent.json")).is_err());
    }
}
