use std::fs;
use std::path::Path;

use anyhow::Result;

/// Delete stray staging files left in the blob root by interrupted uploads.
///
/// Runs independently of request handling, takes no locks, and only ever
/// touches `*.tmp` files; finished blobs are never candidates.
pub fn sweep_staging_files(root: &Path) -> Result<usize> {
    let mut removed = 0;

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if !name.to_string_lossy().ends_with(".tmp") {
            continue;
        }
        // A racing upload may still hold the file open; skip and let the
        // next sweep pick it up.
        if let Err(e) = fs::remove_file(entry.path()) {
            tracing::debug!("Skipping staging file {:?}: {}", name, e);
            continue;
        }
        removed += 1;
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn removes_only_staging_files() {
        let dir = std::env::temp_dir().join(format!("trailbook-sweep-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("5.jpg"), b"keep").unwrap();
        fs::write(dir.join("5.jpg.abc.tmp"), b"stray").unwrap();
        fs::write(dir.join("other.tmp"), b"stray").unwrap();

        let removed = sweep_staging_files(&dir).unwrap();
        assert_eq!(removed, 2);
        assert!(dir.join("5.jpg").exists());
        assert!(!dir.join("other.tmp").exists());
    }

    #[test]
    fn empty_directory_is_fine() {
        let dir = std::env::temp_dir().join(format!("trailbook-sweep-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        assert_eq!(sweep_staging_files(&dir).unwrap(), 0);
    }
}
