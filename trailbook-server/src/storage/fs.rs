use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// A single object in the container: its key plus a content type inferred
/// from the key's extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobItem {
    pub name: String,
    pub content_type: String,
}

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob {0} already exists")]
    AlreadyExists(String),
    #[error("blob {0} not found")]
    NotFound(String),
    #[error("invalid blob name {0}")]
    InvalidName(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Flat blob container backed by a directory. Keys map straight to file
/// names; there is no hierarchy and no metadata beyond the name itself.
#[derive(Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

const STAGING_SUFFIX: &str = ".tmp";

impl FsBlobStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Result<Self, BlobError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, BlobError> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
            || name.ends_with(STAGING_SUFFIX)
        {
            return Err(BlobError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    /// Store a new blob. Rejects names that already hold an object; the
    /// bytes go through a uniquely-named staging file so a crash mid-write
    /// never leaves a half-written blob under its final name.
    pub fn put(&self, name: &str, bytes: &[u8]) -> Result<(), BlobError> {
        let path = self.path_for(name)?;
        if path.exists() {
            return Err(BlobError::AlreadyExists(name.to_string()));
        }

        let staging = self
            .root
            .join(format!("{name}.{}{STAGING_SUFFIX}", Uuid::new_v4()));
        fs::write(&staging, bytes)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read(path)?))
    }

    pub fn delete(&self, name: &str) -> Result<(), BlobError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(BlobError::NotFound(name.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    /// Enumerate every object in the container. Re-reads the directory on
    /// each call; no cursor is kept between listings.
    pub fn list(&self) -> Result<Vec<BlobItem>, BlobError> {
        let mut items = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(STAGING_SUFFIX) {
                continue;
            }
            items.push(BlobItem {
                content_type: content_type_for(&name).to_string(),
                name,
            });
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }
}

pub fn content_type_for(name: &str) -> &'static str {
    match name.rsplit('.').next().map(|ext| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FsBlobStore {
        let dir = std::env::temp_dir().join(format!("trailbook-blob-{}", Uuid::new_v4()));
        FsBlobStore::new(dir).expect("Failed to create store")
    }

    #[test]
    fn put_get_delete_round_trip() {
        let store = store();
        store.put("5.jpg", b"bytes").unwrap();
        assert_eq!(store.get("5.jpg").unwrap().unwrap(), b"bytes");
        store.delete("5.jpg").unwrap();
        assert!(store.get("5.jpg").unwrap().is_none());
    }

    #[test]
    fn put_rejects_existing_name() {
        let store = store();
        store.put("5.jpg", b"one").unwrap();
        let err = store.put("5.jpg", b"two").unwrap_err();
        assert!(matches!(err, BlobError::AlreadyExists(_)));
        // original bytes untouched
        assert_eq!(store.get("5.jpg").unwrap().unwrap(), b"one");
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = store();
        assert!(matches!(store.delete("9.jpg"), Err(BlobError::NotFound(_))));
    }

    #[test]
    fn list_skips_staging_files() {
        let store = store();
        store.put("a.jpg", b"a").unwrap();
        std::fs::write(store.root().join("b.jpg.x.tmp"), b"partial").unwrap();

        let items = store.list().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "a.jpg");
        assert_eq!(items[0].content_type, "image/jpeg");
    }

    #[test]
    fn traversal_names_are_rejected() {
        let store = store();
        assert!(matches!(
            store.put("../evil.jpg", b"x"),
            Err(BlobError::InvalidName(_))
        ));
    }
}
