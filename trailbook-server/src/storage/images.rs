use anyhow::Result;

use trailbook_types::{ImageDto, ImageResponse};

use super::fs::{BlobError, FsBlobStore};

/// Index of the `_`-separated name segment that carries the owning stage id.
/// Names follow the `{prefix}_{ownerId}_{stageId}_{suffix}.{ext}` convention.
const STAGE_SEGMENT: usize = 2;

/// Minimum number of `_` segments for a name to carry a stage association.
const MIN_SEGMENTS: usize = 4;

/// Media layer over the blob container.
///
/// Associations between images and stages are encoded in the blob name, not
/// stored anywhere else: stage-scoped listings filter the full enumeration
/// by the naming convention. Download and delete are fixed to `.jpg` even
/// though upload accepts any extension; both quirks are part of the
/// existing key contract.
#[derive(Clone)]
pub struct ImageStorage {
    store: FsBlobStore,
    base_uri: String,
}

impl ImageStorage {
    pub fn new(store: FsBlobStore, base_uri: impl Into<String>) -> Self {
        Self {
            store,
            base_uri: base_uri.into(),
        }
    }

    fn uri_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_uri.trim_end_matches('/'), name)
    }

    fn dto(&self, name: &str, content_type: &str) -> ImageDto {
        ImageDto {
            uri: self.uri_for(name),
            name: name.to_string(),
            content_type: content_type.to_string(),
        }
    }

    /// Store an uploaded file under `{image_id}{ext}`, keeping the
    /// caller-supplied extension. Collisions and missing input are normal
    /// traffic and come back as structured error responses.
    pub fn upload(
        &self,
        image_id: &str,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> Result<ImageResponse> {
        let filename = match original_filename {
            Some(f) if !f.is_empty() && !image_id.is_empty() && !bytes.is_empty() => f,
            _ => {
                return Ok(ImageResponse {
                    error: true,
                    status: "Invalid file or filename is null.".to_string(),
                    image: None,
                })
            }
        };

        let extension = filename
            .rfind('.')
            .map(|dot| &filename[dot..])
            .unwrap_or_default();
        let name = format!("{image_id}{extension}");

        match self.store.put(&name, bytes) {
            Ok(()) => Ok(ImageResponse {
                error: false,
                status: format!("File {name} Uploaded Successfully"),
                image: Some(self.dto(&name, super::fs::content_type_for(&name))),
            }),
            Err(BlobError::AlreadyExists(_)) => {
                tracing::error!("File with name {name} already exists in container");
                Ok(ImageResponse {
                    error: true,
                    status: format!("File with name {name} already exists. Please use another name."),
                    image: None,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch an image by id. The key is always `{id}.jpg`; a missing blob
    /// is an absent result, not an error.
    pub fn download(&self, image_id: &str) -> Result<Option<(ImageDto, Vec<u8>)>> {
        let name = format!("{image_id}.jpg");
        match self.store.get(&name)? {
            Some(bytes) => Ok(Some((self.dto(&name, "image/jpeg"), bytes))),
            None => {
                tracing::error!("File {name} was not found.");
                Ok(None)
            }
        }
    }

    /// Delete `{id}.jpg`. Absence comes back as a structured status.
    pub fn delete(&self, image_id: &str) -> Result<ImageResponse> {
        let name = format!("{image_id}.jpg");
        match self.store.delete(&name) {
            Ok(()) => Ok(ImageResponse {
                error: false,
                status: format!("File: {name} has been successfully deleted."),
                image: None,
            }),
            Err(BlobError::NotFound(_)) => {
                tracing::error!("File {name} was not found.");
                Ok(ImageResponse {
                    error: true,
                    status: format!("File with name {name} not found."),
                    image: None,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Every image in the container, association or not.
    pub fn list(&self) -> Result<Vec<ImageDto>> {
        let items = self.store.list()?;
        Ok(items
            .into_iter()
            .map(|item| self.dto(&item.name, &item.content_type))
            .collect())
    }

    /// Images associated with a stage via the naming convention. Names with
    /// fewer than four `_` segments carry no association and are silently
    /// excluded here, though they still show up in the unfiltered listing.
    pub fn list_stage(&self, stage_id: i64) -> Result<Vec<ImageDto>> {
        let stage = stage_id.to_string();
        let items = self.store.list()?;
        Ok(items
            .into_iter()
            .filter(|item| {
                let segments: Vec<&str> = item.name.split('_').collect();
                segments.len() > MIN_SEGMENTS - 1 && segments[STAGE_SEGMENT] == stage
            })
            .map(|item| self.dto(&item.name, &item.content_type))
            .collect())
    }
}
