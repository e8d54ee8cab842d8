pub mod fs;
pub mod images;

pub use fs::{BlobError, BlobItem, FsBlobStore};
pub use images::ImageStorage;
