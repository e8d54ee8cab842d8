use crate::db::Database;
use crate::storage::ImageStorage;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub images: ImageStorage,
}

impl AppState {
    pub fn new(db: Database, images: ImageStorage) -> Self {
        Self { db, images }
    }
}
