pub mod attractions;
pub mod error;
pub mod images;
pub mod posts;
pub mod stages;
pub mod trips;
pub mod users;

pub use error::{ApiError, ApiResult};
