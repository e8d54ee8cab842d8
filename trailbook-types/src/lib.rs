pub mod enums;
pub mod models;
pub mod popularity;

pub use enums::*;
pub use models::*;
pub use popularity::*;
