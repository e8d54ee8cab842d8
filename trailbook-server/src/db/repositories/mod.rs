pub mod attraction_repository;
pub mod post_repository;
pub mod stage_repository;
pub mod trip_repository;
pub mod user_repository;

pub use attraction_repository::AttractionRepository;
pub use post_repository::PostRepository;
pub use stage_repository::StageRepository;
pub use trip_repository::TripRepository;
pub use user_repository::UserRepository;

/// Whether a persistence failure is the store's own constraint rejection
/// (duplicate id, duplicate username/email). Callers translate these into
/// conflict outcomes instead of crashing; anything else is re-raised.
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
