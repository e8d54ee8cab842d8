use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::{is_constraint_violation, UserRepository},
    password,
    state::AppState,
    validation::require_text,
};
use trailbook_types::{CreateUserRequest, UpdateUserRequest, User};

/// GET /api/users - Get all users
pub async fn get_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let repo = UserRepository::new(state.db.pool.clone());
    let users = repo.list_all()?;
    Ok(Json(users))
}

/// GET /api/users/:id - Get a single user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    let repo = UserRepository::new(state.db.pool.clone());
    let user = repo
        .get_by_id(id)?
        .ok_or_else(|| ApiError::NotFound(format!("User {id} not found")))?;
    Ok(Json(user))
}

/// GET /api/users/:username/:password - Credential check
///
/// Unknown username is NotFound; a known username with a digest mismatch is
/// Forbidden. The distinction is part of the original contract.
pub async fn login(
    State(state): State<AppState>,
    Path((username, supplied)): Path<(String, String)>,
) -> ApiResult<Json<User>> {
    let repo = UserRepository::new(state.db.pool.clone());
    let user = repo
        .get_by_username(&username)?
        .ok_or_else(|| ApiError::NotFound(format!("User {username} not found")))?;

    if user.password != password::digest(&supplied) {
        return Err(ApiError::Forbidden("Wrong password".to_string()));
    }

    Ok(Json(user))
}

/// POST /api/users - Create a new user
///
/// Validate, allocate, pre-check uniqueness, then persist. The store's own
/// unique indexes can still reject the insert after the pre-checks passed
/// (the allocator and the pre-checks are racy reads); that rejection is
/// translated to Conflict only when the row turns out to exist, otherwise
/// the original failure is re-raised untouched.
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<Json<User>> {
    let username = require_text(payload.username.as_deref(), "username")
        .map_err(ApiError::BadRequest)?;
    let plaintext = require_text(payload.password.as_deref(), "password")
        .map_err(ApiError::BadRequest)?;
    let email = require_text(payload.email.as_deref(), "email").map_err(ApiError::BadRequest)?;

    let repo = UserRepository::new(state.db.pool.clone());

    if repo.username_exists(&username)? {
        return Err(ApiError::Conflict("username already exists".to_string()));
    }
    if repo.email_exists(&email)? {
        return Err(ApiError::Conflict("email already exists".to_string()));
    }

    let user = User {
        id: repo.next_id()?,
        username,
        password: password::digest(&plaintext),
        email,
    };

    if let Err(e) = repo.create(&user) {
        if is_constraint_violation(&e) && repo.exists(user.id)? {
            return Err(ApiError::Conflict(format!(
                "User {} already exists",
                user.id
            )));
        }
        return Err(e.into());
    }

    Ok(Json(user))
}

/// PUT /api/users/:id - Update a user
///
/// Uniqueness is re-checked only for fields whose value actually changed,
/// so a no-op write never conflicts with the row itself.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<StatusCode> {
    if id != payload.id {
        return Err(ApiError::BadRequest("id mismatch".to_string()));
    }

    let username = require_text(payload.username.as_deref(), "username")
        .map_err(ApiError::BadRequest)?;
    let plaintext = require_text(payload.password.as_deref(), "password")
        .map_err(ApiError::BadRequest)?;
    let email = require_text(payload.email.as_deref(), "email").map_err(ApiError::BadRequest)?;

    let repo = UserRepository::new(state.db.pool.clone());

    if let Some(current) = repo.get_by_id(id)? {
        if current.username != username && repo.username_exists(&username)? {
            return Err(ApiError::Conflict("username already exists".to_string()));
        }
        if current.email != email && repo.email_exists(&email)? {
            return Err(ApiError::Conflict("email already exists".to_string()));
        }
    }

    let user = User {
        id,
        username,
        password: password::digest(&plaintext),
        email,
    };

    let rows = repo.update(&user)?;
    if rows == 0 {
        if !repo.exists(id)? {
            return Err(ApiError::NotFound(format!("User {id} not found")));
        }
        return Err(ApiError::InternalError(
            "update affected no rows".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/users/:id - Delete a user
///
/// No cascade: the user's trips, stages and posts are left in place with
/// dangling owner references.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let repo = UserRepository::new(state.db.pool.clone());
    if !repo.delete(id)? {
        return Err(ApiError::NotFound(format!("User {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
