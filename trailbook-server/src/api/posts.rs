use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::{
        is_constraint_violation, PostRepository, StageRepository, TripRepository, UserRepository,
    },
    state::AppState,
    validation::require_text,
};
use trailbook_types::{CreatePostRequest, Post, UpdatePostRequest};

fn check_references(state: &AppState, stage_id: i64, trip_id: i64, user_id: i64) -> ApiResult<()> {
    let stage_repo = StageRepository::new(state.db.pool.clone());
    let trip_repo = TripRepository::new(state.db.pool.clone());
    let user_repo = UserRepository::new(state.db.pool.clone());

    if !stage_repo.exists(stage_id)? || !trip_repo.exists(trip_id)? || !user_repo.exists(user_id)? {
        return Err(ApiError::BadRequest(
            "stage, trip or user not found".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/posts - Get all posts
pub async fn get_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    let repo = PostRepository::new(state.db.pool.clone());
    let posts = repo.list_all()?;
    Ok(Json(posts))
}

/// GET /api/posts/:stage_id/stagePosts - Get all posts of a stage
pub async fn get_stage_posts(
    State(state): State<AppState>,
    Path(stage_id): Path<i64>,
) -> ApiResult<Json<Vec<Post>>> {
    let stage_repo = StageRepository::new(state.db.pool.clone());
    if !stage_repo.exists(stage_id)? {
        return Err(ApiError::NotFound(format!("Stage {stage_id} not found")));
    }

    let repo = PostRepository::new(state.db.pool.clone());
    let posts = repo.list_by_stage(stage_id)?;
    Ok(Json(posts))
}

/// GET /api/posts/:trip_id/tripPosts - Get all posts of a trip
pub async fn get_trip_posts(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> ApiResult<Json<Vec<Post>>> {
    let trip_repo = TripRepository::new(state.db.pool.clone());
    if !trip_repo.exists(trip_id)? {
        return Err(ApiError::NotFound(format!("Trip {trip_id} not found")));
    }

    let repo = PostRepository::new(state.db.pool.clone());
    let posts = repo.list_by_trip(trip_id)?;
    Ok(Json(posts))
}

/// GET /api/posts/:id - Get a single post
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Post>> {
    let repo = PostRepository::new(state.db.pool.clone());
    let post = repo
        .get_by_id(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Post {id} not found")))?;
    Ok(Json(post))
}

/// POST /api/posts - Create a new post
///
/// All three references must resolve before anything is persisted; a post
/// against a missing stage never reaches the store.
pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<Json<Post>> {
    check_references(&state, payload.stage_id, payload.trip_id, payload.user_id)?;

    let story = require_text(payload.story.as_deref(), "story value")
        .map_err(ApiError::BadRequest)?;

    let repo = PostRepository::new(state.db.pool.clone());
    let post = Post {
        id: repo.next_id()?,
        stage_id: payload.stage_id,
        trip_id: payload.trip_id,
        user_id: payload.user_id,
        story,
        creation_date: Utc::now(),
    };

    if let Err(e) = repo.create(&post) {
        if is_constraint_violation(&e) && repo.exists(post.id)? {
            return Err(ApiError::Conflict(format!(
                "Post {} already exists",
                post.id
            )));
        }
        return Err(e.into());
    }

    Ok(Json(post))
}

/// PUT /api/posts/:id - Update a post (creation date is immutable)
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePostRequest>,
) -> ApiResult<StatusCode> {
    if id != payload.id {
        return Err(ApiError::BadRequest("id mismatch".to_string()));
    }

    check_references(&state, payload.stage_id, payload.trip_id, payload.user_id)?;

    let story = require_text(payload.story.as_deref(), "story value")
        .map_err(ApiError::BadRequest)?;

    let repo = PostRepository::new(state.db.pool.clone());
    let post = Post {
        id,
        stage_id: payload.stage_id,
        trip_id: payload.trip_id,
        user_id: payload.user_id,
        story,
        creation_date: Utc::now(), // ignored by the UPDATE
    };

    let rows = repo.update(&post)?;
    if rows == 0 {
        if !repo.exists(id)? {
            return Err(ApiError::NotFound(format!("Post {id} not found")));
        }
        return Err(ApiError::InternalError(
            "update affected no rows".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/posts/:id - Delete a post
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let repo = PostRepository::new(state.db.pool.clone());
    if !repo.delete(id)? {
        return Err(ApiError::NotFound(format!("Post {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
