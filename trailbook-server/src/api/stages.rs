use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::{is_constraint_violation, StageRepository, TripRepository, UserRepository},
    state::AppState,
    validation::require_text,
};
use trailbook_types::{CreateStageRequest, Stage, UpdateStageRequest};

/// GET /api/stages - Get all stages
pub async fn get_stages(State(state): State<AppState>) -> ApiResult<Json<Vec<Stage>>> {
    let repo = StageRepository::new(state.db.pool.clone());
    let stages = repo.list_all()?;
    Ok(Json(stages))
}

/// GET /api/stages/:trip_id/tripsStages - Get all stages of a trip
pub async fn get_trip_stages(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> ApiResult<Json<Vec<Stage>>> {
    let trip_repo = TripRepository::new(state.db.pool.clone());
    if !trip_repo.exists(trip_id)? {
        return Err(ApiError::NotFound(format!("Trip {trip_id} not found")));
    }

    let repo = StageRepository::new(state.db.pool.clone());
    let stages = repo.list_by_trip(trip_id)?;
    Ok(Json(stages))
}

/// GET /api/stages/:id - Get a single stage
pub async fn get_stage(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Stage>> {
    let repo = StageRepository::new(state.db.pool.clone());
    let stage = repo
        .get_by_id(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Stage {id} not found")))?;
    Ok(Json(stage))
}

/// POST /api/stages - Create a new stage
pub async fn create_stage(
    State(state): State<AppState>,
    Json(payload): Json<CreateStageRequest>,
) -> ApiResult<Json<Stage>> {
    let trip_repo = TripRepository::new(state.db.pool.clone());
    let user_repo = UserRepository::new(state.db.pool.clone());
    if !trip_repo.exists(payload.trip_id)? || !user_repo.exists(payload.user_id)? {
        return Err(ApiError::BadRequest("trip or user not found".to_string()));
    }

    let title = require_text(payload.title.as_deref(), "title").map_err(ApiError::BadRequest)?;
    let description = require_text(payload.description.as_deref(), "description")
        .map_err(ApiError::BadRequest)?;

    let repo = StageRepository::new(state.db.pool.clone());
    let stage = Stage {
        id: repo.next_id()?,
        trip_id: payload.trip_id,
        user_id: payload.user_id,
        title,
        description,
        creation_date: Utc::now(),
    };

    if let Err(e) = repo.create(&stage) {
        if is_constraint_violation(&e) && repo.exists(stage.id)? {
            return Err(ApiError::Conflict(format!(
                "Stage {} already exists",
                stage.id
            )));
        }
        return Err(e.into());
    }

    Ok(Json(stage))
}

/// PUT /api/stages/:id - Update a stage (creation date is immutable)
pub async fn update_stage(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStageRequest>,
) -> ApiResult<StatusCode> {
    if id != payload.id {
        return Err(ApiError::BadRequest("id mismatch".to_string()));
    }

    // reassigning a stage to a missing trip or user is rejected up front
    let trip_repo = TripRepository::new(state.db.pool.clone());
    let user_repo = UserRepository::new(state.db.pool.clone());
    if !trip_repo.exists(payload.trip_id)? || !user_repo.exists(payload.user_id)? {
        return Err(ApiError::BadRequest("trip or user not found".to_string()));
    }

    let title = require_text(payload.title.as_deref(), "title").map_err(ApiError::BadRequest)?;
    let description = require_text(payload.description.as_deref(), "description")
        .map_err(ApiError::BadRequest)?;

    let repo = StageRepository::new(state.db.pool.clone());
    let stage = Stage {
        id,
        trip_id: payload.trip_id,
        user_id: payload.user_id,
        title,
        description,
        creation_date: Utc::now(), // ignored by the UPDATE
    };

    let rows = repo.update(&stage)?;
    if rows == 0 {
        if !repo.exists(id)? {
            return Err(ApiError::NotFound(format!("Stage {id} not found")));
        }
        return Err(ApiError::InternalError(
            "update affected no rows".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/stages/:id - Delete a stage
pub async fn delete_stage(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let repo = StageRepository::new(state.db.pool.clone());
    if !repo.delete(id)? {
        return Err(ApiError::NotFound(format!("Stage {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
