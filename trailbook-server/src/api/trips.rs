use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::{is_constraint_violation, TripRepository, UserRepository},
    state::AppState,
    validation::require_text,
};
use trailbook_types::{CreateTripRequest, Trip, UpdateTripRequest};

/// GET /api/trips - Get all trips
pub async fn get_trips(State(state): State<AppState>) -> ApiResult<Json<Vec<Trip>>> {
    let repo = TripRepository::new(state.db.pool.clone());
    let trips = repo.list_all()?;
    Ok(Json(trips))
}

/// GET /api/trips/:user_id/userTrips - Get all trips owned by a user
pub async fn get_user_trips(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<Trip>>> {
    let user_repo = UserRepository::new(state.db.pool.clone());
    if !user_repo.exists(user_id)? {
        return Err(ApiError::NotFound(format!("User {user_id} not found")));
    }

    let repo = TripRepository::new(state.db.pool.clone());
    let trips = repo.list_by_user(user_id)?;
    Ok(Json(trips))
}

/// GET /api/trips/:id - Get a single trip
pub async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Trip>> {
    let repo = TripRepository::new(state.db.pool.clone());
    let trip = repo
        .get_by_id(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Trip {id} not found")))?;
    Ok(Json(trip))
}

/// POST /api/trips - Create a new trip
pub async fn create_trip(
    State(state): State<AppState>,
    Json(payload): Json<CreateTripRequest>,
) -> ApiResult<Json<Trip>> {
    let user_repo = UserRepository::new(state.db.pool.clone());
    if !user_repo.exists(payload.user_id)? {
        return Err(ApiError::BadRequest("user not found".to_string()));
    }

    let title = require_text(payload.title.as_deref(), "title").map_err(ApiError::BadRequest)?;
    let description = require_text(payload.description.as_deref(), "description")
        .map_err(ApiError::BadRequest)?;

    let repo = TripRepository::new(state.db.pool.clone());
    let trip = Trip {
        id: repo.next_id()?,
        user_id: payload.user_id,
        title,
        description,
        creation_date: Utc::now(),
    };

    if let Err(e) = repo.create(&trip) {
        if is_constraint_violation(&e) && repo.exists(trip.id)? {
            return Err(ApiError::Conflict(format!(
                "Trip {} already exists",
                trip.id
            )));
        }
        return Err(e.into());
    }

    Ok(Json(trip))
}

/// PUT /api/trips/:id - Update a trip (creation date is immutable)
pub async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTripRequest>,
) -> ApiResult<StatusCode> {
    if id != payload.id {
        return Err(ApiError::BadRequest("id mismatch".to_string()));
    }

    let user_repo = UserRepository::new(state.db.pool.clone());
    if !user_repo.exists(payload.user_id)? {
        return Err(ApiError::BadRequest("user not found".to_string()));
    }

    let title = require_text(payload.title.as_deref(), "title").map_err(ApiError::BadRequest)?;
    let description = require_text(payload.description.as_deref(), "description")
        .map_err(ApiError::BadRequest)?;

    let repo = TripRepository::new(state.db.pool.clone());
    let trip = Trip {
        id,
        user_id: payload.user_id,
        title,
        description,
        creation_date: Utc::now(), // ignored by the UPDATE
    };

    let rows = repo.update(&trip)?;
    if rows == 0 {
        if !repo.exists(id)? {
            return Err(ApiError::NotFound(format!("Trip {id} not found")));
        }
        return Err(ApiError::InternalError(
            "update affected no rows".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/trips/:id - Delete a trip
pub async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let repo = TripRepository::new(state.db.pool.clone());
    if !repo.delete(id)? {
        return Err(ApiError::NotFound(format!("Trip {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
