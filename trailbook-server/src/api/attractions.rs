use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::{is_constraint_violation, AttractionRepository, StageRepository},
    state::AppState,
    validation::require_text,
};
use trailbook_types::{
    popularity, Attraction, AttractionStage, CreateAttractionRequest, UpdateAttractionRequest,
};

/// GET /api/attractions - Get all attractions
pub async fn get_attractions(State(state): State<AppState>) -> ApiResult<Json<Vec<Attraction>>> {
    let repo = AttractionRepository::new(state.db.pool.clone());
    let attractions = repo.list_all()?;
    Ok(Json(attractions))
}

/// GET /popularAttractions - Attractions promoted to the HIGH tier
pub async fn get_popular_attractions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Attraction>>> {
    let repo = AttractionRepository::new(state.db.pool.clone());
    let attractions = repo.list_popular()?;
    Ok(Json(attractions))
}

/// GET /api/attractions/:stage_id/allStageAttractions - Attractions linked
/// to a stage through the relation table
pub async fn get_stage_attractions(
    State(state): State<AppState>,
    Path(stage_id): Path<i64>,
) -> ApiResult<Json<Vec<Attraction>>> {
    let stage_repo = StageRepository::new(state.db.pool.clone());
    if !stage_repo.exists(stage_id)? {
        return Err(ApiError::NotFound(format!("Stage {stage_id} not found")));
    }

    let repo = AttractionRepository::new(state.db.pool.clone());
    let mut attractions = Vec::new();
    for relation in repo.relations_for_stage(stage_id)? {
        // A dangling relation (attraction deleted, relation left behind)
        // surfaces as NotFound rather than being skipped.
        let attraction = repo
            .get_by_id(relation.attraction_id)?
            .ok_or_else(|| ApiError::NotFound("Attraction not found.".to_string()))?;
        attractions.push(attraction);
    }

    Ok(Json(attractions))
}

/// GET /api/attractions/:id - Get a single attraction
pub async fn get_attraction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Attraction>> {
    let repo = AttractionRepository::new(state.db.pool.clone());
    let attraction = repo
        .get_by_id(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Attraction {id} not found")))?;
    Ok(Json(attraction))
}

/// POST /api/attractions - Create a new attraction
///
/// The score is forced to zero no matter what the caller sent; the tier
/// starts LOW unless explicitly supplied.
pub async fn create_attraction(
    State(state): State<AppState>,
    Json(payload): Json<CreateAttractionRequest>,
) -> ApiResult<Json<Attraction>> {
    let name = require_text(payload.name.as_deref(), "attraction name")
        .map_err(ApiError::BadRequest)?;
    let description = require_text(payload.description.as_deref(), "attraction description")
        .map_err(ApiError::BadRequest)?;

    let repo = AttractionRepository::new(state.db.pool.clone());
    let attraction = Attraction {
        id: repo.next_id()?,
        name,
        description,
        popularity: payload.popularity.unwrap_or_default(),
        score: 0,
    };

    if let Err(e) = repo.create(&attraction) {
        if is_constraint_violation(&e) && repo.exists(attraction.id)? {
            return Err(ApiError::Conflict(format!(
                "Attraction {} already exists",
                attraction.id
            )));
        }
        return Err(e.into());
    }

    Ok(Json(attraction))
}

/// PUT /api/attractions/:id - Update an attraction
///
/// Every successful update advances the popularity machine by one: the
/// persisted score grows by 1 and the tier flips to HIGH once the score
/// passes the limit. The caller supplies name and description only.
pub async fn update_attraction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAttractionRequest>,
) -> ApiResult<StatusCode> {
    if id != payload.id {
        return Err(ApiError::BadRequest("id mismatch".to_string()));
    }

    let name = require_text(payload.name.as_deref(), "attraction name")
        .map_err(ApiError::BadRequest)?;
    let description = require_text(payload.description.as_deref(), "attraction description")
        .map_err(ApiError::BadRequest)?;

    let repo = AttractionRepository::new(state.db.pool.clone());
    let current = repo
        .get_by_id(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Attraction {id} not found")))?;

    let (score, tier) = popularity::advance(current.score, current.popularity);
    let attraction = Attraction {
        id,
        name,
        description,
        popularity: tier,
        score,
    };

    let rows = repo.update(&attraction)?;
    if rows == 0 {
        if !repo.exists(id)? {
            return Err(ApiError::NotFound(format!("Attraction {id} not found")));
        }
        return Err(ApiError::InternalError(
            "update affected no rows".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/attractions/:id - Delete an attraction
pub async fn delete_attraction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let repo = AttractionRepository::new(state.db.pool.clone());
    if !repo.delete(id)? {
        return Err(ApiError::NotFound(format!("Attraction {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/attractions/:attraction_id/:stage_id - Link an attraction to a
/// stage. Duplicate links are allowed.
pub async fn create_relation(
    State(state): State<AppState>,
    Path((attraction_id, stage_id)): Path<(i64, i64)>,
) -> ApiResult<Json<AttractionStage>> {
    let repo = AttractionRepository::new(state.db.pool.clone());
    let stage_repo = StageRepository::new(state.db.pool.clone());

    if !repo.exists(attraction_id)? {
        return Err(ApiError::BadRequest("attraction not found".to_string()));
    }
    if !stage_repo.exists(stage_id)? {
        return Err(ApiError::BadRequest("stage not found".to_string()));
    }

    let relation = AttractionStage {
        attraction_id,
        stage_id,
    };
    repo.add_relation(&relation)?;

    Ok(Json(relation))
}

/// DELETE /api/attractions/:attraction_id/:stage_id - Remove one link
/// between an attraction and a stage
pub async fn delete_relation(
    State(state): State<AppState>,
    Path((attraction_id, stage_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    let repo = AttractionRepository::new(state.db.pool.clone());
    let stage_repo = StageRepository::new(state.db.pool.clone());

    if !repo.exists(attraction_id)? {
        return Err(ApiError::BadRequest("attraction not found".to_string()));
    }
    if !stage_repo.exists(stage_id)? {
        return Err(ApiError::BadRequest("stage not found".to_string()));
    }

    if !repo.remove_relation(attraction_id, stage_id)? {
        return Err(ApiError::NotFound("Relation not found.".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
