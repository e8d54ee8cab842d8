use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::StageRepository,
    state::AppState,
};
use trailbook_types::{ImageDto, ImageResponse};

/// GET /api/images - List every image in the container
pub async fn list_images(State(state): State<AppState>) -> ApiResult<Json<Vec<ImageDto>>> {
    let images = state.images.list()?;
    Ok(Json(images))
}

/// GET /api/images/:stage_id/stageImages - Images associated with a stage
/// via the blob naming convention
pub async fn list_stage_images(
    State(state): State<AppState>,
    Path(stage_id): Path<i64>,
) -> ApiResult<Json<Vec<ImageDto>>> {
    let stage_repo = StageRepository::new(state.db.pool.clone());
    if !stage_repo.exists(stage_id)? {
        return Err(ApiError::NotFound(format!("Stage {stage_id} not found")));
    }

    let images = state.images.list_stage(stage_id)?;
    Ok(Json(images))
}

/// GET /api/images/:id - Serve a single image (keyed as `{id}.jpg`)
pub async fn download_image(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> ApiResult<Response> {
    let (image, bytes) = state
        .images
        .download(&image_id)?
        .ok_or_else(|| ApiError::NotFound(format!("File {image_id}.jpg was not found.")))?;
    Ok(([(header::CONTENT_TYPE, image.content_type)], bytes).into_response())
}

/// POST /api/images/:image_id - Upload a file, stored as `{image_id}{ext}`
///
/// Collisions and missing files come back as structured responses with
/// `error: true`, not as HTTP failures.
pub async fn upload_image(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImageResponse>> {
    let mut filename: Option<String> = None;
    let mut bytes: Vec<u8> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.file_name().is_some() {
            filename = field.file_name().map(|f| f.to_string());
            bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?
                .to_vec();
            break;
        }
    }

    let response = state.images.upload(&image_id, filename.as_deref(), &bytes)?;
    Ok(Json(response))
}

/// DELETE /api/images/:id - Delete `{id}.jpg`; absence is a structured
/// not-found status, never an HTTP failure
pub async fn delete_image(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> ApiResult<Json<ImageResponse>> {
    let response = state.images.delete(&image_id)?;
    Ok(Json(response))
}
