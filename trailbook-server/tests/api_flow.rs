use axum::body::to_bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::Json;
use uuid::Uuid;

use trailbook_server::api::{self, ApiError};
use trailbook_server::db::repositories::PostRepository;
use trailbook_server::db::Database;
use trailbook_server::state::AppState;
use trailbook_server::storage::{FsBlobStore, ImageStorage};
use trailbook_types::{
    CreateAttractionRequest, CreatePostRequest, CreateStageRequest, CreateTripRequest,
    CreateUserRequest, Popularity, UpdateAttractionRequest, UpdateUserRequest,
};

fn test_state() -> AppState {
    let db = Database::in_memory().expect("Failed to create database");
    db.initialize().expect("Failed to initialize schema");

    let dir = std::env::temp_dir().join(format!("trailbook-test-{}", Uuid::new_v4()));
    let store = FsBlobStore::new(dir).expect("Failed to create blob storage");
    let images = ImageStorage::new(store, "http://localhost:3000/api/images");

    AppState::new(db, images)
}

fn user_request(username: &str, email: &str) -> CreateUserRequest {
    CreateUserRequest {
        username: Some(username.to_string()),
        password: Some("wanderer2024".to_string()),
        email: Some(email.to_string()),
    }
}

async fn create_user(state: &AppState, username: &str, email: &str) -> i64 {
    let Json(user) = api::users::create_user(
        State(state.clone()),
        Json(user_request(username, email)),
    )
    .await
    .expect("user creation should succeed");
    user.id
}

#[tokio::test]
async fn full_trip_hierarchy_flow() {
    let state = test_state();

    let user_id = create_user(&state, "ana", "ana@example.com").await;
    assert_eq!(user_id, 1);

    let Json(trip) = api::trips::create_trip(
        State(state.clone()),
        Json(CreateTripRequest {
            user_id,
            title: Some("Dolomites loop".to_string()),
            description: Some("Hut to hut".to_string()),
        }),
    )
    .await
    .expect("trip creation should succeed");

    let Json(stage) = api::stages::create_stage(
        State(state.clone()),
        Json(CreateStageRequest {
            trip_id: trip.id,
            user_id,
            title: Some("Val Gardena".to_string()),
            description: Some("First huts".to_string()),
        }),
    )
    .await
    .expect("stage creation should succeed");

    let Json(post) = api::posts::create_post(
        State(state.clone()),
        Json(CreatePostRequest {
            stage_id: stage.id,
            trip_id: trip.id,
            user_id,
            story: Some("Crossed the first pass.".to_string()),
        }),
    )
    .await
    .expect("post creation should succeed");
    assert_eq!(post.id, 1);

    let Json(posts) = api::posts::get_stage_posts(State(state.clone()), Path(stage.id))
        .await
        .expect("stage posts should list");
    assert_eq!(posts.len(), 1);
}

#[tokio::test]
async fn duplicate_username_conflicts_regardless_of_other_fields() {
    let state = test_state();
    create_user(&state, "ana", "ana@example.com").await;

    let result = api::users::create_user(
        State(state.clone()),
        Json(user_request("ana", "other@example.com")),
    )
    .await;
    assert!(matches!(result, Err(ApiError::Conflict(_))));
}

#[tokio::test]
async fn unchanged_username_never_conflicts_with_itself() {
    let state = test_state();
    let id = create_user(&state, "ana", "ana@example.com").await;

    let status = api::users::update_user(
        State(state.clone()),
        Path(id),
        Json(UpdateUserRequest {
            id,
            username: Some("ana".to_string()),
            password: Some("newpassword".to_string()),
            email: Some("ana@example.com".to_string()),
        }),
    )
    .await
    .expect("no-op rename should not conflict");
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn update_with_mismatched_id_is_a_client_error() {
    let state = test_state();
    let id = create_user(&state, "ana", "ana@example.com").await;

    let result = api::users::update_user(
        State(state.clone()),
        Path(id),
        Json(UpdateUserRequest {
            id: id + 1,
            username: Some("ana".to_string()),
            password: Some("pw".to_string()),
            email: Some("ana@example.com".to_string()),
        }),
    )
    .await;
    assert!(matches!(result, Err(ApiError::BadRequest(_))));
}

#[tokio::test]
async fn literal_null_fields_are_rejected() {
    let state = test_state();
    let result = api::users::create_user(
        State(state.clone()),
        Json(CreateUserRequest {
            username: Some("null".to_string()),
            password: Some("pw".to_string()),
            email: Some("a@example.com".to_string()),
        }),
    )
    .await;
    assert!(matches!(result, Err(ApiError::BadRequest(_))));
}

#[tokio::test]
async fn post_against_missing_stage_persists_nothing() {
    let state = test_state();
    let user_id = create_user(&state, "ana", "ana@example.com").await;

    let result = api::posts::create_post(
        State(state.clone()),
        Json(CreatePostRequest {
            stage_id: 99,
            trip_id: 99,
            user_id,
            story: Some("story".to_string()),
        }),
    )
    .await;
    assert!(matches!(result, Err(ApiError::BadRequest(_))));

    let repo = PostRepository::new(state.db.pool.clone());
    assert!(repo.list_all().unwrap().is_empty());
}

#[tokio::test]
async fn attraction_creation_forces_score_zero_and_low_tier() {
    let state = test_state();

    let Json(attraction) = api::attractions::create_attraction(
        State(state.clone()),
        Json(CreateAttractionRequest {
            name: Some("Rifugio Lavaredo".to_string()),
            description: Some("Hut below the peaks".to_string()),
            popularity: None,
        }),
    )
    .await
    .expect("attraction creation should succeed");

    assert_eq!(attraction.score, 0);
    assert_eq!(attraction.popularity, Popularity::Low);
}

#[tokio::test]
async fn eleven_updates_promote_an_attraction() {
    let state = test_state();

    let Json(attraction) = api::attractions::create_attraction(
        State(state.clone()),
        Json(CreateAttractionRequest {
            name: Some("Miradouro".to_string()),
            description: Some("Viewpoint".to_string()),
            popularity: None,
        }),
    )
    .await
    .expect("attraction creation should succeed");

    for n in 1..=11 {
        api::attractions::update_attraction(
            State(state.clone()),
            Path(attraction.id),
            Json(UpdateAttractionRequest {
                id: attraction.id,
                name: Some("Miradouro".to_string()),
                description: Some("Viewpoint".to_string()),
            }),
        )
        .await
        .expect("update should succeed");

        let Json(current) =
            api::attractions::get_attraction(State(state.clone()), Path(attraction.id))
                .await
                .expect("attraction should exist");
        assert_eq!(current.score, n);
        let expected = if n > 10 { Popularity::High } else { Popularity::Low };
        assert_eq!(current.popularity, expected, "tier after update {n}");
    }
}

#[tokio::test]
async fn relation_to_missing_stage_is_a_client_error() {
    let state = test_state();

    let Json(attraction) = api::attractions::create_attraction(
        State(state.clone()),
        Json(CreateAttractionRequest {
            name: Some("Miradouro".to_string()),
            description: Some("Viewpoint".to_string()),
            popularity: None,
        }),
    )
    .await
    .expect("attraction creation should succeed");

    let result =
        api::attractions::create_relation(State(state.clone()), Path((attraction.id, 42))).await;
    assert!(matches!(result, Err(ApiError::BadRequest(_))));
}

#[tokio::test]
async fn login_distinguishes_unknown_user_from_wrong_password() {
    let state = test_state();
    create_user(&state, "ana", "ana@example.com").await;

    let unknown = api::users::login(
        State(state.clone()),
        Path(("nobody".to_string(), "wanderer2024".to_string())),
    )
    .await;
    assert!(matches!(unknown, Err(ApiError::NotFound(_))));

    let wrong = api::users::login(
        State(state.clone()),
        Path(("ana".to_string(), "letmein".to_string())),
    )
    .await;
    assert!(matches!(wrong, Err(ApiError::Forbidden(_))));

    let Json(user) = api::users::login(
        State(state.clone()),
        Path(("ana".to_string(), "wanderer2024".to_string())),
    )
    .await
    .expect("valid credentials should resolve");
    assert_eq!(user.username, "ana");
}

#[tokio::test]
async fn download_serves_bytes_with_content_type() {
    let state = test_state();
    state
        .images
        .upload("8", Some("pic.jpg"), b"jpeg-bytes")
        .expect("upload should succeed");

    let response = api::images::download_image(State(state.clone()), Path("8".to_string()))
        .await
        .expect("stored image should resolve");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    assert_eq!(&body[..], b"jpeg-bytes");

    let missing = api::images::download_image(State(state.clone()), Path("404".to_string())).await;
    assert!(matches!(missing, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn deleting_a_missing_image_is_a_structured_status() {
    let state = test_state();

    let Json(response) =
        api::images::delete_image(State(state.clone()), Path("404".to_string()))
            .await
            .expect("delete must not fail outright");
    assert!(response.error);
    assert!(response.status.contains("not found"));
}

#[tokio::test]
async fn user_delete_leaves_trips_dangling() {
    let state = test_state();
    let user_id = create_user(&state, "ana", "ana@example.com").await;

    let Json(trip) = api::trips::create_trip(
        State(state.clone()),
        Json(CreateTripRequest {
            user_id,
            title: Some("Dolomites loop".to_string()),
            description: Some("Hut to hut".to_string()),
        }),
    )
    .await
    .expect("trip creation should succeed");

    let status = api::users::delete_user(State(state.clone()), Path(user_id))
        .await
        .expect("delete should succeed");
    assert_eq!(status, StatusCode::NO_CONTENT);

    // no cascade: the trip survives with a dangling owner
    let Json(orphan) = api::trips::get_trip(State(state.clone()), Path(trip.id))
        .await
        .expect("trip should still exist");
    assert_eq!(orphan.user_id, user_id);
}
