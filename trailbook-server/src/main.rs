mod api;
mod cleanup;
mod config;
mod db;
mod password;
mod state;
mod storage;
mod validation;

use std::path::PathBuf;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use state::AppState;
use std::net::SocketAddr;
use storage::{FsBlobStore, ImageStorage};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trailbook_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load settings
    let settings = config::Settings::new().expect("Failed to load settings");

    // Initialize database
    let db = db::Database::new(&settings.database.path).expect("Failed to create database");

    db.initialize()
        .expect("Failed to initialize database schema");

    // Always seed test data for development
    db.seed_test_data().expect("Failed to seed test data");
    tracing::info!("Test data seeded successfully");

    tracing::info!("Database initialized successfully");

    // Initialize blob storage
    let store =
        FsBlobStore::new(settings.storage.root.clone()).expect("Failed to create blob storage");
    let images = ImageStorage::new(store, settings.storage.base_uri.clone());

    // Create application state
    let state = AppState::new(db, images);

    // Sweep stray upload staging files in the background; shares no state
    // with request handling
    let sweep_root = PathBuf::from(settings.storage.root.clone());
    tokio::spawn(async move {
        match cleanup::sweep_staging_files(&sweep_root) {
            Ok(count) => {
                if count > 0 {
                    tracing::info!("Removed {} stray staging files", count);
                }
            }
            Err(e) => {
                tracing::error!("Staging file sweep failed: {}", e);
            }
        }
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // User routes
        .route("/api/users", get(api::users::get_users))
        .route("/api/users", post(api::users::create_user))
        .route("/api/users/:id", get(api::users::get_user))
        .route("/api/users/:id", put(api::users::update_user))
        .route("/api/users/:id", delete(api::users::delete_user))
        // login; the first segment is the username (param names must line
        // up with /api/users/:id for the router)
        .route("/api/users/:id/:password", get(api::users::login))
        // Trip routes
        .route("/api/trips", get(api::trips::get_trips))
        .route("/api/trips", post(api::trips::create_trip))
        .route("/api/trips/:id", get(api::trips::get_trip))
        .route("/api/trips/:id", put(api::trips::update_trip))
        .route("/api/trips/:id", delete(api::trips::delete_trip))
        .route("/api/trips/:id/userTrips", get(api::trips::get_user_trips))
        // Stage routes
        .route("/api/stages", get(api::stages::get_stages))
        .route("/api/stages", post(api::stages::create_stage))
        .route("/api/stages/:id", get(api::stages::get_stage))
        .route("/api/stages/:id", put(api::stages::update_stage))
        .route("/api/stages/:id", delete(api::stages::delete_stage))
        .route("/api/stages/:id/tripsStages", get(api::stages::get_trip_stages))
        // Post routes
        .route("/api/posts", get(api::posts::get_posts))
        .route("/api/posts", post(api::posts::create_post))
        .route("/api/posts/:id", get(api::posts::get_post))
        .route("/api/posts/:id", put(api::posts::update_post))
        .route("/api/posts/:id", delete(api::posts::delete_post))
        .route("/api/posts/:id/stagePosts", get(api::posts::get_stage_posts))
        .route("/api/posts/:id/tripPosts", get(api::posts::get_trip_posts))
        // Attraction routes
        .route("/api/attractions", get(api::attractions::get_attractions))
        .route("/api/attractions", post(api::attractions::create_attraction))
        .route("/popularAttractions", get(api::attractions::get_popular_attractions))
        .route(
            "/api/attractions/:id/allStageAttractions",
            get(api::attractions::get_stage_attractions),
        )
        .route("/api/attractions/:id", get(api::attractions::get_attraction))
        .route("/api/attractions/:id", put(api::attractions::update_attraction))
        .route("/api/attractions/:id", delete(api::attractions::delete_attraction))
        .route(
            "/api/attractions/:id/:stage_id",
            post(api::attractions::create_relation).delete(api::attractions::delete_relation),
        )
        // Image routes
        .route("/api/images", get(api::images::list_images))
        .route("/api/images/:id", get(api::images::download_image))
        .route("/api/images/:id", delete(api::images::delete_image))
        .route("/api/images/:id", post(api::images::upload_image))
        .route("/api/images/:id/stageImages", get(api::images::list_stage_images))
        .with_state(state)
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .expect("Failed to parse server address");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Server error");
}

async fn health_check() -> &'static str {
    "OK"
}
