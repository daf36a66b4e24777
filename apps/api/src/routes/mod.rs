pub mod analysis;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod profile;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(auth::index))
        .route("/health", get(health::health_handler))
        // Pages
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/roadmap", get(dashboard::roadmap))
        .route("/recommendation", get(dashboard::recommendation))
        // JSON API
        .route(
            "/upload",
            post(profile::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/update_profile", post(profile::update_profile))
        .route("/generate", post(analysis::generate))
        .route(
            "/generate_roadmap_data",
            post(analysis::generate_roadmap_data),
        )
        .route("/chat", post(analysis::chat))
        .route(
            "/generate_recommendations",
            get(analysis::generate_recommendations),
        )
        .with_state(state)
}
