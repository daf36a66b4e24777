use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::auth::CurrentUser;
use crate::career::recommendations::Recommendation;
use crate::career::roadmap::{RoadmapBundle, RoadmapError};
use crate::errors::AppError;
use crate::models::profile::ProfileDocument;
use crate::state::AppState;

pub const NO_PROFILE: &str = "No resume analysis found. Please upload a resume first.";

async fn require_profile(state: &AppState, username: &str) -> Result<ProfileDocument, AppError> {
    state
        .store
        .current_profile(username)
        .await?
        .ok_or_else(|| AppError::NotFound(NO_PROFILE.to_string()))
}

/// POST /generate
///
/// Runs the skill-gap prompt against the current profile and caches the
/// answer on it. A failed model call yields an empty list.
pub async fn generate(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Value>, AppError> {
    let mut profile = require_profile(&state, &user.username).await?;
    let missing = state.advisor.skill_gap(&profile.skills).await;

    profile.missing_skills = missing.clone();
    state.store.put_profile(&user.username, &profile).await?;

    Ok(Json(json!({ "skills": missing })))
}

/// POST /generate_roadmap_data
pub async fn generate_roadmap_data(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<RoadmapBundle>, AppError> {
    let mut profile = require_profile(&state, &user.username).await?;

    let mut career_goal = profile.career_preferences.clone();
    if career_goal.is_none() {
        career_goal = state
            .store
            .get_user(&user.username)
            .await?
            .and_then(|record| record.profile_str("careerPreferences").map(str::to_string));
    }

    let bundle = state
        .advisor
        .roadmap_with_challenges(&user.username, &profile.skills, career_goal.as_deref())
        .await
        .map_err(|e| match e {
            RoadmapError::NoSkills => AppError::Validation(RoadmapError::NoSkills.to_string()),
            RoadmapError::Generation(source) => {
                AppError::upstream("Could not generate roadmap", source)
            }
        })?;

    debug!("Roadmap stages for {}: {:?}", user.username, bundle.trail);
    profile.roadmap_html = Some(bundle.roadmap_html.clone());
    profile.challenges = Some(bundle.challenges.clone());
    state.store.put_profile(&user.username, &profile).await?;
    info!(
        "Stored roadmap for {} (challenges {})",
        user.username,
        if bundle.challenges.is_failed() { "failed" } else { "ready" }
    );

    Ok(Json(bundle))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    _user: CurrentUser,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::Validation("Message is required".to_string()))?;

    let response = state.advisor.chat(message).await;
    Ok(Json(json!({ "response": response })))
}

/// GET /generate_recommendations
///
/// Users without an analysed resume still get advice, from an empty profile.
pub async fn generate_recommendations(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Recommendation>, AppError> {
    let profile = state
        .store
        .current_profile(&user.username)
        .await?
        .unwrap_or_default();
    Ok(Json(
        state.advisor.recommend(&user.username, &profile).await,
    ))
}
