use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::extraction::extract_resume_text;
use crate::state::AppState;

pub const RESUME_FIELD: &str = "resume";
pub const PROFILE_UPDATED: &str = "Profile updated successfully!";

/// POST /upload
///
/// Multipart with a PDF under `resume`. Extracts the text, has the model parse
/// it, and stores the result as a new profile revision.
pub async fn upload(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut pdf = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        if field.file_name().map_or(true, str::is_empty) {
            return Err(AppError::Validation("No selected file".to_string()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        pdf = Some(bytes);
        break;
    }

    let pdf = pdf.ok_or_else(|| AppError::Validation("No file part".to_string()))?;
    if pdf.is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }

    let text = extract_resume_text(pdf).await.map_err(|e| {
        warn!("Resume extraction failed for {}: {e}", user.username);
        AppError::Validation("Could not extract text from PDF.".to_string())
    })?;

    let parsed = state
        .advisor
        .parse_resume(&text)
        .await
        .map_err(|e| AppError::upstream("Failed to parse resume", e))?;

    let saved = state.store.create_profile(&user.username, parsed).await?;
    info!(
        "Analysed resume for {} ({} skills)",
        user.username,
        saved.skills.len()
    );

    Ok(Json(json!({
        "message": format!("Analysis complete for '{}'.", saved.name),
        "analysis": saved,
    })))
}

/// POST /update_profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let Value::Object(update) = body else {
        return Err(AppError::Validation(
            "Expected a JSON object of profile fields".to_string(),
        ));
    };

    let mut record = state
        .store
        .get_user(&user.username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    record
        .merge(update)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    state.store.put_user(&user.username, &record).await?;

    info!("Updated profile fields for {}", user.username);
    Ok(Json(json!({
        "success": true,
        "message": PROFILE_UPDATED,
        "user": record.public_view(),
    })))
}
