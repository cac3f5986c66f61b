//! Profile handlers

use axum::{extract::{rejection::JsonRejection, State, Path}, http::StatusCode, Json};
use uuid::Uuid;

use crate::{AppState, AppResult, AppError};
use crate::models::{CreateProfile, ProfileResponse, normalize_email};

/// Register a reporter profile
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateProfile>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ProfileResponse>)> {
    let Json(req) = payload?;
    let data = req.normalized();
    data.check()?;

    if let Some(existing) = state.profiles.find_by_email(&data.email).await? {
        tracing::info!("Profile already registered: {}", existing.id);
        return Err(AppError::DuplicateProfile(Box::new(existing)));
    }

    let email = data.email.clone();
    match state.profiles.insert(data).await? {
        Some(profile) => {
            tracing::info!("Profile created: {}", profile.id);
            Ok((StatusCode::CREATED, Json(ProfileResponse { success: true, profile })))
        }
        None => {
            // Registered concurrently between the lookup and the insert
            let existing = state.profiles.find_by_email(&email)
                .await?
                .ok_or_else(|| AppError::InternalError("Email conflict without a stored profile".to_string()))?;
            Err(AppError::DuplicateProfile(Box::new(existing)))
        }
    }
}

/// Get profile by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProfileResponse>> {
    // Malformed ids cannot match any profile
    let profile = match Uuid::parse_str(&id) {
        Ok(id) => state.profiles.find_by_id(id).await?,
        Err(_) => None,
    }
    .ok_or_else(profile_not_found)?;

    Ok(Json(ProfileResponse { success: true, profile }))
}

/// Get profile by email
pub async fn get_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state.profiles.find_by_email(&normalize_email(&email))
        .await?
        .ok_or_else(profile_not_found)?;

    Ok(Json(ProfileResponse { success: true, profile }))
}

fn profile_not_found() -> AppError {
    AppError::NotFound("Profile not found".to_string())
}
