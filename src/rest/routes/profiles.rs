// rest/routes/profiles.rs — Profile CRUD REST routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::profiles::ProfileError;
use crate::rest::model::{
    ProfileCreateRequest, ProfileCreateResponse, ProfileInfoResponse, ProfileListResponse,
};
use crate::AppContext;

type ApiError = (StatusCode, Json<Value>);

fn profile_error(e: ProfileError) -> ApiError {
    let status = match &e {
        ProfileError::InvalidName(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProfileError::AlreadyExists(_) => StatusCode::CONFLICT,
        ProfileError::NotFound(_) => StatusCode::NOT_FOUND,
        ProfileError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "detail": e.to_string() })))
}

/// `GET /profiles` — list all saved profiles.
pub async fn list_profiles(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<ProfileListResponse>, ApiError> {
    let profiles = ctx.profiles.list().await.map_err(profile_error)?;
    Ok(Json(ProfileListResponse { profiles }))
}

/// `POST /profiles` — create a new empty profile.
pub async fn create_profile(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<ProfileCreateRequest>,
) -> Result<Json<ProfileCreateResponse>, ApiError> {
    let path = ctx.profiles.create(&req.name).await.map_err(profile_error)?;
    Ok(Json(ProfileCreateResponse {
        success: true,
        name: req.name,
        path: path.display().to_string(),
    }))
}

/// `GET /profiles/{name}` — profile information (200 even when absent,
/// with `exists: false`).
pub async fn get_profile(
    State(ctx): State<Arc<AppContext>>,
    Path(name): Path<String>,
) -> Result<Json<ProfileInfoResponse>, ApiError> {
    let info = ctx.profiles.info(&name).await.map_err(profile_error)?;
    Ok(Json(ProfileInfoResponse {
        name: info.name,
        path: info.path.display().to_string(),
        exists: info.exists,
        size_bytes: info.size_bytes,
        last_modified: info.last_modified,
    }))
}

/// `DELETE /profiles/{name}` — delete a profile.
pub async fn delete_profile(
    State(ctx): State<Arc<AppContext>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    ctx.profiles.delete(&name).await.map_err(profile_error)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Profile '{name}' deleted"),
    })))
}
