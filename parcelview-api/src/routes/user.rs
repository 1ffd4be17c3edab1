/// Per-user permission checks
///
/// The dashboard asks this endpoint before rendering gated sections. The
/// answer always comes from the stored flag, so a revocation shows up on
/// the next request regardless of what the client's session believes.
///
/// # Endpoints
///
/// - `POST /v1/user/check-permission` - Check one feature flag

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use parcelview_shared::{
    auth::middleware::AuthContext,
    models::user::{PermissionFlag, User},
};
use serde::{Deserialize, Serialize};

/// Permission check request
#[derive(Debug, Deserialize)]
pub struct CheckPermissionRequest {
    /// Permission name, e.g. "savedProperties" or "canAccessTeamManagement"
    pub permission: String,
}

/// Permission check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPermissionResponse {
    /// Whether the stored flag is enabled
    pub has_permission: bool,
}

/// Checks one of the caller's feature flags against the store
///
/// # Errors
///
/// - `400 Bad Request`: Unknown permission name
/// - `401 Unauthorized`: Session user no longer exists
pub async fn check_permission(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CheckPermissionRequest>,
) -> ApiResult<Json<CheckPermissionResponse>> {
    let flag = PermissionFlag::parse(&req.permission).ok_or_else(|| {
        ApiError::BadRequest(format!("Unknown permission: {}", req.permission))
    })?;

    let has_permission = User::feature_enabled(&state.db, auth.user_id, flag)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User account not found".to_string()))?;

    Ok(Json(CheckPermissionResponse { has_permission }))
}
