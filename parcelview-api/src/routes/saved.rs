/// Saved-property endpoints
///
/// Users bookmark properties with notes and tags. All three operations are
/// gated on the saved-properties feature flag, read fresh from the store.
///
/// # Endpoints
///
/// - `GET    /v1/properties/save?page=&limit=&tag=` - List saved properties
/// - `POST   /v1/properties/save` - Save a property
/// - `DELETE /v1/properties/save` - Remove a saved property
///
/// The list page size defaults to 20 and caps at 100: this endpoint's own
/// paging, separate from the map search limits.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use parcelview_shared::{
    auth::{authorization::require_feature, middleware::AuthContext},
    models::{
        saved_property::{CreateSavedProperty, SavedProperty},
        user::PermissionFlag,
    },
    search::SearchMode,
    shape::shape_property,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

/// Saved-list page-size defaults (per-endpoint, deliberately not shared)
const SAVED_DEFAULT_LIMIT: i64 = 20;
const SAVED_MAX_LIMIT: i64 = 100;

/// List query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 1-based page number
    pub page: Option<i64>,

    /// Page size
    pub limit: Option<i64>,

    /// Only entries carrying this tag
    pub tag: Option<String>,
}

/// Save request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// Property to save
    pub property_id: Uuid,

    /// Optional notes
    pub notes: Option<String>,

    /// Optional tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Unsave request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsaveRequest {
    /// Property to remove
    pub property_id: Uuid,
}

/// Lists the caller's saved properties
///
/// # Errors
///
/// - `403 Forbidden`: Saved-properties feature disabled for this user
pub async fn list_saved(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    require_feature(&state.db, auth.user_id, PermissionFlag::SavedProperties).await?;

    let limit = query
        .limit
        .unwrap_or(SAVED_DEFAULT_LIMIT)
        .clamp(1, SAVED_MAX_LIMIT);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * limit;

    let (entries, total) = SavedProperty::list_by_user(
        &state.db,
        auth.user_id,
        query.tag.as_deref(),
        limit,
        offset,
    )
    .await?;

    let saved: Vec<Value> = entries
        .iter()
        .map(|entry| {
            json!({
                "id": entry.saved_id,
                "notes": entry.notes,
                "tags": entry.tags,
                "savedAt": entry.saved_at,
                "property": shape_property(&entry.property, SearchMode::Filtered),
            })
        })
        .collect();

    Ok(Json(json!({
        "savedProperties": saved,
        "total": total,
        "page": page,
        "limit": limit,
    })))
}

/// Saves a property for the caller
///
/// # Errors
///
/// - `403 Forbidden`: Saved-properties feature disabled for this user
/// - `404 Not Found`: Property does not exist
/// - `409 Conflict`: Property already saved
pub async fn save_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<SaveRequest>,
) -> ApiResult<Json<Value>> {
    require_feature(&state.db, auth.user_id, PermissionFlag::SavedProperties).await?;

    let saved = SavedProperty::create(
        &state.db,
        auth.user_id,
        CreateSavedProperty {
            property_id: req.property_id,
            notes: req.notes,
            tags: req.tags,
        },
    )
    .await?;

    tracing::debug!(user_id = %auth.user_id, property_id = %req.property_id, "Property saved");

    Ok(Json(json!({
        "message": "Property saved",
        "id": saved.id,
    })))
}

/// Removes a saved property
///
/// # Errors
///
/// - `403 Forbidden`: Saved-properties feature disabled for this user
/// - `404 Not Found`: The pair was not saved
pub async fn unsave_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UnsaveRequest>,
) -> ApiResult<Json<Value>> {
    require_feature(&state.db, auth.user_id, PermissionFlag::SavedProperties).await?;

    let deleted = SavedProperty::delete(&state.db, auth.user_id, req.property_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Saved property not found".to_string()));
    }

    Ok(Json(json!({ "message": "Property removed from saved list" })))
}
