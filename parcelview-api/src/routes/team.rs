/// Team administration endpoints
///
/// All endpoints require the admin role plus the team-management feature
/// flag, and are scoped to the admin's own company. Role and flag are
/// re-read from the store on every request; a stale session claim never
/// grants access here.
///
/// # Endpoints
///
/// - `GET   /v1/team/members` - List company members
/// - `PATCH /v1/team/members/:id/permissions` - Update a member's flags
/// - `GET   /v1/team/stats` - Company statistics
/// - `GET   /v1/team/activity-logs` - Recent company activity

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use parcelview_shared::{
    auth::{
        authorization::{require_company_admin, require_feature},
        middleware::AuthContext,
    },
    models::{
        activity_log::ActivityLog,
        invitation::Invitation,
        user::{PermissionFlag, UpdatePermissions, User, UserRole},
    },
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

const ACTIVITY_DEFAULT_LIMIT: i64 = 50;
const ACTIVITY_MAX_LIMIT: i64 = 200;

/// Activity log query parameters
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// Maximum entries to return
    pub limit: Option<i64>,
}

/// Lists the members of the caller's company
///
/// # Errors
///
/// - `403 Forbidden`: Not an admin, no company, or team management disabled
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Value>> {
    let (_, company_id) = require_company_admin(&state.db, auth.user_id).await?;
    require_feature(&state.db, auth.user_id, PermissionFlag::TeamManagement).await?;

    let members = User::list_by_company(&state.db, company_id).await?;

    let shaped: Vec<Value> = members.iter().map(shape_member).collect();

    Ok(Json(json!({
        "members": shaped,
        "total": shaped.len(),
    })))
}

/// Updates a member's feature flags
///
/// Only members of the admin's own company can be updated; the scope is
/// enforced in the update query itself.
///
/// # Errors
///
/// - `400 Bad Request`: No flags in the request body
/// - `403 Forbidden`: Not an admin, no company, or team management disabled
/// - `404 Not Found`: Member not in the admin's company
pub async fn update_member_permissions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(member_id): Path<Uuid>,
    Json(update): Json<UpdatePermissions>,
) -> ApiResult<Json<Value>> {
    let (admin, company_id) = require_company_admin(&state.db, auth.user_id).await?;
    require_feature(&state.db, auth.user_id, PermissionFlag::TeamManagement).await?;

    if update.is_empty() {
        return Err(ApiError::BadRequest(
            "No permission changes supplied".to_string(),
        ));
    }

    let member = User::update_permissions(&state.db, member_id, company_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team member not found".to_string()))?;

    if let Err(e) = ActivityLog::record(
        &state.db,
        admin.id,
        Some(company_id),
        "permissions.updated",
        Some(&member.email),
    )
    .await
    {
        tracing::warn!("Failed to record permission change: {}", e);
    }

    tracing::info!(member_id = %member.id, "Member permissions updated");

    Ok(Json(json!({
        "message": "Permissions updated",
        "member": shape_member(&member),
    })))
}

/// Company statistics for the team page
pub async fn team_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Value>> {
    let (_, company_id) = require_company_admin(&state.db, auth.user_id).await?;
    require_feature(&state.db, auth.user_id, PermissionFlag::TeamManagement).await?;

    let members = User::list_by_company(&state.db, company_id).await?;
    let total_members = members.len();
    let admin_count = members.iter().filter(|m| m.role == UserRole::Admin).count();
    let pending_invitations = Invitation::count_pending_by_company(&state.db, company_id).await?;

    Ok(Json(json!({
        "totalMembers": total_members,
        "admins": admin_count,
        "pendingInvitations": pending_invitations,
    })))
}

/// Recent company activity, newest first
pub async fn activity_logs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Json<Value>> {
    let (_, company_id) = require_company_admin(&state.db, auth.user_id).await?;
    require_feature(&state.db, auth.user_id, PermissionFlag::TeamManagement).await?;

    let limit = query
        .limit
        .unwrap_or(ACTIVITY_DEFAULT_LIMIT)
        .clamp(1, ACTIVITY_MAX_LIMIT);

    let entries = ActivityLog::list_by_company(&state.db, company_id, limit).await?;

    let shaped: Vec<Value> = entries
        .iter()
        .map(|entry| {
            json!({
                "id": entry.id,
                "action": entry.action,
                "detail": entry.detail,
                "actorEmail": entry.actor_email,
                "actorName": entry.actor_name,
                "createdAt": entry.created_at,
            })
        })
        .collect();

    Ok(Json(json!({ "logs": shaped })))
}

/// Shapes a user row for team responses (no password hash, flags grouped)
fn shape_member(user: &User) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
        "role": user.role,
        "permissions": {
            "canAccessDashboard": user.can_access_dashboard,
            "canAccessSavedProperties": user.can_access_saved_properties,
            "canAccessTeamManagement": user.can_access_team_management,
        },
        "createdAt": user.created_at,
        "lastLoginAt": user.last_login_at,
    })
}
