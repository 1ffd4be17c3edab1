/// Dashboard statistics endpoint
///
/// Aggregate counts plus a formatted total value. With `?scope=user` the
/// numbers cover only the caller's saved properties; otherwise they cover
/// the whole dataset.
///
/// # Endpoints
///
/// - `GET /v1/dashboard/stats[?scope=user]`

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use parcelview_shared::{
    auth::{authorization::require_feature, middleware::AuthContext},
    models::{
        owner::Owner, ownership::PropertyOwnership, property::Property,
        saved_property::SavedProperty, user::PermissionFlag,
    },
    shape::format_currency,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Stats query parameters
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// "user" restricts the stats to the caller's saved properties
    pub scope: Option<String>,
}

/// Aggregate statistics for the dashboard
///
/// # Errors
///
/// - `403 Forbidden`: Dashboard feature disabled for this user
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<Value>> {
    require_feature(&state.db, auth.user_id, PermissionFlag::Dashboard).await?;

    if query.scope.as_deref() == Some("user") {
        let saved_count = SavedProperty::count_by_user(&state.db, auth.user_id).await?;
        let total_value = Property::total_value_saved_by(&state.db, auth.user_id).await?;

        return Ok(Json(json!({
            "scope": "user",
            "savedProperties": saved_count,
            "totalValue": total_value,
            "totalValueFormatted": format_currency(Some(total_value)),
        })));
    }

    let total_properties = Property::count(&state.db).await?;
    let total_owners = Owner::count(&state.db).await?;
    let with_owner_info = PropertyOwnership::count_properties_with_owners(&state.db).await?;
    let total_value = Property::total_value(&state.db).await?;

    Ok(Json(json!({
        "scope": "all",
        "totalProperties": total_properties,
        "totalOwners": total_owners,
        "propertiesWithOwnerInfo": with_owner_info,
        "totalValue": total_value,
        "totalValueFormatted": format_currency(Some(total_value)),
    })))
}
