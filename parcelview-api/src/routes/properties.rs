/// Property search and detail endpoints
///
/// # Endpoints
///
/// - `GET /v1/properties/locations` - Filtered search for the map view
/// - `GET /v1/properties/:id` - Full property detail
///
/// The locations endpoint accepts the full set of search parameters
/// (owner name, address, geography, type lists, ranges, free text, sort)
/// and answers with shaped markers plus the total match count. Its page
/// size defaults to 100 and caps at 500, tuned for the map and independent
/// of other endpoints' paging.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use parcelview_shared::{
    auth::middleware::AuthContext,
    models::{
        ownership::PropertyOwnership, property::Property, transaction::PropertyTransaction,
    },
    search::params::{RawSearchParams, SearchParams},
    shape::{shape_ownership, shape_property, shape_transaction},
};
use serde_json::{json, Value};
use uuid::Uuid;

/// Map search page-size defaults (per-endpoint, deliberately not shared)
const LOCATIONS_DEFAULT_LIMIT: i64 = 100;
const LOCATIONS_MAX_LIMIT: i64 = 500;

/// Searches properties for the map view
///
/// # Errors
///
/// - `400 Bad Request`: Malformed numeric/boolean/sort parameter
/// - `401 Unauthorized`: No valid session
pub async fn search_locations(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Query(raw): Query<RawSearchParams>,
) -> ApiResult<Json<Value>> {
    let params = SearchParams::from_raw(raw)?;
    let mode = params.mode();

    let (results, total) = Property::search(
        &state.db,
        &params,
        LOCATIONS_DEFAULT_LIMIT,
        LOCATIONS_MAX_LIMIT,
        0,
    )
    .await?;

    let properties: Vec<Value> = results
        .iter()
        .map(|property| shape_property(property, mode))
        .collect();

    Ok(Json(json!({
        "properties": properties,
        "total": total,
        "searchType": mode.as_str(),
        "filters": filter_echo(&params),
    })))
}

/// Fetches full property detail: attributes, owners, and transactions
///
/// # Errors
///
/// - `404 Not Found`: No property with this ID
pub async fn get_property(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let property = Property::find_with_location(&state.db, id)
        .await?
        .ok_or_else(|| crate::error::ApiError::NotFound("Property not found".to_string()))?;

    let ownerships = PropertyOwnership::list_with_owners(&state.db, id).await?;
    let transactions = PropertyTransaction::list_with_parties(&state.db, id).await?;

    let mut shaped = shape_property(&property, parcelview_shared::search::SearchMode::Filtered);
    shaped["owners"] = Value::Array(ownerships.iter().map(shape_ownership).collect());
    shaped["transactions"] = Value::Array(transactions.iter().map(shape_transaction).collect());

    Ok(Json(json!({
        "property": shaped,
        "success": true,
    })))
}

/// Lists states for the search filter dropdown
pub async fn list_states(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> ApiResult<Json<Value>> {
    let states = parcelview_shared::models::region::State::list(&state.db).await?;

    Ok(Json(json!({ "states": states })))
}

/// Lists a state's cities for the search filter dropdown
///
/// # Errors
///
/// - `404 Not Found`: Unknown state name or code
pub async fn list_cities(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Query(query): Query<CitiesQuery>,
) -> ApiResult<Json<Value>> {
    let region = parcelview_shared::models::region::State::find_by_name_or_code(
        &state.db,
        &query.state,
    )
    .await?
    .ok_or_else(|| crate::error::ApiError::NotFound("State not found".to_string()))?;

    let cities =
        parcelview_shared::models::region::City::list_by_state(&state.db, region.id).await?;

    Ok(Json(json!({ "state": region, "cities": cities })))
}

/// Cities lookup query
#[derive(serde::Deserialize, Debug)]
pub struct CitiesQuery {
    /// State name or two-letter code
    pub state: String,
}

/// Echoes the applied filters back to the client
fn filter_echo(params: &SearchParams) -> Value {
    json!({
        "ownerName": params.owner_name,
        "address": params.address,
        "state": params.state,
        "city": params.city,
        "propertyTypes": params.property_types,
        "minBedrooms": params.min_bedrooms,
        "minBathrooms": params.min_bathrooms,
        "minSqft": params.sqft.min,
        "maxSqft": params.sqft.max,
        "minValue": params.value.min,
        "maxValue": params.value.max,
        "minYearBuilt": params.year_built.min,
        "maxYearBuilt": params.year_built.max,
        "hasOwnerInfo": params.has_owner_info,
        "search": params.search,
    })
}
