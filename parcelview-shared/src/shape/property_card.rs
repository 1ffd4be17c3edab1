/// Property response shaping
///
/// Maps joined property rows into the flat JSON the dashboard renders:
/// location names, formatted values, derived fields, the resolved owner
/// name, and a map-marker title/description pair whose emphasis depends on
/// which search mode produced the result.

use chrono::{Datelike, Utc};
use serde_json::{json, Value};

use crate::models::owner::{NameFallback, Owner};
use crate::models::ownership::OwnershipWithOwner;
use crate::models::property::PropertyWithLocation;
use crate::models::transaction::TransactionWithParties;
use crate::search::SearchMode;
use crate::shape::currency::format_currency;

/// Age of the structure in years, when the build year is known
pub fn property_age(year_built: Option<i32>, current_year: i32) -> Option<i32> {
    year_built.map(|year| current_year - year)
}

/// Price per square foot, rounded to the nearest dollar
///
/// None when either input is missing or square footage is zero.
pub fn price_per_sqft(current_value: Option<i64>, square_footage: Option<i32>) -> Option<i64> {
    match (current_value, square_footage) {
        (Some(value), Some(sqft)) if sqft != 0 => {
            Some((value as f64 / sqft as f64).round() as i64)
        }
        _ => None,
    }
}

/// Shapes a property row for the current year
pub fn shape_property(property: &PropertyWithLocation, mode: SearchMode) -> Value {
    shape_property_at(property, mode, Utc::now().year())
}

/// Shapes a property row with an explicit current year (testable)
pub fn shape_property_at(
    property: &PropertyWithLocation,
    mode: SearchMode,
    current_year: i32,
) -> Value {
    let owner_name = primary_owner_name(property);
    let (title, description) = marker_text(property, mode, &owner_name);

    json!({
        "id": property.id,
        "address": property.address,
        "city": property.city_name,
        "county": property.county_name,
        "state": property.state_name,
        "stateCode": property.state_code,
        "latitude": property.latitude,
        "longitude": property.longitude,
        "propertyType": property.property_type,
        "yearBuilt": property.year_built,
        "squareFootage": property.square_footage,
        "bedrooms": property.bedrooms,
        "bathrooms": property.bathrooms,
        "currentValue": property.current_value,
        "currentValueFormatted": format_currency(property.current_value),
        "assessedValue": property.assessed_value,
        "assessedValueFormatted": format_currency(property.assessed_value),
        "taxAmount": property.tax_amount,
        "lastSalePrice": property.last_sale_price,
        "lastSalePriceFormatted": format_currency(property.last_sale_price),
        "lastSaleDate": property.last_sale_date,
        "propertyAge": property_age(property.year_built, current_year),
        "pricePerSqFt": price_per_sqft(property.current_value, property.square_footage),
        "ownerName": owner_name,
        "title": title,
        "description": description,
        "dataSource": property.data_source,
        "confidence": property.confidence,
    })
}

/// Shapes an ownership stake with its resolved owner for detail responses
pub fn shape_ownership(ownership: &OwnershipWithOwner) -> Value {
    let owner = ownership.owner();

    json!({
        "ownerId": ownership.owner_id,
        "ownerName": owner.display_name(NameFallback::PrimaryOwner),
        "ownerKind": ownership.kind,
        "estimatedNetWorth": ownership.estimated_net_worth,
        "estimatedNetWorthFormatted": format_currency(ownership.estimated_net_worth),
        "occupation": ownership.occupation,
        "employer": ownership.employer,
        "industry": ownership.industry,
        "ownershipPercent": ownership.ownership_percent,
        "ownershipType": ownership.ownership_type,
        "startDate": ownership.start_date,
    })
}

/// Shapes a transaction with buyer/seller names for detail responses
///
/// Buyer and seller fall back to "Unknown", the counterparty placeholder,
/// distinct from the primary-owner "Unknown Owner".
pub fn shape_transaction(transaction: &TransactionWithParties) -> Value {
    let buyer_name = transaction
        .buyer()
        .map(|o| o.display_name(NameFallback::Counterparty))
        .unwrap_or_else(|| "Unknown".to_string());
    let seller_name = transaction
        .seller()
        .map(|o| o.display_name(NameFallback::Counterparty))
        .unwrap_or_else(|| "Unknown".to_string());

    json!({
        "id": transaction.id,
        "amount": transaction.amount,
        "amountFormatted": format_currency(transaction.amount),
        "date": transaction.transaction_date,
        "documentType": transaction.document_type,
        "buyerName": buyer_name,
        "sellerName": seller_name,
    })
}

/// Resolves the primary owner's display name from the joined columns
fn primary_owner_name(property: &PropertyWithLocation) -> String {
    match property.owner_kind {
        None => "Unknown Owner".to_string(),
        Some(kind) => {
            let owner = Owner {
                id: uuid::Uuid::nil(),
                kind,
                first_name: property.owner_first_name.clone(),
                last_name: property.owner_last_name.clone(),
                entity_name: property.owner_entity_name.clone(),
                estimated_net_worth: None,
                occupation: None,
                employer: None,
                industry: None,
                email: None,
                phone: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            owner.display_name(NameFallback::PrimaryOwner)
        }
    }
}

/// Builds the marker title/description pair
///
/// Owner-search results lead with the owner; address and general searches
/// lead with the address and describe the structure.
fn marker_text(
    property: &PropertyWithLocation,
    mode: SearchMode,
    owner_name: &str,
) -> (String, String) {
    match mode {
        SearchMode::Owner => {
            let mut location = property.address.clone();
            if let Some(ref city) = property.city_name {
                location.push_str(&format!(", {}", city));
            }
            location.push_str(&format!(", {}", property.state_code));
            (owner_name.to_string(), location)
        }
        _ => {
            let mut parts: Vec<String> = Vec::new();
            if let Some(ref property_type) = property.property_type {
                parts.push(property_type.clone());
            }
            if let Some(sqft) = property.square_footage {
                parts.push(format!("{} sq ft", sqft));
            }
            if let (Some(bedrooms), Some(bathrooms)) = (property.bedrooms, property.bathrooms) {
                parts.push(format!("{} bd / {} ba", bedrooms, bathrooms));
            }
            (property.address.clone(), parts.join(" · "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::owner::OwnerKind;

    fn sample() -> PropertyWithLocation {
        PropertyWithLocation {
            address: "14 Birch Hollow Rd".to_string(),
            city_name: Some("Austin".to_string()),
            state_name: "Texas".to_string(),
            state_code: "TX".to_string(),
            property_type: Some("Single Family".to_string()),
            year_built: Some(1998),
            square_footage: Some(2400),
            bedrooms: Some(4),
            bathrooms: Some(2.5),
            current_value: Some(1_200_000),
            owner_kind: Some(OwnerKind::Individual),
            owner_first_name: Some("Dana".to_string()),
            owner_last_name: Some("Whitfield".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_property_age() {
        assert_eq!(property_age(Some(1998), 2026), Some(28));
        assert_eq!(property_age(None, 2026), None);
    }

    #[test]
    fn test_price_per_sqft() {
        assert_eq!(price_per_sqft(Some(1_200_000), Some(2400)), Some(500));
        // Rounds to the nearest dollar.
        assert_eq!(price_per_sqft(Some(1_000_000), Some(3000)), Some(333));
        assert_eq!(price_per_sqft(Some(1_000_000), Some(0)), None);
        assert_eq!(price_per_sqft(None, Some(2400)), None);
        assert_eq!(price_per_sqft(Some(1_200_000), None), None);
    }

    #[test]
    fn test_shaped_property_derived_fields() {
        let shaped = shape_property_at(&sample(), SearchMode::Filtered, 2026);

        assert_eq!(shaped["propertyAge"], 28);
        assert_eq!(shaped["pricePerSqFt"], 500);
        assert_eq!(shaped["currentValueFormatted"], "$1.2M");
        assert_eq!(shaped["assessedValueFormatted"], "N/A");
        assert_eq!(shaped["ownerName"], "Dana Whitfield");
    }

    #[test]
    fn test_owner_mode_marker_leads_with_owner() {
        let shaped = shape_property_at(&sample(), SearchMode::Owner, 2026);

        assert_eq!(shaped["title"], "Dana Whitfield");
        assert_eq!(shaped["description"], "14 Birch Hollow Rd, Austin, TX");
    }

    #[test]
    fn test_address_mode_marker_leads_with_address() {
        let shaped = shape_property_at(&sample(), SearchMode::Address, 2026);

        assert_eq!(shaped["title"], "14 Birch Hollow Rd");
        assert_eq!(shaped["description"], "Single Family · 2400 sq ft · 4 bd / 2.5 ba");
    }

    #[test]
    fn test_missing_owner_is_unknown_owner() {
        let property = PropertyWithLocation {
            owner_kind: None,
            ..sample()
        };
        let shaped = shape_property_at(&property, SearchMode::Filtered, 2026);

        assert_eq!(shaped["ownerName"], "Unknown Owner");
    }

    #[test]
    fn test_entity_owner_without_name() {
        let property = PropertyWithLocation {
            owner_kind: Some(OwnerKind::Entity),
            owner_first_name: None,
            owner_last_name: None,
            owner_entity_name: None,
            ..sample()
        };
        let shaped = shape_property_at(&property, SearchMode::Filtered, 2026);

        assert_eq!(shaped["ownerName"], "Unknown Entity");
    }
}
