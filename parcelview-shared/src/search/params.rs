/// Typed search parameters
///
/// Search endpoints accept a flat set of optional string parameters. This
/// module turns them into a typed [`SearchParams`] value, rejecting anything
/// malformed with a [`SearchParamError`] so the route layer can answer with
/// a 400 instead of quietly dropping a filter.
///
/// # Parameter families
///
/// - `ownerName`: substring match against owner names
/// - `address`: substring match against the property address
/// - `search`: general free text across address, type, city, and state,
///   suppressed when an owner-name or address search is present
/// - `state`, `city`: exact (case-insensitive) geography names
/// - `propertyTypes` (comma-separated) / `propertyType`: the plural list
///   takes precedence when both are supplied
/// - `minBedrooms`, `minBathrooms`: lower bounds
/// - `minSqft`/`maxSqft`, `minYearBuilt`/`maxYearBuilt`: ranges
/// - `minValue`/`maxValue` and `minPrice`/`maxPrice`: two historical names
///   for the price range, merged with the price aliases winning
/// - `hasOwnerInfo`: boolean flag
/// - `sortBy` (`relevance`/`price`/`size`/`year`), `sortOrder` (`asc`/`desc`)

use serde::Deserialize;

/// Raw query-string parameters as they arrive from the client
///
/// Every field is an optional string; parsing and validation happen in
/// [`SearchParams::from_raw`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchParams {
    pub owner_name: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub property_types: Option<String>,
    pub min_bedrooms: Option<String>,
    pub min_bathrooms: Option<String>,
    pub min_sqft: Option<String>,
    pub max_sqft: Option<String>,
    pub min_value: Option<String>,
    pub max_value: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_year_built: Option<String>,
    pub max_year_built: Option<String>,
    pub has_owner_info: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<String>,
}

/// Error raised for malformed search parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchParamError {
    /// A numeric parameter did not parse
    #[error("Invalid numeric value for '{param}': '{value}'")]
    InvalidNumber { param: &'static str, value: String },

    /// A boolean parameter did not parse
    #[error("Invalid boolean value for '{param}': '{value}'")]
    InvalidBool { param: &'static str, value: String },

    /// Unknown sort key
    #[error("Invalid sortBy value: '{0}' (expected relevance, price, size, or year)")]
    InvalidSortKey(String),

    /// Unknown sort direction
    #[error("Invalid sortOrder value: '{0}' (expected asc or desc)")]
    InvalidSortDirection(String),
}

/// Sort key for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Best-match ordering; always current value descending
    Relevance,

    /// Current value
    Price,

    /// Square footage
    Size,

    /// Year built
    Year,
}

/// Requested sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Which search family produced a result set
///
/// Reported back to the client as `searchType` and used to pick the
/// marker title/description emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Owner-name search
    Owner,

    /// Address search
    Address,

    /// General free-text search
    General,

    /// Attribute filters only
    Filtered,
}

impl SearchMode {
    /// Wire name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Owner => "owner",
            SearchMode::Address => "address",
            SearchMode::General => "general",
            SearchMode::Filtered => "filtered",
        }
    }
}

/// An optional inclusive numeric range; absent bound = unconstrained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumericRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl NumericRange {
    /// True when neither bound is set
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Fully parsed, validated search parameters
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub owner_name: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,

    /// Property types to match; empty = no type constraint
    pub property_types: Vec<String>,

    pub min_bedrooms: Option<i64>,
    pub min_bathrooms: Option<f64>,
    pub sqft: NumericRange,
    pub value: NumericRange,
    pub year_built: NumericRange,
    pub has_owner_info: Option<bool>,

    /// General free text; retained even when suppressed so the echo of
    /// applied filters stays faithful to the request
    pub search: Option<String>,

    pub sort_by: Option<SortKey>,
    pub sort_direction: SortDirection,
    pub limit: Option<i64>,
}

impl SearchParams {
    /// Parses raw string parameters into typed search parameters
    ///
    /// # Errors
    ///
    /// Returns a [`SearchParamError`] when a numeric, boolean, or sort
    /// parameter is malformed.
    pub fn from_raw(raw: RawSearchParams) -> Result<Self, SearchParamError> {
        // The plural comma-separated list takes precedence over the
        // singular form when both are present.
        let property_types = match (&raw.property_types, &raw.property_type) {
            (Some(list), _) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            (None, Some(single)) if !single.trim().is_empty() => {
                vec![single.trim().to_string()]
            }
            _ => Vec::new(),
        };

        // Two historical names for the price range. minValue/maxValue are
        // assigned first, then minPrice/maxPrice: last write wins, so the
        // price aliases take precedence deterministically.
        let mut value = NumericRange {
            min: parse_i64("minValue", raw.min_value.as_deref())?,
            max: parse_i64("maxValue", raw.max_value.as_deref())?,
        };
        if let Some(min_price) = parse_i64("minPrice", raw.min_price.as_deref())? {
            value.min = Some(min_price);
        }
        if let Some(max_price) = parse_i64("maxPrice", raw.max_price.as_deref())? {
            value.max = Some(max_price);
        }

        let sort_by = match raw.sort_by.as_deref().map(str::trim) {
            None | Some("") => None,
            Some("relevance") => Some(SortKey::Relevance),
            Some("price") => Some(SortKey::Price),
            Some("size") => Some(SortKey::Size),
            Some("year") => Some(SortKey::Year),
            Some(other) => return Err(SearchParamError::InvalidSortKey(other.to_string())),
        };

        let sort_direction = match raw.sort_order.as_deref().map(|s| s.trim().to_lowercase()) {
            None => SortDirection::Desc,
            Some(ref s) if s.is_empty() => SortDirection::Desc,
            Some(ref s) if s == "asc" => SortDirection::Asc,
            Some(ref s) if s == "desc" => SortDirection::Desc,
            Some(other) => return Err(SearchParamError::InvalidSortDirection(other)),
        };

        Ok(Self {
            owner_name: non_empty(raw.owner_name),
            address: non_empty(raw.address),
            state: non_empty(raw.state),
            city: non_empty(raw.city),
            property_types,
            min_bedrooms: parse_i64("minBedrooms", raw.min_bedrooms.as_deref())?,
            min_bathrooms: parse_f64("minBathrooms", raw.min_bathrooms.as_deref())?,
            sqft: NumericRange {
                min: parse_i64("minSqft", raw.min_sqft.as_deref())?,
                max: parse_i64("maxSqft", raw.max_sqft.as_deref())?,
            },
            value,
            year_built: NumericRange {
                min: parse_i64("minYearBuilt", raw.min_year_built.as_deref())?,
                max: parse_i64("maxYearBuilt", raw.max_year_built.as_deref())?,
            },
            has_owner_info: parse_bool("hasOwnerInfo", raw.has_owner_info.as_deref())?,
            search: non_empty(raw.search),
            sort_by,
            sort_direction,
            limit: parse_i64("limit", raw.limit.as_deref())?,
        })
    }

    /// Which search family these parameters select
    ///
    /// Owner-name and address searches each suppress the general free-text
    /// search; with none of the three, the result set is filter-only.
    pub fn mode(&self) -> SearchMode {
        if self.owner_name.is_some() {
            SearchMode::Owner
        } else if self.address.is_some() {
            SearchMode::Address
        } else if self.search.is_some() {
            SearchMode::General
        } else {
            SearchMode::Filtered
        }
    }

    /// The general free-text term, unless suppressed by an owner-name or
    /// address search
    pub fn effective_search(&self) -> Option<&str> {
        if self.owner_name.is_some() || self.address.is_some() {
            None
        } else {
            self.search.as_deref()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_i64(param: &'static str, value: Option<&str>) -> Result<Option<i64>, SearchParamError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| SearchParamError::InvalidNumber {
                param,
                value: s.to_string(),
            }),
    }
}

fn parse_f64(param: &'static str, value: Option<&str>) -> Result<Option<f64>, SearchParamError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| SearchParamError::InvalidNumber {
                param,
                value: s.to_string(),
            }),
    }
}

fn parse_bool(param: &'static str, value: Option<&str>) -> Result<Option<bool>, SearchParamError> {
    match value.map(|s| s.trim().to_lowercase()) {
        None => Ok(None),
        Some(ref s) if s.is_empty() => Ok(None),
        Some(ref s) if s == "true" || s == "1" => Ok(Some(true)),
        Some(ref s) if s == "false" || s == "0" => Ok(Some(false)),
        Some(other) => Err(SearchParamError::InvalidBool {
            param,
            value: other,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawSearchParams {
        RawSearchParams::default()
    }

    #[test]
    fn test_empty_params_parse_to_filtered_mode() {
        let params = SearchParams::from_raw(raw()).unwrap();
        assert_eq!(params.mode(), SearchMode::Filtered);
        assert!(params.property_types.is_empty());
        assert!(params.value.is_empty());
        assert_eq!(params.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_plural_property_types_win_over_singular() {
        let params = SearchParams::from_raw(RawSearchParams {
            property_types: Some("Condo,Townhouse".to_string()),
            property_type: Some("Single Family".to_string()),
            ..raw()
        })
        .unwrap();

        assert_eq!(params.property_types, vec!["Condo", "Townhouse"]);
    }

    #[test]
    fn test_singular_property_type_used_alone() {
        let params = SearchParams::from_raw(RawSearchParams {
            property_type: Some("Single Family".to_string()),
            ..raw()
        })
        .unwrap();

        assert_eq!(params.property_types, vec!["Single Family"]);
    }

    #[test]
    fn test_price_aliases_win_over_value_names() {
        let params = SearchParams::from_raw(RawSearchParams {
            min_value: Some("100000".to_string()),
            max_value: Some("900000".to_string()),
            min_price: Some("250000".to_string()),
            ..raw()
        })
        .unwrap();

        // minPrice overwrote minValue; maxValue survives untouched.
        assert_eq!(params.value.min, Some(250_000));
        assert_eq!(params.value.max, Some(900_000));
    }

    #[test]
    fn test_owner_search_suppresses_general_search() {
        let params = SearchParams::from_raw(RawSearchParams {
            owner_name: Some("Whitfield".to_string()),
            search: Some("lakefront".to_string()),
            ..raw()
        })
        .unwrap();

        assert_eq!(params.mode(), SearchMode::Owner);
        assert_eq!(params.effective_search(), None);
        // The raw term is still retained for the filter echo.
        assert_eq!(params.search.as_deref(), Some("lakefront"));
    }

    #[test]
    fn test_address_search_suppresses_general_search() {
        let params = SearchParams::from_raw(RawSearchParams {
            address: Some("14 Birch".to_string()),
            search: Some("ranch".to_string()),
            ..raw()
        })
        .unwrap();

        assert_eq!(params.mode(), SearchMode::Address);
        assert_eq!(params.effective_search(), None);
    }

    #[test]
    fn test_general_search_applies_when_alone() {
        let params = SearchParams::from_raw(RawSearchParams {
            search: Some("ranch".to_string()),
            ..raw()
        })
        .unwrap();

        assert_eq!(params.mode(), SearchMode::General);
        assert_eq!(params.effective_search(), Some("ranch"));
    }

    #[test]
    fn test_malformed_number_is_rejected() {
        let err = SearchParams::from_raw(RawSearchParams {
            min_sqft: Some("abc".to_string()),
            ..raw()
        })
        .unwrap_err();

        assert_eq!(
            err,
            SearchParamError::InvalidNumber {
                param: "minSqft",
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_bool_is_rejected() {
        let err = SearchParams::from_raw(RawSearchParams {
            has_owner_info: Some("yep".to_string()),
            ..raw()
        })
        .unwrap_err();

        assert!(matches!(err, SearchParamError::InvalidBool { param: "hasOwnerInfo", .. }));
    }

    #[test]
    fn test_unknown_sort_key_is_rejected() {
        let err = SearchParams::from_raw(RawSearchParams {
            sort_by: Some("alphabetical".to_string()),
            ..raw()
        })
        .unwrap_err();

        assert_eq!(err, SearchParamError::InvalidSortKey("alphabetical".to_string()));
    }

    #[test]
    fn test_blank_strings_are_treated_as_absent() {
        let params = SearchParams::from_raw(RawSearchParams {
            owner_name: Some("   ".to_string()),
            min_sqft: Some("".to_string()),
            ..raw()
        })
        .unwrap();

        assert!(params.owner_name.is_none());
        assert!(params.sqft.is_empty());
        assert_eq!(params.mode(), SearchMode::Filtered);
    }
}
