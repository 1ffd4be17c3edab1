/// SQL predicate and ordering builder for property search
///
/// Turns a typed [`SearchParams`] into a WHERE clause, an ORDER BY clause,
/// and a positional bind-parameter list. The clause references the aliases
/// used by the property search query: `p` (properties), `st` (states),
/// `c` (cities).
///
/// Every user-supplied value travels through a bind parameter; the SQL text
/// itself is assembled only from fixed fragments. Substring matches are
/// case-insensitive (`ILIKE`) with `%`/`_` escaped in the needle.

use super::params::{SearchParams, SortDirection, SortKey};

/// A positional bind parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Float(f64),
}

/// The built predicate: WHERE text, ORDER BY text, and bind values
///
/// `where_clause` is "TRUE" when no filter applies, so callers can always
/// write `WHERE {where_clause}`. Parameter placeholders are numbered from
/// `$1`; callers appending LIMIT/OFFSET continue from `params.len() + 1`.
#[derive(Debug, Clone)]
pub struct SearchSql {
    pub where_clause: String,
    pub order_by: String,
    pub params: Vec<SqlParam>,
}

/// Builds the search predicate and ordering from parsed parameters
pub fn build_search_sql(params: &SearchParams) -> SearchSql {
    let mut conditions: Vec<String> = Vec::new();
    let mut binds: Vec<SqlParam> = Vec::new();

    let next = |binds: &mut Vec<SqlParam>, p: SqlParam| -> String {
        binds.push(p);
        format!("${}", binds.len())
    };

    if let Some(ref owner_name) = params.owner_name {
        let ph = next(&mut binds, SqlParam::Text(like_pattern(owner_name)));
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM property_ownerships po \
             JOIN owners o ON o.id = po.owner_id \
             WHERE po.property_id = p.id AND po.is_active \
             AND ((COALESCE(o.first_name, '') || ' ' || COALESCE(o.last_name, '')) ILIKE {ph} \
                  OR o.entity_name ILIKE {ph}))",
        ));
    }

    if let Some(ref address) = params.address {
        let ph = next(&mut binds, SqlParam::Text(like_pattern(address)));
        conditions.push(format!("p.address ILIKE {ph}"));
    }

    if let Some(ref state) = params.state {
        let ph = next(&mut binds, SqlParam::Text(state.clone()));
        conditions.push(format!(
            "(LOWER(st.name) = LOWER({ph}) OR LOWER(st.code) = LOWER({ph}))",
        ));
    }

    if let Some(ref city) = params.city {
        let ph = next(&mut binds, SqlParam::Text(city.clone()));
        conditions.push(format!("LOWER(c.name) = LOWER({ph})"));
    }

    if !params.property_types.is_empty() {
        let placeholders: Vec<String> = params
            .property_types
            .iter()
            .map(|t| next(&mut binds, SqlParam::Text(t.clone())))
            .collect();
        conditions.push(format!(
            "LOWER(p.property_type) IN (SELECT LOWER(x) FROM UNNEST(ARRAY[{}]) AS x)",
            placeholders.join(", "),
        ));
    }

    if let Some(min_bedrooms) = params.min_bedrooms {
        let ph = next(&mut binds, SqlParam::Int(min_bedrooms));
        conditions.push(format!("p.bedrooms >= {ph}"));
    }

    if let Some(min_bathrooms) = params.min_bathrooms {
        let ph = next(&mut binds, SqlParam::Float(min_bathrooms));
        conditions.push(format!("p.bathrooms >= {ph}"));
    }

    push_range(&mut conditions, &mut binds, "p.square_footage", params.sqft.min, params.sqft.max);
    push_range(&mut conditions, &mut binds, "p.current_value", params.value.min, params.value.max);
    push_range(
        &mut conditions,
        &mut binds,
        "p.year_built",
        params.year_built.min,
        params.year_built.max,
    );

    match params.has_owner_info {
        Some(true) => conditions.push(
            "EXISTS (SELECT 1 FROM property_ownerships po \
             WHERE po.property_id = p.id AND po.is_active)"
                .to_string(),
        ),
        Some(false) => conditions.push(
            "NOT EXISTS (SELECT 1 FROM property_ownerships po \
             WHERE po.property_id = p.id AND po.is_active)"
                .to_string(),
        ),
        None => {}
    }

    // General free text, unless an owner-name or address search already
    // claimed the request.
    if let Some(search) = params.effective_search() {
        let ph = next(&mut binds, SqlParam::Text(like_pattern(search)));
        conditions.push(format!(
            "(p.address ILIKE {ph} OR p.property_type ILIKE {ph} \
             OR c.name ILIKE {ph} OR st.name ILIKE {ph})",
        ));
    }

    let where_clause = if conditions.is_empty() {
        "TRUE".to_string()
    } else {
        conditions.join(" AND ")
    };

    SearchSql {
        where_clause,
        order_by: order_by(params.sort_by, params.sort_direction),
        params: binds,
    }
}

/// Maps the sort key and direction to an ORDER BY clause
///
/// `relevance` is always current value descending regardless of the
/// requested direction; the default (no key) is the same ordering. No
/// secondary tie-break column is applied; ties stay in store order.
fn order_by(sort_by: Option<SortKey>, direction: SortDirection) -> String {
    let dir = match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };

    match sort_by {
        None | Some(SortKey::Relevance) => "p.current_value DESC NULLS LAST".to_string(),
        Some(SortKey::Price) => format!("p.current_value {dir} NULLS LAST"),
        Some(SortKey::Size) => format!("p.square_footage {dir} NULLS LAST"),
        Some(SortKey::Year) => format!("p.year_built {dir} NULLS LAST"),
    }
}

fn push_range(
    conditions: &mut Vec<String>,
    binds: &mut Vec<SqlParam>,
    column: &str,
    min: Option<i64>,
    max: Option<i64>,
) {
    if let Some(min) = min {
        binds.push(SqlParam::Int(min));
        conditions.push(format!("{column} >= ${}", binds.len()));
    }
    if let Some(max) = max {
        binds.push(SqlParam::Int(max));
        conditions.push(format!("{column} <= ${}", binds.len()));
    }
}

/// Builds an ILIKE pattern with LIKE metacharacters escaped
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::params::{RawSearchParams, SearchParams};

    fn parse(raw: RawSearchParams) -> SearchParams {
        SearchParams::from_raw(raw).unwrap()
    }

    #[test]
    fn test_empty_params_build_true_predicate() {
        let sql = build_search_sql(&parse(RawSearchParams::default()));
        assert_eq!(sql.where_clause, "TRUE");
        assert!(sql.params.is_empty());
        assert_eq!(sql.order_by, "p.current_value DESC NULLS LAST");
    }

    #[test]
    fn test_owner_search_builds_exists_subquery() {
        let sql = build_search_sql(&parse(RawSearchParams {
            owner_name: Some("Whitfield".to_string()),
            ..Default::default()
        }));

        assert!(sql.where_clause.contains("EXISTS"));
        assert!(sql.where_clause.contains("ILIKE $1"));
        assert_eq!(sql.params, vec![SqlParam::Text("%Whitfield%".to_string())]);
    }

    #[test]
    fn test_owner_search_suppresses_general_text_condition() {
        let sql = build_search_sql(&parse(RawSearchParams {
            owner_name: Some("Whitfield".to_string()),
            search: Some("lakefront".to_string()),
            ..Default::default()
        }));

        // Only the owner-name pattern is bound; "lakefront" never reaches SQL.
        assert_eq!(sql.params.len(), 1);
        assert!(!sql.where_clause.contains("p.property_type ILIKE"));
    }

    #[test]
    fn test_plural_types_bind_each_value() {
        let sql = build_search_sql(&parse(RawSearchParams {
            property_types: Some("Condo,Townhouse".to_string()),
            property_type: Some("Single Family".to_string()),
            ..Default::default()
        }));

        assert_eq!(
            sql.params,
            vec![
                SqlParam::Text("Condo".to_string()),
                SqlParam::Text("Townhouse".to_string()),
            ],
        );
        assert!(sql.where_clause.contains("p.property_type"));
    }

    #[test]
    fn test_open_ended_ranges_bind_single_bound() {
        let sql = build_search_sql(&parse(RawSearchParams {
            min_sqft: Some("1200".to_string()),
            max_price: Some("750000".to_string()),
            ..Default::default()
        }));

        assert!(sql.where_clause.contains("p.square_footage >= $1"));
        assert!(sql.where_clause.contains("p.current_value <= $2"));
        assert_eq!(sql.params, vec![SqlParam::Int(1200), SqlParam::Int(750_000)]);
    }

    #[test]
    fn test_relevance_ignores_requested_direction() {
        let sql = build_search_sql(&parse(RawSearchParams {
            sort_by: Some("relevance".to_string()),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        }));

        assert_eq!(sql.order_by, "p.current_value DESC NULLS LAST");
    }

    #[test]
    fn test_year_sort_honors_direction() {
        let sql = build_search_sql(&parse(RawSearchParams {
            sort_by: Some("year".to_string()),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        }));

        assert_eq!(sql.order_by, "p.year_built ASC NULLS LAST");
    }

    #[test]
    fn test_order_by_names_exactly_one_column() {
        for key in ["relevance", "price", "size", "year"] {
            let sql = build_search_sql(&parse(RawSearchParams {
                sort_by: Some(key.to_string()),
                ..Default::default()
            }));
            // No secondary tie-break: a single column, no comma.
            assert!(!sql.order_by.contains(','), "unexpected tie-break for {key}");
        }
    }

    #[test]
    fn test_like_metacharacters_are_escaped() {
        let sql = build_search_sql(&parse(RawSearchParams {
            address: Some("100%_Main".to_string()),
            ..Default::default()
        }));

        assert_eq!(
            sql.params,
            vec![SqlParam::Text("%100\\%\\_Main%".to_string())],
        );
    }

    #[test]
    fn test_has_owner_info_false_negates_exists() {
        let sql = build_search_sql(&parse(RawSearchParams {
            has_owner_info: Some("false".to_string()),
            ..Default::default()
        }));

        assert!(sql.where_clause.starts_with("NOT EXISTS"));
        assert!(sql.params.is_empty());
    }
}
