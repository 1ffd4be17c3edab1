/// Property model and search execution
///
/// Properties are the central entity: structural and financial attributes
/// plus references into the geographic lookup tables. Search runs the
/// predicate produced by `crate::search` against a joined view that carries
/// location names and the primary owner for display shaping.
///
/// # Example
///
/// ```no_run
/// use parcelview_shared::models::property::Property;
/// use parcelview_shared::search::params::{RawSearchParams, SearchParams};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let params = SearchParams::from_raw(RawSearchParams {
///     city: Some("Austin".to_string()),
///     min_bedrooms: Some("3".to_string()),
///     ..Default::default()
/// })?;
///
/// let (results, total) = Property::search(&pool, &params, 100, 500, 0).await?;
/// println!("{} of {} matches", results.len(), total);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::owner::OwnerKind;
use crate::search::{build_search_sql, SearchParams, SqlParam};

/// Property record as persisted
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    /// Unique property ID
    pub id: Uuid,

    /// Street address
    pub address: String,

    /// State the property sits in
    pub state_id: Uuid,

    /// County, when known
    pub county_id: Option<Uuid>,

    /// City, when known
    pub city_id: Option<Uuid>,

    /// Latitude in decimal degrees
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees
    pub longitude: Option<f64>,

    /// Property type, e.g. "Single Family", "Condo"
    pub property_type: Option<String>,

    /// Year the structure was built
    pub year_built: Option<i32>,

    /// Living area in square feet
    pub square_footage: Option<i32>,

    /// Bedroom count
    pub bedrooms: Option<i32>,

    /// Bathroom count (half-baths allowed)
    pub bathrooms: Option<f64>,

    /// Estimated current value in whole dollars
    pub current_value: Option<i64>,

    /// Tax-assessed value in whole dollars
    pub assessed_value: Option<i64>,

    /// Annual tax amount in whole dollars
    pub tax_amount: Option<i64>,

    /// Price of the most recent sale
    pub last_sale_price: Option<i64>,

    /// Date of the most recent sale
    pub last_sale_date: Option<NaiveDate>,

    /// Source feed the record came from
    pub data_source: Option<String>,

    /// Source confidence score (0.0–1.0)
    pub confidence: Option<f64>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Property joined with location names and its primary owner
///
/// The primary owner is the active ownership stake with the highest
/// percentage; its name columns are carried so shaping never needs a
/// second query per row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PropertyWithLocation {
    pub id: Uuid,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub property_type: Option<String>,
    pub year_built: Option<i32>,
    pub square_footage: Option<i32>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<f64>,
    pub current_value: Option<i64>,
    pub assessed_value: Option<i64>,
    pub tax_amount: Option<i64>,
    pub last_sale_price: Option<i64>,
    pub last_sale_date: Option<NaiveDate>,
    pub data_source: Option<String>,
    pub confidence: Option<f64>,
    pub state_name: String,
    pub state_code: String,
    pub county_name: Option<String>,
    pub city_name: Option<String>,
    pub owner_kind: Option<OwnerKind>,
    pub owner_first_name: Option<String>,
    pub owner_last_name: Option<String>,
    pub owner_entity_name: Option<String>,
}

impl Default for PropertyWithLocation {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            address: String::new(),
            latitude: None,
            longitude: None,
            property_type: None,
            year_built: None,
            square_footage: None,
            bedrooms: None,
            bathrooms: None,
            current_value: None,
            assessed_value: None,
            tax_amount: None,
            last_sale_price: None,
            last_sale_date: None,
            data_source: None,
            confidence: None,
            state_name: String::new(),
            state_code: String::new(),
            county_name: None,
            city_name: None,
            owner_kind: None,
            owner_first_name: None,
            owner_last_name: None,
            owner_entity_name: None,
        }
    }
}

/// Select list matching [`PropertyWithLocation`], over aliases `p`, `st`,
/// `co`, `c`, and `own`. Shared with the saved-properties listing.
pub(crate) const LOCATION_COLUMNS: &str = r#"
        p.id,
        p.address,
        p.latitude,
        p.longitude,
        p.property_type,
        p.year_built,
        p.square_footage,
        p.bedrooms,
        p.bathrooms,
        p.current_value,
        p.assessed_value,
        p.tax_amount,
        p.last_sale_price,
        p.last_sale_date,
        p.data_source,
        p.confidence,
        st.name AS state_name,
        st.code AS state_code,
        co.name AS county_name,
        c.name AS city_name,
        own.kind AS owner_kind,
        own.first_name AS owner_first_name,
        own.last_name AS owner_last_name,
        own.entity_name AS owner_entity_name
"#;

/// Joins resolving the aliases used by [`LOCATION_COLUMNS`], to be appended
/// after a FROM clause that establishes `p` as properties
pub(crate) const LOCATION_JOINS: &str = r#"
    JOIN states st ON st.id = p.state_id
    LEFT JOIN counties co ON co.id = p.county_id
    LEFT JOIN cities c ON c.id = p.city_id
    LEFT JOIN LATERAL (
        SELECT o.kind, o.first_name, o.last_name, o.entity_name
        FROM property_ownerships po
        JOIN owners o ON o.id = po.owner_id
        WHERE po.property_id = p.id AND po.is_active
        ORDER BY po.ownership_percent DESC NULLS LAST
        LIMIT 1
    ) own ON TRUE
"#;

const COUNT_FROM: &str = r#"
    FROM properties p
    JOIN states st ON st.id = p.state_id
    LEFT JOIN counties co ON co.id = p.county_id
    LEFT JOIN cities c ON c.id = p.city_id
"#;

impl Property {
    /// Finds a property with location names and primary owner by ID
    pub async fn find_with_location(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<PropertyWithLocation>, sqlx::Error> {
        let property = sqlx::query_as::<_, PropertyWithLocation>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM properties p {LOCATION_JOINS} WHERE p.id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(property)
    }

    /// Runs a property search and returns matches plus the total count
    ///
    /// The limit comes from the request when present, capped at `max_limit`,
    /// falling back to `default_limit`; each endpoint configures its own
    /// pair rather than sharing one constant.
    pub async fn search(
        pool: &PgPool,
        params: &SearchParams,
        default_limit: i64,
        max_limit: i64,
        offset: i64,
    ) -> Result<(Vec<PropertyWithLocation>, i64), sqlx::Error> {
        let sql = build_search_sql(params);
        let limit = params.limit.unwrap_or(default_limit).clamp(1, max_limit);

        let select = format!(
            "SELECT {LOCATION_COLUMNS} FROM properties p {LOCATION_JOINS} \
             WHERE {} ORDER BY {} LIMIT ${} OFFSET ${}",
            sql.where_clause,
            sql.order_by,
            sql.params.len() + 1,
            sql.params.len() + 2,
        );

        let mut query = sqlx::query_as::<_, PropertyWithLocation>(&select);
        for param in &sql.params {
            query = match param {
                SqlParam::Text(s) => query.bind(s),
                SqlParam::Int(i) => query.bind(i),
                SqlParam::Float(f) => query.bind(f),
            };
        }
        let rows = query.bind(limit).bind(offset).fetch_all(pool).await?;

        let count_sql = format!("SELECT COUNT(*) {COUNT_FROM} WHERE {}", sql.where_clause);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        for param in &sql.params {
            count_query = match param {
                SqlParam::Text(s) => count_query.bind(s),
                SqlParam::Int(i) => count_query.bind(i),
                SqlParam::Float(f) => count_query.bind(f),
            };
        }
        let (total,) = count_query.fetch_one(pool).await?;

        Ok((rows, total))
    }

    /// Counts all properties
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM properties")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Sums the current value of all properties
    pub async fn total_value(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (total,): (Option<i64>,) =
            sqlx::query_as("SELECT SUM(current_value)::BIGINT FROM properties")
                .fetch_one(pool)
                .await?;

        Ok(total.unwrap_or(0))
    }

    /// Sums the current value of the properties a user has saved
    pub async fn total_value_saved_by(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (total,): (Option<i64>,) = sqlx::query_as(
            r#"
            SELECT SUM(p.current_value)::BIGINT
            FROM properties p
            JOIN saved_properties sp ON sp.property_id = p.id
            WHERE sp.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(total.unwrap_or(0))
    }
}
