/// Saved-property model
///
/// Users bookmark properties with optional free-text notes and a tag list.
/// Uniqueness per (user, property) is enforced by the compound unique index;
/// a duplicate save surfaces as a constraint violation that the api layer
/// maps to a 409.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::property::{PropertyWithLocation, LOCATION_COLUMNS, LOCATION_JOINS};

/// A property saved by a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SavedProperty {
    /// Unique row ID
    pub id: Uuid,

    /// Saving user
    pub user_id: Uuid,

    /// Saved property
    pub property_id: Uuid,

    /// Free-text notes
    pub notes: Option<String>,

    /// User-assigned tags
    pub tags: Vec<String>,

    /// When the save happened
    pub created_at: DateTime<Utc>,
}

/// Input for saving a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSavedProperty {
    /// Property to save
    pub property_id: Uuid,

    /// Optional notes
    pub notes: Option<String>,

    /// Optional tags
    pub tags: Vec<String>,
}

/// Saved row joined with its property and location, for list responses
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SavedWithProperty {
    pub saved_id: Uuid,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub saved_at: DateTime<Utc>,

    #[sqlx(flatten)]
    pub property: PropertyWithLocation,
}

impl SavedProperty {
    /// Saves a property for a user
    ///
    /// # Errors
    ///
    /// Returns an error when the (user, property) pair already exists
    /// (unique constraint violation) or the database call fails.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateSavedProperty,
    ) -> Result<Self, sqlx::Error> {
        let saved = sqlx::query_as::<_, SavedProperty>(
            r#"
            INSERT INTO saved_properties (user_id, property_id, notes, tags)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, property_id, notes, tags, created_at
            "#,
        )
        .bind(user_id)
        .bind(data.property_id)
        .bind(data.notes)
        .bind(data.tags)
        .fetch_one(pool)
        .await?;

        Ok(saved)
    }

    /// Removes a saved property
    ///
    /// # Returns
    ///
    /// True when a row was deleted; false when the pair was not saved.
    pub async fn delete(
        pool: &PgPool,
        user_id: Uuid,
        property_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM saved_properties WHERE user_id = $1 AND property_id = $2")
                .bind(user_id)
                .bind(property_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a user's saved properties with property details, newest first
    ///
    /// Supports an optional tag filter and page/limit pagination. Returns
    /// the page plus the total count under the same filter.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        tag: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<SavedWithProperty>, i64), sqlx::Error> {
        let tag_filter = if tag.is_some() { " AND $2 = ANY(sp.tags)" } else { "" };
        let (limit_ph, offset_ph) = if tag.is_some() { ("$3", "$4") } else { ("$2", "$3") };

        let select = format!(
            r#"
            SELECT
                sp.id AS saved_id,
                sp.notes,
                sp.tags,
                sp.created_at AS saved_at,
                {LOCATION_COLUMNS}
            FROM saved_properties sp
            JOIN properties p ON p.id = sp.property_id
            {LOCATION_JOINS}
            WHERE sp.user_id = $1{tag_filter}
            ORDER BY sp.created_at DESC
            LIMIT {limit_ph} OFFSET {offset_ph}
            "#,
        );

        let mut query = sqlx::query_as::<_, SavedWithProperty>(&select).bind(user_id);
        if let Some(tag) = tag {
            query = query.bind(tag);
        }
        let rows = query.bind(limit).bind(offset).fetch_all(pool).await?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM saved_properties sp WHERE sp.user_id = $1{tag_filter}",
        );
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql).bind(user_id);
        if let Some(tag) = tag {
            count_query = count_query.bind(tag);
        }
        let (total,) = count_query.fetch_one(pool).await?;

        Ok((rows, total))
    }

    /// Counts a user's saved properties
    pub async fn count_by_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM saved_properties WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_saved_property_struct() {
        let create = CreateSavedProperty {
            property_id: Uuid::new_v4(),
            notes: Some("Corner lot, call listing agent".to_string()),
            tags: vec!["follow-up".to_string(), "waterfront".to_string()],
        };

        assert_eq!(create.tags.len(), 2);
        assert!(create.notes.is_some());
    }
}
