/// Property ownership join model
///
/// Links properties to owners with a stake percentage and type. A property
/// may have several concurrent active owners; this layer does not enforce
/// that percentages sum to 100.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::owner::{Owner, OwnerKind};

/// Ownership stake of an Owner in a Property
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PropertyOwnership {
    /// Unique ownership ID
    pub id: Uuid,

    /// Property being owned
    pub property_id: Uuid,

    /// Owning party
    pub owner_id: Uuid,

    /// Stake percentage (0–100), not validated to sum across owners
    pub ownership_percent: Option<f64>,

    /// Free-form stake type, e.g. "sole", "joint", "trust"
    pub ownership_type: Option<String>,

    /// Whether the stake is currently active
    pub is_active: bool,

    /// When the stake began
    pub start_date: Option<NaiveDate>,

    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// Ownership row joined with its owner, for property detail responses
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnershipWithOwner {
    pub ownership_id: Uuid,
    pub ownership_percent: Option<f64>,
    pub ownership_type: Option<String>,
    pub is_active: bool,
    pub start_date: Option<NaiveDate>,
    pub owner_id: Uuid,
    pub kind: OwnerKind,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub entity_name: Option<String>,
    pub estimated_net_worth: Option<i64>,
    pub occupation: Option<String>,
    pub employer: Option<String>,
    pub industry: Option<String>,
}

impl OwnershipWithOwner {
    /// Rebuilds an `Owner` view over the joined columns for name resolution
    pub fn owner(&self) -> Owner {
        Owner {
            id: self.owner_id,
            kind: self.kind,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            entity_name: self.entity_name.clone(),
            estimated_net_worth: self.estimated_net_worth,
            occupation: self.occupation.clone(),
            employer: self.employer.clone(),
            industry: self.industry.clone(),
            email: None,
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl PropertyOwnership {
    /// Lists active ownership stakes for a property with owner details,
    /// highest percent first
    pub async fn list_with_owners(
        pool: &PgPool,
        property_id: Uuid,
    ) -> Result<Vec<OwnershipWithOwner>, sqlx::Error> {
        let rows = sqlx::query_as::<_, OwnershipWithOwner>(
            r#"
            SELECT
                po.id AS ownership_id,
                po.ownership_percent,
                po.ownership_type,
                po.is_active,
                po.start_date,
                o.id AS owner_id,
                o.kind,
                o.first_name,
                o.last_name,
                o.entity_name,
                o.estimated_net_worth,
                o.occupation,
                o.employer,
                o.industry
            FROM property_ownerships po
            JOIN owners o ON o.id = po.owner_id
            WHERE po.property_id = $1 AND po.is_active
            ORDER BY po.ownership_percent DESC NULLS LAST
            "#,
        )
        .bind(property_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Counts properties having at least one active ownership stake
    pub async fn count_properties_with_owners(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(DISTINCT property_id) FROM property_ownerships WHERE is_active",
        )
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
