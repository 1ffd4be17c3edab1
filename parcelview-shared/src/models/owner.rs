/// Owner model
///
/// Owners are either individuals (first/last name, occupation, employer) or
/// entities (LLCs, trusts, funds: a single entity name). The variant is a
/// proper tagged enum backed by a Postgres enum so that name resolution is
/// exhaustive instead of string-branching in every handler.
///
/// # Example
///
/// ```
/// use parcelview_shared::models::owner::{Owner, OwnerKind, NameFallback};
///
/// let owner = Owner::individual_for_test(Some("Dana"), Some("Whitfield"));
/// assert_eq!(owner.display_name(NameFallback::PrimaryOwner), "Dana Whitfield");
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Owner variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "owner_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    /// Natural person: first/last name, occupation, employer, industry
    Individual,

    /// Legal entity: single entity name, no employment fields
    Entity,
}

/// Fallback string used when an owner has no resolvable name
///
/// The dashboard uses different placeholder strings depending on where the
/// name appears, so the context is explicit at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFallback {
    /// Primary-owner context (property cards, markers): "Unknown Owner"
    PrimaryOwner,

    /// Transaction buyer/seller context: "Unknown"
    Counterparty,
}

impl NameFallback {
    fn as_str(&self) -> &'static str {
        match self {
            NameFallback::PrimaryOwner => "Unknown Owner",
            NameFallback::Counterparty => "Unknown",
        }
    }
}

/// Property owner (individual or entity)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Owner {
    /// Unique owner ID
    pub id: Uuid,

    /// Individual or entity
    pub kind: OwnerKind,

    /// First name (individuals)
    pub first_name: Option<String>,

    /// Last name (individuals)
    pub last_name: Option<String>,

    /// Entity name (entities)
    pub entity_name: Option<String>,

    /// Estimated net worth in whole dollars
    pub estimated_net_worth: Option<i64>,

    /// Occupation (individuals)
    pub occupation: Option<String>,

    /// Employer (individuals)
    pub employer: Option<String>,

    /// Industry (individuals)
    pub industry: Option<String>,

    /// Contact email
    pub email: Option<String>,

    /// Contact phone
    pub phone: Option<String>,

    /// When the owner record was created
    pub created_at: DateTime<Utc>,

    /// When the owner record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Owner {
    /// Resolves the display name for this owner
    ///
    /// Individuals concatenate first and last name, trimmed, tolerating a
    /// missing part; a fully nameless individual falls back per context.
    /// Entities use the entity name, falling back to "Unknown Entity".
    pub fn display_name(&self, fallback: NameFallback) -> String {
        match self.kind {
            OwnerKind::Individual => {
                let full = format!(
                    "{} {}",
                    self.first_name.as_deref().unwrap_or(""),
                    self.last_name.as_deref().unwrap_or(""),
                );
                let full = full.trim();
                if full.is_empty() {
                    fallback.as_str().to_string()
                } else {
                    full.to_string()
                }
            }
            OwnerKind::Entity => match self.entity_name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => "Unknown Entity".to_string(),
            },
        }
    }

    /// Counts all owners
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM owners")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Test-only constructor for an individual owner
    ///
    /// Kept in the library (not `#[cfg(test)]`) so doc examples and the api
    /// crate's shaping tests can build owners without a database.
    pub fn individual_for_test(first: Option<&str>, last: Option<&str>) -> Self {
        Self {
            id: Uuid::nil(),
            kind: OwnerKind::Individual,
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            entity_name: None,
            estimated_net_worth: None,
            occupation: None,
            employer: None,
            industry: None,
            email: None,
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Test-only constructor for an entity owner
    pub fn entity_for_test(name: Option<&str>) -> Self {
        Self {
            id: Uuid::nil(),
            kind: OwnerKind::Entity,
            first_name: None,
            last_name: None,
            entity_name: name.map(str::to_string),
            estimated_net_worth: None,
            occupation: None,
            employer: None,
            industry: None,
            email: None,
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_individual_full_name() {
        let owner = Owner::individual_for_test(Some("Dana"), Some("Whitfield"));
        assert_eq!(owner.display_name(NameFallback::PrimaryOwner), "Dana Whitfield");
    }

    #[test]
    fn test_individual_last_name_only_is_trimmed() {
        let owner = Owner::individual_for_test(None, Some("Smith"));
        assert_eq!(owner.display_name(NameFallback::PrimaryOwner), "Smith");
        assert_eq!(owner.display_name(NameFallback::Counterparty), "Smith");
    }

    #[test]
    fn test_nameless_individual_falls_back_by_context() {
        let owner = Owner::individual_for_test(None, None);
        assert_eq!(
            owner.display_name(NameFallback::PrimaryOwner),
            "Unknown Owner"
        );
        assert_eq!(owner.display_name(NameFallback::Counterparty), "Unknown");
    }

    #[test]
    fn test_entity_name() {
        let owner = Owner::entity_for_test(Some("Blue Harbor Holdings LLC"));
        assert_eq!(
            owner.display_name(NameFallback::PrimaryOwner),
            "Blue Harbor Holdings LLC"
        );
    }

    #[test]
    fn test_nameless_entity_is_unknown_entity_in_any_context() {
        let owner = Owner::entity_for_test(None);
        assert_eq!(
            owner.display_name(NameFallback::PrimaryOwner),
            "Unknown Entity"
        );
        assert_eq!(
            owner.display_name(NameFallback::Counterparty),
            "Unknown Entity"
        );

        let blank = Owner::entity_for_test(Some("   "));
        assert_eq!(blank.display_name(NameFallback::Counterparty), "Unknown Entity");
    }
}
