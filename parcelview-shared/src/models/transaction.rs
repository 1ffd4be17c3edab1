/// Property transaction history model
///
/// Historical sale records referencing buyer and seller owners. Rows are
/// append-only: they come from deed imports and are never updated in place.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::owner::{Owner, OwnerKind};

/// Historical transaction on a property
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PropertyTransaction {
    /// Unique transaction ID
    pub id: Uuid,

    /// Property the transaction concerns
    pub property_id: Uuid,

    /// Buying party, when known
    pub buyer_id: Option<Uuid>,

    /// Selling party, when known
    pub seller_id: Option<Uuid>,

    /// Sale amount in whole dollars
    pub amount: Option<i64>,

    /// Date of the transaction
    pub transaction_date: Option<NaiveDate>,

    /// Recorded document type, e.g. "Grant Deed"
    pub document_type: Option<String>,

    /// When the row was imported
    pub created_at: DateTime<Utc>,
}

/// Transaction joined with buyer/seller name columns
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionWithParties {
    pub id: Uuid,
    pub amount: Option<i64>,
    pub transaction_date: Option<NaiveDate>,
    pub document_type: Option<String>,
    pub buyer_kind: Option<OwnerKind>,
    pub buyer_first_name: Option<String>,
    pub buyer_last_name: Option<String>,
    pub buyer_entity_name: Option<String>,
    pub seller_kind: Option<OwnerKind>,
    pub seller_first_name: Option<String>,
    pub seller_last_name: Option<String>,
    pub seller_entity_name: Option<String>,
}

impl TransactionWithParties {
    /// Buyer as an `Owner` view, when a buyer is recorded
    pub fn buyer(&self) -> Option<Owner> {
        self.buyer_kind.map(|kind| party_owner(
            kind,
            self.buyer_first_name.clone(),
            self.buyer_last_name.clone(),
            self.buyer_entity_name.clone(),
        ))
    }

    /// Seller as an `Owner` view, when a seller is recorded
    pub fn seller(&self) -> Option<Owner> {
        self.seller_kind.map(|kind| party_owner(
            kind,
            self.seller_first_name.clone(),
            self.seller_last_name.clone(),
            self.seller_entity_name.clone(),
        ))
    }
}

fn party_owner(
    kind: OwnerKind,
    first_name: Option<String>,
    last_name: Option<String>,
    entity_name: Option<String>,
) -> Owner {
    Owner {
        id: Uuid::nil(),
        kind,
        first_name,
        last_name,
        entity_name,
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

impl PropertyTransaction {
    /// Lists a property's transactions with party names, newest first
    pub async fn list_with_parties(
        pool: &PgPool,
        property_id: Uuid,
    ) -> Result<Vec<TransactionWithParties>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TransactionWithParties>(
            r#"
            SELECT
                t.id,
                t.amount,
                t.transaction_date,
                t.document_type,
                b.kind AS buyer_kind,
                b.first_name AS buyer_first_name,
                b.last_name AS buyer_last_name,
                b.entity_name AS buyer_entity_name,
                s.kind AS seller_kind,
                s.first_name AS seller_first_name,
                s.last_name AS seller_last_name,
                s.entity_name AS seller_entity_name
            FROM property_transactions t
            LEFT JOIN owners b ON b.id = t.buyer_id
            LEFT JOIN owners s ON s.id = t.seller_id
            WHERE t.property_id = $1
            ORDER BY t.transaction_date DESC NULLS LAST
            "#,
        )
        .bind(property_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
