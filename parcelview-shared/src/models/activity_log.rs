/// Activity log model
///
/// Company-scoped audit trail behind the team dashboard: who invited whom,
/// whose permissions changed, who logged in. Append-only; failures to write
/// a log entry are reported to the caller but should never fail the request
/// that triggered them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Recorded activity entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityLog {
    /// Unique entry ID
    pub id: Uuid,

    /// Acting user
    pub user_id: Uuid,

    /// Company scope (None for accounts without a company)
    pub company_id: Option<Uuid>,

    /// Short machine-readable action, e.g. "invitation.created"
    pub action: String,

    /// Human-readable detail
    pub detail: Option<String>,

    /// When the action happened
    pub created_at: DateTime<Utc>,
}

/// Activity entry joined with the actor's name and email
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ActivityLogWithActor {
    pub id: Uuid,
    pub action: String,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub actor_email: String,
    pub actor_name: Option<String>,
}

impl ActivityLog {
    /// Records an activity entry
    pub async fn record(
        pool: &PgPool,
        user_id: Uuid,
        company_id: Option<Uuid>,
        action: &str,
        detail: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO activity_logs (user_id, company_id, action, detail) VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(company_id)
        .bind(action)
        .bind(detail)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Lists a company's recent activity with actor details, newest first
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityLogWithActor>, sqlx::Error> {
        let entries = sqlx::query_as::<_, ActivityLogWithActor>(
            r#"
            SELECT
                al.id,
                al.action,
                al.detail,
                al.created_at,
                u.email AS actor_email,
                u.name AS actor_name
            FROM activity_logs al
            JOIN users u ON u.id = al.user_id
            WHERE al.company_id = $1
            ORDER BY al.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(company_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }
}
