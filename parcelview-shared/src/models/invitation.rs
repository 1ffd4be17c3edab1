/// Invitation model and state machine
///
/// Invitations are how administrators bring teammates into their company.
/// The lifecycle is `pending → accepted`; "expired" is a derived state
/// (`expires_at < now` while still pending), never stored.
///
/// The accept transition is a single conditional UPDATE: status and expiry
/// are checked and the row flipped in one statement, so two concurrent
/// accept attempts cannot both succeed. Both the plain accept endpoint and
/// invitation-completing signup go through [`Invitation::accept_pending`].
///
/// Tokens are random single-use secrets; only their SHA-256 hash is stored,
/// the same way API-style secrets are usually kept at rest.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// How long an invitation stays valid after creation
pub const INVITATION_TTL_DAYS: i64 = 7;

/// Stored invitation status
///
/// Expiry is derived from `expires_at`, so only the two persisted states
/// appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Created, not yet consumed
    Pending,

    /// Consumed exactly once
    Accepted,
}

/// Invitation to join a company
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invitation {
    /// Unique invitation ID
    pub id: Uuid,

    /// Invited email address, unique among invitations
    pub email: String,

    /// SHA-256 hex digest of the single-use token
    pub token_hash: String,

    /// Stored status
    pub status: InvitationStatus,

    /// When the invitation stops being acceptable
    pub expires_at: DateTime<Utc>,

    /// Admin who created the invitation
    pub invited_by: Uuid,

    /// Company the invitee will join
    pub company_id: Uuid,

    /// When the invitation was created
    pub created_at: DateTime<Utc>,

    /// When the invitation was accepted (None while pending)
    pub accepted_at: Option<DateTime<Utc>>,
}

/// Input for creating an invitation
#[derive(Debug, Clone)]
pub struct CreateInvitation {
    /// Invited email address
    pub email: String,

    /// SHA-256 hex digest of the generated token
    pub token_hash: String,

    /// Admin creating the invitation
    pub invited_by: Uuid,

    /// Company the invitee will join
    pub company_id: Uuid,
}

/// Outcome of validating an invitation token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValidation {
    /// Pending and unexpired
    Valid {
        email: String,
        expires_at: DateTime<Utc>,
    },

    /// No invitation carries this token
    NotFound,

    /// Still pending but past its expiry
    Expired,

    /// Already consumed
    AlreadyUsed,
}

const INVITATION_COLUMNS: &str = "id, email, token_hash, status, expires_at, invited_by, \
     company_id, created_at, accepted_at";

impl Invitation {
    /// Creates a pending invitation expiring [`INVITATION_TTL_DAYS`] from now
    ///
    /// # Errors
    ///
    /// Returns an error when an invitation already exists for the email
    /// (unique constraint violation) or the database call fails.
    pub async fn create(pool: &PgPool, data: CreateInvitation) -> Result<Self, sqlx::Error> {
        let expires_at = Utc::now() + Duration::days(INVITATION_TTL_DAYS);

        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            r#"
            INSERT INTO invitations (email, token_hash, expires_at, invited_by, company_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {INVITATION_COLUMNS}
            "#,
        ))
        .bind(data.email)
        .bind(data.token_hash)
        .bind(expires_at)
        .bind(data.invited_by)
        .bind(data.company_id)
        .fetch_one(pool)
        .await?;

        Ok(invitation)
    }

    /// Finds an invitation by its token hash
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE token_hash = $1",
        ))
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }

    /// Finds an invitation by invited email, case-insensitive
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE LOWER(email) = LOWER($1)",
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }

    /// Validates a token without consuming it
    ///
    /// Read-only classification: the authoritative state change only ever
    /// happens in [`Self::accept_pending`].
    pub async fn validate_token(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<TokenValidation, sqlx::Error> {
        let invitation = Self::find_by_token_hash(pool, token_hash).await?;

        Ok(match invitation {
            None => TokenValidation::NotFound,
            Some(inv) => inv.classify(Utc::now()),
        })
    }

    /// Classifies this invitation's state at a point in time
    pub fn classify(&self, now: DateTime<Utc>) -> TokenValidation {
        match self.status {
            InvitationStatus::Accepted => TokenValidation::AlreadyUsed,
            InvitationStatus::Pending if self.expires_at < now => TokenValidation::Expired,
            InvitationStatus::Pending => TokenValidation::Valid {
                email: self.email.clone(),
                expires_at: self.expires_at,
            },
        }
    }

    /// Counts a company's pending, unexpired invitations
    pub async fn count_pending_by_company(
        pool: &PgPool,
        company_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM invitations \
             WHERE company_id = $1 AND status = 'pending' AND expires_at > NOW()",
        )
        .bind(company_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Atomically transitions a pending, unexpired invitation to accepted
    ///
    /// One conditional UPDATE checks status and expiry and flips the row,
    /// so concurrent accept attempts race safely: exactly one wins.
    ///
    /// # Returns
    ///
    /// The accepted invitation, or None when the token was absent, already
    /// used, or expired; call [`Self::validate_token`] afterwards to
    /// report which.
    pub async fn accept_pending(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            r#"
            UPDATE invitations
            SET status = 'accepted', accepted_at = NOW()
            WHERE token_hash = $1 AND status = 'pending' AND expires_at > NOW()
            RETURNING {INVITATION_COLUMNS}
            "#,
        ))
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }

    /// Same transition as [`Self::accept_pending`], inside an open transaction
    ///
    /// Invitation-completing signup creates the user and accepts the
    /// invitation in one transaction; losing the accept race rolls the user
    /// insert back.
    pub async fn accept_pending_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            r#"
            UPDATE invitations
            SET status = 'accepted', accepted_at = NOW()
            WHERE token_hash = $1 AND status = 'pending' AND expires_at > NOW()
            RETURNING {INVITATION_COLUMNS}
            "#,
        ))
        .bind(token_hash)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(invitation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(status: InvitationStatus, expires_at: DateTime<Utc>) -> Invitation {
        Invitation {
            id: Uuid::nil(),
            email: "new@x.com".to_string(),
            token_hash: "deadbeef".to_string(),
            status,
            expires_at,
            invited_by: Uuid::nil(),
            company_id: Uuid::nil(),
            created_at: Utc::now(),
            accepted_at: None,
        }
    }

    #[test]
    fn test_pending_unexpired_is_valid() {
        let now = Utc::now();
        let inv = invitation(InvitationStatus::Pending, now + Duration::days(3));

        assert_eq!(
            inv.classify(now),
            TokenValidation::Valid {
                email: "new@x.com".to_string(),
                expires_at: now + Duration::days(3),
            },
        );
    }

    #[test]
    fn test_pending_past_expiry_is_expired() {
        let now = Utc::now();
        let inv = invitation(InvitationStatus::Pending, now - Duration::hours(1));

        assert_eq!(inv.classify(now), TokenValidation::Expired);
    }

    #[test]
    fn test_accepted_is_already_used_even_when_expired() {
        let now = Utc::now();
        let inv = invitation(InvitationStatus::Accepted, now - Duration::days(1));

        // "Already used" takes precedence over expiry in reporting.
        assert_eq!(inv.classify(now), TokenValidation::AlreadyUsed);
    }
}
