/// Authorization helpers and permission checks
///
/// Parcelview's permission model has two layers:
///
/// 1. **Role**: `admin` unlocks team administration (invitations, member
///    permissions, activity logs).
/// 2. **Feature flags**: three independent booleans on the user row gate
///    the dashboard, saved properties, and team management.
///
/// Both checks read the users table at request time. Session claims are
/// identity only: a stale claim can never grant access that the store has
/// since revoked, because nothing here ever consults the claim.
///
/// # Example
///
/// ```no_run
/// use parcelview_shared::auth::authorization::{require_admin, require_feature};
/// use parcelview_shared::models::user::PermissionFlag;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// // Admin-only route:
/// let admin = require_admin(&pool, user_id).await?;
///
/// // Feature-gated route:
/// require_feature(&pool, user_id, PermissionFlag::SavedProperties).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{PermissionFlag, User};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The session's user no longer exists
    #[error("User account not found")]
    UserMissing,

    /// Route requires the admin role
    #[error("Administrator role required")]
    NotAdmin,

    /// Admin route requires a company to scope to
    #[error("User does not belong to a company")]
    NoCompany,

    /// The required feature flag is disabled for this user
    #[error("Access to {0:?} is disabled for this user")]
    FeatureDisabled(PermissionFlag),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Requires that the user exists and has the admin role
///
/// Loads the user fresh from the store and returns it so the handler can
/// use the role and company without a second query.
///
/// # Errors
///
/// - `UserMissing` when the user row is gone
/// - `NotAdmin` when the stored role is not admin
pub async fn require_admin(pool: &PgPool, user_id: Uuid) -> Result<User, AuthzError> {
    let user = User::find_by_id(pool, user_id)
        .await?
        .ok_or(AuthzError::UserMissing)?;

    if !user.is_admin() {
        return Err(AuthzError::NotAdmin);
    }

    Ok(user)
}

/// Requires an admin who belongs to a company, returning (admin, company_id)
///
/// Team endpoints are company-scoped; an admin without a company has
/// nothing to administer.
pub async fn require_company_admin(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<(User, Uuid), AuthzError> {
    let user = require_admin(pool, user_id).await?;
    let company_id = user.company_id.ok_or(AuthzError::NoCompany)?;

    Ok((user, company_id))
}

/// Requires that a feature flag is enabled for the user
///
/// The flag is read fresh from the store, never from a session claim,
/// so revocations take effect on the next request.
///
/// # Errors
///
/// - `UserMissing` when the user row is gone
/// - `FeatureDisabled` when the stored flag is false
pub async fn require_feature(
    pool: &PgPool,
    user_id: Uuid,
    flag: PermissionFlag,
) -> Result<(), AuthzError> {
    let enabled = User::feature_enabled(pool, user_id, flag)
        .await?
        .ok_or(AuthzError::UserMissing)?;

    if !enabled {
        return Err(AuthzError::FeatureDisabled(flag));
    }

    Ok(())
}
