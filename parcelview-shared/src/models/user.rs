/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing user
/// accounts. Users optionally belong to a Company and carry a role plus three
/// independent feature flags that gate parts of the dashboard.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     name VARCHAR(255),
///     role user_role NOT NULL DEFAULT 'user',
///     company_id UUID REFERENCES companies(id),
///     can_access_dashboard BOOLEAN NOT NULL DEFAULT TRUE,
///     can_access_saved_properties BOOLEAN NOT NULL DEFAULT TRUE,
///     can_access_team_management BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use parcelview_shared::models::user::{User, CreateUser, UserRole};
/// use parcelview_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     name: Some("Jordan Reyes".to_string()),
///     role: UserRole::User,
///     company_id: None,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular user: browse, search, save properties
    User,

    /// Administrator: invites teammates, manages permissions, views activity
    Admin,
}

impl UserRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

/// Per-user feature flags gating parts of the application
///
/// Each flag is an independent boolean column on the users table. The
/// authoritative value is always the stored column, never a session claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionFlag {
    /// Access to the main dashboard and property search
    Dashboard,

    /// Access to saved-property lists
    SavedProperties,

    /// Access to team administration (admin feature)
    TeamManagement,
}

impl PermissionFlag {
    /// Database column backing this flag
    pub fn column(&self) -> &'static str {
        match self {
            PermissionFlag::Dashboard => "can_access_dashboard",
            PermissionFlag::SavedProperties => "can_access_saved_properties",
            PermissionFlag::TeamManagement => "can_access_team_management",
        }
    }

    /// Parses a client-supplied permission name
    ///
    /// Accepts both the short form ("dashboard") and the flag-column form
    /// ("canAccessDashboard") used by older clients.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "dashboard" | "canAccessDashboard" => Some(PermissionFlag::Dashboard),
            "savedProperties" | "canAccessSavedProperties" => Some(PermissionFlag::SavedProperties),
            "teamManagement" | "canAccessTeamManagement" => Some(PermissionFlag::TeamManagement),
            _ => None,
        }
    }
}

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,

    /// Account role
    pub role: UserRole,

    /// Company the user belongs to, if any
    pub company_id: Option<Uuid>,

    /// Dashboard feature flag
    pub can_access_dashboard: bool,

    /// Saved-properties feature flag
    pub can_access_saved_properties: bool,

    /// Team-management feature flag
    pub can_access_team_management: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,

    /// Account role
    pub role: UserRole,

    /// Company to attach the user to
    pub company_id: Option<Uuid>,
}

/// Feature-flag updates applied by team administrators
///
/// All fields are optional; only non-None flags are updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermissions {
    /// New dashboard flag value
    pub can_access_dashboard: Option<bool>,

    /// New saved-properties flag value
    pub can_access_saved_properties: Option<bool>,

    /// New team-management flag value
    pub can_access_team_management: Option<bool>,
}

impl UpdatePermissions {
    /// True when no flag is being changed
    pub fn is_empty(&self) -> bool {
        self.can_access_dashboard.is_none()
            && self.can_access_saved_properties.is_none()
            && self.can_access_team_management.is_none()
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, name, role, company_id, \
     can_access_dashboard, can_access_saved_properties, can_access_team_management, \
     created_at, updated_at, last_login_at";

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, name, role, company_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.role)
        .bind(data.company_id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Creates a user inside an open transaction
    ///
    /// Used by invitation completion, where the user insert and the
    /// invitation accept must commit or roll back together.
    pub async fn create_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        data: CreateUser,
    ) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, name, role, company_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.role)
        .bind(data.company_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Email comparison is case-insensitive.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)",
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users in a company, newest first
    pub async fn list_by_company(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE company_id = $1 ORDER BY created_at DESC",
        ))
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Counts users in a company
    pub async fn count_by_company(pool: &PgPool, company_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE company_id = $1")
                .bind(company_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Updates the last login timestamp for a user
    ///
    /// Called after successful authentication.
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates a user's feature flags, scoped to a company
    ///
    /// Only non-None flags are written. The company scope prevents an admin
    /// from one company from touching another company's users.
    ///
    /// # Returns
    ///
    /// The updated user, or None when the user does not exist in the company.
    pub async fn update_permissions(
        pool: &PgPool,
        id: Uuid,
        company_id: Uuid,
        data: UpdatePermissions,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which flags are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.can_access_dashboard.is_some() {
            bind_count += 1;
            query.push_str(&format!(", can_access_dashboard = ${}", bind_count));
        }
        if data.can_access_saved_properties.is_some() {
            bind_count += 1;
            query.push_str(&format!(", can_access_saved_properties = ${}", bind_count));
        }
        if data.can_access_team_management.is_some() {
            bind_count += 1;
            query.push_str(&format!(", can_access_team_management = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 AND company_id = $2 RETURNING {USER_COLUMNS}",
        ));

        let mut q = sqlx::query_as::<_, User>(&query).bind(id).bind(company_id);

        if let Some(dashboard) = data.can_access_dashboard {
            q = q.bind(dashboard);
        }
        if let Some(saved) = data.can_access_saved_properties {
            q = q.bind(saved);
        }
        if let Some(team) = data.can_access_team_management {
            q = q.bind(team);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Reads a single feature flag fresh from the store
    ///
    /// This is the authoritative permission check: session claims may be
    /// stale, the stored column is not.
    ///
    /// # Returns
    ///
    /// The flag value, or None when the user does not exist.
    pub async fn feature_enabled(
        pool: &PgPool,
        id: Uuid,
        flag: PermissionFlag,
    ) -> Result<Option<bool>, sqlx::Error> {
        let enabled: Option<bool> = sqlx::query_scalar(&format!(
            "SELECT {} FROM users WHERE id = $1",
            flag.column()
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(enabled)
    }

    /// True when this user is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Reads the stored value of a flag from an already-loaded user
    pub fn flag(&self, flag: PermissionFlag) -> bool {
        match flag {
            PermissionFlag::Dashboard => self.can_access_dashboard,
            PermissionFlag::SavedProperties => self.can_access_saved_properties,
            PermissionFlag::TeamManagement => self.can_access_team_management,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(UserRole::User.as_str(), "user");
        assert_eq!(UserRole::Admin.as_str(), "admin");
    }

    #[test]
    fn test_permission_flag_columns() {
        assert_eq!(PermissionFlag::Dashboard.column(), "can_access_dashboard");
        assert_eq!(
            PermissionFlag::SavedProperties.column(),
            "can_access_saved_properties"
        );
        assert_eq!(
            PermissionFlag::TeamManagement.column(),
            "can_access_team_management"
        );
    }

    #[test]
    fn test_permission_flag_parse() {
        assert_eq!(
            PermissionFlag::parse("dashboard"),
            Some(PermissionFlag::Dashboard)
        );
        assert_eq!(
            PermissionFlag::parse("canAccessTeamManagement"),
            Some(PermissionFlag::TeamManagement)
        );
        assert_eq!(
            PermissionFlag::parse("savedProperties"),
            Some(PermissionFlag::SavedProperties)
        );
        assert_eq!(PermissionFlag::parse("billing"), None);
    }

    #[test]
    fn test_update_permissions_is_empty() {
        assert!(UpdatePermissions::default().is_empty());

        let update = UpdatePermissions {
            can_access_team_management: Some(true),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
