/// Invitation lifecycle endpoints
///
/// Administrators invite teammates by email; the invitee follows a
/// single-use link to validate the token and complete signup. The stored
/// state machine is `pending → accepted`; expiry is derived from the
/// timestamp, and every consuming transition goes through the one atomic
/// conditional update in the invitation model.
///
/// # Endpoints
///
/// - `POST /v1/invitations` - Create invitation (admin)
/// - `GET  /v1/invitations/validate?token=` - Validate a token (public)
/// - `POST /v1/invitations/accept` - Accept an invitation (public)
/// - `POST /v1/invitations/complete` - Complete signup with password (public)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::auth::validation_details,
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use parcelview_shared::{
    auth::{
        authorization::require_company_admin,
        invite_token::{generate_invite_token, hash_invite_token, validate_token_format},
        middleware::AuthContext,
        password,
    },
    models::{
        activity_log::ActivityLog,
        company::Company,
        invitation::{CreateInvitation, Invitation, TokenValidation},
        user::{CreateUser, User, UserRole},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create invitation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    /// Email address to invite
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Create invitation response
#[derive(Debug, Serialize)]
pub struct CreateInvitationResponse {
    /// Outcome message
    pub message: String,

    /// Non-fatal warning, e.g. email delivery failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Token validation query
#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    /// Invitation token from the signup link
    pub token: Option<String>,
}

/// Token validation response
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    /// Invited email address
    pub email: String,

    /// When the invitation expires
    pub expires: DateTime<Utc>,
}

/// Accept invitation request
#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    /// Invitation token
    pub token: String,
}

/// Message-only response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Outcome message
    pub message: String,
}

/// Complete-signup request
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteSignupRequest {
    /// Invitation token
    pub token: String,

    /// Display name for the new account
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    /// Password for the new account
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Complete-signup response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSignupResponse {
    /// Outcome message
    pub message: String,

    /// ID of the created user
    pub user_id: String,
}

/// Creates an invitation (admin only)
///
/// Rejects when a user or invitation already exists for the email.
/// Generates a single-use token, stores its hash with a 7-day expiry, and
/// emails the signup link. Email delivery failure is reported as a warning
/// in the response, never as a silent success.
///
/// # Errors
///
/// - `401 Unauthorized`: No valid session
/// - `403 Forbidden`: Caller is not an admin with a company
/// - `409 Conflict`: Email already has an account or invitation
pub async fn create_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateInvitationRequest>,
) -> ApiResult<Json<CreateInvitationResponse>> {
    req.validate().map_err(validation_details)?;

    let (admin, company_id) = require_company_admin(&state.db, auth.user_id).await?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict(
            "A user with this email already exists".to_string(),
        ));
    }

    if Invitation::find_by_email(&state.db, &req.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "An invitation already exists for this email".to_string(),
        ));
    }

    let (token, token_hash) = generate_invite_token();

    let invitation = Invitation::create(
        &state.db,
        CreateInvitation {
            email: req.email.clone(),
            token_hash,
            invited_by: admin.id,
            company_id,
        },
    )
    .await?;

    if let Err(e) = ActivityLog::record(
        &state.db,
        admin.id,
        Some(company_id),
        "invitation.created",
        Some(&req.email),
    )
    .await
    {
        tracing::warn!("Failed to record invitation activity: {}", e);
    }

    // Email delivery is a side effect: its failure must not fail the
    // invitation, but it must be visible to the admin.
    let warning = match &state.email {
        None => {
            tracing::warn!(email = %req.email, "Email delivery not configured; invitation link not sent");
            Some("Email delivery is not configured; share the invitation link manually".to_string())
        }
        Some(client) => {
            let company_name = Company::find_by_id(&state.db, company_id)
                .await?
                .map(|c| c.name)
                .unwrap_or_else(|| "your team".to_string());

            match client.send_invitation(&req.email, &token, &company_name).await {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!(email = %req.email, "Invitation email failed: {}", e);
                    Some("Invitation created, but the email could not be delivered".to_string())
                }
            }
        }
    };

    tracing::info!(
        invitation_id = %invitation.id,
        email = %invitation.email,
        "Invitation created"
    );

    Ok(Json(CreateInvitationResponse {
        message: format!("Invitation sent to {}", invitation.email),
        warning,
    }))
}

/// Validates an invitation token (read-only)
///
/// # Errors
///
/// - `400 Bad Request`: Missing token, expired, or already used
/// - `404 Not Found`: No invitation carries this token
pub async fn validate_invitation(
    State(state): State<AppState>,
    Query(query): Query<ValidateQuery>,
) -> ApiResult<Json<ValidateResponse>> {
    let token = query
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing token parameter".to_string()))?;

    match lookup_token(&state, token).await? {
        TokenValidation::Valid { email, expires_at } => Ok(Json(ValidateResponse {
            email,
            expires: expires_at,
        })),
        other => Err(rejection_error(other)),
    }
}

/// Accepts a pending invitation
///
/// One conditional update flips `pending → accepted`; when it matches no
/// row, the token is re-validated only to pick the right error message.
///
/// # Errors
///
/// - `400 Bad Request`: Expired or already used
/// - `404 Not Found`: No invitation carries this token
pub async fn accept_invitation(
    State(state): State<AppState>,
    Json(req): Json<AcceptRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let token_hash = hash_invite_token(&req.token);

    match Invitation::accept_pending(&state.db, &token_hash).await? {
        Some(invitation) => {
            tracing::info!(invitation_id = %invitation.id, "Invitation accepted");
            Ok(Json(MessageResponse {
                message: "Invitation accepted".to_string(),
            }))
        }
        None => {
            let outcome = lookup_token(&state, &req.token).await?;
            Err(rejection_error(outcome))
        }
    }
}

/// Completes signup from an invitation
///
/// Creates the user with the invitation's company and default feature
/// flags (dashboard and saved properties on, team management off), and
/// accepts the invitation, both inside one transaction, so losing the
/// accept race leaves no half-created account.
///
/// # Errors
///
/// - `400 Bad Request`: Weak password, expired or used token
/// - `404 Not Found`: No invitation carries this token
/// - `409 Conflict`: A user with the invited email already exists
pub async fn complete_signup(
    State(state): State<AppState>,
    Json(req): Json<CompleteSignupRequest>,
) -> ApiResult<Json<CompleteSignupResponse>> {
    req.validate().map_err(validation_details)?;

    password::validate_password_strength(&req.password)
        .map_err(ApiError::BadRequest)?;

    let password_hash = password::hash_password(&req.password)?;
    let token_hash = hash_invite_token(&req.token);

    let mut tx = state.db.begin().await?;

    let invitation = match Invitation::accept_pending_in_tx(&mut tx, &token_hash).await? {
        Some(invitation) => invitation,
        None => {
            tx.rollback().await?;
            let outcome = lookup_token(&state, &req.token).await?;
            return Err(rejection_error(outcome));
        }
    };

    let user = User::create_in_tx(
        &mut tx,
        CreateUser {
            email: invitation.email.clone(),
            password_hash,
            name: req.name.clone(),
            role: UserRole::User,
            company_id: Some(invitation.company_id),
        },
    )
    .await?;

    tx.commit().await?;

    if let Err(e) = ActivityLog::record(
        &state.db,
        user.id,
        Some(invitation.company_id),
        "invitation.completed",
        Some(&invitation.email),
    )
    .await
    {
        tracing::warn!("Failed to record signup activity: {}", e);
    }

    tracing::info!(user_id = %user.id, "Signup completed from invitation");

    Ok(Json(CompleteSignupResponse {
        message: "Account created".to_string(),
        user_id: user.id.to_string(),
    }))
}

/// Hashes and validates a token, short-circuiting obviously malformed ones
async fn lookup_token(state: &AppState, token: &str) -> ApiResult<TokenValidation> {
    if !validate_token_format(token) {
        return Ok(TokenValidation::NotFound);
    }

    let token_hash = hash_invite_token(token);
    Ok(Invitation::validate_token(&state.db, &token_hash).await?)
}

/// Maps a non-valid token outcome to its error response
fn rejection_error(outcome: TokenValidation) -> ApiError {
    match outcome {
        TokenValidation::NotFound => ApiError::NotFound("Invitation not found".to_string()),
        TokenValidation::Expired => ApiError::BadRequest("Invitation has expired".to_string()),
        TokenValidation::AlreadyUsed => {
            ApiError::BadRequest("Invitation has already been used".to_string())
        }
        TokenValidation::Valid { .. } => {
            // Only reachable on a race where the token became valid again,
            // which the state machine forbids.
            ApiError::InternalError("Unexpected valid token in rejection path".to_string())
        }
    }
}
