/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Session endpoints (login, refresh)
/// - `invitations`: Invitation lifecycle
/// - `properties`: Property search and detail
/// - `saved`: Saved-property management
/// - `team`: Team administration (admin, company-scoped)
/// - `user`: Permission checks
/// - `dashboard`: Aggregate statistics

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod invitations;
pub mod properties;
pub mod saved;
pub mod team;
pub mod user;
