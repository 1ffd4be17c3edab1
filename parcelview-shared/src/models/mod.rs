/// Database models for Parcelview
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts, roles, and feature flags
/// - `company`: Companies (the tenancy boundary)
/// - `invitation`: Single-use invitations with the pending→accepted machine
/// - `region`: State/county/city geographic lookups
/// - `property`: Property records and search execution
/// - `owner`: Individual/entity owners with name resolution
/// - `ownership`: Property↔Owner stakes
/// - `transaction`: Historical sale records
/// - `saved_property`: Per-user bookmarks with notes and tags
/// - `activity_log`: Company-scoped audit trail

pub mod activity_log;
pub mod company;
pub mod invitation;
pub mod owner;
pub mod ownership;
pub mod property;
pub mod region;
pub mod saved_property;
pub mod transaction;
pub mod user;
