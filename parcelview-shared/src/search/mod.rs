/// Property search: parameter parsing and SQL predicate building
///
/// The search pipeline has two stages:
///
/// 1. `params`: a flat map of optional string query parameters is parsed
///    into a typed [`params::SearchParams`]. Malformed values are rejected
///    here; a bad number is a client error, never silently ignored.
/// 2. `builder`: the typed parameters become a SQL predicate plus an
///    ordering specification, with positional bind parameters, executed by
///    `models::property`.

pub mod builder;
pub mod params;

pub use builder::{build_search_sql, SearchSql, SqlParam};
pub use params::{SearchMode, SearchParamError, SearchParams, SortDirection, SortKey};
