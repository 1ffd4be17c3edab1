/// Geographic lookup models: states, counties, and cities
///
/// Properties reference these rows; searches resolve state/city names through
/// them. They are reference data, loaded by an out-of-band import, so only
/// read operations are provided here.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// US state
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct State {
    /// Unique state ID
    pub id: Uuid,

    /// Full state name, e.g. "California"
    pub name: String,

    /// Two-letter postal code, e.g. "CA"
    pub code: String,
}

/// County within a state
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct County {
    pub id: Uuid,
    pub state_id: Uuid,
    pub name: String,
}

/// City within a state, optionally tied to a county
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    pub id: Uuid,
    pub state_id: Uuid,
    pub county_id: Option<Uuid>,
    pub name: String,
}

impl State {
    /// Finds a state by name or two-letter code, case-insensitive
    pub async fn find_by_name_or_code(
        pool: &PgPool,
        value: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let state = sqlx::query_as::<_, State>(
            "SELECT id, name, code FROM states WHERE LOWER(name) = LOWER($1) OR LOWER(code) = LOWER($1)",
        )
        .bind(value)
        .fetch_optional(pool)
        .await?;

        Ok(state)
    }

    /// Lists all states, alphabetical
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let states = sqlx::query_as::<_, State>("SELECT id, name, code FROM states ORDER BY name")
            .fetch_all(pool)
            .await?;

        Ok(states)
    }
}

impl City {
    /// Lists a state's cities, alphabetical
    pub async fn list_by_state(pool: &PgPool, state_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let cities = sqlx::query_as::<_, City>(
            "SELECT id, state_id, county_id, name FROM cities WHERE state_id = $1 ORDER BY name",
        )
        .bind(state_id)
        .fetch_all(pool)
        .await?;

        Ok(cities)
    }
}
