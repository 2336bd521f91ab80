use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::id::UserId;
use crate::model::{Country, Persona, Platform, ReturningUser};
use crate::sink::ReturningUserSource;

/// Reads recently active players back out of the `events` table.
///
/// Looks at the 30 days of partitions before the reference date and keeps
/// players who installed before it and were last seen fewer than 35 days
/// before it. Each player's latest persona, level, country, and platform are
/// taken from their most recent event.
#[derive(Debug, Clone)]
pub struct PostgresSource {
    pool: PgPool,
}

impl PostgresSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ReturningUserSource for PostgresSource {
    async fn fetch_returning_users(&self, date: NaiveDate) -> Result<Vec<ReturningUser>> {
        let rows = sqlx::query(include_str!("../../sql/returning_users.sql"))
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

        let users = rows
            .iter()
            .map(decode_row)
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?;
        info!(%date, users = users.len(), "fetched returning users");
        Ok(users)
    }
}

/// Unknown enum labels and out-of-range levels decode as missing.
fn decode_row(row: &PgRow) -> std::result::Result<ReturningUser, sqlx::Error> {
    let user_id: Uuid = row.try_get("user_pseudo_id")?;
    let age_days: i32 = row.try_get("age_days")?;
    let persona: Option<String> = row.try_get("persona")?;
    let village_level: Option<i32> = row.try_get("village_level")?;
    let country: Option<String> = row.try_get("country")?;
    let platform: Option<String> = row.try_get("platform")?;

    Ok(ReturningUser {
        user_id: UserId::from_uuid(user_id),
        age_days: i64::from(age_days),
        persona: persona.and_then(|s| Persona::try_from(s.as_str()).ok()),
        village_level: village_level.and_then(|l| u32::try_from(l).ok()),
        country: country.and_then(|s| Country::try_from(s.as_str()).ok()),
        platform: platform.and_then(|s| Platform::try_from(s.as_str()).ok()),
    })
}
