use sqlx::PgPool;

use crate::error::Result;

/// Execute the schema DDL (CREATE TABLE / CREATE INDEX IF NOT EXISTS).
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::raw_sql(include_str!("../../sql/schema.sql"))
        .execute(pool)
        .await?;
    Ok(())
}
