use std::fmt::{Display, Write as _};

use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::error::Result;
use crate::model::EventRow;
use crate::sink::EventSink;

/// Open a connection pool to the warehouse database.
pub async fn connect(url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new().max_connections(4).connect(url).await?;
    Ok(pool)
}

/// Writes partitions into the `events` table.
///
/// Each partition replace is a single transaction: the day's existing rows
/// are deleted, then the new rows are streamed in with COPY FROM STDIN (text
/// format). An empty batch only clears the day. A failure anywhere rolls
/// both steps back.
#[derive(Debug, Clone)]
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl EventSink for PostgresSink {
    async fn replace_partition(&mut self, date: NaiveDate, rows: &[EventRow]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM events WHERE partition_date = $1")
            .bind(date)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if !rows.is_empty() {
            let buf = encode_rows(date, rows);
            let mut copy = tx
                .copy_in_raw(include_str!("../../sql/copy_events.sql"))
                .await?;
            copy.send(buf.as_bytes()).await?;
            copy.finish().await?;
        }
        tx.commit().await?;

        info!(%date, deleted, inserted = rows.len(), "partition replaced");
        Ok(())
    }
}

/// Render rows as a COPY text payload, one tab-separated line per row with
/// the partition date as the last column.
fn encode_rows(date: NaiveDate, rows: &[EventRow]) -> String {
    let mut buf = String::new();
    for r in rows {
        let fields = [
            r.event_timestamp.to_string(),
            r.user_pseudo_id.to_string(),
            r.session_id.to_string(),
            escape(&r.event_name),
            escape(&r.platform),
            escape(&r.app_version),
            escape(&r.country),
            r.current_village_level.to_string(),
            opt(r.spin_cost),
            opt_str(r.spin_outcome_type.as_deref()),
            opt(r.spin_outcome_value),
            opt(r.item_cost),
            opt_str(r.entry_point.as_deref()),
            opt_str(r.product_id.as_deref()),
            r.price_usd.map_or_else(null, |p| format!("{p:.2}")),
            opt(r.attack_target_id),
            opt(r.raid_target_id),
            opt_str(r.invite_method.as_deref()),
            opt_str(r.attribution_source.as_deref()),
            opt(r.inviter_user_id),
            escape(&r.persona),
            date.to_string(),
        ];
        let _ = writeln!(buf, "{}", fields.join("\t"));
    }
    buf
}

/// Escape a string for Postgres COPY text format.
/// Backslash must be escaped first, then the special whitespace characters.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

fn null() -> String {
    "\\N".to_string()
}

fn opt<T: Display>(v: Option<T>) -> String {
    v.map_or_else(null, |v| v.to_string())
}

fn opt_str(v: Option<&str>) -> String {
    v.map_or_else(null, escape)
}
