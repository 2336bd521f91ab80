use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::id::UserId;
use crate::model::{Event, EventKind, Persona, to_rows};
use crate::sim::{CohortDriver, IncrementalDriver, make_rng};
use crate::sink::{EventSink, ReturningUserSource, fetch_or_empty};

/// Result of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Written { partitions: usize, events: usize },
    /// The run produced no events. Every day it covered was still replaced,
    /// leaving those partitions empty.
    NoEvents,
}

impl RunOutcome {
    pub fn events(&self) -> usize {
        match self {
            RunOutcome::Written { events, .. } => *events,
            RunOutcome::NoEvents => 0,
        }
    }
}

/// Event totals for a run, by kind and by persona.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub events: usize,
    pub by_kind: BTreeMap<EventKind, usize>,
    pub by_persona: BTreeMap<Persona, usize>,
    users: HashSet<UserId>,
}

impl RunSummary {
    pub fn record(&mut self, events: &[Event]) {
        self.events += events.len();
        for event in events {
            *self.by_kind.entry(event.kind()).or_default() += 1;
            *self.by_persona.entry(event.persona).or_default() += 1;
            self.users.insert(event.user_id);
        }
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Distinct players that emitted at least one event.
    pub fn active_users(&self) -> usize {
        self.users.len()
    }

    pub fn log(&self, run: &str) {
        info!(
            run,
            events = self.events,
            active_users = self.users.len(),
            by_kind = ?self.by_kind,
            by_persona = ?self.by_persona,
            "run summary"
        );
    }
}

/// Simulate the full backfill horizon starting at `start`, replacing one
/// partition per day. Days without events are written empty so rows from an
/// earlier run over the same range do not survive.
pub async fn run_backfill<S: EventSink>(
    config: &GeneratorConfig,
    start: NaiveDate,
    sink: &mut S,
) -> Result<RunOutcome> {
    config.validate()?;
    let driver = CohortDriver::new(config, start);
    info!(%start, end = %driver.end(), "starting backfill");

    let mut summary = RunSummary::default();
    let mut partitions = 0;
    for batch in driver {
        if batch.events.is_empty() {
            debug!(date = %batch.date, "no events, clearing partition");
        }
        sink.replace_partition(batch.date, &to_rows(&batch.events)).await?;
        summary.record(&batch.events);
        partitions += 1;
    }

    summary.log("backfill");
    Ok(outcome(partitions, summary.events))
}

/// Simulate a single catch-up day from the players `source` reports.
///
/// A failing source degrades to an empty returning list; sink failures are
/// returned unchanged.
pub async fn run_daily<R: ReturningUserSource, S: EventSink>(
    config: &GeneratorConfig,
    date: NaiveDate,
    source: &R,
    sink: &mut S,
) -> Result<RunOutcome> {
    config.validate()?;
    let returning = fetch_or_empty(source, date).await;
    info!(%date, returning = returning.len(), "starting daily run");

    let mut rng = make_rng(config.seed, date, "daily");
    let batch = IncrementalDriver::new(config).simulate_day(&mut rng, date, &returning);
    if batch.events.is_empty() {
        info!(%date, "no events generated, clearing partition");
    }

    sink.replace_partition(date, &to_rows(&batch.events)).await?;
    let mut summary = RunSummary::default();
    summary.record(&batch.events);
    summary.log("daily");
    Ok(outcome(1, summary.events))
}

fn outcome(partitions: usize, events: usize) -> RunOutcome {
    if events == 0 {
        RunOutcome::NoEvents
    } else {
        RunOutcome::Written { partitions, events }
    }
}
