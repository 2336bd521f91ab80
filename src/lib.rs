pub mod config;
pub mod db;
pub mod error;
pub mod flush;
pub mod id;
pub mod model;
pub mod run;
pub mod sim;
pub mod sink;

pub use config::GeneratorConfig;
pub use error::{Error, Result};
pub use id::{SessionId, UserId};
pub use model::{Event, EventKind, EventPayload, EventRow, Persona, ReturningUser, UserState};
pub use run::{RunOutcome, RunSummary, run_backfill, run_daily};
pub use sim::{CohortDriver, DayBatch, IncrementalDriver, SessionSimulator};
pub use sink::{EventSink, ReturningUserSource};
