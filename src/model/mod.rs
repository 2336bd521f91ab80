#[macro_use]
mod macros;

pub mod catalog;
pub mod event;
pub mod persona;
pub mod row;
pub mod user;

pub use catalog::{AttributionSource, EntryPoint, InviteMethod, Product, SpinOutcome};
pub use event::{Event, EventKind, EventPayload};
pub use persona::{PERSONA_WEIGHTS, Persona};
pub use row::{EVENT_COLUMNS, EventRow, to_rows};
pub use user::{Country, Platform, ReturningUser, UserState};
