mod clock;
mod cohort;
mod helpers;
mod incremental;
mod persona;
mod retention;
mod seed;
mod session;

pub use clock::SessionClock;
pub use cohort::{CohortDriver, DayBatch};
pub use helpers::{chance, pick, pick_target, time_of_day, weighted_pick};
pub use incremental::{IncrementalDriver, draw_install_variance, install_count, restore_user};
pub use persona::{assign_persona, draw_attribution, install_with_id, new_install};
pub use retention::{
    BASE_RETENTION_CURVE, LONG_TAIL_RETENTION, base_probability, return_probability, should_churn,
};
pub use seed::{make_rng, make_seed};
pub use session::{MAX_EVENTS_PER_SESSION, SessionSimulator};
