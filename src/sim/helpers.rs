use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::{Rng, RngCore};

use crate::id::UserId;

/// Bernoulli draw. Probabilities outside `[0, 1]` are clamped.
pub fn chance(rng: &mut dyn RngCore, p: f64) -> bool {
    rng.random_bool(p.clamp(0.0, 1.0))
}

/// Uniform pick from a fixed, non-empty table.
pub fn pick<T: Copy>(rng: &mut dyn RngCore, items: &[T]) -> T {
    items[rng.random_range(0..items.len())]
}

/// Categorical draw from a `(value, weight)` table whose weights sum to 1.
///
/// Rounding slack at the top end falls to the last entry.
pub fn weighted_pick<T: Copy>(rng: &mut dyn RngCore, table: &[(T, f64)]) -> T {
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    for &(value, weight) in table {
        cumulative += weight;
        if roll < cumulative {
            return value;
        }
    }
    table[table.len() - 1].0
}

/// Pick an attack/raid target, falling back to the sentinel on an empty pool.
pub fn pick_target(rng: &mut dyn RngCore, pool: &[UserId]) -> UserId {
    if pool.is_empty() {
        UserId::SENTINEL
    } else {
        pick(rng, pool)
    }
}

/// A random minute of `date` (hour 0–23, minute 0–59).
pub fn time_of_day(rng: &mut dyn RngCore, date: NaiveDate) -> NaiveDateTime {
    let hours = rng.random_range(0..=23);
    let minutes = rng.random_range(0..=59);
    date.and_time(NaiveTime::MIN) + Duration::hours(hours) + Duration::minutes(minutes)
}
