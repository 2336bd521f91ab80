use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDateTime};
use rand::{Rng, RngCore};

/// Simulated wall clock for a single session.
///
/// Every step advances by at least one second, so events stamped between steps
/// get strictly increasing timestamps.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    now: NaiveDateTime,
}

impl SessionClock {
    pub fn starting_at(start: NaiveDateTime) -> Self {
        Self { now: start }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Move forward by a uniform number of seconds from `seconds`.
    pub fn advance(&mut self, rng: &mut dyn RngCore, seconds: RangeInclusive<i64>) {
        debug_assert!(*seconds.start() >= 1, "clock steps must be positive");
        self.now += Duration::seconds(rng.random_range(seconds));
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn advance_stays_within_range() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(6);
        let mut clock = SessionClock::starting_at(start);
        let mut prev = clock.now();
        for _ in 0..1000 {
            clock.advance(&mut rng, 2..=5);
            let step = (clock.now() - prev).num_seconds();
            assert!((2..=5).contains(&step));
            prev = clock.now();
        }
        // Sessions may run past midnight.
        assert!(clock.now().date() > start.date());
    }
}
