use chrono::{Duration, NaiveDate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::helpers::{chance, pick, time_of_day};
use super::persona::{draw_attribution, new_install};
use super::retention::should_churn;
use super::session::SessionSimulator;
use crate::config::GeneratorConfig;
use crate::id::UserId;
use crate::model::{AttributionSource, Event, UserState};

/// Events generated for one simulated calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBatch {
    pub date: NaiveDate,
    pub events: Vec<Event>,
}

/// Multi-day backfill over a fixed population.
///
/// The whole population is created up front with install dates spread over the
/// horizon. Iterating the driver yields one [`DayBatch`] per day from `start`
/// to `end` inclusive, so only a single day's events are held at a time. The
/// driver owns its RNG; a given seed and parameters always yield the same
/// sequence of batches.
pub struct CohortDriver {
    users: Vec<UserState>,
    sessions: SessionSimulator,
    rng: SmallRng,
    next_day: NaiveDate,
    end: NaiveDate,
}

impl CohortDriver {
    pub fn new(config: &GeneratorConfig, start: NaiveDate) -> Self {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let span = i64::from(config.days_back);
        let end = start + Duration::days(span);

        let users: Vec<UserState> = (0..config.total_users)
            .map(|_| {
                let offset = rng.random_range(0..=span);
                new_install(&mut rng, start + Duration::days(offset))
            })
            .collect();

        info!(
            users = users.len(),
            %start,
            %end,
            seed = config.seed,
            "cohort population created"
        );

        Self {
            users,
            sessions: SessionSimulator::new(config.max_events_per_session),
            rng,
            next_day: start,
            end,
        }
    }

    pub fn users(&self) -> &[UserState] {
        &self.users
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// The next day the iterator will simulate, or `None` once past the horizon.
    pub fn next_day(&self) -> Option<NaiveDate> {
        (self.next_day <= self.end).then_some(self.next_day)
    }

    fn simulate_day(&mut self, day: NaiveDate) -> Vec<Event> {
        let Self {
            users,
            sessions,
            rng,
            ..
        } = self;

        let targets: Vec<UserId> = users
            .iter()
            .filter(|u| u.is_live_on(day))
            .map(|u| u.id)
            .collect();
        let mut inviters: Vec<UserId> = users
            .iter()
            .filter(|u| u.is_live_on(day) && u.sent_invites > 0)
            .map(|u| u.id)
            .collect();
        if inviters.is_empty() {
            inviters.push(if users.is_empty() {
                UserId::SENTINEL
            } else {
                users[rng.random_range(0..users.len())].id
            });
        }

        let mut events = Vec::new();
        let mut installs = 0usize;
        let mut churned = 0usize;
        let mut players = 0usize;

        for user in users.iter_mut() {
            if user.install_date == day {
                let start = time_of_day(rng, day);
                let attribution = draw_attribution(rng);
                let inviter = if attribution == AttributionSource::FriendInvite {
                    Some(pick(rng, &inviters))
                } else {
                    None
                };
                events.extend(sessions.open_session(
                    rng,
                    user,
                    start,
                    attribution,
                    inviter,
                    &targets,
                ));
                user.mark_active(day);
                installs += 1;
                continue;
            }

            if !user.is_live_on(day) {
                continue;
            }

            if should_churn(
                rng,
                user.persona,
                user.days_since_install(day),
                user.days_since_active(day),
            ) {
                user.mark_churned();
                churned += 1;
                continue;
            }

            if !chance(rng, user.persona.daily_play_chance()) {
                continue;
            }
            let count = rng.random_range(user.persona.backfill_sessions());
            for _ in 0..count {
                let start = time_of_day(rng, day);
                events.extend(sessions.open_session(
                    rng,
                    user,
                    start,
                    AttributionSource::Organic,
                    None,
                    &targets,
                ));
            }
            user.mark_active(day);
            players += 1;
        }

        debug!(
            %day,
            installs,
            returning = players,
            churned,
            events = events.len(),
            "simulated backfill day"
        );
        events
    }
}

impl Iterator for CohortDriver {
    type Item = DayBatch;

    fn next(&mut self) -> Option<DayBatch> {
        let date = self.next_day()?;
        let events = self.simulate_day(date);
        self.next_day = date + Duration::days(1);
        Some(DayBatch { date, events })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;
    use crate::model::{EventKind, EventPayload, Persona};

    fn config(users: u32, days: u32, seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            seed,
            total_users: users,
            days_back: days,
            ..Default::default()
        }
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn yields_one_batch_per_day_inclusive() {
        let driver = CohortDriver::new(&config(20, 5, 1), start());
        let dates: Vec<NaiveDate> = driver.map(|b| b.date).collect();
        assert_eq!(dates.len(), 6);
        assert_eq!(dates[0], start());
        assert_eq!(dates[5], start() + Duration::days(5));
    }

    #[test]
    fn install_dates_fall_inside_horizon() {
        let driver = CohortDriver::new(&config(300, 10, 2), start());
        let end = driver.end();
        assert!(
            driver
                .users()
                .iter()
                .all(|u| u.install_date >= start() && u.install_date <= end)
        );
    }

    #[test]
    fn every_user_opens_on_install_day() {
        let mut driver = CohortDriver::new(&config(100, 7, 3), start());
        let installs: HashMap<UserId, NaiveDate> = driver
            .users()
            .iter()
            .map(|u| (u.id, u.install_date))
            .collect();

        let mut first_seen: HashMap<UserId, (NaiveDate, EventPayload)> = HashMap::new();
        for batch in driver.by_ref() {
            for event in batch.events {
                first_seen
                    .entry(event.user_id)
                    .or_insert((batch.date, event.payload));
            }
        }

        assert_eq!(first_seen.len(), installs.len());
        for (id, (date, payload)) in first_seen {
            assert_eq!(date, installs[&id]);
            assert!(matches!(payload, EventPayload::AppOpen { .. }));
        }
    }

    #[test]
    fn return_sessions_are_organic() {
        let driver = CohortDriver::new(&config(200, 10, 4), start());
        let installs: HashMap<UserId, NaiveDate> = driver
            .users()
            .iter()
            .map(|u| (u.id, u.install_date))
            .collect();
        for batch in driver {
            for event in batch.events {
                if let EventPayload::AppOpen {
                    attribution,
                    inviter,
                } = event.payload
                {
                    if installs[&event.user_id] != batch.date {
                        assert_eq!(attribution, AttributionSource::Organic);
                        assert_eq!(inviter, None);
                    } else if attribution != AttributionSource::FriendInvite {
                        assert_eq!(inviter, None);
                    } else {
                        assert!(inviter.is_some());
                    }
                }
            }
        }
    }

    #[test]
    fn churned_users_stay_silent() {
        let mut driver = CohortDriver::new(&config(400, 40, 5), start());
        let mut churned_on: HashMap<UserId, NaiveDate> = HashMap::new();
        let mut last_event: HashMap<UserId, NaiveDate> = HashMap::new();

        while let Some(day) = driver.next_day() {
            let before: Vec<bool> = driver.users().iter().map(|u| u.churned).collect();
            let batch = driver.next().unwrap();
            for event in &batch.events {
                last_event.insert(event.user_id, batch.date);
            }
            for (user, was) in driver.users().iter().zip(before) {
                assert!(!(was && !user.churned), "churn flag was cleared");
                if user.churned && !was {
                    churned_on.insert(user.id, day);
                }
            }
        }

        assert!(!churned_on.is_empty());
        for (id, day) in churned_on {
            assert!(last_event[&id] < day);
        }
    }

    #[test]
    fn only_non_payers_churn() {
        let mut driver = CohortDriver::new(&config(500, 45, 6), start());
        for _ in driver.by_ref() {}
        assert!(
            driver
                .users()
                .iter()
                .filter(|u| u.churned)
                .all(|u| !u.persona.is_payer())
        );
    }

    #[test]
    fn app_close_follows_every_app_open() {
        let driver = CohortDriver::new(&config(150, 6, 7), start());
        for batch in driver {
            let opens = batch
                .events
                .iter()
                .filter(|e| e.kind() == EventKind::AppOpen)
                .count();
            let closes = batch
                .events
                .iter()
                .filter(|e| e.kind() == EventKind::AppClose)
                .count();
            assert_eq!(opens, closes);
        }
    }

    #[test]
    fn payers_play_at_their_daily_rate() {
        let driver = CohortDriver::new(&config(20_000, 20, 9), start());
        let end = driver.end();
        let users: HashMap<UserId, (Persona, NaiveDate)> = driver
            .users()
            .iter()
            .map(|u| (u.id, (u.persona, u.install_date)))
            .collect();

        let mut played: HashMap<Persona, usize> = HashMap::new();
        for batch in driver {
            let mut seen = HashSet::new();
            for event in &batch.events {
                let (persona, installed) = users[&event.user_id];
                if event.kind() == EventKind::AppOpen
                    && installed < batch.date
                    && seen.insert(event.user_id)
                {
                    *played.entry(persona).or_default() += 1;
                }
            }
        }

        // Payers never churn, so every day after install is a play opportunity.
        let mut eligible: HashMap<Persona, usize> = HashMap::new();
        for (persona, installed) in users.values() {
            *eligible.entry(*persona).or_default() += (end - *installed).num_days() as usize;
        }

        let rate = |p: Persona| played[&p] as f64 / eligible[&p] as f64;
        let low = rate(Persona::LowSpender);
        assert!((0.66..0.74).contains(&low), "low spenders played {low}");
        let high = rate(Persona::HighSpender);
        assert!((0.86..0.94).contains(&high), "high spenders played {high}");
    }

    #[test]
    fn empty_population_produces_empty_days() {
        let driver = CohortDriver::new(&config(0, 3, 8), start());
        assert!(driver.into_iter().all(|b| b.events.is_empty()));
    }
}
