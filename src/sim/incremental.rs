use chrono::{Duration, NaiveDate, TimeDelta};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use tracing::{debug, warn};

use super::cohort::DayBatch;
use super::helpers::{chance, pick, time_of_day};
use super::persona::{draw_attribution, install_with_id};
use super::retention::return_probability;
use super::session::SessionSimulator;
use crate::config::GeneratorConfig;
use crate::id::UserId;
use crate::model::{
    AttributionSource, Country, Event, Persona, Platform, ReturningUser, UserState,
};

/// Draw the day's deviation from the base install volume: 80% of days run
/// 10–20 above base, the rest 8–15 below.
pub fn draw_install_variance(rng: &mut dyn RngCore) -> i64 {
    if chance(rng, 0.8) {
        rng.random_range(10..=20)
    } else {
        rng.random_range(-15..=-8)
    }
}

/// New installs for a day: `base + variance`, never below `floor`.
pub fn install_count(base: u32, variance: i64, floor: u32) -> u32 {
    let count = (i64::from(base) + variance).max(i64::from(floor));
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Rebuild session state for a returning player, filling gaps the warehouse
/// left: Non-Payer persona, level 1, random country and platform.
///
/// Returns `None` when `age_days` is negative or does not map to a
/// representable install date.
pub fn restore_user(
    rng: &mut dyn RngCore,
    record: &ReturningUser,
    date: NaiveDate,
) -> Option<UserState> {
    if record.age_days < 0 {
        return None;
    }
    let install_date = TimeDelta::try_days(record.age_days)
        .and_then(|age| date.checked_sub_signed(age))?;
    let country = record.country.unwrap_or_else(|| pick(rng, Country::ALL));
    let platform = record.platform.unwrap_or_else(|| pick(rng, Platform::ALL));
    let mut user = UserState::new(
        record.user_id,
        record.persona.unwrap_or(Persona::NonPayer),
        country,
        platform,
        install_date,
    );
    user.village_level = record.village_level.unwrap_or(1).max(1);
    user.mark_active(date);
    Some(user)
}

/// Generates a single day from a list of previously active players plus a
/// fresh batch of installs.
#[derive(Debug, Clone)]
pub struct IncrementalDriver {
    sessions: SessionSimulator,
    base_installs: u32,
    min_installs: u32,
    inviter_sample: usize,
}

impl IncrementalDriver {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            sessions: SessionSimulator::new(config.max_events_per_session),
            base_installs: config.base_installs_per_day,
            min_installs: config.min_daily_installs,
            inviter_sample: config.inviter_sample_size,
        }
    }

    pub fn simulate_day(
        &self,
        rng: &mut dyn RngCore,
        date: NaiveDate,
        returning: &[ReturningUser],
    ) -> DayBatch {
        let returning_ids: Vec<UserId> = returning.iter().map(|r| r.user_id).collect();

        let mut inviters: Vec<UserId> = returning_ids
            .choose_multiple(rng, self.inviter_sample)
            .copied()
            .collect();
        if inviters.is_empty() {
            inviters.push(UserId::SENTINEL);
        }

        let new_count = install_count(
            self.base_installs,
            draw_install_variance(rng),
            self.min_installs,
        );
        let new_ids: Vec<UserId> = (0..new_count).map(|_| UserId::random(rng)).collect();

        // Both cohorts can be attacked, including players installing today.
        let mut targets = returning_ids;
        targets.extend_from_slice(&new_ids);

        let mut events = self.simulate_returning(rng, date, returning, &targets);
        let returning_events = events.len();
        events.extend(self.simulate_installs(rng, date, &new_ids, &inviters, &targets));

        debug!(
            %date,
            returning = returning.len(),
            returning_events,
            installs = new_count,
            events = events.len(),
            "simulated catch-up day"
        );
        DayBatch { date, events }
    }

    fn simulate_returning(
        &self,
        rng: &mut dyn RngCore,
        date: NaiveDate,
        returning: &[ReturningUser],
        targets: &[UserId],
    ) -> Vec<Event> {
        let mut events = Vec::new();
        for record in returning {
            let Some(mut user) = restore_user(rng, record, date) else {
                warn!(
                    %date,
                    user = %record.user_id,
                    age_days = record.age_days,
                    "returning user has an implausible age, skipped"
                );
                continue;
            };
            if !chance(rng, return_probability(record.age_days, user.persona)) {
                continue;
            }
            let count = rng.random_range(user.persona.returning_sessions());
            for _ in 0..count {
                let start = time_of_day(rng, date);
                events.extend(self.sessions.open_session(
                    rng,
                    &mut user,
                    start,
                    AttributionSource::Organic,
                    None,
                    targets,
                ));
            }
        }
        events
    }

    fn simulate_installs(
        &self,
        rng: &mut dyn RngCore,
        date: NaiveDate,
        new_ids: &[UserId],
        inviters: &[UserId],
        targets: &[UserId],
    ) -> Vec<Event> {
        let mut events = Vec::new();
        for &id in new_ids {
            let mut user = install_with_id(rng, id, date);
            let installed_at = time_of_day(rng, date);
            let attribution = draw_attribution(rng);
            let inviter = if attribution == AttributionSource::FriendInvite {
                Some(pick(rng, inviters))
            } else {
                None
            };
            events.extend(self.sessions.open_session(
                rng,
                &mut user,
                installed_at,
                attribution,
                inviter,
                targets,
            ));

            if !chance(rng, user.persona.install_day_replay_chance()) {
                continue;
            }
            let extra = rng.random_range(1..=2);
            for _ in 0..extra {
                let start = installed_at + Duration::minutes(rng.random_range(30..=180));
                events.extend(self.sessions.open_session(
                    rng,
                    &mut user,
                    start,
                    AttributionSource::Organic,
                    None,
                    targets,
                ));
            }
        }
        events
    }
}
