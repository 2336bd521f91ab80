use chrono::NaiveDateTime;
use rand::{Rng, RngCore};

use super::clock::SessionClock;
use super::helpers::{chance, pick, pick_target};
use crate::id::{SessionId, UserId};
use crate::model::catalog::{APP_VERSIONS, FREE_SPIN_REWARDS, HIGH_TIER_PRODUCTS, SPIN_COSTS};
use crate::model::{
    AttributionSource, EntryPoint, Event, EventPayload, InviteMethod, Persona, Product,
    SpinOutcome, UserState,
};

/// Default cap on events emitted by the spin loop of one session.
pub const MAX_EVENTS_PER_SESSION: usize = 500;

const ITEM_UPGRADE_CHANCE: f64 = 0.1;
const LEADERBOARD_CHANCE: f64 = 0.3;
const INVITE_CHANCE: f64 = 0.1;

/// Accumulates one session's events, stamping each with a fresh app version.
struct SessionLog {
    session_id: SessionId,
    events: Vec<Event>,
}

impl SessionLog {
    fn push(
        &mut self,
        rng: &mut dyn RngCore,
        user: &UserState,
        at: NaiveDateTime,
        payload: EventPayload,
    ) {
        let version = pick(rng, &APP_VERSIONS);
        self.events
            .push(Event::for_user(user, self.session_id, at, version, payload));
    }
}

/// Generates the event timeline of a single session for one player.
#[derive(Debug, Clone)]
pub struct SessionSimulator {
    max_events: usize,
}

impl Default for SessionSimulator {
    fn default() -> Self {
        Self::new(MAX_EVENTS_PER_SESSION)
    }
}

impl SessionSimulator {
    pub fn new(max_events: usize) -> Self {
        Self { max_events }
    }

    pub fn max_events(&self) -> usize {
        self.max_events
    }

    /// Emit `app_open` for a new session and play it through to `app_close`.
    ///
    /// `inviter` is only meaningful for friend-invite installs.
    pub fn open_session(
        &self,
        rng: &mut dyn RngCore,
        user: &mut UserState,
        start: NaiveDateTime,
        attribution: AttributionSource,
        inviter: Option<UserId>,
        targets: &[UserId],
    ) -> Vec<Event> {
        let session_id = SessionId::random(rng);
        let mut log = SessionLog {
            session_id,
            events: Vec::new(),
        };
        log.push(
            rng,
            user,
            start,
            EventPayload::AppOpen {
                attribution,
                inviter,
            },
        );
        log.events
            .extend(self.simulate_session(rng, user, session_id, start, targets));
        log.events
    }

    /// Events following `app_open` for one session, ending with `app_close`.
    ///
    /// Mutates the player's village level and invite counter; last-active and
    /// churn are left to the caller.
    pub fn simulate_session(
        &self,
        rng: &mut dyn RngCore,
        user: &mut UserState,
        session_id: SessionId,
        start: NaiveDateTime,
        targets: &[UserId],
    ) -> Vec<Event> {
        let spins = rng.random_range(user.persona.spin_range());
        self.simulate_with_spins(rng, user, session_id, start, targets, spins)
    }

    /// Same as [`Self::simulate_session`] with an explicit spin count.
    ///
    /// The spin loop stops as soon as it has emitted `max_events` events, even
    /// mid-spin. The post-spin steps and `app_close` are never cut.
    pub fn simulate_with_spins(
        &self,
        rng: &mut dyn RngCore,
        user: &mut UserState,
        session_id: SessionId,
        start: NaiveDateTime,
        targets: &[UserId],
        spins: u32,
    ) -> Vec<Event> {
        let mut log = SessionLog {
            session_id,
            events: Vec::new(),
        };
        let mut clock = SessionClock::starting_at(start);
        clock.advance(rng, 5..=15);

        self.spin_phase(rng, user, &mut log, &mut clock, targets, spins);
        social_phase(rng, user, &mut log, &mut clock);
        store_phase(rng, user, &mut log, &mut clock);

        if chance(rng, user.persona.level_up_chance()) {
            user.level_up();
        }
        log.push(rng, user, clock.now(), EventPayload::AppClose);
        log.events
    }

    fn spin_phase(
        &self,
        rng: &mut dyn RngCore,
        user: &UserState,
        log: &mut SessionLog,
        clock: &mut SessionClock,
        targets: &[UserId],
        spins: u32,
    ) {
        let cap = self.max_events;

        for _ in 0..spins {
            if log.events.len() >= cap {
                break;
            }
            let cost = pick(rng, &SPIN_COSTS);
            log.push(rng, user, clock.now(), EventPayload::SpinAction { cost });
            clock.advance(rng, 2..=5);

            if log.events.len() >= cap {
                break;
            }
            let outcome = pick(rng, SpinOutcome::ALL);
            let value = match outcome {
                SpinOutcome::Coins => rng.random_range(1_000..=100_000) * u64::from(cost),
                SpinOutcome::FreeSpins => pick(rng, &FREE_SPIN_REWARDS),
                _ => 1,
            };
            log.push(
                rng,
                user,
                clock.now(),
                EventPayload::SpinOutcomeReceived { outcome, value },
            );
            clock.advance(rng, 1..=3);

            let combat = match outcome {
                SpinOutcome::Attack => Some(EventPayload::AttackPerformed {
                    target: pick_target(rng, targets),
                }),
                SpinOutcome::Raid => Some(EventPayload::RaidPerformed {
                    target: pick_target(rng, targets),
                }),
                _ => None,
            };
            if let Some(payload) = combat {
                if log.events.len() >= cap {
                    break;
                }
                log.push(rng, user, clock.now(), payload);
                clock.advance(rng, 10..=20);
            }

            if chance(rng, ITEM_UPGRADE_CHANCE) {
                if log.events.len() >= cap {
                    break;
                }
                let cost = rng.random_range(50_000..=500_000) * u64::from(user.village_level);
                log.push(
                    rng,
                    user,
                    clock.now(),
                    EventPayload::VillageItemUpgraded { cost },
                );
                clock.advance(rng, 10..=30);
            }
        }
    }
}

/// Leaderboard views and friend invites; payers only.
fn social_phase(
    rng: &mut dyn RngCore,
    user: &mut UserState,
    log: &mut SessionLog,
    clock: &mut SessionClock,
) {
    if !user.persona.is_payer() {
        return;
    }
    if chance(rng, LEADERBOARD_CHANCE) {
        log.push(rng, user, clock.now(), EventPayload::LeaderboardViewed);
        clock.advance(rng, 5..=15);
    }
    if chance(rng, INVITE_CHANCE) {
        let method = pick(rng, InviteMethod::ALL);
        log.push(
            rng,
            user,
            clock.now(),
            EventPayload::FriendInviteSent { method },
        );
        user.record_invite();
        clock.advance(rng, 10..=20);
    }
}

/// Store visit followed by a purchase, at persona-specific odds and price points.
fn store_phase(
    rng: &mut dyn RngCore,
    user: &UserState,
    log: &mut SessionLog,
    clock: &mut SessionClock,
) {
    let persona = user.persona;
    if !persona.is_payer() || !chance(rng, persona.purchase_chance()) {
        return;
    }

    let (entry_point, browse_secs) = match persona {
        Persona::HighSpender => (EntryPoint::OutOfCoinsPopup, 5..=20),
        _ => (EntryPoint::OutOfSpinsPopup, 10..=30),
    };
    log.push(
        rng,
        user,
        clock.now(),
        EventPayload::StoreOpened { entry_point },
    );
    clock.advance(rng, browse_secs);

    let product = match persona {
        Persona::HighSpender => pick(rng, &HIGH_TIER_PRODUCTS),
        _ => Product::BundleSmall,
    };
    log.push(
        rng,
        user,
        clock.now(),
        EventPayload::PurchaseCompleted { product },
    );
    clock.advance(rng, 5..=10);
}
