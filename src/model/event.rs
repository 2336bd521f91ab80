use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::catalog::{AttributionSource, EntryPoint, InviteMethod, Product, SpinOutcome};
use super::persona::Persona;
use super::user::{Country, Platform, UserState};
use crate::id::{SessionId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventKind {
    AppOpen,
    SpinAction,
    SpinOutcomeReceived,
    AttackPerformed,
    RaidPerformed,
    VillageItemUpgraded,
    LeaderboardViewed,
    FriendInviteSent,
    StoreOpened,
    PurchaseCompleted,
    AppClose,
}

string_enum!(EventKind {
    AppOpen => "app_open",
    SpinAction => "spin_action",
    SpinOutcomeReceived => "spin_outcome_received",
    AttackPerformed => "attack_performed",
    RaidPerformed => "raid_performed",
    VillageItemUpgraded => "village_item_upgraded",
    LeaderboardViewed => "leaderboard_viewed",
    FriendInviteSent => "friend_invite_sent",
    StoreOpened => "store_opened",
    PurchaseCompleted => "purchase_completed",
    AppClose => "app_close",
});

/// Kind-specific data carried by an event. Only the fields relevant to the
/// kind exist; flattening to the warehouse shape happens in [`super::EventRow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_name", rename_all = "snake_case")]
pub enum EventPayload {
    AppOpen {
        attribution: AttributionSource,
        inviter: Option<UserId>,
    },
    SpinAction {
        cost: u32,
    },
    SpinOutcomeReceived {
        outcome: SpinOutcome,
        value: u64,
    },
    AttackPerformed {
        target: UserId,
    },
    RaidPerformed {
        target: UserId,
    },
    VillageItemUpgraded {
        cost: u64,
    },
    LeaderboardViewed,
    FriendInviteSent {
        method: InviteMethod,
    },
    StoreOpened {
        entry_point: EntryPoint,
    },
    PurchaseCompleted {
        product: Product,
    },
    AppClose,
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::AppOpen { .. } => EventKind::AppOpen,
            EventPayload::SpinAction { .. } => EventKind::SpinAction,
            EventPayload::SpinOutcomeReceived { .. } => EventKind::SpinOutcomeReceived,
            EventPayload::AttackPerformed { .. } => EventKind::AttackPerformed,
            EventPayload::RaidPerformed { .. } => EventKind::RaidPerformed,
            EventPayload::VillageItemUpgraded { .. } => EventKind::VillageItemUpgraded,
            EventPayload::LeaderboardViewed => EventKind::LeaderboardViewed,
            EventPayload::FriendInviteSent { .. } => EventKind::FriendInviteSent,
            EventPayload::StoreOpened { .. } => EventKind::StoreOpened,
            EventPayload::PurchaseCompleted { .. } => EventKind::PurchaseCompleted,
            EventPayload::AppClose => EventKind::AppClose,
        }
    }
}

/// One telemetry point. Created once, in session order, and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: NaiveDateTime,
    pub user_id: UserId,
    pub session_id: SessionId,
    pub platform: Platform,
    pub app_version: String,
    pub country: Country,
    /// Village level at the moment of emission.
    pub village_level: u32,
    pub persona: Persona,
    pub payload: EventPayload,
}

impl Event {
    /// Stamp `payload` with the user's current header fields.
    pub fn for_user(
        user: &UserState,
        session_id: SessionId,
        timestamp: NaiveDateTime,
        app_version: &str,
        payload: EventPayload,
    ) -> Self {
        Self {
            timestamp,
            user_id: user.id,
            session_id,
            platform: user.platform,
            app_version: app_version.to_string(),
            country: user.country,
            village_level: user.village_level,
            persona: user.persona,
            payload,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}
