use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::event::{Event, EventPayload};
use crate::id::{SessionId, UserId};

/// Column names of the events table, in write order.
pub const EVENT_COLUMNS: [&str; 21] = [
    "event_timestamp",
    "user_pseudo_id",
    "session_id",
    "event_name",
    "platform",
    "app_version",
    "country",
    "current_village_level",
    "spin_cost",
    "spin_outcome_type",
    "spin_outcome_value",
    "item_cost",
    "entry_point",
    "product_id",
    "price_usd",
    "attack_target_id",
    "raid_target_id",
    "invite_method",
    "attribution_source",
    "inviter_user_id",
    "persona",
];

/// Fixed-shape warehouse record. Every column is always present; columns that
/// do not apply to the event kind are `None` and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub event_timestamp: NaiveDateTime,
    pub user_pseudo_id: UserId,
    pub session_id: SessionId,
    pub event_name: String,
    pub platform: String,
    pub app_version: String,
    pub country: String,
    pub current_village_level: u32,
    pub spin_cost: Option<u32>,
    pub spin_outcome_type: Option<String>,
    pub spin_outcome_value: Option<u64>,
    pub item_cost: Option<u64>,
    pub entry_point: Option<String>,
    pub product_id: Option<String>,
    pub price_usd: Option<f64>,
    pub attack_target_id: Option<UserId>,
    pub raid_target_id: Option<UserId>,
    pub invite_method: Option<String>,
    pub attribution_source: Option<String>,
    pub inviter_user_id: Option<UserId>,
    pub persona: String,
}

impl From<&Event> for EventRow {
    fn from(ev: &Event) -> Self {
        let mut row = EventRow {
            event_timestamp: ev.timestamp,
            user_pseudo_id: ev.user_id,
            session_id: ev.session_id,
            event_name: ev.kind().as_str().to_string(),
            platform: ev.platform.as_str().to_string(),
            app_version: ev.app_version.clone(),
            country: ev.country.as_str().to_string(),
            current_village_level: ev.village_level,
            spin_cost: None,
            spin_outcome_type: None,
            spin_outcome_value: None,
            item_cost: None,
            entry_point: None,
            product_id: None,
            price_usd: None,
            attack_target_id: None,
            raid_target_id: None,
            invite_method: None,
            attribution_source: None,
            inviter_user_id: None,
            persona: ev.persona.as_str().to_string(),
        };

        match &ev.payload {
            EventPayload::AppOpen {
                attribution,
                inviter,
            } => {
                row.attribution_source = Some(attribution.as_str().to_string());
                row.inviter_user_id = *inviter;
            }
            EventPayload::SpinAction { cost } => row.spin_cost = Some(*cost),
            EventPayload::SpinOutcomeReceived { outcome, value } => {
                row.spin_outcome_type = Some(outcome.as_str().to_string());
                row.spin_outcome_value = Some(*value);
            }
            EventPayload::AttackPerformed { target } => row.attack_target_id = Some(*target),
            EventPayload::RaidPerformed { target } => row.raid_target_id = Some(*target),
            EventPayload::VillageItemUpgraded { cost } => row.item_cost = Some(*cost),
            EventPayload::FriendInviteSent { method } => {
                row.invite_method = Some(method.as_str().to_string());
            }
            EventPayload::StoreOpened { entry_point } => {
                row.entry_point = Some(entry_point.as_str().to_string());
            }
            EventPayload::PurchaseCompleted { product } => {
                row.product_id = Some(product.as_str().to_string());
                row.price_usd = Some(product.price_usd());
            }
            EventPayload::LeaderboardViewed | EventPayload::AppClose => {}
        }

        row
    }
}

/// Flatten a batch of events into warehouse rows, preserving order.
pub fn to_rows(events: &[Event]) -> Vec<EventRow> {
    events.iter().map(EventRow::from).collect()
}
