use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::persona::Persona;
use crate::id::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Platform {
    Ios,
    Android,
}

string_enum!(Platform {
    Ios => "iOS",
    Android => "Android",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Country {
    Us,
    In,
    De,
    Gb,
    Fr,
    Il,
    Jp,
    Br,
}

string_enum!(Country {
    Us => "US",
    In => "IN",
    De => "DE",
    Gb => "GB",
    Fr => "FR",
    Il => "IL",
    Jp => "JP",
    Br => "BR",
});

/// Mutable record of one simulated player, carried across days and sessions.
///
/// Identity, persona, demographics, and install date are fixed at creation.
/// `village_level` and `sent_invites` only grow and are written by the session
/// simulator; `last_active` and `churned` belong to the drivers. Once
/// `churned` is set it stays set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub id: UserId,
    pub persona: Persona,
    pub country: Country,
    pub platform: Platform,
    pub install_date: NaiveDate,
    pub village_level: u32,
    pub last_active: NaiveDate,
    pub churned: bool,
    pub sent_invites: u32,
}

impl UserState {
    /// A fresh install: level 1, no invites, active on its install day.
    pub fn new(
        id: UserId,
        persona: Persona,
        country: Country,
        platform: Platform,
        install_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            persona,
            country,
            platform,
            install_date,
            village_level: 1,
            last_active: install_date,
            churned: false,
            sent_invites: 0,
        }
    }

    pub fn is_installed_by(&self, day: NaiveDate) -> bool {
        self.install_date <= day
    }

    /// Installed on or before `day` and not churned.
    pub fn is_live_on(&self, day: NaiveDate) -> bool {
        self.is_installed_by(day) && !self.churned
    }

    pub fn days_since_install(&self, day: NaiveDate) -> i64 {
        (day - self.install_date).num_days()
    }

    pub fn days_since_active(&self, day: NaiveDate) -> i64 {
        (day - self.last_active).num_days()
    }

    pub fn mark_active(&mut self, day: NaiveDate) {
        self.last_active = day;
    }

    pub fn mark_churned(&mut self) {
        self.churned = true;
    }

    /// Raise the village level by one. Levels never go down.
    pub fn level_up(&mut self) {
        self.village_level += 1;
    }

    pub fn record_invite(&mut self) {
        self.sent_invites += 1;
    }
}

/// A previously active player as reported by the warehouse, used to seed a
/// catch-up day. Fields the warehouse could not supply are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturningUser {
    pub user_id: UserId,
    /// Whole days between install and the reference date.
    pub age_days: i64,
    pub persona: Option<Persona>,
    pub village_level: Option<u32>,
    pub country: Option<Country>,
    pub platform: Option<Platform>,
}
