use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Monetization archetype, fixed for a player's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Persona {
    NonPayer,
    LowSpender,
    HighSpender,
}

string_enum!(Persona {
    NonPayer => "Non-Payer",
    LowSpender => "Low-Spender",
    HighSpender => "High-Spender",
});

/// Population mix every new player is drawn from.
pub const PERSONA_WEIGHTS: [(Persona, f64); 3] = [
    (Persona::NonPayer, 0.95),
    (Persona::LowSpender, 0.04),
    (Persona::HighSpender, 0.01),
];

impl Persona {
    pub fn is_payer(self) -> bool {
        self != Persona::NonPayer
    }

    /// Spins attempted in one session.
    pub fn spin_range(self) -> RangeInclusive<u32> {
        match self {
            Persona::NonPayer => 10..=40,
            Persona::LowSpender => 50..=100,
            Persona::HighSpender => 30..=70,
        }
    }

    /// Multiplier applied to the base retention curve.
    pub fn retention_multiplier(self) -> f64 {
        match self {
            Persona::NonPayer => 1.0,
            Persona::LowSpender => 1.2,
            Persona::HighSpender => 1.5,
        }
    }

    /// Chance that an installed, unchurned player plays on a given backfill day.
    pub fn daily_play_chance(self) -> f64 {
        match self {
            Persona::NonPayer => 0.25,
            Persona::LowSpender => 0.7,
            Persona::HighSpender => 0.9,
        }
    }

    /// Sessions played on a backfill day once the player decides to play.
    pub fn backfill_sessions(self) -> RangeInclusive<u32> {
        match self {
            Persona::NonPayer => 1..=1,
            Persona::LowSpender => 1..=3,
            Persona::HighSpender => 1..=5,
        }
    }

    /// Sessions played by a returning player on a single catch-up day.
    pub fn returning_sessions(self) -> RangeInclusive<u32> {
        match self {
            Persona::NonPayer => 1..=1,
            Persona::LowSpender => 1..=2,
            Persona::HighSpender => 1..=3,
        }
    }

    /// Chance a brand-new player comes back for more sessions on install day.
    pub fn install_day_replay_chance(self) -> f64 {
        match self {
            Persona::NonPayer => 0.0,
            Persona::LowSpender => 0.3,
            Persona::HighSpender => 0.5,
        }
    }

    /// Chance that a session ends with a store visit and purchase.
    pub fn purchase_chance(self) -> f64 {
        match self {
            Persona::NonPayer => 0.0,
            Persona::LowSpender => 0.05,
            Persona::HighSpender => 0.40,
        }
    }

    /// Chance that a session raises the village level by one.
    pub fn level_up_chance(self) -> f64 {
        match self {
            Persona::HighSpender => 0.1 + 0.3,
            _ => 0.1,
        }
    }
}
