use chrono::NaiveDate;
use rand::RngCore;

use super::helpers::{pick, weighted_pick};
use crate::id::UserId;
use crate::model::catalog::ATTRIBUTION_WEIGHTS;
use crate::model::{AttributionSource, Country, PERSONA_WEIGHTS, Persona, Platform, UserState};

/// Weighted draw over the persona mix.
pub fn assign_persona(rng: &mut dyn RngCore) -> Persona {
    weighted_pick(rng, &PERSONA_WEIGHTS)
}

/// Attribution channel credited for a brand-new install.
pub fn draw_attribution(rng: &mut dyn RngCore) -> AttributionSource {
    weighted_pick(rng, &ATTRIBUTION_WEIGHTS)
}

/// Create a player installing on `install_date` with an already-drawn id.
pub fn install_with_id(rng: &mut dyn RngCore, id: UserId, install_date: NaiveDate) -> UserState {
    let persona = assign_persona(rng);
    let country = pick(rng, Country::ALL);
    let platform = pick(rng, Platform::ALL);
    UserState::new(id, persona, country, platform, install_date)
}

/// Create a player installing on `install_date`.
pub fn new_install(rng: &mut dyn RngCore, install_date: NaiveDate) -> UserState {
    let id = UserId::random(rng);
    install_with_id(rng, id, install_date)
}
