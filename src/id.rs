use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

/// Draw a version-4 UUID from the simulation's random stream.
///
/// Ids must come from the seeded source rather than OS entropy so that a fixed
/// seed reproduces the same ids.
fn random_uuid(rng: &mut dyn RngCore) -> Uuid {
    Builder::from_random_bytes(rng.random()).into_uuid()
}

/// Stable identity of a simulated player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Stand-in target when no real user is available (empty attack/raid or
    /// inviter pool).
    pub const SENTINEL: UserId = UserId(Uuid::nil());

    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self(random_uuid(rng))
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of one session; shared by every event between `app_open` and `app_close`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self(random_uuid(rng))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
