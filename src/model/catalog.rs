//! Fixed game content: spin costs, spin outcomes, store products, and the
//! attribution channels new installs are credited to.

use serde::{Deserialize, Serialize};

/// Coin cost options for a single spin.
pub const SPIN_COSTS: [u32; 4] = [1, 3, 5, 10];

/// Free-spin rewards for a `free_spins` outcome.
pub const FREE_SPIN_REWARDS: [u64; 3] = [5, 10, 25];

/// Client builds in circulation; each event reports one at random.
pub const APP_VERSIONS: [&str; 4] = ["1.150.0", "1.150.1", "1.150.2", "1.151.0"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SpinOutcome {
    Coins,
    Attack,
    Raid,
    Shield,
    FreeSpins,
}

string_enum!(SpinOutcome {
    Coins => "coins",
    Attack => "attack",
    Raid => "raid",
    Shield => "shield",
    FreeSpins => "free_spins",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AttributionSource {
    Organic,
    PaidAdA,
    PaidAdB,
    FriendInvite,
}

string_enum!(AttributionSource {
    Organic => "organic",
    PaidAdA => "paid_ad_A",
    PaidAdB => "paid_ad_B",
    FriendInvite => "friend_invite",
});

/// Install attribution mix for brand-new players.
pub const ATTRIBUTION_WEIGHTS: [(AttributionSource, f64); 4] = [
    (AttributionSource::Organic, 0.4),
    (AttributionSource::PaidAdA, 0.25),
    (AttributionSource::PaidAdB, 0.25),
    (AttributionSource::FriendInvite, 0.1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum InviteMethod {
    Facebook,
    Whatsapp,
    Sms,
    ContactList,
}

string_enum!(InviteMethod {
    Facebook => "facebook",
    Whatsapp => "whatsapp",
    Sms => "sms",
    ContactList => "contact_list",
});

/// Where the store was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EntryPoint {
    OutOfSpinsPopup,
    OutOfCoinsPopup,
}

string_enum!(EntryPoint {
    OutOfSpinsPopup => "out_of_spins_popup",
    OutOfCoinsPopup => "out_of_coins_popup",
});

/// In-app purchase bundles. The string form is the store product id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Product {
    BundleSmall,
    BundleMedium,
    BundleLarge,
    BundleWhale,
}

string_enum!(Product {
    BundleSmall => "bundle_small_4.99",
    BundleMedium => "bundle_medium_9.99",
    BundleLarge => "bundle_large_19.99",
    BundleWhale => "bundle_whale_49.99",
});

/// Bundles offered to high spenders.
pub const HIGH_TIER_PRODUCTS: [Product; 3] = [
    Product::BundleMedium,
    Product::BundleLarge,
    Product::BundleWhale,
];

impl Product {
    pub fn price_cents(self) -> u32 {
        match self {
            Product::BundleSmall => 499,
            Product::BundleMedium => 999,
            Product::BundleLarge => 1999,
            Product::BundleWhale => 4999,
        }
    }

    pub fn price_usd(self) -> f64 {
        f64::from(self.price_cents()) / 100.0
    }
}
