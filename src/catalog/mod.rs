//! Static card and noble catalog.
//!
//! The catalog is immutable and shared by every game in the process. Games
//! only ever store ids; everything else about a card or noble is looked up
//! here.

mod cards;
mod color;
mod nobles;

pub use color::Color;

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::Gems;

/// Number of card tiers.
pub const TIERS: usize = 3;

/// Number of face-up slots per tier.
pub const SLOTS_PER_TIER: usize = 4;

/// A development card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: &'static str,
    tier: usize,
    color: Color,
    points: u32,
    cost: Gems,
}

impl Card {
    /// Catalog id, e.g. `"1_4_0"`.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Tier the card is dealt from (1-3).
    pub fn tier(&self) -> usize {
        self.tier
    }

    /// Colour of the permanent discount this card grants.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Prestige points.
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Coin cost before discounts.
    pub fn cost(&self) -> &Gems {
        &self.cost
    }
}

/// A noble tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Noble {
    id: &'static str,
    points: u32,
    cost: Gems,
}

impl Noble {
    /// Every noble is worth the same.
    pub const POINTS: u32 = 3;

    /// Catalog id, e.g. `"henry_viii"`.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Prestige points.
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Owned-card counts required to attract this noble.
    pub fn cost(&self) -> &Gems {
        &self.cost
    }
}

static CARDS_BY_ID: LazyLock<HashMap<&'static str, &'static Card>> = LazyLock::new(|| {
    cards::TIER_1
        .iter()
        .chain(cards::TIER_2.iter())
        .chain(cards::TIER_3.iter())
        .map(|card| (card.id, card))
        .collect()
});

static NOBLES_BY_ID: LazyLock<HashMap<&'static str, &'static Noble>> =
    LazyLock::new(|| nobles::NOBLES.iter().map(|noble| (noble.id, noble)).collect());

/// Looks up a card by id.
pub fn card(id: &str) -> Option<&'static Card> {
    CARDS_BY_ID.get(id).copied()
}

/// Looks up a noble by id.
pub fn noble(id: &str) -> Option<&'static Noble> {
    NOBLES_BY_ID.get(id).copied()
}

/// All cards of one tier, in catalog order. Empty for a tier outside 1-3.
pub fn tier(tier: usize) -> &'static [Card] {
    match tier {
        1 => &cards::TIER_1,
        2 => &cards::TIER_2,
        3 => &cards::TIER_3,
        _ => &[],
    }
}

/// Every card in the catalog.
pub fn all_cards() -> impl Iterator<Item = &'static Card> {
    (1..=TIERS).flat_map(tier)
}

/// Every noble in the catalog.
pub fn all_nobles() -> &'static [Noble] {
    &nobles::NOBLES
}

/// Card ids of one tier, sorted so that shuffles are reproducible.
pub fn sorted_tier_ids(tier_number: usize) -> Vec<&'static str> {
    let mut ids: Vec<_> = tier(tier_number).iter().map(Card::id).collect();
    ids.sort_unstable();
    ids
}

/// Noble ids, sorted so that picks are reproducible.
pub fn sorted_noble_ids() -> Vec<&'static str> {
    let mut ids: Vec<_> = nobles::NOBLES.iter().map(Noble::id).collect();
    ids.sort_unstable();
    ids
}
