//! Game aggregate types shared by the engine and the stores.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::catalog::{SLOTS_PER_TIER, TIERS};
use crate::Gems;

/// Unique identifier for a game.
pub type GameId = String;

/// Verified user identity, supplied by the caller.
pub type UserId = String;

/// Catalog id of a card.
pub type CardId = String;

/// Catalog id of a noble.
pub type NobleId = String;

/// Optimistic-concurrency token; starts at 0 and grows by one per move.
pub type Version = i64;

/// Face-up cards of one tier; `None` marks a slot left empty by an exhausted deck.
pub type TableRow = [Option<CardId>; SLOTS_PER_TIER];

/// Lifecycle state of a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameState {
    /// Normal play; all four move kinds are accepted.
    Playing,
    /// The current player qualified for a noble and must choose one before
    /// play continues. No move resolves this state yet.
    PickingNoble,
    /// Someone reached the winning score. Terminal.
    Over,
}

/// The per-game header the turn sequencer works from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameBasics {
    /// Current version.
    pub version: Version,
    /// Current lifecycle state.
    pub state: GameState,
    /// Player expected to act next.
    pub current: UserId,
}

/// Cards a player holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hand {
    /// Bought cards; they grant discounts and score.
    pub owned: Vec<CardId>,
    /// Reserved cards, oldest first.
    pub reserved: Vec<CardId>,
}

/// One player's holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seat {
    /// The player.
    pub user: UserId,
    /// Coins held.
    pub purse: Gems,
    /// Nobles won.
    pub nobles: Vec<NobleId>,
    /// Cards bought or reserved.
    pub hand: Hand,
}

impl Seat {
    /// An empty seat for a new game.
    pub fn empty(user: impl Into<UserId>) -> Self {
        Self {
            user: user.into(),
            purse: Gems::EMPTY,
            nobles: Vec::new(),
            hand: Hand::default(),
        }
    }
}

/// The complete persisted state of one game.
///
/// This is what [`GameStore::create_game`](crate::GameStore::create_game)
/// inserts and what [`GameSnapshot::load`] reads back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// Game id.
    pub id: GameId,
    /// Version, state and current player.
    pub basics: GameBasics,
    /// Players in turn order.
    pub seats: Vec<Seat>,
    /// Bank balance.
    pub bank: Gems,
    /// Nobles on offer.
    pub nobles: Vec<NobleId>,
    /// Face-up cards, tier one first.
    pub table: [TableRow; TIERS],
    /// Undealt cards per tier, next to deal first.
    pub decks: [Vec<CardId>; TIERS],
}

impl GameSnapshot {
    /// Player ids in turn order.
    pub fn players(&self) -> Vec<UserId> {
        self.seats.iter().map(|seat| seat.user.clone()).collect()
    }

    /// The seat of one player.
    pub fn seat(&self, user: &str) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.user == user)
    }

    /// Mutable access to the seat of one player.
    pub fn seat_mut(&mut self, user: &str) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|seat| seat.user == user)
    }
}

/// One row of a game listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    /// Game id.
    pub id: GameId,
    /// Players in turn order.
    pub players: Vec<UserId>,
    /// Lifecycle state.
    pub state: GameState,
    /// When the game was created (UTC).
    pub created_at: NaiveDateTime,
}
