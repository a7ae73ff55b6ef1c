//! Persistence port for game aggregates.
//!
//! The engine never talks to a database directly. It asks a [`GameStore`]
//! for a transaction scoped to one game and reads and writes through the
//! [`GameTx`] handle it is given. Two implementations ship with the crate:
//! [`MemoryStore`] and the diesel-backed [`SqliteStore`](crate::SqliteStore).

mod memory;

pub use memory::MemoryStore;

use tracing::instrument;

use crate::catalog::TIERS;
use crate::{
    CardId, EngineError, GameBasics, GameSnapshot, GameState, GameSummary, Gems, Hand, NobleId,
    Seat, TableRow, UserId, Version,
};

/// Storage for many games.
///
/// Implementations must be shareable across worker threads; all
/// serialization of moves on one game happens inside [`GameStore::transact`]
/// and [`GameTx::commit_if_version`].
pub trait GameStore: Send + Sync {
    /// Inserts a complete new game atomically.
    fn create_game(&self, game: &GameSnapshot) -> Result<(), EngineError>;

    /// Removes a game and everything that belongs to it.
    ///
    /// Returns [`EngineError::NotFound`] if there is no such game.
    fn delete_game(&self, game_id: &str) -> Result<(), EngineError>;

    /// Games the user plays in, with their players in turn order.
    fn list_games(&self, user_id: &str) -> Result<Vec<GameSummary>, EngineError>;

    /// Runs `f` inside one transaction on `game_id`.
    ///
    /// An `Err` from `f` discards every write it made. Writes are durable
    /// only once [`GameTx::commit_if_version`] has succeeded inside `f`.
    fn transact<T, F>(&self, game_id: &str, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut dyn GameTx) -> Result<T, EngineError>;
}

/// Reads and writes on one game inside one transaction.
///
/// Tiers are numbered 1-3 and slots 0-3 throughout.
pub trait GameTx {
    /// Id of the game this transaction is scoped to.
    fn game_id(&self) -> &str;

    /// Version, state and current player.
    fn basics(&mut self) -> Result<GameBasics, EngineError>;

    /// Player ids in turn order.
    fn players(&mut self) -> Result<Vec<UserId>, EngineError>;

    /// True if `user_id` plays in this game.
    fn is_playing(&mut self, user_id: &str) -> Result<bool, EngineError> {
        Ok(self.players()?.iter().any(|player| player == user_id))
    }

    /// Bank balance.
    fn bank(&mut self) -> Result<Gems, EngineError>;

    /// Overwrites the bank balance.
    fn set_bank(&mut self, bank: &Gems) -> Result<(), EngineError>;

    /// Nobles on offer, in table order.
    fn nobles(&mut self) -> Result<Vec<NobleId>, EngineError>;

    /// Face-up cards of one tier.
    fn table_row(&mut self, tier: usize) -> Result<TableRow, EngineError>;

    /// Undealt cards of one tier, next to deal first.
    fn deck(&mut self, tier: usize) -> Result<Vec<CardId>, EngineError>;

    /// The next card a tier would deal, if any.
    fn top_card(&mut self, tier: usize) -> Result<Option<CardId>, EngineError> {
        Ok(self.deck(tier)?.into_iter().next())
    }

    /// Removes `card_id` from the tier's deck and places it in the slot.
    fn move_top_card_to_table(
        &mut self,
        tier: usize,
        slot: usize,
        card_id: &str,
    ) -> Result<(), EngineError>;

    /// Leaves a slot empty.
    fn clear_table_slot(&mut self, tier: usize, slot: usize) -> Result<(), EngineError>;

    /// A player's coins.
    fn purse(&mut self, user_id: &str) -> Result<Gems, EngineError>;

    /// Overwrites a player's coins.
    fn set_purse(&mut self, user_id: &str, purse: &Gems) -> Result<(), EngineError>;

    /// Nobles a player has won.
    fn player_nobles(&mut self, user_id: &str) -> Result<Vec<NobleId>, EngineError>;

    /// A player's bought and reserved cards.
    fn hand(&mut self, user_id: &str) -> Result<Hand, EngineError>;

    /// Gives a card to a player, as bought or as reserved.
    fn add_to_hand(&mut self, user_id: &str, card_id: &str, reserved: bool)
    -> Result<(), EngineError>;

    /// Compare-and-swap on the game header.
    ///
    /// If the stored version still equals `expected`, bumps it by one, sets
    /// state and current player, and returns the new version. Otherwise
    /// fails with [`EngineError::Conflict`] and changes nothing.
    fn commit_if_version(
        &mut self,
        expected: Version,
        state: GameState,
        current: &str,
    ) -> Result<Version, EngineError>;
}

impl GameSnapshot {
    /// Reads the whole aggregate through a transaction.
    #[instrument(skip(tx), fields(game_id = %tx.game_id()))]
    pub fn load(tx: &mut dyn GameTx) -> Result<Self, EngineError> {
        let basics = tx.basics()?;

        let mut seats = Vec::new();
        for user in tx.players()? {
            seats.push(Seat {
                purse: tx.purse(&user)?,
                nobles: tx.player_nobles(&user)?,
                hand: tx.hand(&user)?,
                user,
            });
        }

        let mut table: [TableRow; TIERS] = Default::default();
        let mut decks: [Vec<CardId>; TIERS] = Default::default();
        for tier in 1..=TIERS {
            table[tier - 1] = tx.table_row(tier)?;
            decks[tier - 1] = tx.deck(tier)?;
        }

        Ok(Self {
            id: tx.game_id().to_string(),
            basics,
            seats,
            bank: tx.bank()?,
            nobles: tx.nobles()?,
            table,
            decks,
        })
    }
}
