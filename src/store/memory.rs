//! In-process game store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::store::{GameStore, GameTx};
use crate::{
    CardId, EngineError, GameBasics, GameId, GameSnapshot, GameState, GameSummary, Gems, Hand,
    NobleId, Seat, StoreError, TableRow, UserId, Version,
};

#[derive(Debug, Clone)]
struct Entry {
    game: GameSnapshot,
    created_at: NaiveDateTime,
}

/// Game store that keeps every aggregate in memory.
///
/// A transaction works on a private copy of the game taken when it starts;
/// the copy replaces the shared one only through
/// [`GameTx::commit_if_version`], and only if nobody else committed in the
/// meantime. Cloning the store shares the underlying games.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    games: Arc<Mutex<HashMap<GameId, Entry>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating MemoryStore");
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<GameId, Entry>>, StoreError> {
        self.games
            .lock()
            .map_err(|_| StoreError::new("Memory store lock poisoned"))
    }
}

impl GameStore for MemoryStore {
    #[instrument(skip(self, game), fields(game_id = %game.id))]
    fn create_game(&self, game: &GameSnapshot) -> Result<(), EngineError> {
        let mut games = self.lock()?;
        if games.contains_key(&game.id) {
            warn!("Game id already in use");
            return Err(StoreError::new(format!("Game '{}' already exists", game.id)).into());
        }
        games.insert(
            game.id.clone(),
            Entry {
                game: game.clone(),
                created_at: Utc::now().naive_utc(),
            },
        );
        info!(players = game.seats.len(), "Game stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete_game(&self, game_id: &str) -> Result<(), EngineError> {
        let mut games = self.lock()?;
        match games.remove(game_id) {
            Some(_) => {
                info!("Game deleted");
                Ok(())
            }
            None => Err(EngineError::NotFound),
        }
    }

    #[instrument(skip(self))]
    fn list_games(&self, user_id: &str) -> Result<Vec<GameSummary>, EngineError> {
        let games = self.lock()?;
        let mut summaries: Vec<GameSummary> = games
            .values()
            .filter(|entry| entry.game.seat(user_id).is_some())
            .map(|entry| GameSummary {
                id: entry.game.id.clone(),
                players: entry.game.players(),
                state: entry.game.basics.state,
                created_at: entry.created_at,
            })
            .collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        debug!(count = summaries.len(), "Games listed");
        Ok(summaries)
    }

    #[instrument(skip(self, f))]
    fn transact<T, F>(&self, game_id: &str, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut dyn GameTx) -> Result<T, EngineError>,
    {
        let entry = self.lock()?.get(game_id).cloned().ok_or(EngineError::NotFound)?;
        let mut tx = MemoryTx {
            store: self,
            game: entry.game,
        };
        f(&mut tx)
    }
}

/// Transaction over a private copy of one game.
struct MemoryTx<'a> {
    store: &'a MemoryStore,
    game: GameSnapshot,
}

impl MemoryTx<'_> {
    fn seat(&mut self, user_id: &str) -> Result<&mut Seat, EngineError> {
        self.game.seat_mut(user_id).ok_or(EngineError::NotFound)
    }

    fn row(&mut self, tier: usize) -> Result<&mut TableRow, EngineError> {
        tier.checked_sub(1)
            .and_then(|i| self.game.table.get_mut(i))
            .ok_or_else(|| StoreError::new(format!("No such tier: {tier}")).into())
    }

    fn deck_mut(&mut self, tier: usize) -> Result<&mut Vec<CardId>, EngineError> {
        tier.checked_sub(1)
            .and_then(|i| self.game.decks.get_mut(i))
            .ok_or_else(|| StoreError::new(format!("No such tier: {tier}")).into())
    }
}

impl GameTx for MemoryTx<'_> {
    fn game_id(&self) -> &str {
        &self.game.id
    }

    fn basics(&mut self) -> Result<GameBasics, EngineError> {
        Ok(self.game.basics.clone())
    }

    fn players(&mut self) -> Result<Vec<UserId>, EngineError> {
        Ok(self.game.players())
    }

    fn bank(&mut self) -> Result<Gems, EngineError> {
        Ok(self.game.bank)
    }

    fn set_bank(&mut self, bank: &Gems) -> Result<(), EngineError> {
        self.game.bank = *bank;
        Ok(())
    }

    fn nobles(&mut self) -> Result<Vec<NobleId>, EngineError> {
        Ok(self.game.nobles.clone())
    }

    fn table_row(&mut self, tier: usize) -> Result<TableRow, EngineError> {
        Ok(self.row(tier)?.clone())
    }

    fn deck(&mut self, tier: usize) -> Result<Vec<CardId>, EngineError> {
        Ok(self.deck_mut(tier)?.clone())
    }

    fn move_top_card_to_table(
        &mut self,
        tier: usize,
        slot: usize,
        card_id: &str,
    ) -> Result<(), EngineError> {
        let deck = self.deck_mut(tier)?;
        let position = deck
            .iter()
            .position(|card| card == card_id)
            .ok_or_else(|| StoreError::new(format!("Card '{card_id}' is not in deck {tier}")))?;
        deck.remove(position);

        let row = self.row(tier)?;
        let cell = row
            .get_mut(slot)
            .ok_or_else(|| StoreError::new(format!("No such slot: {slot}")))?;
        *cell = Some(card_id.to_string());
        Ok(())
    }

    fn clear_table_slot(&mut self, tier: usize, slot: usize) -> Result<(), EngineError> {
        let row = self.row(tier)?;
        let cell = row
            .get_mut(slot)
            .ok_or_else(|| StoreError::new(format!("No such slot: {slot}")))?;
        *cell = None;
        Ok(())
    }

    fn purse(&mut self, user_id: &str) -> Result<Gems, EngineError> {
        Ok(self.seat(user_id)?.purse)
    }

    fn set_purse(&mut self, user_id: &str, purse: &Gems) -> Result<(), EngineError> {
        self.seat(user_id)?.purse = *purse;
        Ok(())
    }

    fn player_nobles(&mut self, user_id: &str) -> Result<Vec<NobleId>, EngineError> {
        Ok(self.seat(user_id)?.nobles.clone())
    }

    fn hand(&mut self, user_id: &str) -> Result<Hand, EngineError> {
        Ok(self.seat(user_id)?.hand.clone())
    }

    fn add_to_hand(
        &mut self,
        user_id: &str,
        card_id: &str,
        reserved: bool,
    ) -> Result<(), EngineError> {
        let hand = &mut self.seat(user_id)?.hand;
        if reserved {
            hand.reserved.push(card_id.to_string());
        } else {
            hand.owned.push(card_id.to_string());
        }
        Ok(())
    }

    #[instrument(skip(self), fields(game_id = %self.game.id))]
    fn commit_if_version(
        &mut self,
        expected: Version,
        state: GameState,
        current: &str,
    ) -> Result<Version, EngineError> {
        let mut games = self.store.lock()?;
        let entry = games.get_mut(&self.game.id).ok_or(EngineError::NotFound)?;
        if entry.game.basics.version != expected {
            warn!(
                expected,
                stored = entry.game.basics.version,
                "Version moved on, rejecting commit"
            );
            return Err(EngineError::Conflict);
        }

        let version = expected + 1;
        self.game.basics = GameBasics {
            version,
            state,
            current: current.to_string(),
        };
        entry.game = self.game.clone();
        debug!(version, "Committed");
        Ok(version)
    }
}
