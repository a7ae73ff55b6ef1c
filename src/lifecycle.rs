//! Game lifecycle and the operations callers use.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::{debug, info, instrument, warn};

use crate::catalog::{self, SLOTS_PER_TIER, TIERS};
use crate::rng::{RandomSource, new_game_id, pick, shuffle};
use crate::{
    CardId, EngineError, GameBasics, GameId, GameSnapshot, GameState, GameStore, GameSummary,
    GameView, Gems, Move, Seat, StoreError, TableRow, TurnSequencer, UserId, Version,
};

/// Fewest players a game can have.
pub const MIN_PLAYERS: usize = 2;

/// Most players a game can have.
pub const MAX_PLAYERS: usize = 4;

/// Wildcards in the bank at the start of every game.
pub const STARTING_WILDS: u32 = 5;

/// Bank balance a game with `players` players starts with.
///
/// # Errors
///
/// [`EngineError::Validation`] outside 2-4 players.
pub fn starting_bank(players: usize) -> Result<Gems, EngineError> {
    let per_color = match players {
        2 => 4,
        3 => 5,
        4 => 7,
        n => {
            return Err(EngineError::validation(format!(
                "Games take {} to {} players, not {}",
                MIN_PLAYERS, MAX_PLAYERS, n
            )));
        }
    };
    Ok(Gems::uniform(per_color, STARTING_WILDS))
}

/// Deals a fresh game for `players`.
///
/// Turn order, nobles and every tier's deal order are drawn from `rng`; the
/// catalog ids are sorted first so a seeded source reproduces the same game.
///
/// # Errors
///
/// [`EngineError::Validation`] unless there are 2-4 distinct, non-empty
/// player ids.
#[instrument(skip(rng))]
pub fn deal_game(
    id: GameId,
    players: &[UserId],
    rng: &mut dyn RandomSource,
) -> Result<GameSnapshot, EngineError> {
    let bank = starting_bank(players.len())?;
    if players.iter().any(|player| player.is_empty()) {
        return Err(EngineError::validation("Player ids must not be empty"));
    }
    let distinct: HashSet<&UserId> = players.iter().collect();
    if distinct.len() != players.len() {
        return Err(EngineError::validation("Players must all be different"));
    }

    let order = shuffle(players, rng);
    let current = order
        .first()
        .cloned()
        .ok_or_else(|| EngineError::validation("No players"))?;

    let nobles = pick(&catalog::sorted_noble_ids(), players.len() + 1, rng)
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut table: [TableRow; TIERS] = Default::default();
    let mut decks: [Vec<CardId>; TIERS] = Default::default();
    for tier in 1..=TIERS {
        let mut cards = shuffle(&catalog::sorted_tier_ids(tier), rng)
            .into_iter()
            .map(str::to_string);
        for slot in table[tier - 1].iter_mut() {
            *slot = cards.next();
        }
        decks[tier - 1] = cards.collect();
    }
    debug!(
        table = TIERS * SLOTS_PER_TIER,
        deck = decks.iter().map(Vec::len).sum::<usize>(),
        "Cards dealt"
    );

    Ok(GameSnapshot {
        id,
        basics: GameBasics {
            version: 0,
            state: GameState::Playing,
            current,
        },
        seats: order.into_iter().map(Seat::empty).collect(),
        bank,
        nobles,
        table,
        decks,
    })
}

/// The engine's front door: creates, reads, lists and deletes games, and
/// applies moves on behalf of authenticated users.
///
/// User ids are trusted as given.
pub struct GameService<S> {
    store: S,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl<S: GameStore> GameService<S> {
    /// Creates a service over `store` that deals games with `rng`.
    #[instrument(skip(store, rng))]
    pub fn new(store: S, rng: Box<dyn RandomSource>) -> Self {
        info!("Creating GameService");
        Self {
            store,
            rng: Mutex::new(rng),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Deals and stores a new game. Returns its id.
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] for a bad player list, or a store error.
    #[instrument(skip(self))]
    pub fn new_game(&self, players: &[UserId]) -> Result<GameId, EngineError> {
        let game = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| StoreError::new("Random source lock poisoned"))?;
            deal_game(new_game_id()?, players, &mut **rng)?
        };
        self.store.create_game(&game)?;
        info!(game_id = %game.id, first = %game.basics.current, "Game created");
        Ok(game.id)
    }

    /// The full aggregate, for players of the game only.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] if there is no such game or the user does
    /// not play in it.
    #[instrument(skip(self))]
    pub fn snapshot(&self, game_id: &str, user_id: &str) -> Result<GameSnapshot, EngineError> {
        self.store.transact(game_id, |tx| {
            if !tx.is_playing(user_id)? {
                debug!("User does not play in this game");
                return Err(EngineError::NotFound);
            }
            GameSnapshot::load(tx)
        })
    }

    /// The read model of a game, for players of the game only.
    ///
    /// # Errors
    ///
    /// As [`GameService::snapshot`].
    #[instrument(skip(self))]
    pub fn get_game(&self, game_id: &str, user_id: &str) -> Result<GameView, EngineError> {
        GameView::from_snapshot(&self.snapshot(game_id, user_id)?)
    }

    /// Deletes a game. Only its players may do so.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] if there is no such game or the user does
    /// not play in it.
    #[instrument(skip(self))]
    pub fn delete_game(&self, game_id: &str, user_id: &str) -> Result<(), EngineError> {
        let member = self.store.transact(game_id, |tx| tx.is_playing(user_id))?;
        if !member {
            warn!("Delete refused to non-player");
            return Err(EngineError::NotFound);
        }
        self.store.delete_game(game_id)
    }

    /// Games the user plays in, oldest first.
    #[instrument(skip(self))]
    pub fn list_games(&self, user_id: &str) -> Result<Vec<GameSummary>, EngineError> {
        self.store.list_games(user_id)
    }

    /// Applies an already built move.
    #[instrument(skip(self))]
    pub fn apply_move(
        &self,
        game_id: &str,
        user_id: &str,
        mv: &Move,
    ) -> Result<Version, EngineError> {
        TurnSequencer::new(&self.store).apply_move(game_id, user_id, mv)
    }

    /// Takes one coin of each of three distinct colours.
    #[instrument(skip(self, colors))]
    pub fn take_three<C: AsRef<str>>(
        &self,
        game_id: &str,
        user_id: &str,
        colors: &[C],
    ) -> Result<Version, EngineError> {
        self.apply_move(game_id, user_id, &Move::take_three(colors)?)
    }

    /// Takes two coins of one colour.
    #[instrument(skip(self))]
    pub fn take_two(
        &self,
        game_id: &str,
        user_id: &str,
        color: &str,
    ) -> Result<Version, EngineError> {
        self.apply_move(game_id, user_id, &Move::take_two(color)?)
    }

    /// Reserves the card at `tier`/`index`.
    #[instrument(skip(self))]
    pub fn reserve(
        &self,
        game_id: &str,
        user_id: &str,
        tier: i64,
        index: i64,
    ) -> Result<Version, EngineError> {
        self.apply_move(game_id, user_id, &Move::reserve(tier, index)?)
    }

    /// Buys the card at `tier`/`index`.
    #[instrument(skip(self))]
    pub fn buy(
        &self,
        game_id: &str,
        user_id: &str,
        tier: i64,
        index: i64,
    ) -> Result<Version, EngineError> {
        self.apply_move(game_id, user_id, &Move::buy(tier, index)?)
    }
}
