//! SQLite-backed game store.

use std::collections::HashMap;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::models::{
    CardSlotRow, GameRow, NewCoinRow, NewDeckRow, NewGameRow, NewNobleRow, NewPlayerCardRow,
    NewPlayerCoinRow, NewPlayerNobleRow, NewPlayerRow, gems_from_rows, to_column,
};
use crate::db::schema::{
    game_cards, game_coins, game_decks, game_nobles, games, player_cards, player_coins,
    player_nobles, players,
};
use crate::store::{GameStore, GameTx};
use crate::{
    CardId, EngineError, GameBasics, GameSnapshot, GameState, GameSummary, Gems, Hand, NobleId,
    StoreError, TableRow, UserId, Version,
};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Game store backed by a SQLite database file.
///
/// Every operation opens its own connection, so the store is cheap to clone
/// and safe to share between worker threads. Move transactions are
/// `BEGIN IMMEDIATE`, which serializes writers on the database; the version
/// check in [`GameTx::commit_if_version`] still guards the header.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    database_url: String,
}

impl SqliteStore {
    /// Creates a store for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the path is empty.
    #[instrument(skip(database_url), fields(database_url = %database_url))]
    pub fn new(database_url: String) -> Result<Self, StoreError> {
        if database_url.is_empty() {
            return Err(StoreError::new("Database path is empty"));
        }
        info!(path = %database_url, "Creating SqliteStore");
        Ok(Self { database_url })
    }

    /// Path of the underlying database.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Establishes a database connection with foreign keys enforced.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.database_url, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.database_url).map_err(|e| {
            StoreError::new(format!(
                "Failed to connect to '{}': {}",
                self.database_url, e
            ))
        })?;
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
        Ok(conn)
    }

    /// Applies any schema migrations the database has not seen yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }
}

impl GameStore for SqliteStore {
    #[instrument(skip(self, game), fields(game_id = %game.id))]
    fn create_game(&self, game: &GameSnapshot) -> Result<(), EngineError> {
        let mut conn = self.connection()?;
        let id = game.id.as_str();
        let state: &'static str = game.basics.state.into();

        conn.immediate_transaction::<_, EngineError, _>(|conn| {
            diesel::insert_into(games::table)
                .values(&NewGameRow::new(
                    id,
                    game.basics.version,
                    state,
                    &game.basics.current,
                ))
                .execute(conn)?;

            let coins = game
                .bank
                .iter()
                .map(|(color, count)| Ok(NewCoinRow::new(id, color.name(), to_column(count)?)))
                .collect::<Result<Vec<_>, StoreError>>()?;
            diesel::insert_into(game_coins::table)
                .values(&coins)
                .execute(conn)?;

            let nobles = game
                .nobles
                .iter()
                .enumerate()
                .map(|(i, noble)| Ok(NewNobleRow::new(id, to_column(i)?, noble)))
                .collect::<Result<Vec<_>, StoreError>>()?;
            diesel::insert_into(game_nobles::table)
                .values(&nobles)
                .execute(conn)?;

            let mut slots = Vec::new();
            let mut deck = Vec::new();
            for (t, row) in game.table.iter().enumerate() {
                let tier = to_column(t + 1)?;
                for (slot, card) in row.iter().enumerate() {
                    if let Some(card) = card {
                        slots.push(CardSlotRow::new(id, tier, to_column(slot)?, card));
                    }
                }
                for (position, card) in game.decks[t].iter().enumerate() {
                    deck.push(NewDeckRow::new(id, tier, to_column(position)?, card));
                }
            }
            diesel::insert_into(game_cards::table)
                .values(&slots)
                .execute(conn)?;
            diesel::insert_into(game_decks::table)
                .values(&deck)
                .execute(conn)?;

            for (seat_number, seat) in game.seats.iter().enumerate() {
                let user = seat.user.as_str();
                diesel::insert_into(players::table)
                    .values(&NewPlayerRow::new(id, user, to_column(seat_number)?))
                    .execute(conn)?;

                let purse = seat
                    .purse
                    .iter()
                    .map(|(color, count)| {
                        Ok(NewPlayerCoinRow::new(id, user, color.name(), to_column(count)?))
                    })
                    .collect::<Result<Vec<_>, StoreError>>()?;
                diesel::insert_into(player_coins::table)
                    .values(&purse)
                    .execute(conn)?;

                for noble in &seat.nobles {
                    diesel::insert_into(player_nobles::table)
                        .values(&NewPlayerNobleRow::new(id, user, noble))
                        .execute(conn)?;
                }

                let cards = seat
                    .hand
                    .owned
                    .iter()
                    .map(|card| (card, false))
                    .chain(seat.hand.reserved.iter().map(|card| (card, true)));
                for (acquired, (card, reserved)) in cards.enumerate() {
                    diesel::insert_into(player_cards::table)
                        .values(&NewPlayerCardRow::new(
                            id,
                            user,
                            card,
                            reserved,
                            to_column(acquired)?,
                        ))
                        .execute(conn)?;
                }
            }

            Ok(())
        })?;

        info!(players = game.seats.len(), "Game stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete_game(&self, game_id: &str) -> Result<(), EngineError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(games::table.find(game_id)).execute(&mut conn)?;
        if deleted == 0 {
            debug!("No game to delete");
            return Err(EngineError::NotFound);
        }
        info!("Game deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn list_games(&self, user_id: &str) -> Result<Vec<GameSummary>, EngineError> {
        let mut conn = self.connection()?;

        let ids: Vec<String> = players::table
            .filter(players::user_id.eq(user_id))
            .select(players::game_id)
            .load(&mut conn)?;

        let rows: Vec<GameRow> = games::table
            .filter(games::id.eq_any(&ids))
            .order((games::created_at.asc(), games::id.asc()))
            .select(GameRow::as_select())
            .load(&mut conn)?;

        let seats: Vec<(String, String)> = players::table
            .filter(players::game_id.eq_any(&ids))
            .order((players::game_id.asc(), players::seat.asc()))
            .select((players::game_id, players::user_id))
            .load(&mut conn)?;

        let mut by_game: HashMap<String, Vec<UserId>> = HashMap::new();
        for (game_id, user) in seats {
            by_game.entry(game_id).or_default().push(user);
        }

        let summaries = rows
            .into_iter()
            .map(|row| {
                Ok(GameSummary {
                    players: by_game.remove(row.id()).unwrap_or_default(),
                    state: row.parse_state()?,
                    created_at: *row.created_at(),
                    id: row.id().clone(),
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        info!(count = summaries.len(), "Games listed");
        Ok(summaries)
    }

    #[instrument(skip(self, f))]
    fn transact<T, F>(&self, game_id: &str, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut dyn GameTx) -> Result<T, EngineError>,
    {
        let mut conn = self.connection()?;
        conn.immediate_transaction(|conn| {
            let mut tx = SqliteTx { conn, game_id };
            f(&mut tx)
        })
    }
}

/// One open transaction on one game.
struct SqliteTx<'a> {
    conn: &'a mut SqliteConnection,
    game_id: &'a str,
}

impl GameTx for SqliteTx<'_> {
    fn game_id(&self) -> &str {
        self.game_id
    }

    fn basics(&mut self) -> Result<GameBasics, EngineError> {
        let row = games::table
            .find(self.game_id)
            .select(GameRow::as_select())
            .first(self.conn)
            .optional()?
            .ok_or(EngineError::NotFound)?;
        Ok(row.basics()?)
    }

    fn players(&mut self) -> Result<Vec<UserId>, EngineError> {
        Ok(players::table
            .filter(players::game_id.eq(self.game_id))
            .order(players::seat.asc())
            .select(players::user_id)
            .load(self.conn)?)
    }

    fn is_playing(&mut self, user_id: &str) -> Result<bool, EngineError> {
        let found = players::table
            .find((self.game_id, user_id))
            .select(players::seat)
            .first::<i32>(self.conn)
            .optional()?;
        Ok(found.is_some())
    }

    fn bank(&mut self) -> Result<Gems, EngineError> {
        let rows = game_coins::table
            .filter(game_coins::game_id.eq(self.game_id))
            .select((game_coins::color, game_coins::count))
            .load::<(String, i32)>(self.conn)?;
        Ok(gems_from_rows(rows)?)
    }

    fn set_bank(&mut self, bank: &Gems) -> Result<(), EngineError> {
        for (color, count) in bank.iter() {
            diesel::update(game_coins::table.find((self.game_id, color.name())))
                .set(game_coins::count.eq(to_column(count)?))
                .execute(self.conn)?;
        }
        Ok(())
    }

    fn nobles(&mut self) -> Result<Vec<NobleId>, EngineError> {
        Ok(game_nobles::table
            .filter(game_nobles::game_id.eq(self.game_id))
            .order(game_nobles::position.asc())
            .select(game_nobles::noble_id)
            .load(self.conn)?)
    }

    fn table_row(&mut self, tier: usize) -> Result<TableRow, EngineError> {
        let rows = game_cards::table
            .filter(game_cards::game_id.eq(self.game_id))
            .filter(game_cards::tier.eq(to_column(tier)?))
            .select((game_cards::slot, game_cards::card_id))
            .load::<(i32, String)>(self.conn)?;

        let mut row = TableRow::default();
        for (slot, card) in rows {
            let cell = usize::try_from(slot)
                .ok()
                .and_then(|slot| row.get_mut(slot))
                .ok_or_else(|| StoreError::new(format!("Invalid slot {} in tier {}", slot, tier)))?;
            *cell = Some(card);
        }
        Ok(row)
    }

    fn deck(&mut self, tier: usize) -> Result<Vec<CardId>, EngineError> {
        Ok(game_decks::table
            .filter(game_decks::game_id.eq(self.game_id))
            .filter(game_decks::tier.eq(to_column(tier)?))
            .order(game_decks::position.asc())
            .select(game_decks::card_id)
            .load(self.conn)?)
    }

    fn top_card(&mut self, tier: usize) -> Result<Option<CardId>, EngineError> {
        Ok(game_decks::table
            .filter(game_decks::game_id.eq(self.game_id))
            .filter(game_decks::tier.eq(to_column(tier)?))
            .order(game_decks::position.asc())
            .select(game_decks::card_id)
            .first(self.conn)
            .optional()?)
    }

    fn move_top_card_to_table(
        &mut self,
        tier: usize,
        slot: usize,
        card_id: &str,
    ) -> Result<(), EngineError> {
        let tier = to_column(tier)?;
        let removed = diesel::delete(
            game_decks::table
                .filter(game_decks::game_id.eq(self.game_id))
                .filter(game_decks::tier.eq(tier))
                .filter(game_decks::card_id.eq(card_id)),
        )
        .execute(self.conn)?;
        if removed != 1 {
            return Err(
                StoreError::new(format!("Card '{}' is not in deck {}", card_id, tier)).into(),
            );
        }

        diesel::replace_into(game_cards::table)
            .values(&CardSlotRow::new(self.game_id, tier, to_column(slot)?, card_id))
            .execute(self.conn)?;
        Ok(())
    }

    fn clear_table_slot(&mut self, tier: usize, slot: usize) -> Result<(), EngineError> {
        diesel::delete(game_cards::table.find((self.game_id, to_column(tier)?, to_column(slot)?)))
            .execute(self.conn)?;
        Ok(())
    }

    fn purse(&mut self, user_id: &str) -> Result<Gems, EngineError> {
        let rows = player_coins::table
            .filter(player_coins::game_id.eq(self.game_id))
            .filter(player_coins::user_id.eq(user_id))
            .select((player_coins::color, player_coins::count))
            .load::<(String, i32)>(self.conn)?;
        if rows.is_empty() {
            return Err(EngineError::NotFound);
        }
        Ok(gems_from_rows(rows)?)
    }

    fn set_purse(&mut self, user_id: &str, purse: &Gems) -> Result<(), EngineError> {
        for (color, count) in purse.iter() {
            diesel::update(player_coins::table.find((self.game_id, user_id, color.name())))
                .set(player_coins::count.eq(to_column(count)?))
                .execute(self.conn)?;
        }
        Ok(())
    }

    fn player_nobles(&mut self, user_id: &str) -> Result<Vec<NobleId>, EngineError> {
        Ok(player_nobles::table
            .filter(player_nobles::game_id.eq(self.game_id))
            .filter(player_nobles::user_id.eq(user_id))
            .order(player_nobles::noble_id.asc())
            .select(player_nobles::noble_id)
            .load(self.conn)?)
    }

    fn hand(&mut self, user_id: &str) -> Result<Hand, EngineError> {
        let rows = player_cards::table
            .filter(player_cards::game_id.eq(self.game_id))
            .filter(player_cards::user_id.eq(user_id))
            .order(player_cards::acquired.asc())
            .select((player_cards::card_id, player_cards::reserved))
            .load::<(String, bool)>(self.conn)?;

        let mut hand = Hand::default();
        for (card, reserved) in rows {
            if reserved {
                hand.reserved.push(card);
            } else {
                hand.owned.push(card);
            }
        }
        Ok(hand)
    }

    fn add_to_hand(
        &mut self,
        user_id: &str,
        card_id: &str,
        reserved: bool,
    ) -> Result<(), EngineError> {
        let held: i64 = player_cards::table
            .filter(player_cards::game_id.eq(self.game_id))
            .filter(player_cards::user_id.eq(user_id))
            .count()
            .get_result(self.conn)?;

        diesel::insert_into(player_cards::table)
            .values(&NewPlayerCardRow::new(
                self.game_id,
                user_id,
                card_id,
                reserved,
                to_column(held)?,
            ))
            .execute(self.conn)?;
        Ok(())
    }

    #[instrument(skip(self), fields(game_id = %self.game_id))]
    fn commit_if_version(
        &mut self,
        expected: Version,
        state: GameState,
        current: &str,
    ) -> Result<Version, EngineError> {
        let state: &'static str = state.into();
        let version = diesel::update(
            games::table
                .filter(games::id.eq(self.game_id))
                .filter(games::version.eq(expected)),
        )
        .set((
            games::version.eq(games::version + 1_i64),
            games::state.eq(state),
            games::current_player.eq(current),
        ))
        .returning(games::version)
        .get_result::<i64>(self.conn)
        .optional()?;

        match version {
            Some(version) => {
                debug!(version, "Committed");
                Ok(version)
            }
            None => {
                warn!(expected, "Version moved on, rejecting commit");
                Err(EngineError::Conflict)
            }
        }
    }
}
