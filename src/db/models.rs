//! Database row types and conversions to domain types.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::schema;
use crate::{Color, GameBasics, GameState, Gems, StoreError};

/// Game header row.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRow {
    id: String,
    version: i64,
    state: String,
    current_player: String,
    created_at: NaiveDateTime,
}

impl GameRow {
    /// Parses the stored state string into a [`GameState`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the string is not a valid state.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn parse_state(&self) -> Result<GameState, StoreError> {
        GameState::from_str(&self.state)
            .map_err(|_| StoreError::new(format!("Invalid game state: '{}'", self.state)))
    }

    /// Converts the row into the header the engine works with.
    pub fn basics(&self) -> Result<GameBasics, StoreError> {
        Ok(GameBasics {
            version: self.version,
            state: self.parse_state()?,
            current: self.current_player.clone(),
        })
    }
}

/// Insertable game header.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGameRow<'a> {
    id: &'a str,
    version: i64,
    state: &'a str,
    current_player: &'a str,
}

/// Insertable bank balance row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::game_coins)]
pub struct NewCoinRow<'a> {
    game_id: &'a str,
    color: &'a str,
    count: i32,
}

/// Insertable noble-on-offer row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::game_nobles)]
pub struct NewNobleRow<'a> {
    game_id: &'a str,
    position: i32,
    noble_id: &'a str,
}

/// Face-up card row; also used to refill a slot.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::game_cards)]
pub struct CardSlotRow<'a> {
    game_id: &'a str,
    tier: i32,
    slot: i32,
    card_id: &'a str,
}

/// Insertable deck row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::game_decks)]
pub struct NewDeckRow<'a> {
    game_id: &'a str,
    tier: i32,
    position: i32,
    card_id: &'a str,
}

/// Insertable player row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::players)]
pub struct NewPlayerRow<'a> {
    game_id: &'a str,
    user_id: &'a str,
    seat: i32,
}

/// Insertable purse balance row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::player_coins)]
pub struct NewPlayerCoinRow<'a> {
    game_id: &'a str,
    user_id: &'a str,
    color: &'a str,
    count: i32,
}

/// Insertable won-noble row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::player_nobles)]
pub struct NewPlayerNobleRow<'a> {
    game_id: &'a str,
    user_id: &'a str,
    noble_id: &'a str,
}

/// Insertable hand row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::player_cards)]
pub struct NewPlayerCardRow<'a> {
    game_id: &'a str,
    user_id: &'a str,
    card_id: &'a str,
    reserved: bool,
    acquired: i32,
}

/// Converts a count or position to the column type.
#[track_caller]
pub fn to_column(value: impl TryInto<i32> + Copy + std::fmt::Display) -> Result<i32, StoreError> {
    value
        .try_into()
        .map_err(|_| StoreError::new(format!("Value out of range for column: {}", value)))
}

/// Rebuilds a colour vector from `(color, count)` rows.
#[instrument(skip(rows), fields(rows = rows.len()))]
pub fn gems_from_rows(rows: Vec<(String, i32)>) -> Result<Gems, StoreError> {
    let mut gems = Gems::EMPTY;
    for (name, count) in rows {
        let color = Color::from_str(&name)
            .map_err(|_| StoreError::new(format!("Invalid colour: '{}'", name)))?;
        let count = u32::try_from(count)
            .map_err(|_| StoreError::new(format!("Negative {} count: {}", name, count)))?;
        gems.set(color, count);
    }
    Ok(gems)
}
