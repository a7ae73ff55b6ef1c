//! Serializable read model of a game.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{self, Card, Noble, TIERS};
use crate::{
    Color, EngineError, GameId, GameSnapshot, GameState, Gems, StoreError, UserId, Version,
};

/// A card as shown to players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// Catalog id.
    pub id: String,
    /// Tier, 1-3.
    pub tier: usize,
    /// Discount colour.
    pub color: Color,
    /// Prestige points.
    pub points: u32,
    /// Coin cost.
    pub cost: Gems,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id().to_string(),
            tier: card.tier(),
            color: card.color(),
            points: card.points(),
            cost: *card.cost(),
        }
    }
}

/// A noble as shown to players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NobleView {
    /// Catalog id.
    pub id: String,
    /// Prestige points.
    pub points: u32,
    /// Owned-card counts that attract the noble.
    pub cost: Gems,
}

impl From<&Noble> for NobleView {
    fn from(noble: &Noble) -> Self {
        Self {
            id: noble.id().to_string(),
            points: noble.points(),
            cost: *noble.cost(),
        }
    }
}

/// The shared part of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    /// Bank balance.
    pub bank: Gems,
    /// Nobles on offer.
    pub nobles: Vec<NobleView>,
    /// Face-up cards per tier; empty slots are `None`.
    pub rows: Vec<Vec<Option<CardView>>>,
    /// Undealt cards left per tier.
    pub deck_sizes: [usize; TIERS],
}

/// One player's side of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    /// The player.
    pub user: UserId,
    /// Coins held.
    pub purse: Gems,
    /// Nobles won.
    pub nobles: Vec<NobleView>,
    /// Bought cards by discount colour.
    pub cards: BTreeMap<Color, Vec<CardView>>,
    /// Reserved cards, oldest first.
    pub reserved: Vec<CardView>,
    /// Card points plus noble points.
    pub points: u32,
}

/// Everything a player may see about a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    /// Game id.
    pub id: GameId,
    /// Current version.
    pub version: Version,
    /// Lifecycle state.
    pub state: GameState,
    /// Player expected to act.
    pub current_player: UserId,
    /// Bank, nobles and cards on the table.
    pub table: TableView,
    /// Players in turn order.
    pub players: Vec<PlayerView>,
}

impl GameView {
    /// Resolves every id in the snapshot against the catalog.
    ///
    /// # Errors
    ///
    /// [`EngineError::Store`] if the snapshot references an unknown id.
    pub fn from_snapshot(game: &GameSnapshot) -> Result<Self, EngineError> {
        let rows = game
            .table
            .iter()
            .map(|row| {
                row.iter()
                    .map(|slot| slot.as_deref().map(card_view).transpose())
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let table = TableView {
            bank: game.bank,
            nobles: noble_views(&game.nobles)?,
            rows,
            deck_sizes: [game.decks[0].len(), game.decks[1].len(), game.decks[2].len()],
        };

        let players = game
            .seats
            .iter()
            .map(|seat| {
                let nobles = noble_views(&seat.nobles)?;
                let mut cards: BTreeMap<Color, Vec<CardView>> = BTreeMap::new();
                for id in &seat.hand.owned {
                    let card = card_view(id)?;
                    cards.entry(card.color).or_default().push(card);
                }
                let reserved = seat
                    .hand
                    .reserved
                    .iter()
                    .map(|id| card_view(id))
                    .collect::<Result<Vec<_>, _>>()?;

                let points = cards.values().flatten().map(|card| card.points).sum::<u32>()
                    + nobles.iter().map(|noble| noble.points).sum::<u32>();

                Ok(PlayerView {
                    user: seat.user.clone(),
                    purse: seat.purse,
                    nobles,
                    cards,
                    reserved,
                    points,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        Ok(Self {
            id: game.id.clone(),
            version: game.basics.version,
            state: game.basics.state,
            current_player: game.basics.current.clone(),
            table,
            players,
        })
    }

    /// The view of one player.
    pub fn player(&self, user: &str) -> Option<&PlayerView> {
        self.players.iter().find(|player| player.user == user)
    }
}

fn card_view(id: &str) -> Result<CardView, EngineError> {
    catalog::card(id)
        .map(CardView::from)
        .ok_or_else(|| StoreError::new(format!("Unknown card '{}'", id)).into())
}

fn noble_views(ids: &[String]) -> Result<Vec<NobleView>, EngineError> {
    ids.iter()
        .map(|id| {
            catalog::noble(id)
                .map(NobleView::from)
                .ok_or_else(|| StoreError::new(format!("Unknown noble '{}'", id)).into())
        })
        .collect()
}
