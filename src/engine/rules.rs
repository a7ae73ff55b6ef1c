//! One procedure per move kind.
//!
//! Each procedure checks its preconditions, writes through the context's
//! transaction, and returns the [`Transition`] to commit. An `Err` leaves
//! the writes to be rolled back by the caller.

use tracing::{debug, info, instrument};

use crate::catalog::{self, Card};
use crate::engine::context::{MoveContext, Transition};
use crate::ledger::{earn_coins, pay_cost};
use crate::{CardId, Color, EngineError, GameState, Gems, Move, StoreError};

/// Most reserved cards a player may hold.
pub const MAX_RESERVED: usize = 3;

/// Score that ends the game.
pub const WINNING_POINTS: u32 = 15;

/// Coins of a colour the bank must hold before anyone may take two of it.
pub const TAKE_TWO_FLOOR: u32 = 4;

/// Runs the procedure for `mv`.
pub fn apply(ctx: &mut MoveContext<'_>, mv: &Move) -> Result<Transition, EngineError> {
    ctx.require_playing()?;
    match *mv {
        Move::TakeThree { colors } => take_three(ctx, colors),
        Move::TakeTwo { color } => take_two(ctx, color),
        Move::Reserve { tier, index } => reserve(ctx, tier, index),
        Move::Buy { tier, index } => buy(ctx, tier, index),
    }
}

/// One coin each of three distinct colours.
#[instrument(skip(ctx), fields(user_id = %ctx.user()))]
pub fn take_three(
    ctx: &mut MoveContext<'_>,
    colors: [Color; 3],
) -> Result<Transition, EngineError> {
    let delta: Gems = colors.into_iter().collect();
    earn(ctx, &delta, &delta)?;
    Ok(ctx.advance())
}

/// Two coins of one colour, if the bank holds at least four.
#[instrument(skip(ctx), fields(user_id = %ctx.user()))]
pub fn take_two(ctx: &mut MoveContext<'_>, color: Color) -> Result<Transition, EngineError> {
    let limit = Gems::of(&[(color, TAKE_TWO_FLOOR)]);
    let delta = Gems::of(&[(color, 2)]);
    earn(ctx, &limit, &delta)?;
    Ok(ctx.advance())
}

/// Takes a face-up card into the reserve and grants a wildcard when the
/// bank has one left.
#[instrument(skip(ctx), fields(user_id = %ctx.user()))]
pub fn reserve(
    ctx: &mut MoveContext<'_>,
    tier: usize,
    index: usize,
) -> Result<Transition, EngineError> {
    let user = ctx.user().to_string();

    let held = ctx.tx().hand(&user)?.reserved.len();
    if held >= MAX_RESERVED {
        debug!(held, "Reserve limit reached");
        return Err(EngineError::TooManyReserved);
    }

    let card = card_at(ctx, tier, index)?;
    ctx.tx().add_to_hand(&user, &card, true)?;
    deal(ctx, tier, index)?;

    let wild = Gems::of(&[(Color::Wild, 1)]);
    match earn(ctx, &wild, &wild) {
        Ok(()) => {}
        Err(EngineError::InsufficientCoins) => debug!("Bank out of wildcards, no bonus"),
        Err(err) => return Err(err),
    }

    info!(%card, "Card reserved");
    Ok(ctx.advance())
}

/// Buys a face-up card, then checks for a noble visit and the end of the
/// game.
#[instrument(skip(ctx), fields(user_id = %ctx.user()))]
pub fn buy(
    ctx: &mut MoveContext<'_>,
    tier: usize,
    index: usize,
) -> Result<Transition, EngineError> {
    let user = ctx.user().to_string();

    let card_id = card_at(ctx, tier, index)?;
    let card = lookup_card(&card_id)?;

    let owned = ctx.tx().hand(&user)?.owned;
    let mut discounts = card_discounts(&owned)?;

    let bank = ctx.tx().bank()?;
    let purse = ctx.tx().purse(&user)?;
    let paid = pay_cost(&bank, &purse, &discounts, card.cost())?;
    ctx.tx().set_bank(&paid.bank)?;
    ctx.tx().set_purse(&user, &paid.purse)?;

    ctx.tx().add_to_hand(&user, &card_id, false)?;
    deal(ctx, tier, index)?;
    info!(card = %card_id, "Card bought");

    discounts.deposit(card.color(), 1);
    for noble_id in ctx.tx().nobles()? {
        let noble = catalog::noble(&noble_id)
            .ok_or_else(|| StoreError::new(format!("Unknown noble '{}'", noble_id)))?;
        if discounts.covers(noble.cost()) {
            info!(noble = %noble_id, "Noble visit due");
            return Ok(ctx.stay(GameState::PickingNoble));
        }
    }

    for player in ctx.players().to_vec() {
        let points = score(ctx, &player)?;
        if points >= WINNING_POINTS {
            info!(winner = %player, points, "Winning score reached");
            return Ok(ctx.stay(GameState::Over));
        }
    }

    Ok(ctx.advance())
}

/// Prestige points of one player: owned cards plus nobles.
pub fn score(ctx: &mut MoveContext<'_>, user_id: &str) -> Result<u32, EngineError> {
    let mut points = 0;
    for card_id in ctx.tx().hand(user_id)?.owned {
        points += lookup_card(&card_id)?.points();
    }
    for noble_id in ctx.tx().player_nobles(user_id)? {
        points += catalog::noble(&noble_id)
            .ok_or_else(|| StoreError::new(format!("Unknown noble '{}'", noble_id)))?
            .points();
    }
    Ok(points)
}

/// Permanent per-colour discounts granted by owned cards.
pub fn card_discounts(owned: &[CardId]) -> Result<Gems, EngineError> {
    owned
        .iter()
        .map(|id| lookup_card(id).map(Card::color))
        .collect()
}

/// Refills a vacated slot from the top of the tier's deck, or leaves it
/// empty once the deck has run out.
#[instrument(skip(ctx))]
pub fn deal(ctx: &mut MoveContext<'_>, tier: usize, index: usize) -> Result<(), EngineError> {
    let tx = ctx.tx();
    match tx.top_card(tier)? {
        Some(card) => {
            debug!(%card, "Dealing replacement");
            tx.move_top_card_to_table(tier, index, &card)
        }
        None => {
            debug!("Deck exhausted, slot stays empty");
            tx.clear_table_slot(tier, index)
        }
    }
}

fn earn(ctx: &mut MoveContext<'_>, limits: &Gems, deltas: &Gems) -> Result<(), EngineError> {
    let user = ctx.user().to_string();
    let tx = ctx.tx();
    let bank = tx.bank()?;
    let purse = tx.purse(&user)?;
    let next = earn_coins(&bank, &purse, limits, deltas)?;
    tx.set_bank(&next.bank)?;
    tx.set_purse(&user, &next.purse)
}

fn card_at(ctx: &mut MoveContext<'_>, tier: usize, index: usize) -> Result<CardId, EngineError> {
    ctx.tx()
        .table_row(tier)?
        .get(index)
        .cloned()
        .flatten()
        .ok_or(EngineError::NoCardThere)
}

fn lookup_card(id: &str) -> Result<&'static Card, EngineError> {
    catalog::card(id).ok_or_else(|| StoreError::new(format!("Unknown card '{}'", id)).into())
}
