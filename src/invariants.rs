//! First-class game invariants.
//!
//! Invariants are properties every committed game must satisfy. They are
//! checked against a [`GameSnapshot`] so tests can assert them after every
//! move, whichever store the game lives in.

use std::collections::HashMap;

use crate::catalog;
use crate::lifecycle::starting_bank;
use crate::engine::rules::MAX_RESERVED;
use crate::{GameSnapshot, Gems};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of [`Invariant`]s.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
            (I4::holds(state), I4::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Bank plus purses equals the starting bank, colour by colour.
pub struct CoinConservation;

impl Invariant<GameSnapshot> for CoinConservation {
    fn holds(game: &GameSnapshot) -> bool {
        let Ok(expected) = starting_bank(game.seats.len()) else {
            return false;
        };
        coins_in_play(game) == expected
    }

    fn description() -> &'static str {
        "Coins are neither created nor destroyed"
    }
}

/// Every catalog card sits in exactly one place: a table slot, a deck, a
/// hand or a reserve.
pub struct CardUniqueness;

impl Invariant<GameSnapshot> for CardUniqueness {
    fn holds(game: &GameSnapshot) -> bool {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let placed = game
            .table
            .iter()
            .flatten()
            .flatten()
            .chain(game.decks.iter().flatten())
            .chain(game.seats.iter().flat_map(|seat| {
                seat.hand.owned.iter().chain(seat.hand.reserved.iter())
            }));
        for card in placed {
            *seen.entry(card.as_str()).or_default() += 1;
        }

        catalog::all_cards().count() == seen.len()
            && catalog::all_cards().all(|card| seen.get(card.id()) == Some(&1))
    }

    fn description() -> &'static str {
        "Each card is in exactly one place"
    }
}

/// Nobody holds more reserved cards than allowed.
pub struct ReserveCap;

impl Invariant<GameSnapshot> for ReserveCap {
    fn holds(game: &GameSnapshot) -> bool {
        game.seats
            .iter()
            .all(|seat| seat.hand.reserved.len() <= MAX_RESERVED)
    }

    fn description() -> &'static str {
        "At most three reserved cards per player"
    }
}

/// The current player is one of the game's players.
pub struct CurrentPlayerSeated;

impl Invariant<GameSnapshot> for CurrentPlayerSeated {
    fn holds(game: &GameSnapshot) -> bool {
        game.seat(&game.basics.current).is_some()
    }

    fn description() -> &'static str {
        "Current player has a seat"
    }
}

/// All game invariants as a composable set.
pub type SplendorInvariants = (
    CoinConservation,
    CardUniqueness,
    ReserveCap,
    CurrentPlayerSeated,
);

/// Total coins of a game, bank and purses together.
pub fn coins_in_play(game: &GameSnapshot) -> Gems {
    game.seats.iter().map(|seat| seat.purse).fold(game.bank, |a, b| a + b)
}
