//! Coin arithmetic: colour-count vectors and the two transfer algorithms.
//!
//! Nothing here touches storage. Both algorithms take snapshots of the bank
//! and a purse and hand back new snapshots; the caller writes them.

use std::ops::{Add, AddAssign, Index};

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, instrument};

use crate::{Color, EngineError};

/// A count per colour, wildcard included.
///
/// Used for bank and purse balances, card and noble costs, and owned-card
/// discounts alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Gems([u32; Color::COUNT]);

impl Gems {
    /// All zeros.
    pub const EMPTY: Gems = Gems([0; Color::COUNT]);

    /// Builds a vector from `(colour, count)` pairs; repeated colours add up.
    pub const fn of(pairs: &[(Color, u32)]) -> Self {
        let mut counts = [0; Color::COUNT];
        let mut i = 0;
        while i < pairs.len() {
            counts[pairs[i].0.index()] += pairs[i].1;
            i += 1;
        }
        Self(counts)
    }

    /// Same count of every normal colour, plus a separate wildcard count.
    pub fn uniform(normal: u32, wild: u32) -> Self {
        let mut gems = Self([normal; Color::COUNT]);
        gems.set(Color::Wild, wild);
        gems
    }

    /// Count for one colour.
    pub fn get(&self, color: Color) -> u32 {
        self.0[color.index()]
    }

    /// Overwrites the count for one colour.
    pub fn set(&mut self, color: Color, count: u32) {
        self.0[color.index()] = count;
    }

    /// Adds to one colour.
    pub fn deposit(&mut self, color: Color, count: u32) {
        self.0[color.index()] += count;
    }

    /// Sum over all colours.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Every colour with its count, in [`Color::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, u32)> + '_ {
        Color::ALL.into_iter().map(|color| (color, self.get(color)))
    }

    /// Only the colours with a non-zero count.
    pub fn nonzero(&self) -> impl Iterator<Item = (Color, u32)> + '_ {
        self.iter().filter(|(_, count)| *count > 0)
    }

    /// True when every colour here is at least the corresponding count in `cost`.
    pub fn covers(&self, cost: &Gems) -> bool {
        cost.iter().all(|(color, needed)| self.get(color) >= needed)
    }
}

impl Index<Color> for Gems {
    type Output = u32;

    fn index(&self, color: Color) -> &u32 {
        &self.0[color.index()]
    }
}

impl Add for Gems {
    type Output = Gems;

    fn add(mut self, rhs: Gems) -> Gems {
        self += rhs;
        self
    }
}

impl AddAssign for Gems {
    fn add_assign(&mut self, rhs: Gems) {
        for color in Color::ALL {
            self.0[color.index()] += rhs.get(color);
        }
    }
}

impl FromIterator<Color> for Gems {
    /// Counts occurrences, e.g. the colours of a player's cards.
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut gems = Gems::EMPTY;
        for color in iter {
            gems.deposit(color, 1);
        }
        gems
    }
}

impl Serialize for Gems {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Color::COUNT))?;
        for (color, count) in self.iter() {
            map.serialize_entry(&color, &count)?;
        }
        map.end()
    }
}

/// Bank and purse balances after a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinTransfer {
    /// New bank balance.
    pub bank: Gems,
    /// New purse balance.
    pub purse: Gems,
}

/// Moves coins from the bank into a purse.
///
/// Every colour in `limits` must have at least that many coins in the bank
/// *before* the transfer; then `deltas` is moved across. Taking two of a
/// colour uses a limit of four and a delta of two.
///
/// # Errors
///
/// [`EngineError::InsufficientCoins`] if a limit is not met or the bank
/// cannot cover a delta.
#[instrument(level = "debug")]
pub fn earn_coins(
    bank: &Gems,
    purse: &Gems,
    limits: &Gems,
    deltas: &Gems,
) -> Result<CoinTransfer, EngineError> {
    for (color, limit) in limits.nonzero() {
        if bank.get(color) < limit {
            debug!(%color, limit, available = bank.get(color), "Bank below limit");
            return Err(EngineError::InsufficientCoins);
        }
    }

    let mut next = CoinTransfer {
        bank: *bank,
        purse: *purse,
    };
    for (color, count) in deltas.nonzero() {
        let remaining = bank
            .get(color)
            .checked_sub(count)
            .ok_or(EngineError::InsufficientCoins)?;
        next.bank.set(color, remaining);
        next.purse.deposit(color, count);
    }

    Ok(next)
}

/// Pays for a card out of a purse into the bank.
///
/// For each colour of the cost, owned cards of that colour discount it; the
/// rest is paid in that colour for as long as the purse lasts and any
/// shortfall is accumulated. The shortfall is then paid in wildcards. The
/// order is fixed: no colour is ever paid with a wildcard while the purse
/// still holds coins of that colour.
///
/// # Errors
///
/// [`EngineError::InsufficientCoins`] if the purse's wildcards cannot cover
/// the shortfall.
#[instrument(level = "debug")]
pub fn pay_cost(
    bank: &Gems,
    purse: &Gems,
    discounts: &Gems,
    cost: &Gems,
) -> Result<CoinTransfer, EngineError> {
    let mut next = CoinTransfer {
        bank: *bank,
        purse: *purse,
    };
    let mut wilds_needed = 0;

    for (color, price) in cost.nonzero() {
        let needed = price.saturating_sub(discounts.get(color));
        if needed == 0 {
            continue;
        }

        let paid = needed.min(purse.get(color));
        next.purse.set(color, purse.get(color) - paid);
        next.bank.deposit(color, paid);
        wilds_needed += needed - paid;
    }

    if wilds_needed > 0 {
        let wilds = purse.get(Color::Wild);
        if wilds < wilds_needed {
            debug!(wilds, wilds_needed, "Not enough wildcards");
            return Err(EngineError::InsufficientCoins);
        }
        next.purse.set(Color::Wild, wilds - wilds_needed);
        next.bank.deposit(Color::Wild, wilds_needed);
    }

    Ok(next)
}
