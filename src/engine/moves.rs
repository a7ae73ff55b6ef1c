//! First-class move types.
//!
//! A [`Move`] is the player's intent, checked for shape before any game
//! state is read. Whether the move is *legal right now* is decided later by
//! the rule procedures inside a transaction.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use tracing::instrument;

use crate::catalog::{SLOTS_PER_TIER, TIERS};
use crate::{Color, EngineError};

/// A move a player can submit on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Move {
    /// Take one coin of each of three distinct normal colours.
    TakeThree {
        /// The three colours.
        colors: [Color; 3],
    },
    /// Take two coins of one normal colour.
    TakeTwo {
        /// The colour.
        color: Color,
    },
    /// Reserve a face-up card and collect a wildcard if the bank has one.
    Reserve {
        /// Tier, 1-3.
        tier: usize,
        /// Slot within the tier, 0-3.
        index: usize,
    },
    /// Buy a face-up card.
    Buy {
        /// Tier, 1-3.
        tier: usize,
        /// Slot within the tier, 0-3.
        index: usize,
    },
}

impl Move {
    /// Builds a take-three move from colour names.
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] unless there are exactly three known,
    /// normal, pairwise distinct colours.
    #[instrument(skip(colors), fields(count = colors.len()))]
    pub fn take_three<S: AsRef<str>>(colors: &[S]) -> Result<Self, EngineError> {
        let parsed = colors
            .iter()
            .map(|name| parse_color(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let colors: [Color; 3] = parsed.try_into().map_err(|parsed: Vec<Color>| {
            EngineError::validation(format!(
                "Need exactly 3 colours, got {}",
                parsed.len()
            ))
        })?;
        let mv = Self::TakeThree { colors };
        mv.validate()?;
        Ok(mv)
    }

    /// Builds a take-two move from a colour name.
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] for an unknown colour or the wildcard.
    #[instrument]
    pub fn take_two(color: &str) -> Result<Self, EngineError> {
        let mv = Self::TakeTwo {
            color: parse_color(color)?,
        };
        mv.validate()?;
        Ok(mv)
    }

    /// Builds a reserve move from raw coordinates.
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] if the tier or index is out of range.
    #[instrument]
    pub fn reserve(tier: i64, index: i64) -> Result<Self, EngineError> {
        let (tier, index) = coordinates(tier, index)?;
        Ok(Self::Reserve { tier, index })
    }

    /// Builds a buy move from raw coordinates.
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] if the tier or index is out of range.
    #[instrument]
    pub fn buy(tier: i64, index: i64) -> Result<Self, EngineError> {
        let (tier, index) = coordinates(tier, index)?;
        Ok(Self::Buy { tier, index })
    }

    /// Name of the move kind, e.g. `"take_three"`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Checks the move's shape.
    ///
    /// Constructors already call this; it exists for moves built directly
    /// or deserialized.
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<(), EngineError> {
        match *self {
            Self::TakeThree { colors } => {
                if let Some(wild) = colors.iter().find(|c| !c.is_normal()) {
                    return Err(EngineError::validation(format!(
                        "Can't take {} coins this way",
                        wild
                    )));
                }
                let [a, b, c] = colors;
                if a == b || b == c || a == c {
                    return Err(EngineError::validation("Colours must all be different"));
                }
                Ok(())
            }
            Self::TakeTwo { color } => {
                if color.is_normal() {
                    Ok(())
                } else {
                    Err(EngineError::validation(format!(
                        "Can't take {} coins this way",
                        color
                    )))
                }
            }
            Self::Reserve { tier, index } | Self::Buy { tier, index } => {
                check_slot(tier, index)
            }
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TakeThree { colors: [a, b, c] } => write!(f, "take three {a}/{b}/{c}"),
            Self::TakeTwo { color } => write!(f, "take two {color}"),
            Self::Reserve { tier, index } => write!(f, "reserve {tier}:{index}"),
            Self::Buy { tier, index } => write!(f, "buy {tier}:{index}"),
        }
    }
}

fn parse_color(name: &str) -> Result<Color, EngineError> {
    Color::from_str(name).map_err(|_| EngineError::validation(format!("Unknown colour '{}'", name)))
}

fn coordinates(tier: i64, index: i64) -> Result<(usize, usize), EngineError> {
    let tier = usize::try_from(tier)
        .map_err(|_| EngineError::validation(format!("Invalid tier {}", tier)))?;
    let index = usize::try_from(index)
        .map_err(|_| EngineError::validation(format!("Invalid index {}", index)))?;
    check_slot(tier, index)?;
    Ok((tier, index))
}

fn check_slot(tier: usize, index: usize) -> Result<(), EngineError> {
    if !(1..=TIERS).contains(&tier) {
        return Err(EngineError::validation(format!("Invalid tier {}", tier)));
    }
    if index >= SLOTS_PER_TIER {
        return Err(EngineError::validation(format!("Invalid index {}", index)));
    }
    Ok(())
}
