//! Gem colours.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A gem colour: the five normal colours plus the gold wildcard.
///
/// The discriminants double as indices into [`Gems`](crate::Gems), so the
/// declaration order is part of the storage layout.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    /// Diamond.
    White,
    /// Onyx.
    Black,
    /// Emerald.
    Green,
    /// Sapphire.
    Blue,
    /// Ruby.
    Red,
    /// Gold joker, spendable in place of any normal colour.
    Wild,
}

impl Color {
    /// Number of colours, wildcard included.
    pub const COUNT: usize = 6;

    /// The five colours cards cost and coins can be taken in.
    pub const NORMAL: [Color; 5] = [
        Color::White,
        Color::Black,
        Color::Green,
        Color::Blue,
        Color::Red,
    ];

    /// Every colour, wildcard last.
    pub const ALL: [Color; Color::COUNT] = [
        Color::White,
        Color::Black,
        Color::Green,
        Color::Blue,
        Color::Red,
        Color::Wild,
    ];

    /// Returns true for the five normal colours.
    pub fn is_normal(self) -> bool {
        Color::NORMAL.contains(&self)
    }

    /// Lowercase name, as stored and as accepted on input.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Position of this colour inside a [`Gems`](crate::Gems) vector.
    pub const fn index(self) -> usize {
        self as usize
    }
}
