//! Noble tile definitions.

use super::Color::{Black, Blue, Green, Red, White};
use super::{Color, Noble};
use crate::Gems;

const fn noble(id: &'static str, cost: &[(Color, u32)]) -> Noble {
    Noble {
        id,
        points: Noble::POINTS,
        cost: Gems::of(cost),
    }
}

/// Every noble in the box. Costs are counted in owned cards, not coins.
pub static NOBLES: [Noble; 10] = [
    noble("mary_stuart", &[(Red, 4), (Green, 4)]),
    noble("charles_v", &[(Black, 3), (Red, 3), (White, 3)]),
    noble("macchiavelli", &[(Blue, 4), (White, 4)]),
    noble("isabelle_of_castille", &[(Black, 4), (White, 4)]),
    noble("suleiman_i", &[(Blue, 4), (Green, 4)]),
    noble("catherine_of_medici", &[(Green, 3), (Blue, 3), (Red, 3)]),
    noble("anne_of_brittany", &[(Green, 3), (Blue, 3), (White, 3)]),
    noble("henry_viii", &[(Black, 4), (Red, 4)]),
    noble("elisabeth_of_austria", &[(Black, 3), (Blue, 3), (White, 3)]),
    noble("francis_i", &[(Black, 3), (Red, 3), (Green, 3)]),
];
