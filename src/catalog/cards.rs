//! Development card definitions for all three tiers.

use super::Color::{Black, Blue, Green, Red, White};
use super::{Card, Color};
use crate::Gems;

const fn card(
    id: &'static str,
    tier: usize,
    color: Color,
    points: u32,
    cost: &[(Color, u32)],
) -> Card {
    Card {
        id,
        tier,
        color,
        points,
        cost: Gems::of(cost),
    }
}

/// Tier one: cheap cards, mostly worth nothing.
pub static TIER_1: [Card; 40] = [
    card("1_4_0", 1, White, 1, &[(Green, 4)]),
    card("1_4_1", 1, Green, 1, &[(Black, 4)]),
    card("1_4_2", 1, Black, 1, &[(Blue, 4)]),
    card("1_4_3", 1, Blue, 1, &[(Red, 4)]),
    card("1_4_4", 1, Red, 1, &[(White, 4)]),
    card("1_3_0", 1, White, 0, &[(Blue, 3)]),
    card("1_3_1", 1, Green, 0, &[(Red, 3)]),
    card("1_3_2", 1, Black, 0, &[(Green, 3)]),
    card("1_3_3", 1, Blue, 0, &[(Black, 3)]),
    card("1_3_4", 1, Red, 0, &[(White, 3)]),
    card("1_2_1_0", 1, White, 0, &[(Red, 2), (Black, 1)]),
    card("1_2_1_1", 1, Green, 0, &[(White, 2), (Blue, 1)]),
    card("1_2_1_2", 1, Black, 0, &[(Green, 2), (Red, 1)]),
    card("1_2_1_3", 1, Blue, 0, &[(Black, 2), (White, 1)]),
    card("1_2_1_4", 1, Red, 0, &[(Blue, 2), (Green, 1)]),
    card("1_22_0", 1, White, 0, &[(Blue, 2), (Black, 2)]),
    card("1_22_1", 1, Green, 0, &[(Blue, 2), (Red, 2)]),
    card("1_22_2", 1, Black, 0, &[(White, 2), (Green, 2)]),
    card("1_22_3", 1, Blue, 0, &[(Green, 2), (Black, 2)]),
    card("1_22_4", 1, Red, 0, &[(White, 2), (Red, 2)]),
    card("1_41_0", 1, White, 0, &[(Blue, 1), (Green, 1), (Red, 1), (Black, 1)]),
    card("1_41_1", 1, Green, 0, &[(Blue, 1), (White, 1), (Red, 1), (Black, 1)]),
    card("1_41_2", 1, Black, 0, &[(Blue, 1), (Green, 1), (Red, 1), (White, 1)]),
    card("1_41_3", 1, Blue, 0, &[(White, 1), (Green, 1), (Red, 1), (Black, 1)]),
    card("1_41_4", 1, Red, 0, &[(Blue, 1), (Green, 1), (White, 1), (Black, 1)]),
    card("1_3_21_0", 1, White, 0, &[(White, 3), (Blue, 1), (Black, 1)]),
    card("1_3_21_1", 1, Green, 0, &[(Blue, 3), (White, 1), (Green, 1)]),
    card("1_3_21_2", 1, Black, 0, &[(Red, 3), (Green, 1), (Black, 1)]),
    card("1_3_21_3", 1, Blue, 0, &[(Green, 3), (Red, 1), (Blue, 1)]),
    card("1_3_21_4", 1, Red, 0, &[(Black, 3), (Red, 1), (White, 1)]),
    card("1_22_1_0", 1, White, 0, &[(Blue, 2), (Green, 2), (Black, 1)]),
    card("1_22_1_1", 1, Green, 0, &[(Black, 2), (Red, 2), (Blue, 1)]),
    card("1_22_1_2", 1, Black, 0, &[(White, 2), (Blue, 2), (Red, 1)]),
    card("1_22_1_3", 1, Blue, 0, &[(Red, 2), (Green, 2), (White, 1)]),
    card("1_22_1_4", 1, Red, 0, &[(White, 2), (Black, 2), (Green, 1)]),
    card("1_2_31_0", 1, White, 0, &[(Green, 2), (Blue, 1), (Red, 1), (Black, 1)]),
    card("1_2_31_1", 1, Green, 0, &[(Black, 2), (Blue, 1), (Red, 1), (White, 1)]),
    card("1_2_31_2", 1, Black, 0, &[(Blue, 2), (White, 1), (Red, 1), (Green, 1)]),
    card("1_2_31_3", 1, Blue, 0, &[(Red, 2), (White, 1), (Green, 1), (Black, 1)]),
    card("1_2_31_4", 1, Red, 0, &[(White, 2), (Blue, 1), (Green, 1), (Black, 1)]),
];

/// Tier two: mid-game cards worth one to three points.
pub static TIER_2: [Card; 30] = [
    card("2_6_0", 2, White, 3, &[(White, 6)]),
    card("2_6_1", 2, Green, 3, &[(Green, 6)]),
    card("2_6_2", 2, Black, 3, &[(Black, 6)]),
    card("2_6_3", 2, Blue, 3, &[(Blue, 6)]),
    card("2_6_4", 2, Red, 3, &[(Red, 6)]),
    card("2_5_0", 2, White, 2, &[(Red, 5)]),
    card("2_5_1", 2, Green, 2, &[(Green, 5)]),
    card("2_5_2", 2, Black, 2, &[(White, 5)]),
    card("2_5_3", 2, Blue, 2, &[(Blue, 5)]),
    card("2_5_4", 2, Red, 2, &[(Black, 5)]),
    card("2_5_3_0", 2, White, 2, &[(Red, 5), (Black, 3)]),
    card("2_5_3_1", 2, Green, 2, &[(Blue, 5), (Green, 3)]),
    card("2_5_3_2", 2, Black, 2, &[(Green, 5), (Red, 3)]),
    card("2_5_3_3", 2, Blue, 2, &[(White, 5), (Blue, 3)]),
    card("2_5_3_4", 2, Red, 2, &[(Black, 5), (White, 3)]),
    card("2_4_2_1_0", 2, White, 2, &[(Red, 4), (Black, 2), (Green, 1)]),
    card("2_4_2_1_1", 2, Green, 2, &[(White, 4), (Blue, 2), (Black, 1)]),
    card("2_4_2_1_2", 2, Black, 2, &[(Green, 4), (Red, 2), (Blue, 1)]),
    card("2_4_2_1_3", 2, Blue, 2, &[(Black, 4), (White, 2), (Red, 1)]),
    card("2_4_2_1_4", 2, Red, 2, &[(Blue, 4), (Green, 2), (White, 1)]),
    card("2_3_22_0", 2, White, 1, &[(Green, 3), (Red, 2), (Black, 2)]),
    card("2_3_22_1", 2, Green, 1, &[(Blue, 3), (White, 2), (Black, 2)]),
    card("2_3_22_2", 2, Black, 1, &[(White, 3), (Blue, 2), (Green, 2)]),
    card("2_3_22_3", 2, Blue, 1, &[(Red, 3), (Blue, 2), (Green, 2)]),
    card("2_3_22_4", 2, Red, 1, &[(Black, 3), (Red, 2), (White, 2)]),
    card("2_23_2_0", 2, White, 1, &[(Blue, 3), (Red, 3), (White, 2)]),
    card("2_23_2_1", 2, Green, 1, &[(Red, 3), (White, 3), (Green, 2)]),
    card("2_23_2_2", 2, Black, 1, &[(White, 3), (Green, 3), (Black, 2)]),
    card("2_23_2_3", 2, Blue, 1, &[(Green, 3), (Black, 3), (Blue, 2)]),
    card("2_23_2_4", 2, Red, 1, &[(Blue, 3), (Black, 3), (Red, 2)]),
];

/// Tier three: expensive late-game cards.
pub static TIER_3: [Card; 20] = [
    card("3_7_3_0", 3, White, 5, &[(Black, 7), (White, 3)]),
    card("3_7_3_1", 3, Green, 5, &[(Blue, 7), (Green, 3)]),
    card("3_7_3_2", 3, Black, 5, &[(Red, 7), (Black, 3)]),
    card("3_7_3_3", 3, Blue, 5, &[(White, 7), (Blue, 3)]),
    card("3_7_3_4", 3, Red, 5, &[(Green, 7), (Red, 3)]),
    card("3_7_0", 3, White, 4, &[(Black, 7)]),
    card("3_7_1", 3, Green, 4, &[(Blue, 7)]),
    card("3_7_2", 3, Black, 4, &[(Red, 7)]),
    card("3_7_3", 3, Blue, 4, &[(White, 7)]),
    card("3_7_4", 3, Red, 4, &[(Green, 7)]),
    card("3_6_23_0", 3, White, 4, &[(Black, 6), (White, 3), (Red, 3)]),
    card("3_6_23_1", 3, Green, 4, &[(Blue, 6), (Green, 3), (White, 3)]),
    card("3_6_23_2", 3, Black, 4, &[(Red, 6), (Black, 3), (Green, 3)]),
    card("3_6_23_3", 3, Blue, 4, &[(White, 6), (Blue, 3), (Black, 3)]),
    card("3_6_23_4", 3, Red, 4, &[(Green, 6), (Blue, 3), (Red, 3)]),
    card("3_5_33_0", 3, White, 3, &[(Red, 5), (Blue, 3), (Green, 3), (Black, 3)]),
    card("3_5_33_1", 3, Green, 3, &[(White, 5), (Blue, 3), (Red, 3), (Black, 3)]),
    card("3_5_33_2", 3, Black, 3, &[(Green, 5), (White, 3), (Blue, 3), (Red, 3)]),
    card("3_5_33_3", 3, Blue, 3, &[(Black, 5), (White, 3), (Green, 3), (Red, 3)]),
    card("3_5_33_4", 3, Red, 3, &[(Blue, 5), (White, 3), (Green, 3), (Black, 3)]),
];
