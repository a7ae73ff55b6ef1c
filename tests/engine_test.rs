//! Tests for move processing against the in-memory store.

use strictly_splendor::{
    Color, EngineError, GameService, GameSnapshot, GameState, GameStore, Gems, InvariantSet,
    MAX_RESERVED, MemoryStore, SeededRandom, SplendorInvariants, all_cards, card, deal_game,
    noble,
};

const GAME: &str = "game-1";

/// Deals a two-player game where ann moves first, lets the test rearrange
/// it, and stores it in a fresh in-memory service.
fn setup(
    seed: u64,
    arrange: impl FnOnce(&mut GameSnapshot),
) -> (GameService<MemoryStore>, GameSnapshot) {
    let players = vec!["ann".to_string(), "bob".to_string()];
    let mut game = deal_game(GAME.to_string(), &players, &mut SeededRandom::from_seed(seed))
        .expect("Two players is a valid game");
    game.seats.sort_by(|a, b| a.user.cmp(&b.user));
    game.basics.current = "ann".to_string();
    arrange(&mut game);

    let service = GameService::new(MemoryStore::new(), Box::new(SeededRandom::from_seed(seed)));
    service
        .store()
        .create_game(&game)
        .expect("Failed to store game");
    (service, game)
}

fn load(service: &GameService<MemoryStore>) -> GameSnapshot {
    service.snapshot(GAME, "ann").expect("Failed to load game")
}

fn assert_invariants(game: &GameSnapshot) {
    if let Err(violations) = SplendorInvariants::check_all(game) {
        panic!("Invariants violated: {:?}", violations);
    }
}

/// Removes a card from wherever it is in the game.
fn remove_card(game: &mut GameSnapshot, id: &str) {
    for slot in game.table.iter_mut().flatten() {
        if slot.as_deref() == Some(id) {
            *slot = None;
        }
    }
    for deck in game.decks.iter_mut() {
        deck.retain(|card| card != id);
    }
    for seat in game.seats.iter_mut() {
        seat.hand.owned.retain(|card| card != id);
        seat.hand.reserved.retain(|card| card != id);
    }
}

/// Moves a card into a player's bought cards.
fn give_owned(game: &mut GameSnapshot, user: &str, id: &str) {
    remove_card(game, id);
    game.seat_mut(user)
        .expect("Player is seated")
        .hand
        .owned
        .push(id.to_string());
}

/// Puts a card face up, sending whatever was there to the bottom of its deck.
fn place_on_table(game: &mut GameSnapshot, tier: usize, slot: usize, id: &str) {
    remove_card(game, id);
    if let Some(displaced) = game.table[tier - 1][slot].replace(id.to_string()) {
        game.decks[tier - 1].push(displaced);
    }
}

/// Moves coins from the bank into a purse.
fn fund(game: &mut GameSnapshot, user: &str, coins: &Gems) {
    for (color, count) in coins.nonzero() {
        let left = game.bank[color]
            .checked_sub(count)
            .expect("Bank holds enough to fund the test");
        game.bank.set(color, left);
        game.seat_mut(user)
            .expect("Player is seated")
            .purse
            .deposit(color, count);
    }
}

fn table_cost(game: &GameSnapshot, tier: usize, slot: usize) -> Gems {
    let id = game.table[tier - 1][slot]
        .as_deref()
        .expect("Slot holds a card");
    *card(id).expect("Card is in the catalog").cost()
}

#[test]
fn test_take_three_moves_coins_and_hands_off() {
    let (service, before) = setup(1, |_| {});

    let version = service
        .take_three(GAME, "ann", &["red", "green", "blue"])
        .expect("Bank is full");
    assert_eq!(version, 1);

    let after = load(&service);
    assert_eq!(after.basics.version, 1);
    assert_eq!(after.basics.current, "bob");
    assert_eq!(
        after.seat("ann").unwrap().purse,
        Gems::of(&[(Color::Red, 1), (Color::Green, 1), (Color::Blue, 1)])
    );
    assert_eq!(after.bank[Color::Red], before.bank[Color::Red] - 1);
    assert_eq!(after.bank[Color::White], before.bank[Color::White]);
    assert_invariants(&after);

    let version = service
        .take_three(GAME, "bob", &["white", "black", "red"])
        .expect("Bank still has coins");
    assert_eq!(version, 2);
    assert_eq!(load(&service).basics.current, "ann");
}

#[test]
fn test_move_out_of_turn_changes_nothing() {
    let (service, before) = setup(2, |_| {});

    let err = service.take_two(GAME, "bob", "red").unwrap_err();
    assert_eq!(err, EngineError::NotYourTurn);
    assert_eq!(load(&service), before);
}

#[test]
fn test_strangers_and_missing_games_are_not_found() {
    let (service, before) = setup(3, |_| {});

    assert_eq!(
        service.take_two(GAME, "eve", "red"),
        Err(EngineError::NotFound)
    );
    assert_eq!(
        service.take_two("no-such-game", "ann", "red"),
        Err(EngineError::NotFound)
    );
    assert_eq!(service.get_game(GAME, "eve"), Err(EngineError::NotFound));
    assert_eq!(load(&service), before);
}

#[test]
fn test_bad_input_is_rejected_before_reading_the_game() {
    let (service, before) = setup(4, |_| {});

    for result in [
        service.take_three(GAME, "ann", &["red", "red", "blue"]),
        service.take_three(GAME, "ann", &["red", "wild", "blue"]),
        service.take_two(GAME, "ann", "gold"),
        service.reserve(GAME, "ann", 0, 0),
        service.buy(GAME, "ann", 1, 4),
    ] {
        assert!(matches!(result, Err(EngineError::Validation(_))), "{result:?}");
    }
    assert_eq!(load(&service), before);
}

#[test]
fn test_take_two_needs_four_in_bank() {
    let (service, _) = setup(5, |_| {});

    service
        .take_two(GAME, "ann", "red")
        .expect("Two-player bank starts with four of each");

    let before = load(&service);
    assert_eq!(before.bank[Color::Red], 2);
    assert_eq!(
        service.take_two(GAME, "bob", "red"),
        Err(EngineError::InsufficientCoins)
    );
    assert_eq!(load(&service), before);

    service
        .take_two(GAME, "bob", "green")
        .expect("Green is untouched");
    let after = load(&service);
    assert_eq!(after.seat("bob").unwrap().purse[Color::Green], 2);
    assert_invariants(&after);
}

#[test]
fn test_reserve_deals_replacement_and_grants_wildcard() {
    let (service, before) = setup(6, |_| {});
    let first = before.table[0][0].clone().expect("Slot dealt");

    service.reserve(GAME, "ann", 1, 0).expect("Slot has a card");

    let after = load(&service);
    let ann = after.seat("ann").unwrap();
    assert_eq!(ann.hand.reserved, vec![first]);
    assert_eq!(ann.purse[Color::Wild], 1);
    assert_eq!(after.bank[Color::Wild], before.bank[Color::Wild] - 1);
    assert_eq!(after.table[0][0], before.decks[0].first().cloned());
    assert_eq!(after.decks[0].len(), before.decks[0].len() - 1);
    assert_eq!(after.basics.current, "bob");
    assert_invariants(&after);
}

#[test]
fn test_fourth_reserve_is_refused() {
    let (service, before) = setup(7, |_| {});

    for _ in 0..MAX_RESERVED {
        service.reserve(GAME, "ann", 1, 0).expect("Under the cap");
        service
            .take_three(GAME, "bob", &["white", "black", "green"])
            .expect("Bank has coins");
    }

    let held = load(&service);
    let ann = held.seat("ann").unwrap();
    let mut expected = vec![before.table[0][0].clone().unwrap()];
    expected.extend(before.decks[0][..2].iter().cloned());
    assert_eq!(ann.hand.reserved, expected);
    assert_eq!(ann.purse[Color::Wild], 3);

    assert_eq!(
        service.reserve(GAME, "ann", 2, 1),
        Err(EngineError::TooManyReserved)
    );
    assert_eq!(load(&service), held);
    assert_invariants(&held);
}

#[test]
fn test_reserve_without_wildcards_still_succeeds() {
    let (service, _) = setup(8, |game| {
        let wilds = Gems::of(&[(Color::Wild, game.bank[Color::Wild])]);
        fund(game, "bob", &wilds);
    });

    service
        .reserve(GAME, "ann", 3, 2)
        .expect("Missing bonus is not an error");

    let after = load(&service);
    assert_eq!(after.seat("ann").unwrap().hand.reserved.len(), 1);
    assert_eq!(after.seat("ann").unwrap().purse[Color::Wild], 0);
    assert_eq!(after.bank[Color::Wild], 0);
    assert_invariants(&after);
}

#[test]
fn test_reserving_from_exhausted_tier_leaves_slot_empty() {
    let (service, before) = setup(9, |game| {
        for id in std::mem::take(&mut game.decks[2]) {
            game.seat_mut("bob").unwrap().hand.owned.push(id);
        }
    });

    service.reserve(GAME, "ann", 3, 1).expect("Slot has a card");

    let after = load(&service);
    assert_eq!(after.table[2][1], None);
    assert_eq!(after.table[2][0], before.table[2][0]);
    assert_invariants(&after);

    service
        .take_three(GAME, "bob", &["white", "black", "green"])
        .expect("Bank has coins");
    assert_eq!(
        service.reserve(GAME, "ann", 3, 1),
        Err(EngineError::NoCardThere)
    );
    assert_eq!(
        service.buy(GAME, "ann", 3, 1),
        Err(EngineError::NoCardThere)
    );
}

#[test]
fn test_buy_pays_shortfall_in_wildcards() {
    let (service, before) = setup(10, |game| {
        let mut coins = table_cost(game, 1, 0);
        let (color, _) = coins.nonzero().next().expect("Cards cost something");
        coins.set(color, coins[color] - 1);
        coins.deposit(Color::Wild, 1);
        fund(game, "ann", &coins);
    });
    let bought = before.table[0][0].clone().unwrap();

    service.buy(GAME, "ann", 1, 0).expect("Purse plus wildcard covers it");

    let after = load(&service);
    let ann = after.seat("ann").unwrap();
    assert_eq!(ann.purse, Gems::EMPTY);
    assert_eq!(ann.hand.owned, vec![bought]);
    assert_eq!(after.bank, Gems::uniform(4, 5));
    assert_eq!(after.table[0][0], before.decks[0].first().cloned());
    assert_eq!(after.basics.state, GameState::Playing);
    assert_eq!(after.basics.current, "bob");
    assert_invariants(&after);
}

#[test]
fn test_buy_without_enough_coins_changes_nothing() {
    let (service, before) = setup(11, |game| {
        let mut coins = table_cost(game, 1, 3);
        let (color, _) = coins.nonzero().next().expect("Cards cost something");
        coins.set(color, coins[color] - 1);
        fund(game, "ann", &coins);
    });

    assert_eq!(
        service.buy(GAME, "ann", 1, 3),
        Err(EngineError::InsufficientCoins)
    );
    assert_eq!(load(&service), before);
}

#[test]
fn test_buying_last_card_of_tier_leaves_slot_empty() {
    let (service, _) = setup(12, |game| {
        for id in std::mem::take(&mut game.decks[0]) {
            game.seat_mut("bob").unwrap().hand.owned.push(id);
        }
        let cost = table_cost(game, 1, 2);
        fund(game, "ann", &cost);
    });

    service.buy(GAME, "ann", 1, 2).expect("Ann can afford it");

    let after = load(&service);
    assert_eq!(after.table[0][2], None);
    assert_eq!(after.basics.state, GameState::Playing);
    assert_eq!(after.basics.current, "bob");
    assert_invariants(&after);
}

/// Gives `user` all but one of the zero-point cards the first noble on
/// offer wants, puts the missing one in tier 1 slot 0, and funds its cost.
fn arrange_noble_due(game: &mut GameSnapshot, user: &str) {
    let noble_id = game.nobles[0].clone();
    let wanted = *noble(&noble_id).expect("Noble is in the catalog").cost();

    let mut first = true;
    for (color, count) in wanted.nonzero() {
        let cheap: Vec<&str> = all_cards()
            .filter(|c| c.tier() == 1 && c.color() == color && c.points() == 0)
            .map(|c| c.id())
            .collect();
        let count = count as usize;
        if first {
            for id in &cheap[..count - 1] {
                give_owned(game, user, id);
            }
            place_on_table(game, 1, 0, cheap[count - 1]);
            first = false;
        } else {
            for id in &cheap[..count] {
                give_owned(game, user, id);
            }
        }
    }

    let cost = table_cost(game, 1, 0);
    fund(game, user, &cost);
}

#[test]
fn test_buy_that_attracts_noble_waits_for_pick() {
    let (service, _) = setup(13, |game| arrange_noble_due(game, "ann"));

    let version = service.buy(GAME, "ann", 1, 0).expect("Ann can afford it");
    assert_eq!(version, 1);

    let after = load(&service);
    assert_eq!(after.basics.state, GameState::PickingNoble);
    assert_eq!(after.basics.current, "ann");
    assert!(after.seat("ann").unwrap().nobles.is_empty());
    assert_invariants(&after);

    assert_eq!(
        service.take_three(GAME, "ann", &["red", "green", "blue"]),
        Err(EngineError::WrongState(GameState::PickingNoble))
    );
    assert_eq!(
        service.take_three(GAME, "bob", &["red", "green", "blue"]),
        Err(EngineError::NotYourTurn)
    );
    assert_eq!(load(&service), after);
}

#[test]
fn test_noble_visit_takes_precedence_over_win() {
    let (service, _) = setup(15, |game| {
        let mut points = 0;
        let rich: Vec<&str> = all_cards()
            .filter(|c| c.tier() == 3)
            .map(|c| c.id())
            .collect();
        for id in rich {
            if points >= 15 {
                break;
            }
            give_owned(game, "ann", id);
            points += card(id).expect("Card is in the catalog").points();
        }
        arrange_noble_due(game, "ann");
    });

    service.buy(GAME, "ann", 1, 0).expect("Ann can afford it");

    let after = load(&service);
    assert_eq!(after.basics.state, GameState::PickingNoble);
    assert_eq!(after.basics.current, "ann");
    let view = service.get_game(GAME, "ann").expect("Ann plays");
    assert!(view.player("ann").unwrap().points >= 15);
    assert_invariants(&after);
}

#[test]
fn test_winning_score_ends_the_game() {
    let (service, _) = setup(14, |game| {
        game.nobles.clear();
        let mut points = 0;
        let rich: Vec<_> = all_cards().filter(|c| c.tier() == 3).collect();
        for c in rich {
            if points >= 15 {
                break;
            }
            give_owned(game, "bob", c.id());
            points += c.points();
        }
        let cost = table_cost(game, 1, 1);
        fund(game, "ann", &cost);
    });

    service.buy(GAME, "ann", 1, 1).expect("Ann can afford it");

    let after = load(&service);
    assert_eq!(after.basics.state, GameState::Over);
    assert_eq!(after.basics.current, "ann");

    let view = service.get_game(GAME, "bob").expect("Bob plays");
    assert!(view.player("bob").unwrap().points >= 15);

    assert_eq!(
        service.take_two(GAME, "ann", "white"),
        Err(EngineError::WrongState(GameState::Over))
    );
    assert_eq!(
        service.take_two(GAME, "bob", "white"),
        Err(EngineError::NotYourTurn)
    );
}

#[test]
fn test_view_of_fresh_game() {
    let (service, before) = setup(15, |_| {});

    let view = service.get_game(GAME, "bob").expect("Bob plays");
    assert_eq!(view.version, 0);
    assert_eq!(view.state, GameState::Playing);
    assert_eq!(view.current_player, "ann");
    assert_eq!(view.table.nobles.len(), 3);
    assert_eq!(view.table.deck_sizes, [36, 26, 16]);
    assert!(view.table.rows.iter().flatten().all(Option::is_some));
    assert_eq!(view.table.bank, before.bank);
    assert_eq!(view.players.len(), 2);
    assert!(view.players.iter().all(|p| p.points == 0 && p.cards.is_empty()));

    let json = serde_json::to_value(&view).expect("View serializes");
    assert_eq!(json["current_player"], "ann");
    assert_eq!(json["table"]["bank"]["wild"], 5);
}

/// Plays a greedy game to the end, checking every invariant after every
/// committed move and that every rejected move leaves the game untouched.
#[test]
fn test_scripted_game_keeps_invariants() {
    let service = GameService::new(MemoryStore::new(), Box::new(SeededRandom::from_seed(99)));
    let players = vec!["ann".to_string(), "bob".to_string(), "cat".to_string()];
    let game = service.new_game(&players).expect("Three players");

    let colors = ["white", "black", "green", "blue", "red"];
    let mut version = 0;
    for turn in 0..300 {
        let before = service.snapshot(&game, "ann").expect("Game exists");
        assert_invariants(&before);
        if before.basics.state != GameState::Playing {
            break;
        }
        let user = before.basics.current.clone();

        let mut committed = (1..=3)
            .rev()
            .flat_map(|tier| (0..4).map(move |index| (tier, index)))
            .find_map(|(tier, index)| service.buy(&game, &user, tier, index).ok());

        if committed.is_none() {
            let offset = turn % colors.len();
            let pick: Vec<&str> = (0..3).map(|i| colors[(offset + i) % colors.len()]).collect();
            committed = service.take_three(&game, &user, pick.as_slice()).ok();
        }
        if committed.is_none() {
            committed = (1..=3)
                .flat_map(|tier| (0..4).map(move |index| (tier, index)))
                .find_map(|(tier, index)| service.reserve(&game, &user, tier, index).ok());
        }
        if committed.is_none() {
            committed = colors
                .iter()
                .find_map(|color| service.take_two(&game, &user, color).ok());
        }

        match committed {
            Some(next) => {
                assert_eq!(next, version + 1, "Each move bumps the version by one");
                version = next;
            }
            None => {
                assert_eq!(service.snapshot(&game, "ann").unwrap(), before);
                break;
            }
        }
    }

    assert!(version > 10, "Game should get well under way");
}
