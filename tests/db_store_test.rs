//! Tests for the SQLite game store.

use tempfile::NamedTempFile;

use strictly_splendor::{
    Color, EngineError, GameService, GameSnapshot, GameState, GameStore, Gems, InvariantSet,
    SeededRandom, SplendorInvariants, SqliteStore, card, deal_game,
};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready store.
fn setup_test_db() -> (NamedTempFile, SqliteStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let store = SqliteStore::new(db_path).expect("Failed to create store");
    store.run_migrations().expect("Migrations failed");
    (db_file, store)
}

fn players(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn dealt(id: &str, names: &[&str], seed: u64) -> GameSnapshot {
    deal_game(id.to_string(), &players(names), &mut SeededRandom::from_seed(seed))
        .expect("Valid players")
}

/// Two-player game with ann to move and seats in name order.
fn dealt_for_ann(id: &str, seed: u64) -> GameSnapshot {
    let mut game = dealt(id, &["ann", "bob"], seed);
    game.basics.current = "ann".to_string();
    game.seats.sort_by(|a, b| a.user.cmp(&b.user));
    game
}

/// Moves exactly the coins for the card at `tier`/`slot` from bank to purse.
fn fund_for(game: &mut GameSnapshot, user: &str, tier: usize, slot: usize) -> String {
    let id = game.table[tier - 1][slot]
        .clone()
        .expect("Slot holds a card");
    let cost = *card(&id).expect("Card is in the catalog").cost();
    for (color, count) in cost.nonzero() {
        let left = game.bank[color]
            .checked_sub(count)
            .expect("Bank holds enough");
        game.bank.set(color, left);
        game.seat_mut(user)
            .expect("Player is seated")
            .purse
            .deposit(color, count);
    }
    id
}

fn assert_invariants(game: &GameSnapshot) {
    if let Err(violations) = SplendorInvariants::check_all(game) {
        panic!("Invariants violated: {:?}", violations);
    }
}

fn load(store: &SqliteStore, id: &str) -> GameSnapshot {
    store
        .transact(id, |tx| GameSnapshot::load(tx))
        .expect("Failed to load game")
}

#[test]
fn test_migrations_are_idempotent() {
    let (_db, store) = setup_test_db();
    store.run_migrations().expect("Second run is a no-op");
}

#[test]
fn test_empty_path_is_rejected() {
    assert!(SqliteStore::new(String::new()).is_err());
}

#[test]
fn test_created_game_loads_back_identically() {
    let (_db, store) = setup_test_db();
    let game = dealt("g1", &["ann", "bob", "cat"], 1);

    store.create_game(&game).expect("Create failed");

    assert_eq!(load(&store, "g1"), game);
}

#[test]
fn test_duplicate_game_id_fails() {
    let (_db, store) = setup_test_db();
    let game = dealt("g1", &["ann", "bob"], 2);
    store.create_game(&game).expect("First create failed");

    let result = store.create_game(&game);
    assert!(matches!(result, Err(EngineError::Store(_))), "{result:?}");
}

#[test]
fn test_missing_game_is_not_found() {
    let (_db, store) = setup_test_db();
    let result = store.transact("nope", |tx| tx.basics());
    assert_eq!(result, Err(EngineError::NotFound));
    assert_eq!(store.delete_game("nope"), Err(EngineError::NotFound));
}

#[test]
fn test_stale_commit_is_a_conflict() {
    let (_db, store) = setup_test_db();
    store
        .create_game(&dealt("g1", &["ann", "bob"], 3))
        .expect("Create failed");

    let version = store
        .transact("g1", |tx| tx.commit_if_version(0, GameState::Playing, "bob"))
        .expect("Version 0 is current");
    assert_eq!(version, 1);

    let stale = store.transact("g1", |tx| {
        let mut bank = tx.bank()?;
        bank.set(Color::Red, 0);
        tx.set_bank(&bank)?;
        tx.commit_if_version(0, GameState::Over, "ann")
    });
    assert_eq!(stale, Err(EngineError::Conflict));

    let game = load(&store, "g1");
    assert_eq!(game.basics.version, 1);
    assert_eq!(game.basics.current, "bob");
    assert_eq!(game.bank[Color::Red], 4, "Conflicting writes roll back");
}

#[test]
fn test_moves_persist_through_service() {
    let (_db, store) = setup_test_db();
    let service = GameService::new(store, Box::new(SeededRandom::from_seed(8)));
    let game = service
        .new_game(&players(&["ann", "bob"]))
        .expect("Create failed");
    assert_eq!(game.len(), 32);
    assert!(game.chars().all(|c| c.is_ascii_hexdigit()));

    let first = service.get_game(&game, "ann").expect("Ann plays").current_player;
    let second = if first == "ann" { "bob" } else { "ann" };

    assert_eq!(service.reserve(&game, &first, 2, 3), Ok(1));
    assert_eq!(
        service.take_three(&game, &first, &["red", "green", "blue"]),
        Err(EngineError::NotYourTurn)
    );
    assert_eq!(service.take_two(&game, second, "black"), Ok(2));
    assert_eq!(service.reserve(&game, &first, 2, 3), Ok(3));

    let snapshot = service.snapshot(&game, second).expect("Second plays");
    assert_eq!(snapshot.basics.version, 3);
    assert_eq!(snapshot.basics.current, second);
    assert_eq!(snapshot.seat(&first).unwrap().hand.reserved.len(), 2);
    assert_eq!(snapshot.seat(&first).unwrap().purse[Color::Wild], 2);
    assert_eq!(snapshot.seat(second).unwrap().purse[Color::Black], 2);
    assert_eq!(snapshot.decks[1].len(), 24);
    if let Err(violations) = SplendorInvariants::check_all(&snapshot) {
        panic!("Invariants violated: {:?}", violations);
    }
}

#[test]
fn test_rejected_move_rolls_back() {
    let (_db, store) = setup_test_db();
    let mut game = dealt("g1", &["ann", "bob"], 5);
    game.basics.current = "ann".to_string();
    game.seats.sort_by(|a, b| a.user.cmp(&b.user));
    store.create_game(&game).expect("Create failed");
    let service = GameService::new(store, Box::new(SeededRandom::from_seed(5)));

    assert_eq!(
        service.buy("g1", "ann", 1, 0),
        Err(EngineError::InsufficientCoins)
    );
    assert_eq!(service.snapshot("g1", "ann").unwrap(), game);
}

#[test]
fn test_list_and_delete() {
    let (_db, store) = setup_test_db();
    store
        .create_game(&dealt("g1", &["ann", "bob"], 1))
        .expect("Create failed");
    store
        .create_game(&dealt("g2", &["bob", "cat", "dan"], 2))
        .expect("Create failed");
    let service = GameService::new(store, Box::new(SeededRandom::from_seed(1)));

    let bobs = service.list_games("bob").expect("List failed");
    let ids: Vec<_> = bobs.iter().map(|summary| summary.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"g1") && ids.contains(&"g2"));
    let g2 = bobs.iter().find(|summary| summary.id == "g2").unwrap();
    assert_eq!(g2.players.len(), 3);
    assert_eq!(g2.state, GameState::Playing);

    assert!(service.list_games("eve").expect("List failed").is_empty());

    assert_eq!(service.delete_game("g1", "cat"), Err(EngineError::NotFound));
    service.delete_game("g1", "ann").expect("Ann may delete");
    assert_eq!(service.get_game("g1", "ann"), Err(EngineError::NotFound));
    assert_eq!(service.delete_game("g1", "ann"), Err(EngineError::NotFound));

    let remaining = service.list_games("bob").expect("List failed");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "g2");
}

#[test]
fn test_buying_from_exhausted_tier_persists_empty_slot() {
    let (_db, store) = setup_test_db();
    let mut game = dealt_for_ann("g1", 6);
    for id in std::mem::take(&mut game.decks[0]) {
        game.seat_mut("bob").unwrap().hand.owned.push(id);
    }
    let bought = fund_for(&mut game, "ann", 1, 2);
    let bank_before = game.bank;
    store.create_game(&game).expect("Create failed");
    let service = GameService::new(store, Box::new(SeededRandom::from_seed(6)));

    assert_eq!(service.buy("g1", "ann", 1, 2), Ok(1));

    let after = service.snapshot("g1", "ann").expect("Ann plays");
    assert_eq!(after.table[0][2], None);
    assert!(after.decks[0].is_empty());
    assert_eq!(after.basics.state, GameState::Playing);
    assert_eq!(after.basics.current, "bob");

    let ann = after.seat("ann").unwrap();
    assert_eq!(ann.hand.owned, vec![bought.clone()]);
    assert!(ann.hand.reserved.is_empty());
    assert_eq!(ann.purse, Gems::EMPTY);
    let cost = *card(&bought).unwrap().cost();
    assert_eq!(after.bank, bank_before + cost);
    assert_invariants(&after);

    assert_eq!(service.buy("g1", "bob", 1, 2), Err(EngineError::NoCardThere));
}

#[test]
fn test_winning_buy_is_stored_as_over() {
    let (_db, store) = setup_test_db();
    let mut game = dealt_for_ann("g1", 7);
    let mut points = 0;
    while points < 15 {
        let id = game.decks[2].remove(0);
        points += card(&id).expect("Card is in the catalog").points();
        game.seat_mut("bob").unwrap().hand.owned.push(id);
    }
    fund_for(&mut game, "ann", 1, 1);
    store.create_game(&game).expect("Create failed");
    let service = GameService::new(store, Box::new(SeededRandom::from_seed(7)));

    assert_eq!(service.buy("g1", "ann", 1, 1), Ok(1));

    let after = service.snapshot("g1", "bob").expect("Bob plays");
    assert_eq!(after.basics.state, GameState::Over);
    assert_eq!(after.basics.current, "ann");
    assert_invariants(&after);
    assert_eq!(
        service.take_two("g1", "ann", "red"),
        Err(EngineError::WrongState(GameState::Over))
    );

    let summary = service.list_games("ann").expect("List failed");
    assert_eq!(summary[0].state, GameState::Over);
}

#[test]
fn test_noble_pick_state_round_trips() {
    let (_db, store) = setup_test_db();
    store
        .create_game(&dealt_for_ann("g1", 8))
        .expect("Create failed");

    let version = store
        .transact("g1", |tx| tx.commit_if_version(0, GameState::PickingNoble, "ann"))
        .expect("Version 0 is current");
    assert_eq!(version, 1);

    let game = load(&store, "g1");
    assert_eq!(game.basics.state, GameState::PickingNoble);
    assert_eq!(game.basics.current, "ann");
}
