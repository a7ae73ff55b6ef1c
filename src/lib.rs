//! Strictly Splendor - move-processing engine for a gem-trading card game
//!
//! Games are persisted aggregates changed only by player moves. Every move
//! is validated, applied and committed exactly once, in turn order, guarded
//! by an optimistic version check.
//!
//! # Architecture
//!
//! - **Catalog**: immutable card and noble tables shared by every game
//! - **Ledger**: coin arithmetic for taking coins and paying for cards
//! - **Store**: the persistence port, with in-memory and SQLite backends
//! - **Engine**: move shapes, one rule procedure per move, the turn sequencer
//! - **Lifecycle**: dealing, reading, listing and deleting games
//!
//! # Example
//!
//! ```no_run
//! use strictly_splendor::{GameService, MemoryStore, SeededRandom};
//!
//! # fn example() -> Result<(), strictly_splendor::EngineError> {
//! let service = GameService::new(MemoryStore::new(), Box::new(SeededRandom::from_seed(1)));
//! let game = service.new_game(&["ann".to_string(), "bob".to_string()])?;
//! let view = service.get_game(&game, "ann")?;
//! service.take_three(&game, &view.current_player, &["red", "green", "blue"])?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod catalog;
mod config;
mod db;
mod engine;
mod error;
mod invariants;
mod ledger;
mod lifecycle;
mod model;
mod rng;
mod store;
mod view;

// Crate-level exports - Catalog
pub use catalog::{
    Card, Color, Noble, SLOTS_PER_TIER, TIERS, all_cards, all_nobles, card, noble,
};

// Crate-level exports - Ledger
pub use ledger::{CoinTransfer, Gems, earn_coins, pay_cost};

// Crate-level exports - Randomness
pub use rng::{OsRandom, RandomSource, SeededRandom, pick, shuffle};

// Crate-level exports - Errors
pub use error::{EngineError, StoreError};

// Crate-level exports - Game aggregate
pub use model::{
    CardId, GameBasics, GameId, GameSnapshot, GameState, GameSummary, Hand, NobleId, Seat,
    TableRow, UserId, Version,
};

// Crate-level exports - Persistence
pub use db::{MIGRATIONS, SqliteStore};
pub use store::{GameStore, GameTx, MemoryStore};

// Crate-level exports - Engine
pub use engine::rules::{MAX_RESERVED, TAKE_TWO_FLOOR, WINNING_POINTS};
pub use engine::{Move, MoveContext, Transition, TurnSequencer};

// Crate-level exports - Lifecycle and read model
pub use lifecycle::{GameService, MAX_PLAYERS, MIN_PLAYERS, deal_game, starting_bank};
pub use view::{CardView, GameView, NobleView, PlayerView, TableView};

// Crate-level exports - Invariants
pub use invariants::{
    CardUniqueness, CoinConservation, CurrentPlayerSeated, Invariant, InvariantSet,
    InvariantViolation, ReserveCap, SplendorInvariants, coins_in_play,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, EngineConfig};
