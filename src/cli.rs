//! Command-line interface for strictly_splendor.

use clap::{Parser, Subcommand};

/// Strictly Splendor - play gem-trading games against a SQLite database
#[derive(Parser, Debug)]
#[command(name = "strictly_splendor")]
#[command(about = "Move-processing engine for a turn-based gem-trading game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (optional; defaults apply when missing)
    #[arg(short, long, default_value = "strictly_splendor.toml", global = true)]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or upgrade the database schema
    Migrate,

    /// Deal a new game and print its id
    NewGame {
        /// Player ids (2 to 4)
        #[arg(required = true, num_args = 2..=4)]
        players: Vec<String>,
    },

    /// Print a game as JSON
    Show {
        /// Game id
        game: String,

        /// Acting user
        #[arg(short, long)]
        user: String,
    },

    /// List the games a user plays in
    List {
        /// Acting user
        #[arg(short, long)]
        user: String,
    },

    /// Delete a game
    Delete {
        /// Game id
        game: String,

        /// Acting user
        #[arg(short, long)]
        user: String,
    },

    /// Take one coin of three different colours
    TakeThree {
        /// Game id
        game: String,

        /// Acting user
        #[arg(short, long)]
        user: String,

        /// Colours (white, black, green, blue, red)
        #[arg(num_args = 3)]
        colors: Vec<String>,
    },

    /// Take two coins of one colour
    TakeTwo {
        /// Game id
        game: String,

        /// Acting user
        #[arg(short, long)]
        user: String,

        /// Colour
        color: String,
    },

    /// Reserve a face-up card
    Reserve {
        /// Game id
        game: String,

        /// Acting user
        #[arg(short, long)]
        user: String,

        /// Tier (1-3)
        #[arg(allow_negative_numbers = true)]
        tier: i64,

        /// Slot within the tier (0-3)
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Buy a face-up card
    Buy {
        /// Game id
        game: String,

        /// Acting user
        #[arg(short, long)]
        user: String,

        /// Tier (1-3)
        #[arg(allow_negative_numbers = true)]
        tier: i64,

        /// Slot within the tier (0-3)
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
}
