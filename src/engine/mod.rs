//! Move processing: input shapes, rule procedures and the turn sequencer.

mod context;
mod moves;
pub mod rules;
mod sequencer;

pub use context::{MoveContext, Transition};
pub use moves::Move;
pub use sequencer::TurnSequencer;
