//! End-to-end processing of one move.

use tracing::{info, instrument, warn};

use crate::engine::context::MoveContext;
use crate::engine::rules;
use crate::{EngineError, GameStore, Move, Version};

/// Applies moves to games held in a [`GameStore`].
///
/// Each call runs in its own transaction and either commits exactly one
/// version transition or changes nothing. Conflicts are reported, never
/// retried here.
#[derive(Debug)]
pub struct TurnSequencer<'s, S> {
    store: &'s S,
}

impl<'s, S: GameStore> TurnSequencer<'s, S> {
    /// Creates a sequencer over `store`.
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Validates, applies and commits one move.
    ///
    /// Returns the game's new version.
    ///
    /// # Errors
    ///
    /// Any [`EngineError`]; the game is unchanged in every case.
    #[instrument(skip(self), fields(kind = mv.kind()))]
    pub fn apply_move(
        &self,
        game_id: &str,
        user_id: &str,
        mv: &Move,
    ) -> Result<Version, EngineError> {
        mv.validate()?;

        let result = self.store.transact(game_id, |tx| {
            let mut ctx = MoveContext::load(tx, user_id)?;
            let next = rules::apply(&mut ctx, mv)?;
            ctx.commit(next)
        });

        match &result {
            Ok(version) => info!(version, %mv, "Move committed"),
            Err(EngineError::Store(err)) => warn!(error = %err, "Move failed in storage"),
            Err(err) => warn!(error = %err, %mv, "Move rejected"),
        }
        result
    }
}
