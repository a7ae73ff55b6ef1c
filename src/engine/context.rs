//! Transaction-scoped state shared by the rule procedures.

use tracing::{debug, instrument, warn};

use crate::store::GameTx;
use crate::{EngineError, GameBasics, GameState, UserId, Version};

/// Where a game goes after a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Next lifecycle state.
    pub state: GameState,
    /// Next player to act.
    pub current: UserId,
}

/// One move in progress: the open transaction plus the header read at its
/// start.
///
/// Lives only for the duration of a single [`GameStore::transact`] call and
/// is handed to the rule procedures by reference.
///
/// [`GameStore::transact`]: crate::GameStore::transact
pub struct MoveContext<'t> {
    tx: &'t mut dyn GameTx,
    basics: GameBasics,
    players: Vec<UserId>,
    seat: usize,
}

impl<'t> MoveContext<'t> {
    /// Reads the game header and checks that `user_id` is the one to act.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] if the user does not play in the game,
    /// [`EngineError::NotYourTurn`] if someone else is current.
    #[instrument(skip(tx), fields(game_id = %tx.game_id()))]
    pub fn load(tx: &'t mut dyn GameTx, user_id: &str) -> Result<Self, EngineError> {
        let basics = tx.basics()?;
        let players = tx.players()?;

        let seat = players
            .iter()
            .position(|player| player == user_id)
            .ok_or_else(|| {
                debug!("User does not play in this game");
                EngineError::NotFound
            })?;

        if basics.current != user_id {
            warn!(current = %basics.current, "Move out of turn");
            return Err(EngineError::NotYourTurn);
        }

        Ok(Self {
            tx,
            basics,
            players,
            seat,
        })
    }

    /// The open transaction.
    pub fn tx(&mut self) -> &mut dyn GameTx {
        &mut *self.tx
    }

    /// Header as read when the move started.
    pub fn basics(&self) -> &GameBasics {
        &self.basics
    }

    /// Players in turn order.
    pub fn players(&self) -> &[UserId] {
        &self.players
    }

    /// The acting player.
    pub fn user(&self) -> &str {
        &self.players[self.seat]
    }

    /// Fails unless the game is in normal play.
    pub fn require_playing(&self) -> Result<(), EngineError> {
        match self.basics.state {
            GameState::Playing => Ok(()),
            state => Err(EngineError::WrongState(state)),
        }
    }

    /// The actor's cyclic successor in turn order.
    pub fn next_player(&self) -> &str {
        &self.players[(self.seat + 1) % self.players.len()]
    }

    /// Hands the turn to the next player.
    pub fn advance(&self) -> Transition {
        Transition {
            state: GameState::Playing,
            current: self.next_player().to_string(),
        }
    }

    /// Keeps the actor current and moves the game to `state`.
    pub fn stay(&self, state: GameState) -> Transition {
        Transition {
            state,
            current: self.user().to_string(),
        }
    }

    /// Commits the move if nobody else committed since it started.
    ///
    /// # Errors
    ///
    /// [`EngineError::Conflict`] if the version moved on.
    pub fn commit(self, next: Transition) -> Result<Version, EngineError> {
        self.tx
            .commit_if_version(self.basics.version, next.state, &next.current)
    }
}
