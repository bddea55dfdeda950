//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the battle engine, content loading, and action
//! providers so clients can bubble them up with consistent context.
use std::fmt;

use tactics_core::{BattleState, ExecuteError, GameError, SetupError, Side, UnitId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),

    #[error("command actor {provided} does not match active unit {expected:?}")]
    InvalidActionActor {
        expected: Option<UnitId>,
        provided: UnitId,
    },

    #[error("no earlier snapshot to restore")]
    NothingToUndo,

    #[error("battle did not finish within {max_steps} steps")]
    StepLimit { max_steps: usize },

    #[error("{kind} action provider has no command left")]
    ProviderExhausted { kind: ProviderKind },

    #[error("replay diverged at command {index}: {source}")]
    ReplayDiverged {
        index: usize,
        #[source]
        source: Box<RuntimeError>,
    },
}

impl RuntimeError {
    /// Whether the session can continue after this error.
    ///
    /// Rejected commands leave the session untouched; everything else points
    /// at broken content or a misbehaving provider.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RuntimeError::Execute(err) => !err.severity().is_internal(),
            RuntimeError::InvalidActionActor { .. } | RuntimeError::NothingToUndo => true,
            _ => false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    Player,
    Enemy,
}

impl ProviderKind {
    /// The side whose turn a provider was asked to fill.
    pub fn of_active(state: &BattleState) -> Self {
        match state.active_unit().map(|unit| unit.side) {
            Some(Side::Enemy) => ProviderKind::Enemy,
            _ => ProviderKind::Player,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Player => "player",
            ProviderKind::Enemy => "enemy",
        };
        write!(f, "{}", label)
    }
}
