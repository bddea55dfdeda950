//! Error types for the action execution pipeline.

use crate::action::{ActionTransition, AttackAction, MoveAction, PlayCardAction};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{StateError, UnitId};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors raised by the turn sequencer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("battle is already over")]
    PhaseTerminal,

    #[error("turn order is empty")]
    EmptyTurnOrder,
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PhaseTerminal => ErrorSeverity::Validation,
            Self::EmptyTurnOrder => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PhaseTerminal => "TURN_PHASE_TERMINAL",
            Self::EmptyTurnOrder => "TURN_EMPTY_ORDER",
        }
    }
}

/// Errors raised when an AI policy is asked to act for the wrong unit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiError {
    #[error("battle is already over")]
    PhaseTerminal,

    #[error("no unit is active")]
    NoActiveUnit,

    #[error("active unit {0} is not enemy-controlled")]
    NotEnemyTurn(UnitId),

    #[error("active unit {0} is not player-controlled")]
    NotPlayerTurn(UnitId),

    #[error("active unit {0} is not on the grid")]
    NotPlaced(UnitId),
}

impl GameError for AiError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PhaseTerminal => "AI_PHASE_TERMINAL",
            Self::NoActiveUnit => "AI_NO_ACTIVE_UNIT",
            Self::NotEnemyTurn(_) => "AI_NOT_ENEMY_TURN",
            Self::NotPlayerTurn(_) => "AI_NOT_PLAYER_TURN",
            Self::NotPlaced(_) => "AI_NOT_PLACED",
        }
    }
}

/// Errors surfaced while executing anything through the battle engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    #[error("move action failed: {0}")]
    Move(TransitionPhaseError<<MoveAction as ActionTransition>::Error>),

    #[error("attack action failed: {0}")]
    Attack(TransitionPhaseError<<AttackAction as ActionTransition>::Error>),

    #[error("play card action failed: {0}")]
    PlayCard(TransitionPhaseError<<PlayCardAction as ActionTransition>::Error>),

    #[error("turn advance failed: {0}")]
    Turn(#[from] TurnError),

    #[error("ai decision failed: {0}")]
    Ai(#[from] AiError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl ExecuteError {
    /// Pipeline phase that produced the error, for action failures.
    pub fn phase(&self) -> Option<TransitionPhase> {
        match self {
            Self::Move(err) => Some(err.phase),
            Self::Attack(err) => Some(err.phase),
            Self::PlayCard(err) => Some(err.phase),
            _ => None,
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Move(err) => err.error.severity(),
            Self::Attack(err) => err.error.severity(),
            Self::PlayCard(err) => err.error.severity(),
            Self::Turn(err) => err.severity(),
            Self::Ai(err) => err.severity(),
            Self::State(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Move(err) => err.error.error_code(),
            Self::Attack(err) => err.error.error_code(),
            Self::PlayCard(err) => err.error.error_code(),
            Self::Turn(err) => err.error_code(),
            Self::Ai(err) => err.error_code(),
            Self::State(err) => err.error_code(),
        }
    }
}
