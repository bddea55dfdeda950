use crate::action::ActionTransition;
use crate::env::{BattleEnv, RngSource};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{BattleState, LogTag, Position, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("battle is already over")]
    PhaseTerminal,

    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {0} is not on the grid")]
    NotPlaced(UnitId),

    #[error("destination {destination} is out of bounds")]
    OutOfBounds { destination: Position },

    #[error("destination {destination} is the unit's current tile")]
    NoMovement { destination: Position },

    #[error("destination {destination} is {distance} tiles away, agi allows {agi}")]
    OutOfRange {
        destination: Position,
        distance: u32,
        agi: i32,
    },

    #[error("destination {destination} is blocked")]
    Blocked { destination: Position },

    #[error("destination {destination} is occupied")]
    Occupied { destination: Position },
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PhaseTerminal | Self::UnitNotFound(_) | Self::NotPlaced(_) => {
                ErrorSeverity::Validation
            }
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PhaseTerminal => "MOVE_PHASE_TERMINAL",
            Self::UnitNotFound(_) => "MOVE_UNIT_NOT_FOUND",
            Self::NotPlaced(_) => "MOVE_NOT_PLACED",
            Self::OutOfBounds { .. } => "MOVE_OUT_OF_BOUNDS",
            Self::NoMovement { .. } => "MOVE_NO_MOVEMENT",
            Self::OutOfRange { .. } => "MOVE_OUT_OF_RANGE",
            Self::Blocked { .. } => "MOVE_BLOCKED",
            Self::Occupied { .. } => "MOVE_OCCUPIED",
        }
    }
}

/// Relocates a unit to any walkable tile within its AGI, measured as
/// Manhattan distance. Tiles in between are not inspected.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub actor: UnitId,
    pub destination: Position,
}

impl MoveAction {
    pub fn new(actor: impl Into<UnitId>, destination: Position) -> Self {
        Self {
            actor: actor.into(),
            destination,
        }
    }
}

impl ActionTransition for MoveAction {
    type Error = MoveError;
    type Result = Position;

    fn actor(&self) -> &UnitId {
        &self.actor
    }

    fn pre_validate(&self, state: &BattleState, _env: &BattleEnv<'_>) -> Result<(), Self::Error> {
        if state.is_terminal() {
            return Err(MoveError::PhaseTerminal);
        }
        let unit = state
            .unit(&self.actor)
            .ok_or_else(|| MoveError::UnitNotFound(self.actor.clone()))?;
        let origin = unit
            .position
            .ok_or_else(|| MoveError::NotPlaced(self.actor.clone()))?;

        let destination = self.destination;
        if !state.is_inside_bounds(destination) {
            return Err(MoveError::OutOfBounds { destination });
        }

        let distance = origin.manhattan(destination);
        if distance == 0 {
            return Err(MoveError::NoMovement { destination });
        }
        if i64::from(distance) > i64::from(unit.stats.agi) {
            return Err(MoveError::OutOfRange {
                destination,
                distance,
                agi: unit.stats.agi,
            });
        }

        if !state.grid.is_passable(destination) {
            return Err(MoveError::Blocked { destination });
        }
        if state.unit_at(destination).is_some() {
            return Err(MoveError::Occupied { destination });
        }

        Ok(())
    }

    fn apply<R: RngSource + ?Sized>(
        &self,
        state: &mut BattleState,
        _env: &BattleEnv<'_>,
        _rng: &mut R,
    ) -> Result<Self::Result, Self::Error> {
        let unit = state
            .unit_mut(&self.actor)
            .ok_or_else(|| MoveError::UnitNotFound(self.actor.clone()))?;
        let origin = unit
            .position
            .replace(self.destination)
            .ok_or_else(|| MoveError::NotPlaced(self.actor.clone()))?;
        let name = unit.name.clone();

        state.log.push(
            LogTag::Move,
            format!("{name} repositions to {}.", self.destination),
        );
        Ok(origin)
    }

    fn post_validate(&self, state: &BattleState, _env: &BattleEnv<'_>) -> Result<(), Self::Error> {
        let occupants = state
            .units
            .iter()
            .filter(|unit| unit.position == Some(self.destination))
            .count();
        if occupants > 1 {
            return Err(MoveError::Occupied {
                destination: self.destination,
            });
        }
        Ok(())
    }
}
