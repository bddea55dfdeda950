//! State lookup errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::UnitId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {0} is not on the grid")]
    UnitNotPlaced(UnitId),
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitNotFound(_) => "STATE_UNIT_NOT_FOUND",
            Self::UnitNotPlaced(_) => "STATE_UNIT_NOT_PLACED",
        }
    }
}
