//! Player- and AI-issued battle actions.
//!
//! Every action is an [`ActionTransition`]: `pre_validate` checks the
//! snapshot without touching it, `apply` mutates a working copy. The engine
//! only runs `apply` after validation succeeded, so a rejected action never
//! leaves partial changes behind.
//!
//! # Module Structure
//!
//! - `movement`: straight-line relocation within AGI range
//! - `combat`: the attack primitive with jam and accuracy rolls
//! - `card`: playing a card from hand
//! - `types`: the [`Action`] envelope and [`ActionResult`]

pub mod card;
pub mod combat;
pub mod movement;
pub mod types;

pub use card::{CardError, CardOutcome, CardResolution, PlayCardAction, check_card_target};
pub use combat::{AttackAction, AttackError};
pub use movement::{MoveAction, MoveError};
pub use types::{Action, ActionResult};

use crate::env::{BattleEnv, RngSource};
use crate::state::{BattleState, UnitId};

/// Defines how a concrete action validates against and mutates a snapshot.
pub trait ActionTransition {
    type Error;
    type Result;

    /// Unit performing this action.
    fn actor(&self) -> &UnitId;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, state: &BattleState, env: &BattleEnv<'_>) -> Result<(), Self::Error>;

    /// Applies the action. Implementations may assume `pre_validate` passed.
    fn apply<R: RngSource + ?Sized>(
        &self,
        state: &mut BattleState,
        env: &BattleEnv<'_>,
        rng: &mut R,
    ) -> Result<Self::Result, Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &BattleState, _env: &BattleEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}
