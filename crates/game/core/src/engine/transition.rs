//! Action transition dispatch and execution logic.

use crate::action::{Action, ActionResult, ActionTransition};
use crate::env::{BattleEnv, RngSource};
use crate::state::BattleState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns the result.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the working state and return result
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T, R>(
    transition: &T,
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    rng: &mut R,
) -> Result<T::Result, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
    R: RngSource + ?Sized,
{
    transition
        .pre_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let result = transition
        .apply(state, env, rng)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(result)
}

/// Routes each action to its transition and wraps the result in [`ActionResult`].
pub(super) fn execute_transition<R: RngSource + ?Sized>(
    action: &Action,
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    rng: &mut R,
) -> Result<ActionResult, ExecuteError> {
    match action {
        Action::Move(transition) => {
            let from = drive_transition(transition, state, env, rng).map_err(ExecuteError::Move)?;
            Ok(ActionResult::Move {
                from,
                to: transition.destination,
            })
        }
        Action::Attack(transition) => {
            let outcome =
                drive_transition(transition, state, env, rng).map_err(ExecuteError::Attack)?;
            Ok(ActionResult::Attack(outcome))
        }
        Action::PlayCard(transition) => {
            let outcome =
                drive_transition(transition, state, env, rng).map_err(ExecuteError::PlayCard)?;
            Ok(ActionResult::PlayCard(outcome))
        }
    }
}
