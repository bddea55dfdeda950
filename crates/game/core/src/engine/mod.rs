//! Turn sequencing and the action execution pipeline.
//!
//! [`BattleEngine`] is the snapshot-in, snapshot-out facade over the battle
//! rules. Every entrypoint clones the input [`BattleState`], runs the change
//! on the working copy and returns it alongside a typed result, so callers
//! can hold on to earlier snapshots for undo and replay.
//!
//! The free functions ([`perform_action`], [`advance_turn`],
//! [`resolve_outcome`]) mutate a working state in place and are what the AI
//! policies and the facade compose.

mod errors;
mod outcome;
mod placement;
mod setup;
mod transition;
mod turns;

pub use errors::{AiError, ExecuteError, TransitionPhase, TransitionPhaseError, TurnError};
pub use outcome::resolve_outcome;
pub use placement::{PlacementError, PlacementPlan, max_units_per_side};
pub use setup::{
    EncounterBuilder, MAX_GRID_SIDE, MIN_GRID_SIDE, SetupError, edge_row, start_battle,
};
pub use turns::{TurnReport, advance_turn};

use crate::action::{Action, ActionResult, AttackAction, MoveAction, PlayCardAction};
use crate::ai::{AutoTurn, EnemyTurn};
use crate::cards::DrawReport;
use crate::env::{BattleEnv, RngSource};
use crate::state::{BattlePhase, BattleState, Position, StateError, UnitId};
use crate::strain::StrainChange;

/// Runs one action on the working state, then re-evaluates the outcome.
///
/// On error the working state may be partially updated; the facade discards
/// it in that case.
pub fn perform_action<R: RngSource + ?Sized>(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    rng: &mut R,
    action: &Action,
) -> Result<ActionResult, ExecuteError> {
    let result = transition::execute_transition(action, state, env, rng)?;
    let phase = resolve_outcome(state, env.config());
    tracing::debug!(
        action = action.as_snake_case(),
        actor = %action.actor(),
        ?phase,
        "action executed"
    );
    Ok(result)
}

/// New snapshot plus what the entrypoint produced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome<T> {
    pub state: BattleState,
    pub result: T,
}

impl<T> ExecutionOutcome<T> {
    pub fn into_state(self) -> BattleState {
        self.state
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExecutionOutcome<U> {
        ExecutionOutcome {
            state: self.state,
            result: f(self.result),
        }
    }
}

/// Battle engine bound to an environment and a random source.
///
/// The input snapshot is never touched: each call works on a clone and only
/// hands it back when the whole operation succeeded.
pub struct BattleEngine<'a, R: RngSource + ?Sized> {
    env: BattleEnv<'a>,
    rng: &'a mut R,
}

impl<'a, R: RngSource + ?Sized> BattleEngine<'a, R> {
    pub fn new(env: BattleEnv<'a>, rng: &'a mut R) -> Self {
        Self { env, rng }
    }

    pub fn env(&self) -> BattleEnv<'a> {
        self.env
    }

    fn run<T, E>(
        &mut self,
        state: &BattleState,
        f: impl FnOnce(&mut BattleState, &BattleEnv<'a>, &mut R) -> Result<T, E>,
    ) -> Result<ExecutionOutcome<T>, E> {
        let mut working = state.clone();
        let result = f(&mut working, &self.env, &mut *self.rng)?;
        Ok(ExecutionOutcome {
            state: working,
            result,
        })
    }

    pub fn execute(
        &mut self,
        state: &BattleState,
        action: &Action,
    ) -> Result<ExecutionOutcome<ActionResult>, ExecuteError> {
        self.run(state, |working, env, rng| {
            perform_action(working, env, rng, action)
        })
    }

    /// Moves a unit; the result is the tile it left.
    pub fn move_unit(
        &mut self,
        state: &BattleState,
        unit: &UnitId,
        destination: Position,
    ) -> Result<ExecutionOutcome<Position>, ExecuteError> {
        let action = Action::Move(MoveAction::new(unit.clone(), destination));
        self.execute(state, &action).map(|outcome| {
            outcome.map(|result| match result {
                ActionResult::Move { from, .. } => from,
                _ => destination,
            })
        })
    }

    pub fn attack(
        &mut self,
        state: &BattleState,
        attacker: &UnitId,
        defender: &UnitId,
    ) -> Result<ExecutionOutcome<ActionResult>, ExecuteError> {
        let action = Action::Attack(AttackAction::new(attacker.clone(), defender.clone()));
        self.execute(state, &action)
    }

    pub fn play_card(
        &mut self,
        state: &BattleState,
        actor: &UnitId,
        hand_index: usize,
        target: Option<UnitId>,
    ) -> Result<ExecutionOutcome<ActionResult>, ExecuteError> {
        let action = Action::PlayCard(PlayCardAction::new(actor.clone(), hand_index, target));
        self.execute(state, &action)
    }

    pub fn advance_turn(
        &mut self,
        state: &BattleState,
    ) -> Result<ExecutionOutcome<TurnReport>, ExecuteError> {
        self.run(state, |working, env, rng| {
            advance_turn(working, env.config(), rng).map_err(ExecuteError::from)
        })
    }

    /// Fills the unit's hand up to the configured hand size.
    pub fn draw_cards(
        &mut self,
        state: &BattleState,
        unit: &UnitId,
    ) -> Result<ExecutionOutcome<DrawReport>, ExecuteError> {
        self.run(state, |working, env, rng| -> Result<_, ExecuteError> {
            let target = working
                .unit_mut(unit)
                .ok_or_else(|| StateError::UnitNotFound(unit.clone()))?;
            Ok(crate::cards::draw_cards(target, env.config().hand_size, rng))
        })
    }

    pub fn apply_strain(
        &mut self,
        state: &BattleState,
        unit: &UnitId,
        amount: i32,
    ) -> Result<ExecutionOutcome<StrainChange>, ExecuteError> {
        self.run(state, |working, env, _| {
            crate::strain::apply_strain(working, unit, amount, env.config())
                .map_err(ExecuteError::from)
        })
    }

    pub fn evaluate_outcome(&mut self, state: &BattleState) -> ExecutionOutcome<BattlePhase> {
        let mut working = state.clone();
        let result = resolve_outcome(&mut working, self.env.config());
        ExecutionOutcome {
            state: working,
            result,
        }
    }

    pub fn enemy_turn(
        &mut self,
        state: &BattleState,
    ) -> Result<ExecutionOutcome<EnemyTurn>, ExecuteError> {
        self.run(state, |working, env, rng| crate::ai::enemy_turn(working, env, rng))
    }

    pub fn auto_turn(
        &mut self,
        state: &BattleState,
    ) -> Result<ExecutionOutcome<AutoTurn>, ExecuteError> {
        self.run(state, |working, env, rng| crate::ai::auto_turn(working, env, rng))
    }
}
