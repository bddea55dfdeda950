//! Auto-battle policy for squad members.
//!
//! Each step plays the highest-scoring playable card. When nothing is
//! playable the unit takes one step toward the nearest enemy, and once it
//! can do neither the turn passes on.

use crate::action::{Action, ActionResult, CardOutcome, check_card_target};
use crate::cards::{CardDefinition, CardEffect, CardTarget};
use crate::combat::calculate_damage;
use crate::config::BattleConfig;
use crate::engine::{AiError, ExecuteError, TurnReport, advance_turn, perform_action};
use crate::env::{BattleEnv, RngSource};
use crate::state::{BattleState, Position, Side, UnitId, UnitState};
use crate::strain::is_over_strain_threshold;

use super::{nearest_unit, step_toward};

/// Next thing the auto-battler wants to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutoPlan {
    PlayCard { hand_index: usize, target: UnitId },
    Move { destination: Position },
    EndTurn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutoStep {
    PlayedCard(CardOutcome),
    Moved { from: Position, to: Position },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoTurn {
    pub actor: UnitId,
    pub steps: Vec<AutoStep>,
    /// `None` when the battle ended during the turn.
    pub next: Option<TurnReport>,
}

/// Picks the next step for the active squad member without mutating state.
///
/// `may_move` is false once the unit has already stepped this turn.
pub fn plan_auto(
    state: &BattleState,
    env: &BattleEnv<'_>,
    may_move: bool,
) -> Result<AutoPlan, AiError> {
    if state.is_terminal() {
        return Err(AiError::PhaseTerminal);
    }
    let actor = state.active_unit().ok_or(AiError::NoActiveUnit)?;
    if actor.side != Side::Player {
        return Err(AiError::NotPlayerTurn(actor.id.clone()));
    }
    let origin = actor
        .position
        .ok_or_else(|| AiError::NotPlaced(actor.id.clone()))?;

    if let Some(plan) = best_card(state, env, actor) {
        return Ok(plan);
    }

    if may_move {
        let nearest = nearest_unit(state, origin, Side::Enemy)
            .and_then(|enemy| enemy.position)
            .filter(|position| position.manhattan(origin) > 1);
        if let Some(destination) = nearest.and_then(|target| step_toward(state, &actor.id, target))
        {
            return Ok(AutoPlan::Move { destination });
        }
    }

    Ok(AutoPlan::EndTurn)
}

/// Scores every card in hand; the first of equally scored cards wins.
fn best_card(state: &BattleState, env: &BattleEnv<'_>, actor: &UnitState) -> Option<AutoPlan> {
    let config = env.config();
    let mut best: Option<(i32, AutoPlan)> = None;

    for (hand_index, card_id) in actor.cards.hand.iter().enumerate() {
        let Some(card) = env.cards().card(card_id) else {
            continue;
        };
        let Some((score, target)) = score_card(state, config, actor, card) else {
            continue;
        };
        if best.as_ref().is_none_or(|(top, _)| score > *top) {
            best = Some((score, AutoPlan::PlayCard { hand_index, target }));
        }
    }

    best.map(|(_, plan)| plan)
}

fn score_card(
    state: &BattleState,
    config: &BattleConfig,
    actor: &UnitState,
    card: &CardDefinition,
) -> Option<(i32, UnitId)> {
    let overstrained = is_over_strain_threshold(actor, config);
    let strain_penalty = if actor.strain + card.strain_cost >= config.strain_threshold {
        30
    } else {
        0
    };
    let legal = |target: &UnitState| check_card_target(card, actor, target).is_ok();

    let (score, target) = match (card.effect, card.target) {
        (CardEffect::Damage(_) | CardEffect::Strike, CardTarget::Enemy) => {
            let origin = actor.position?;
            let target = state
                .units_on(Side::Enemy)
                .filter(|unit| legal(unit))
                .min_by_key(|unit| unit.position.map(|p| p.manhattan(origin)))?;
            let damage = match card.effect {
                CardEffect::Damage(amount) => amount.max(config.min_damage),
                _ => calculate_damage(actor.stats.atk, target, config),
            };
            let lethal = if damage >= target.hp { 25 } else { 0 };
            (100 + damage + lethal, target.id.clone())
        }
        (CardEffect::Heal(amount), _) => {
            let target = state
                .units_on(actor.side)
                .filter(|unit| unit.hp < unit.max_hp && legal(unit))
                .max_by_key(|unit| (unit.max_hp - unit.hp, std::cmp::Reverse(unit.id.clone())))?;
            (50 + amount.min(target.max_hp - target.hp), target.id.clone())
        }
        (CardEffect::Guard { magnitude, .. }, _) => {
            let target = if legal(actor) {
                actor
            } else {
                state.units_on(actor.side).find(|unit| legal(unit))?
            };
            (40 + magnitude, target.id.clone())
        }
        (CardEffect::Cooldown(_), _) if overstrained && legal(actor) => (10, actor.id.clone()),
        _ => return None,
    };

    Some((score - strain_penalty, target))
}

/// Runs the active squad member's whole turn on the working state: cards
/// until none is worth playing, at most one step, then the turn passes on.
pub fn auto_turn<R: RngSource + ?Sized>(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    rng: &mut R,
) -> Result<AutoTurn, ExecuteError> {
    let actor = state
        .active
        .clone()
        .ok_or(AiError::NoActiveUnit)?;
    let mut steps = Vec::new();
    let mut may_move = true;

    loop {
        let plan = plan_auto(state, env, may_move)?;
        tracing::debug!(actor = %actor, ?plan, "auto-battle step");
        let action = match plan {
            AutoPlan::PlayCard { hand_index, target } => {
                Action::play_card(actor.clone(), hand_index, Some(target))
            }
            AutoPlan::Move { destination } => {
                may_move = false;
                Action::move_to(actor.clone(), destination)
            }
            AutoPlan::EndTurn => break,
        };

        match perform_action(state, env, rng, &action)? {
            ActionResult::PlayCard(outcome) => steps.push(AutoStep::PlayedCard(outcome)),
            ActionResult::Move { from, to } => steps.push(AutoStep::Moved { from, to }),
            ActionResult::Attack(_) => {}
        }

        if state.is_terminal() {
            return Ok(AutoTurn {
                actor,
                steps,
                next: None,
            });
        }
    }

    let next = advance_turn(state, env.config(), rng)?;
    Ok(AutoTurn {
        actor,
        steps,
        next: Some(next),
    })
}
