//! Enemy pursuit AI: attack an adjacent squad member, otherwise take one
//! step toward the nearest one, then end the turn.

use crate::action::{Action, ActionResult};
use crate::combat::AttackOutcome;
use crate::engine::{AiError, ExecuteError, TurnReport, advance_turn, perform_action};
use crate::env::{BattleEnv, RngSource};
use crate::state::{BattleState, Position, Side, UnitId};

use super::{nearest_unit, step_toward};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnemyDecision {
    /// No squad member is on the grid; nothing happened.
    Idle,
    Attacked {
        target: UnitId,
        outcome: AttackOutcome,
    },
    Moved {
        from: Position,
        to: Position,
    },
    /// Could neither attack nor step closer.
    Held,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyTurn {
    pub actor: UnitId,
    pub decision: EnemyDecision,
    /// Set when the turn passed on; `None` after an idle turn or when the
    /// attack ended the battle.
    pub next: Option<TurnReport>,
}

/// Runs the active enemy's turn on the working state.
pub fn enemy_turn<R: RngSource + ?Sized>(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    rng: &mut R,
) -> Result<EnemyTurn, ExecuteError> {
    if state.is_terminal() {
        return Err(AiError::PhaseTerminal.into());
    }
    let actor = state.active_unit().ok_or(AiError::NoActiveUnit)?;
    if actor.side != Side::Enemy {
        return Err(AiError::NotEnemyTurn(actor.id.clone()).into());
    }
    let origin = actor
        .position
        .ok_or_else(|| AiError::NotPlaced(actor.id.clone()))?;
    let actor_id = actor.id.clone();

    let Some(target) = nearest_unit(state, origin, Side::Player) else {
        tracing::debug!(actor = %actor_id, "no squad member on the grid");
        return Ok(EnemyTurn {
            actor: actor_id,
            decision: EnemyDecision::Idle,
            next: None,
        });
    };
    let target_id = target.id.clone();
    let target_position = target.position.unwrap_or(origin);

    let decision = if origin.is_adjacent(target_position) {
        tracing::debug!(actor = %actor_id, target = %target_id, "enemy attacks");
        let result = perform_action(
            state,
            env,
            rng,
            &Action::attack(actor_id.clone(), target_id.clone()),
        )?;
        match result {
            ActionResult::Attack(outcome) => EnemyDecision::Attacked {
                target: target_id,
                outcome,
            },
            _ => EnemyDecision::Held,
        }
    } else if let Some(step) = step_toward(state, &actor_id, target_position) {
        tracing::debug!(actor = %actor_id, to = %step, "enemy advances");
        perform_action(state, env, rng, &Action::move_to(actor_id.clone(), step))?;
        EnemyDecision::Moved {
            from: origin,
            to: step,
        }
    } else {
        EnemyDecision::Held
    };

    let next = if state.is_terminal() {
        None
    } else {
        Some(advance_turn(state, env.config(), rng)?)
    };

    Ok(EnemyTurn {
        actor: actor_id,
        decision,
        next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardTable;
    use crate::config::BattleConfig;
    use crate::env::{Grid, ScriptedRng, TemplateStats, UnitTemplate};
    use crate::state::{BattlePhase, LogTag, UnitState};

    fn unit(id: &str, side: Side, hp: i32, agi: i32, position: Option<Position>) -> UnitState {
        let template = UnitTemplate::new(
            id,
            id,
            "c",
            TemplateStats {
                max_hp: hp,
                atk: 5,
                def: 1,
                agi,
                acc: Some(100),
            },
        );
        UnitState::from_template(&template, UnitId::from(id), side, position, vec![])
    }

    fn battle(units: Vec<UnitState>, active: &str) -> BattleState {
        let mut state = BattleState::new(Grid::new(6, 4), units);
        state.active = Some(UnitId::from(active));
        state.turn = 1;
        state
    }

    #[test]
    fn adjacent_enemy_attacks_then_passes_turn() {
        let config = BattleConfig::default();
        let cards = CardTable::starter();
        let env = BattleEnv::new(&config, &cards);
        let mut state = battle(
            vec![
                unit("e1", Side::Enemy, 10, 5, Some(Position::new(1, 0))),
                unit("p1", Side::Player, 10, 3, Some(Position::new(0, 0))),
            ],
            "e1",
        );
        let mut rng = ScriptedRng::new([0.1]);
        let turn = enemy_turn(&mut state, &env, &mut rng).unwrap();
        assert_eq!(
            turn.decision,
            EnemyDecision::Attacked {
                target: UnitId::from("p1"),
                outcome: AttackOutcome::Hit {
                    damage: 4,
                    remaining_hp: 6
                },
            }
        );
        assert_eq!(turn.next.unwrap().active, UnitId::from("p1"));
    }

    #[test]
    fn distant_enemy_steps_horizontally() {
        let config = BattleConfig::default();
        let cards = CardTable::starter();
        let env = BattleEnv::new(&config, &cards);
        let mut state = battle(
            vec![
                unit("e1", Side::Enemy, 10, 5, Some(Position::new(5, 3))),
                unit("p1", Side::Player, 10, 3, Some(Position::new(0, 0))),
            ],
            "e1",
        );
        let turn = enemy_turn(&mut state, &env, &mut ScriptedRng::new([])).unwrap();
        assert_eq!(
            turn.decision,
            EnemyDecision::Moved {
                from: Position::new(5, 3),
                to: Position::new(4, 3),
            }
        );
        assert_eq!(state.log.count(LogTag::Move), 1);
        assert_eq!(state.active, Some(UnitId::from("p1")));
    }

    #[test]
    fn idle_when_no_squad_member_is_placed() {
        let config = BattleConfig::default();
        let cards = CardTable::starter();
        let env = BattleEnv::new(&config, &cards);
        let mut state = battle(
            vec![
                unit("e1", Side::Enemy, 10, 5, Some(Position::new(5, 3))),
                unit("p1", Side::Player, 10, 3, None),
            ],
            "e1",
        );
        let before = state.clone();
        let turn = enemy_turn(&mut state, &env, &mut ScriptedRng::new([])).unwrap();
        assert_eq!(turn.decision, EnemyDecision::Idle);
        assert_eq!(state, before);
    }

    #[test]
    fn killing_blow_ends_battle_without_advancing() {
        let config = BattleConfig::default();
        let cards = CardTable::starter();
        let env = BattleEnv::new(&config, &cards);
        let mut state = battle(
            vec![
                unit("e1", Side::Enemy, 10, 5, Some(Position::new(1, 0))),
                unit("p1", Side::Player, 2, 3, Some(Position::new(0, 0))),
            ],
            "e1",
        );
        let turn = enemy_turn(&mut state, &env, &mut ScriptedRng::new([0.0])).unwrap();
        assert!(turn.next.is_none());
        assert_eq!(state.phase, BattlePhase::Defeat);
    }

    #[test]
    fn rejects_player_turn() {
        let config = BattleConfig::default();
        let cards = CardTable::starter();
        let env = BattleEnv::new(&config, &cards);
        let mut state = battle(
            vec![
                unit("e1", Side::Enemy, 10, 5, Some(Position::new(1, 0))),
                unit("p1", Side::Player, 2, 3, Some(Position::new(0, 0))),
            ],
            "p1",
        );
        let err = enemy_turn(&mut state, &env, &mut ScriptedRng::new([])).unwrap_err();
        assert_eq!(err, ExecuteError::Ai(AiError::NotEnemyTurn(UnitId::from("p1"))));
    }
}
