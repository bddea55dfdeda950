//! Turn sequencing: circular rotation over the initiative order plus the
//! per-activation tick effects.

use crate::cards::{DrawReport, discard_hand, draw_cards};
use crate::config::BattleConfig;
use crate::env::RngSource;
use crate::state::{BattleState, LogTag, UnitId};
use crate::strain::{StrainCrossing, cool_down};

use super::errors::TurnError;

/// What happened when a new unit became active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub active: UnitId,
    pub turn: u32,
    /// True when the rotation wrapped back to the first unit.
    pub wrapped: bool,
    pub stabilized: bool,
    pub power_surge: bool,
    /// Present when the new active unit is player-side.
    pub draw: Option<DrawReport>,
}

/// Index of the next unit and the turn counter that goes with it.
///
/// No active unit yet means the first activation: index 0, turn 1. An active
/// unit missing from the order (it died on its own turn) wraps to index 0.
fn next_slot(state: &BattleState) -> (usize, u32, bool) {
    match (&state.active, state.active_index()) {
        (None, _) => (0, 1, false),
        (Some(_), Some(index)) if index + 1 < state.turn_order.len() => {
            (index + 1, state.turn, false)
        }
        (Some(_), _) => (0, state.turn + 1, true),
    }
}

/// Hands the turn to the next unit in the initiative order.
pub fn advance_turn<R: RngSource + ?Sized>(
    state: &mut BattleState,
    config: &BattleConfig,
    rng: &mut R,
) -> Result<TurnReport, TurnError> {
    if state.is_terminal() {
        return Err(TurnError::PhaseTerminal);
    }
    if state.turn_order.is_empty() {
        return Err(TurnError::EmptyTurnOrder);
    }

    if config.discard_hand_on_turn_end {
        if let Some(outgoing) = state.active.clone() {
            if let Some(unit) = state.unit_mut(&outgoing).filter(|unit| unit.is_player()) {
                discard_hand(unit);
            }
        }
    }

    let (index, turn, wrapped) = next_slot(state);
    let next = state.turn_order[index].clone();
    state.active = Some(next.clone());
    state.turn = turn;
    tracing::debug!(active = %next, turn, wrapped, "turn advanced");

    let stabilized = cool_down(state, &next, config)
        .map(|change| change.crossing == Some(StrainCrossing::Stabilized))
        .unwrap_or(false);

    if let Some(unit) = state.unit_mut(&next) {
        unit.tick_buffs();
    }

    let power_surge = roll_power_surge(state, config, rng);

    let draw = match state.unit_mut(&next) {
        Some(unit) if unit.is_player() => Some(draw_cards(unit, config.hand_size, rng)),
        _ => None,
    };

    Ok(TurnReport {
        active: next,
        turn,
        wrapped,
        stabilized,
        power_surge,
        draw,
    })
}

/// Power overload: on a successful roll every player unit loses hp (floored
/// at zero), regardless of whose turn it is. Returns whether it fired.
fn roll_power_surge<R: RngSource + ?Sized>(
    state: &mut BattleState,
    config: &BattleConfig,
    rng: &mut R,
) -> bool {
    let power_over = state
        .load_penalties
        .is_some_and(|penalties| penalties.power_over);
    if !power_over {
        return false;
    }
    let surged = rng.chance(config.power_surge_chance);
    tracing::debug!(surged, chance = config.power_surge_chance, "power surge roll");
    if !surged {
        return false;
    }

    for unit in state.units.iter_mut().filter(|unit| unit.is_player()) {
        unit.hp = (unit.hp - config.power_surge_damage).max(0);
    }
    state.log.push(
        LogTag::Surge,
        format!(
            "Power overload shocks your squad (-{} HP).",
            config.power_surge_damage
        ),
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Grid, LoadPenalties, PcgRng, ScriptedRng, TemplateStats, UnitTemplate};
    use crate::state::{Buff, CardId, Side, UnitState};

    fn unit(id: &str, side: Side, agi: i32) -> UnitState {
        let template = UnitTemplate::new(
            id,
            id,
            "c",
            TemplateStats {
                max_hp: 10,
                atk: 3,
                def: 1,
                agi,
                acc: None,
            },
        );
        let deck = vec![CardId::from("core_guard"); 6];
        UnitState::from_template(&template, UnitId::from(id), side, None, deck)
    }

    fn state() -> BattleState {
        BattleState::new(
            Grid::new(6, 4),
            vec![
                unit("p1", Side::Player, 6),
                unit("p2", Side::Player, 5),
                unit("e1", Side::Enemy, 4),
            ],
        )
    }

    #[test]
    fn first_activation_sets_turn_one() {
        let config = BattleConfig::default();
        let mut state = state();
        let report = advance_turn(&mut state, &config, &mut PcgRng::new(1)).unwrap();
        assert_eq!(report.active, UnitId::from("p1"));
        assert_eq!(state.turn, 1);
        assert!(!report.wrapped);
        assert_eq!(report.draw.unwrap().drawn, 5);
    }

    #[test]
    fn full_rotation_increments_turn_once() {
        let config = BattleConfig::default();
        let mut state = state();
        let mut rng = PcgRng::new(9);
        advance_turn(&mut state, &config, &mut rng).unwrap();
        let start = state.turn;
        for _ in 0..state.turn_order.len() {
            advance_turn(&mut state, &config, &mut rng).unwrap();
        }
        assert_eq!(state.turn, start + 1);
        assert_eq!(state.active, Some(UnitId::from("p1")));
    }

    #[test]
    fn enemy_activation_draws_nothing() {
        let config = BattleConfig::default();
        let mut state = state();
        state.active = Some(UnitId::from("p2"));
        state.turn = 1;
        let report = advance_turn(&mut state, &config, &mut PcgRng::new(2)).unwrap();
        assert_eq!(report.active, UnitId::from("e1"));
        assert!(report.draw.is_none());
        assert!(state.unit(&UnitId::from("e1")).unwrap().cards.hand.is_empty());
    }

    #[test]
    fn missing_active_unit_wraps_to_first() {
        let config = BattleConfig::default();
        let mut state = state();
        state.active = Some(UnitId::from("dead"));
        state.turn = 3;
        let report = advance_turn(&mut state, &config, &mut PcgRng::new(2)).unwrap();
        assert_eq!(report.active, UnitId::from("p1"));
        assert_eq!(state.turn, 4);
        assert!(report.wrapped);
    }

    #[test]
    fn activation_cools_strain_and_ticks_buffs() {
        let config = BattleConfig::default();
        let mut state = state();
        {
            let p1 = state.unit_mut(&UnitId::from("p1")).unwrap();
            p1.strain = 6;
            p1.buffs.push(Buff::defense_up(2, 1));
        }
        let report = advance_turn(&mut state, &config, &mut PcgRng::new(4)).unwrap();
        let p1 = state.unit(&UnitId::from("p1")).unwrap();
        assert!(report.stabilized);
        assert_eq!(p1.strain, 5);
        assert!(p1.buffs.is_empty());
        assert_eq!(state.log.count(LogTag::Stabilize), 1);
    }

    #[test]
    fn power_surge_hits_every_player_unit() {
        let config = BattleConfig::default();
        let mut state = state().with_load_penalties(Some(LoadPenalties::from_ratios(0.5, 0.5, 1.4)));
        state.active = Some(UnitId::from("p2"));
        state.turn = 1;
        // first value feeds the surge roll; the enemy activation draws nothing
        let mut rng = ScriptedRng::new([0.05]);
        let report = advance_turn(&mut state, &config, &mut rng).unwrap();
        assert!(report.power_surge);
        assert_eq!(state.unit(&UnitId::from("p1")).unwrap().hp, 9);
        assert_eq!(state.unit(&UnitId::from("p2")).unwrap().hp, 9);
        assert_eq!(state.unit(&UnitId::from("e1")).unwrap().hp, 10);
        assert_eq!(state.log.count(LogTag::Surge), 1);
    }

    #[test]
    fn no_surge_roll_without_power_overload() {
        let config = BattleConfig::default();
        let mut state = state();
        state.active = Some(UnitId::from("p2"));
        let mut rng = ScriptedRng::new([0.0]);
        let report = advance_turn(&mut state, &config, &mut rng).unwrap();
        assert!(!report.power_surge);
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn discard_on_turn_end_is_opt_in() {
        let config = BattleConfig::default();
        let mut state = state();
        let mut rng = PcgRng::new(5);
        advance_turn(&mut state, &config, &mut rng).unwrap();
        advance_turn(&mut state, &config, &mut rng).unwrap();
        let p1 = state.unit(&UnitId::from("p1")).unwrap();
        assert_eq!(p1.cards.hand.len(), 5);

        let config = BattleConfig {
            discard_hand_on_turn_end: true,
            ..BattleConfig::default()
        };
        let mut state = self::state();
        advance_turn(&mut state, &config, &mut rng).unwrap();
        advance_turn(&mut state, &config, &mut rng).unwrap();
        let p1 = state.unit(&UnitId::from("p1")).unwrap();
        assert!(p1.cards.hand.is_empty());
        assert_eq!(p1.cards.discard.len(), 5);
    }

    #[test]
    fn terminal_battle_rejects_advance() {
        let config = BattleConfig::default();
        let mut state = state();
        state.phase = crate::state::BattlePhase::Victory;
        let err = advance_turn(&mut state, &config, &mut PcgRng::new(1)).unwrap_err();
        assert_eq!(err, TurnError::PhaseTerminal);
    }
}
