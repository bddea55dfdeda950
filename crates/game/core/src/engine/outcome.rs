//! Terminal-state detection and victory rewards.

use crate::config::{BattleConfig, RewardBasis};
use crate::state::{BattlePhase, BattleState, LogTag, Rewards, Side};

/// Checks for victory or defeat and applies the phase change.
///
/// A terminal battle is left untouched, so calling this repeatedly is safe.
/// Defeat wins when both sides are empty at once.
pub fn resolve_outcome(state: &mut BattleState, config: &BattleConfig) -> BattlePhase {
    if state.is_terminal() {
        return state.phase;
    }

    if !state.has_units_on(Side::Player) {
        state.phase = BattlePhase::Defeat;
        state.active = None;
        state
            .log
            .push(LogTag::Engage, "Player squad offline. Link severed.");
        tracing::info!(turn = state.turn, "battle lost");
        return state.phase;
    }

    if !state.has_units_on(Side::Enemy) {
        let count = match config.reward_basis {
            RewardBasis::PresentAtEvaluation => state.units_on(Side::Enemy).count() as u32,
            RewardBasis::Defeated => state.enemies_defeated,
        };
        let rewards = Rewards::for_enemy_count(count);
        state.phase = BattlePhase::Victory;
        state.active = None;
        state.rewards = Some(rewards);
        state
            .log
            .push(LogTag::Engage, "All hostiles cleared. Engagement complete.");
        state.log.push(LogTag::Reward, rewards.to_string());
        tracing::info!(turn = state.turn, wad = rewards.wad, "battle won");
    }

    state.phase
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Grid, TemplateStats, UnitTemplate};
    use crate::state::{UnitId, UnitState};

    fn unit(id: &str, side: Side) -> UnitState {
        let template = UnitTemplate::new(
            id,
            id,
            "c",
            TemplateStats {
                max_hp: 5,
                atk: 2,
                def: 0,
                agi: 2,
                acc: None,
            },
        );
        UnitState::from_template(&template, UnitId::from(id), side, None, vec![])
    }

    #[test]
    fn ongoing_battle_is_unchanged() {
        let config = BattleConfig::default();
        let mut state = BattleState::new(
            Grid::new(4, 4),
            vec![unit("p", Side::Player), unit("e", Side::Enemy)],
        );
        let before = state.clone();
        assert_eq!(resolve_outcome(&mut state, &config), BattlePhase::Active);
        assert_eq!(state, before);
    }

    #[test]
    fn no_players_means_defeat() {
        let config = BattleConfig::default();
        let mut state = BattleState::new(Grid::new(4, 4), vec![unit("e", Side::Enemy)]);
        state.active = Some(UnitId::from("e"));
        assert_eq!(resolve_outcome(&mut state, &config), BattlePhase::Defeat);
        assert!(state.active.is_none());
        assert!(state.rewards.is_none());
        assert_eq!(
            state.log.last().unwrap().to_string(),
            "SLK//ENGAGE :: Player squad offline. Link severed."
        );
    }

    #[test]
    fn victory_rewards_use_enemies_present() {
        let config = BattleConfig::default();
        let mut state = BattleState::new(Grid::new(4, 4), vec![unit("p", Side::Player)]);
        state.enemies_defeated = 3;
        assert_eq!(resolve_outcome(&mut state, &config), BattlePhase::Victory);
        assert_eq!(state.rewards, Some(Rewards::for_enemy_count(1)));
        assert_eq!(state.log.count(LogTag::Reward), 1);
    }

    #[test]
    fn victory_rewards_can_count_defeated_enemies() {
        let config = BattleConfig::default().with_reward_basis(RewardBasis::Defeated);
        let mut state = BattleState::new(Grid::new(4, 4), vec![unit("p", Side::Player)]);
        state.enemies_defeated = 3;
        resolve_outcome(&mut state, &config);
        let rewards = state.rewards.unwrap();
        assert_eq!(rewards.wad, 30);
        assert_eq!(rewards.chaos_shards, 1);
    }

    #[test]
    fn terminal_evaluation_is_idempotent() {
        let config = BattleConfig::default();
        let mut state = BattleState::new(Grid::new(4, 4), vec![unit("p", Side::Player)]);
        resolve_outcome(&mut state, &config);
        let settled = state.clone();
        resolve_outcome(&mut state, &config);
        resolve_outcome(&mut state, &config);
        assert_eq!(state, settled);
    }
}
