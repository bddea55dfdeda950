//! Damage calculation and application.

use crate::config::BattleConfig;
use crate::state::{BattleState, LogTag, Side, StateError, UnitId, UnitState};

/// Attack minus total defense, floored at the configured minimum.
///
/// ```text
/// damage = max(atk - (def + defense_up), min_damage)
/// ```
pub fn calculate_damage(atk: i32, defender: &UnitState, config: &BattleConfig) -> i32 {
    let defense = defender.stats.def + defender.defense_bonus();
    (atk - defense).max(config.min_damage)
}

/// Result of subtracting damage from a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DamageApplied {
    Wounded { remaining_hp: i32, max_hp: i32 },
    Killed { side: Side },
}

/// Subtracts `damage` from the defender. At zero hp the defender is removed
/// from the roster and the turn order and a TARGET OFFLINE line is logged;
/// otherwise the hit line reports the remaining hp.
pub fn apply_damage(
    state: &mut BattleState,
    source_name: &str,
    defender_id: &UnitId,
    damage: i32,
) -> Result<DamageApplied, StateError> {
    let defender = state
        .unit_mut(defender_id)
        .ok_or_else(|| StateError::UnitNotFound(defender_id.clone()))?;
    let new_hp = defender.hp - damage;
    let name = defender.name.clone();

    if new_hp <= 0 {
        let side = defender.side;
        state.remove_unit(defender_id);
        if side == Side::Enemy {
            state.enemies_defeated += 1;
        }
        state.log.push(
            LogTag::Hit,
            format!("{source_name} hits {name} for {damage} - TARGET OFFLINE."),
        );
        return Ok(DamageApplied::Killed { side });
    }

    defender.hp = new_hp;
    let max_hp = defender.max_hp;
    state.log.push(
        LogTag::Hit,
        format!("{source_name} hits {name} for {damage} (HP {new_hp}/{max_hp})."),
    );
    Ok(DamageApplied::Wounded {
        remaining_hp: new_hp,
        max_hp,
    })
}
