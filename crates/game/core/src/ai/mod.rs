//! Built-in decision policies.
//!
//! - `pursuit`: enemy AI, close in on the nearest squad member and strike
//! - `auto`: auto-battle for squad members, play the best card or advance
//!
//! Both pick targets by scanning the roster in order, so the first unit wins
//! an exact distance tie.

pub mod auto;
pub mod pursuit;

pub use auto::{AutoPlan, AutoStep, AutoTurn, auto_turn, plan_auto};
pub use pursuit::{EnemyDecision, EnemyTurn, enemy_turn};

use crate::state::{BattleState, Position, Side, UnitId, UnitState};

/// Nearest placed unit of `side` to `origin`; the first in roster order wins
/// ties.
pub fn nearest_unit(state: &BattleState, origin: Position, side: Side) -> Option<&UnitState> {
    state
        .units_on(side)
        .filter_map(|unit| Some((unit.position?.manhattan(origin), unit)))
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, unit)| unit)
}

/// One orthogonal step from `unit` toward `target`: horizontal first, then
/// vertical, each only if the tile is a legal move.
///
/// Moves are capped by AGI, so a unit with AGI 0 gets `None` and holds.
pub fn step_toward(state: &BattleState, unit: &UnitId, target: Position) -> Option<Position> {
    let origin = state.unit(unit)?.position?;
    let dx = (target.x - origin.x).signum();
    let dy = (target.y - origin.y).signum();

    [(dx, 0), (0, dy)]
        .into_iter()
        .filter(|&(x, y)| x != 0 || y != 0)
        .map(|(x, y)| origin.offset(x, y))
        .find(|&candidate| state.can_unit_move_to(unit, candidate))
}
