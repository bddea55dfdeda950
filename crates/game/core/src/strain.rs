//! Strain: the per-unit fatigue counter.
//!
//! Crossing the threshold upward logs an alert; cooling back below it at the
//! start of the unit's turn logs a stabilize line. Repeated applications while
//! already over the threshold stay silent.

use crate::config::BattleConfig;
use crate::state::{BattleState, LogTag, StateError, UnitId, UnitState};

/// Threshold crossing produced by a strain change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrainCrossing {
    Overstrained,
    Stabilized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrainChange {
    pub before: u32,
    pub after: u32,
    pub crossing: Option<StrainCrossing>,
}

#[inline]
pub fn is_over_strain_threshold(unit: &UnitState, config: &BattleConfig) -> bool {
    unit.strain >= config.strain_threshold
}

/// Adds `amount` (possibly negative) to the unit's strain, flooring at zero.
pub fn shift_strain(unit: &mut UnitState, amount: i32, config: &BattleConfig) -> StrainChange {
    let before = unit.strain;
    let after = if amount >= 0 {
        before.saturating_add(amount.unsigned_abs())
    } else {
        before.saturating_sub(amount.unsigned_abs())
    };
    unit.strain = after;

    let threshold = config.strain_threshold;
    let crossing = match (before >= threshold, after >= threshold) {
        (false, true) => Some(StrainCrossing::Overstrained),
        (true, false) => Some(StrainCrossing::Stabilized),
        _ => None,
    };
    StrainChange {
        before,
        after,
        crossing,
    }
}

/// Applies strain to a unit and logs an alert when it first crosses the
/// threshold.
pub fn apply_strain(
    state: &mut BattleState,
    id: &UnitId,
    amount: i32,
    config: &BattleConfig,
) -> Result<StrainChange, StateError> {
    let unit = state
        .unit_mut(id)
        .ok_or_else(|| StateError::UnitNotFound(id.clone()))?;
    let change = shift_strain(unit, amount, config);
    let name = unit.name.clone();

    if change.crossing == Some(StrainCrossing::Overstrained) {
        state.log.push(
            LogTag::Alert,
            format!("{name}'s vitals spike - STRAIN threshold exceeded."),
        );
    }
    Ok(change)
}

/// Turn-start cooldown; logs a stabilize line when the unit drops below the
/// threshold.
pub fn cool_down(
    state: &mut BattleState,
    id: &UnitId,
    config: &BattleConfig,
) -> Result<StrainChange, StateError> {
    let unit = state
        .unit_mut(id)
        .ok_or_else(|| StateError::UnitNotFound(id.clone()))?;
    let amount = i32::try_from(config.strain_cooldown).unwrap_or(i32::MAX);
    let change = shift_strain(unit, -amount, config);
    let name = unit.name.clone();

    if change.crossing == Some(StrainCrossing::Stabilized) {
        state.log.push(
            LogTag::Stabilize,
            format!("{name}'s vitals normalize - strain cooling."),
        );
    }
    Ok(change)
}
