//! Accuracy and jam calculations.

use crate::config::BattleConfig;
use crate::env::LoadPenalties;
use crate::state::UnitState;
use crate::strain::is_over_strain_threshold;

/// Effective accuracy of an attacker.
///
/// # Formula
///
/// ```text
/// accuracy = acc (or default) - penalty if overstrained
/// clamped to [min_accuracy, max_accuracy]
/// ```
pub fn effective_accuracy(attacker: &UnitState, config: &BattleConfig) -> i32 {
    let mut accuracy = attacker.stats.accuracy_or(config.default_accuracy);
    if is_over_strain_threshold(attacker, config) {
        accuracy -= config.strain_accuracy_penalty;
    }
    accuracy.clamp(config.min_accuracy, config.max_accuracy)
}

/// A roll in `[0, 100)` above the accuracy misses.
#[inline]
pub fn check_hit(accuracy: i32, roll: f64) -> bool {
    roll <= f64::from(accuracy)
}

/// Probability that a player attack jams. Enemy attackers never jam.
pub fn jam_probability(
    attacker: &UnitState,
    penalties: Option<&LoadPenalties>,
    config: &BattleConfig,
) -> f64 {
    match penalties {
        Some(penalties) if attacker.is_player() => penalties.jam_chance(config.max_jam_chance),
        _ => 0.0,
    }
}
