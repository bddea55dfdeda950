use crate::action::ActionTransition;
use crate::combat::{
    AttackOutcome, DamageApplied, apply_damage, calculate_damage, check_hit, effective_accuracy,
    jam_probability,
};
use crate::env::{BattleEnv, RngSource};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{BattleState, LogTag, UnitId};
use crate::strain::is_over_strain_threshold;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackError {
    #[error("battle is already over")]
    PhaseTerminal,

    #[error("attacker {0} not found")]
    AttackerNotFound(UnitId),

    #[error("target {0} not found")]
    TargetNotFound(UnitId),

    #[error("{attacker} and {target} are on the same side")]
    SameSide { attacker: UnitId, target: UnitId },

    #[error("{target} is not adjacent to {attacker}")]
    NotAdjacent { attacker: UnitId, target: UnitId },
}

impl GameError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotAdjacent { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PhaseTerminal => "ATTACK_PHASE_TERMINAL",
            Self::AttackerNotFound(_) => "ATTACK_ATTACKER_NOT_FOUND",
            Self::TargetNotFound(_) => "ATTACK_TARGET_NOT_FOUND",
            Self::SameSide { .. } => "ATTACK_SAME_SIDE",
            Self::NotAdjacent { .. } => "ATTACK_NOT_ADJACENT",
        }
    }
}

/// Weapon attack against an adjacent opponent.
///
/// Resolution order: jam check (player attackers under bulk overload only),
/// accuracy roll, damage, application.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackAction {
    pub attacker: UnitId,
    pub defender: UnitId,
}

impl AttackAction {
    pub fn new(attacker: impl Into<UnitId>, defender: impl Into<UnitId>) -> Self {
        Self {
            attacker: attacker.into(),
            defender: defender.into(),
        }
    }
}

impl ActionTransition for AttackAction {
    type Error = AttackError;
    type Result = AttackOutcome;

    fn actor(&self) -> &UnitId {
        &self.attacker
    }

    fn pre_validate(&self, state: &BattleState, _env: &BattleEnv<'_>) -> Result<(), Self::Error> {
        if state.is_terminal() {
            return Err(AttackError::PhaseTerminal);
        }
        let attacker = state
            .unit(&self.attacker)
            .ok_or_else(|| AttackError::AttackerNotFound(self.attacker.clone()))?;
        let defender = state
            .unit(&self.defender)
            .ok_or_else(|| AttackError::TargetNotFound(self.defender.clone()))?;

        if !attacker.side.opposes(defender.side) {
            return Err(AttackError::SameSide {
                attacker: self.attacker.clone(),
                target: self.defender.clone(),
            });
        }
        if attacker.distance_to(defender) != Some(1) {
            return Err(AttackError::NotAdjacent {
                attacker: self.attacker.clone(),
                target: self.defender.clone(),
            });
        }
        Ok(())
    }

    fn apply<R: RngSource + ?Sized>(
        &self,
        state: &mut BattleState,
        env: &BattleEnv<'_>,
        rng: &mut R,
    ) -> Result<Self::Result, Self::Error> {
        let config = env.config();
        let attacker = state
            .unit(&self.attacker)
            .ok_or_else(|| AttackError::AttackerNotFound(self.attacker.clone()))?;
        let defender = state
            .unit(&self.defender)
            .ok_or_else(|| AttackError::TargetNotFound(self.defender.clone()))?;
        let attacker_name = attacker.name.clone();
        let defender_name = defender.name.clone();

        let jam = jam_probability(attacker, state.load_penalties.as_ref(), config);
        if jam > 0.0 {
            let jammed = rng.chance(jam);
            tracing::debug!(attacker = %self.attacker, jam, jammed, "jam roll");
            if jammed {
                state.log.push(
                    LogTag::Jam,
                    format!("{attacker_name}'s weapon jams under BULK overload."),
                );
                return Ok(AttackOutcome::Jammed);
            }
        }

        let accuracy = effective_accuracy(attacker, config);
        let roll = rng.roll_percent();
        tracing::debug!(attacker = %self.attacker, accuracy, roll, "accuracy roll");
        if !check_hit(accuracy, roll) {
            let reason = if is_over_strain_threshold(attacker, config) {
                " (strain interference)"
            } else {
                ""
            };
            state.log.push(
                LogTag::Miss,
                format!(
                    "{attacker_name} swings at {defender_name} but the strike goes wide{reason}."
                ),
            );
            return Ok(AttackOutcome::Missed { accuracy });
        }

        let damage = calculate_damage(attacker.stats.atk, defender, config);
        let applied = apply_damage(state, &attacker_name, &self.defender, damage)
            .map_err(|_| AttackError::TargetNotFound(self.defender.clone()))?;

        Ok(match applied {
            DamageApplied::Killed { .. } => AttackOutcome::Killed { damage },
            DamageApplied::Wounded { remaining_hp, .. } => AttackOutcome::Hit {
                damage,
                remaining_hp,
            },
        })
    }
}
