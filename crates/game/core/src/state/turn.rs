use super::{UnitId, UnitState};

/// Lifecycle tag of an encounter. Once terminal, a battle never leaves it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BattlePhase {
    #[default]
    Active,
    Victory,
    Defeat,
}

impl BattlePhase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, BattlePhase::Active)
    }
}

/// Initiative order: agi descending, ties broken by ascending id.
pub fn compute_turn_order(units: &[UnitState]) -> Vec<UnitId> {
    let mut ranked: Vec<&UnitState> = units.iter().collect();
    ranked.sort_by(|a, b| {
        b.stats
            .agi
            .cmp(&a.stats.agi)
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked.into_iter().map(|unit| unit.id.clone()).collect()
}
