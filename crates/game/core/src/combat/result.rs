//! Attack resolution outcomes.

/// What an attack action did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// Bulk overload jammed the weapon; nothing else happened.
    Jammed,
    /// The accuracy roll failed.
    Missed { accuracy: i32 },
    Hit { damage: i32, remaining_hp: i32 },
    Killed { damage: i32 },
}

impl AttackOutcome {
    pub fn landed(&self) -> bool {
        matches!(self, AttackOutcome::Hit { .. } | AttackOutcome::Killed { .. })
    }

    pub fn damage(&self) -> i32 {
        match self {
            AttackOutcome::Hit { damage, .. } | AttackOutcome::Killed { damage } => *damage,
            AttackOutcome::Jammed | AttackOutcome::Missed { .. } => 0,
        }
    }
}
