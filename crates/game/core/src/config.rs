/// How the victory reward scales with the enemy force.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RewardBasis {
    /// Counts enemy units still in the unit map when victory is evaluated
    /// (never fewer than one).
    #[default]
    PresentAtEvaluation,
    /// Counts enemy units removed during the encounter.
    Defeated,
}

/// Battle tuning constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Hand size the draw routine fills up to.
    pub hand_size: usize,
    /// Strain at or above which a unit is overstrained.
    pub strain_threshold: u32,
    /// Strain removed from a unit when its turn begins.
    pub strain_cooldown: u32,
    /// Accuracy lost while overstrained.
    pub strain_accuracy_penalty: i32,
    pub min_accuracy: i32,
    pub max_accuracy: i32,
    /// Accuracy used for units whose template leaves it unset.
    pub default_accuracy: i32,
    pub min_damage: i32,
    /// Upper bound on the bulk-overload jam probability.
    pub max_jam_chance: f64,
    pub power_surge_chance: f64,
    pub power_surge_damage: i32,
    /// AGI removed from every player unit under mass overload (floored at 1).
    pub mass_agi_penalty: i32,
    /// Move the outgoing player unit's hand to its discard pile on advance.
    pub discard_hand_on_turn_end: bool,
    pub reward_basis: RewardBasis,
}

impl BattleConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HAND_SIZE: usize = 5;
    pub const DEFAULT_STRAIN_THRESHOLD: u32 = 6;
    pub const DEFAULT_STRAIN_COOLDOWN: u32 = 1;
    pub const DEFAULT_STRAIN_ACCURACY_PENALTY: i32 = 20;
    pub const DEFAULT_MIN_ACCURACY: i32 = 10;
    pub const DEFAULT_MAX_ACCURACY: i32 = 100;
    pub const DEFAULT_ACCURACY: i32 = 100;
    pub const DEFAULT_MIN_DAMAGE: i32 = 1;
    pub const DEFAULT_MAX_JAM_CHANCE: f64 = 0.5;
    pub const DEFAULT_POWER_SURGE_CHANCE: f64 = 0.15;
    pub const DEFAULT_POWER_SURGE_DAMAGE: i32 = 1;
    pub const DEFAULT_MASS_AGI_PENALTY: i32 = 1;

    pub fn new() -> Self {
        Self {
            hand_size: Self::DEFAULT_HAND_SIZE,
            strain_threshold: Self::DEFAULT_STRAIN_THRESHOLD,
            strain_cooldown: Self::DEFAULT_STRAIN_COOLDOWN,
            strain_accuracy_penalty: Self::DEFAULT_STRAIN_ACCURACY_PENALTY,
            min_accuracy: Self::DEFAULT_MIN_ACCURACY,
            max_accuracy: Self::DEFAULT_MAX_ACCURACY,
            default_accuracy: Self::DEFAULT_ACCURACY,
            min_damage: Self::DEFAULT_MIN_DAMAGE,
            max_jam_chance: Self::DEFAULT_MAX_JAM_CHANCE,
            power_surge_chance: Self::DEFAULT_POWER_SURGE_CHANCE,
            power_surge_damage: Self::DEFAULT_POWER_SURGE_DAMAGE,
            mass_agi_penalty: Self::DEFAULT_MASS_AGI_PENALTY,
            discard_hand_on_turn_end: false,
            reward_basis: RewardBasis::default(),
        }
    }

    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    pub fn with_reward_basis(mut self, reward_basis: RewardBasis) -> Self {
        self.reward_basis = reward_basis;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
