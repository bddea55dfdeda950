/// Equipment-overload snapshot computed outside the engine from the squad's
/// carried inventory.
///
/// Each ratio is `carried / capacity`; a flag is raised when its ratio
/// exceeds 1. The engine only reads this value: mass overload lowers squad
/// AGI at setup, bulk overload makes player attacks jam, and power overload
/// triggers periodic surges.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadPenalties {
    pub mass_over: bool,
    pub bulk_over: bool,
    pub power_over: bool,
    pub mass_ratio: f64,
    pub bulk_ratio: f64,
    pub power_ratio: f64,
}

impl LoadPenalties {
    /// Derives the flags from load-to-capacity ratios.
    pub fn from_ratios(mass_ratio: f64, bulk_ratio: f64, power_ratio: f64) -> Self {
        Self {
            mass_over: mass_ratio > 1.0,
            bulk_over: bulk_ratio > 1.0,
            power_over: power_ratio > 1.0,
            mass_ratio,
            bulk_ratio,
            power_ratio,
        }
    }

    pub fn any(&self) -> bool {
        self.mass_over || self.bulk_over || self.power_over
    }

    /// Probability that a player attack jams: `clamp(bulk_ratio - 1, 0, cap)`,
    /// or zero when bulk is not flagged.
    pub fn jam_chance(&self, cap: f64) -> f64 {
        if !self.bulk_over {
            return 0.0;
        }
        (self.bulk_ratio - 1.0).clamp(0.0, cap)
    }
}
