use std::fmt;

/// Loot granted on victory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub wad: u32,
    pub metal_scrap: u32,
    pub wood: u32,
    pub chaos_shards: u32,
    pub steam_components: u32,
}

impl Rewards {
    /// Reward table for `enemy_count` enemies; counts below one are treated as one.
    pub fn for_enemy_count(enemy_count: u32) -> Self {
        let n = enemy_count.max(1);
        let rare = u32::from(n >= 2);
        Self {
            wad: 10 * n,
            metal_scrap: 2 * n,
            wood: n,
            chaos_shards: rare,
            steam_components: rare,
        }
    }
}

impl fmt::Display for Rewards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "+{} WAD, +{} Metal Scrap, +{} Wood, +{} Chaos Shards, +{} Steam Components.",
            self.wad, self.metal_scrap, self.wood, self.chaos_shards, self.steam_components
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_enemy_grants_no_rare_resources() {
        let rewards = Rewards::for_enemy_count(1);
        assert_eq!(
            rewards,
            Rewards {
                wad: 10,
                metal_scrap: 2,
                wood: 1,
                chaos_shards: 0,
                steam_components: 0,
            }
        );
        assert_eq!(Rewards::for_enemy_count(0), rewards);
    }

    #[test]
    fn three_enemies_scale_linearly() {
        let rewards = Rewards::for_enemy_count(3);
        assert_eq!(rewards.wad, 30);
        assert_eq!(rewards.metal_scrap, 6);
        assert_eq!(rewards.wood, 3);
        assert_eq!(rewards.chaos_shards, 1);
        assert_eq!(rewards.steam_components, 1);
    }
}
