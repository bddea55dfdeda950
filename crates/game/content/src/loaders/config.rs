//! Battle configuration loader.

use std::path::Path;

use tactics_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
///
/// Keys missing from the file keep their default values.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }

    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::RewardBasis;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = ConfigLoader::parse(
            r#"
            hand_size = 4
            reward_basis = "defeated"
            "#,
        )
        .unwrap();
        assert_eq!(config.hand_size, 4);
        assert_eq!(config.reward_basis, RewardBasis::Defeated);
        assert_eq!(config.strain_threshold, BattleConfig::DEFAULT_STRAIN_THRESHOLD);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(ConfigLoader::parse("hand_size = \"five\"").is_err());
    }
}
