//! Inventory manifest loader.

use std::path::Path;

use crate::inventory::InventoryManifest;
use crate::loaders::{LoadResult, read_file};

pub struct InventoryLoader;

impl InventoryLoader {
    pub fn parse(content: &str) -> LoadResult<InventoryManifest> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse inventory RON: {}", e))
    }

    pub fn load(path: &Path) -> LoadResult<InventoryManifest> {
        let content = read_file(path)?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::CapacityTier;

    #[test]
    fn quantity_defaults_to_one() {
        let manifest = InventoryLoader::parse(
            r#"(tier: D, forward_locker: [(id: "rifle", mass_kg: 6.5, bulk_bu: 4.0)])"#,
        )
        .unwrap();
        assert_eq!(manifest.tier, CapacityTier::D);
        assert_eq!(manifest.forward_locker[0].quantity, 1);
        assert!(manifest.base_storage.is_empty());
    }
}
