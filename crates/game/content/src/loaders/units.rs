//! Unit template loader (squad roster and enemy archetypes).

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{CardCatalog, UnitTemplate};

use crate::loaders::{LoadResult, read_file};

/// Unit catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCatalogRon {
    pub units: Vec<UnitTemplate>,
}

/// Loader for unit templates from RON files.
pub struct UnitLoader;

impl UnitLoader {
    pub fn parse(content: &str) -> LoadResult<Vec<UnitTemplate>> {
        let catalog: UnitCatalogRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for unit in &catalog.units {
            if !seen.insert(unit.id.as_str()) {
                anyhow::bail!("Duplicate unit template '{}'", unit.id);
            }
            if unit.stats.max_hp <= 0 {
                anyhow::bail!("Unit template '{}' has non-positive max_hp", unit.id);
            }
        }
        Ok(catalog.units)
    }

    pub fn load(path: &Path) -> LoadResult<Vec<UnitTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Checks that every deck entry names a card in the catalog.
    pub fn check_decks(templates: &[UnitTemplate], cards: &dyn CardCatalog) -> LoadResult<()> {
        for template in templates {
            if let Some(card) = template.deck.iter().find(|card| !cards.contains(card)) {
                anyhow::bail!(
                    "Unit template '{}' references unknown card '{}'",
                    template.id,
                    card
                );
            }
        }
        Ok(())
    }
}
