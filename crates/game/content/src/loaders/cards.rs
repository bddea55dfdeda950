//! Card catalog loader.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{CardDefinition, CardTable};

use crate::loaders::{LoadResult, read_file};

/// Card catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardCatalogRon {
    pub cards: Vec<CardDefinition>,
}

/// Loader for card catalogs from RON files.
pub struct CardLoader;

impl CardLoader {
    /// Parses a card catalog. Duplicate ids are rejected.
    pub fn parse(content: &str) -> LoadResult<Vec<CardDefinition>> {
        let catalog: CardCatalogRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse card catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for card in &catalog.cards {
            if !seen.insert(card.id.clone()) {
                anyhow::bail!("Duplicate card id '{}' in catalog", card.id);
            }
        }
        Ok(catalog.cards)
    }

    pub fn load(path: &Path) -> LoadResult<Vec<CardDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Loads a catalog on top of the starter table; file entries replace
    /// starter cards with the same id.
    pub fn load_table(path: &Path) -> LoadResult<CardTable> {
        let mut table = CardTable::starter();
        table.extend(Self::load(path)?);
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{CardEffect, CardId, CardTarget};

    #[test]
    fn parses_effects_and_targets() {
        let cards = CardLoader::parse(
            r#"(cards: [
                (id: "steam_lance", name: "Steam Lance", target: enemy, strain_cost: 2, range: 3, effect: damage(5)),
                (id: "brace", name: "Brace", target: self_only, strain_cost: 0, range: 0, effect: guard(magnitude: 3, duration: 2)),
            ])"#,
        )
        .unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, CardId::from("steam_lance"));
        assert_eq!(cards[0].target, CardTarget::Enemy);
        assert_eq!(cards[0].effect, CardEffect::Damage(5));
        assert_eq!(
            cards[1].effect,
            CardEffect::Guard {
                magnitude: 3,
                duration: 2
            }
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = CardLoader::parse(
            r#"(cards: [
                (id: "x", name: "X", target: enemy, strain_cost: 0, range: 1, effect: strike),
                (id: "x", name: "X2", target: enemy, strain_cost: 0, range: 1, effect: strike),
            ])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate card id"));
    }
}
