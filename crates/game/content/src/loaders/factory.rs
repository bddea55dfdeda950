//! Content factory for assembling a playable encounter from data files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tactics_core::{
    BattleConfig, CardTable, EncounterBuilder, Grid, LoadPenalties, Position, TemplateStats,
    UnitTemplate,
};

use crate::inventory::InventoryManifest;
use crate::loaders::{
    CardLoader, ConfigLoader, InventoryLoader, LoadResult, MapLoader, UnitLoader, read_file,
};

/// One enemy spawn in an encounter file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub template: String,
    #[serde(default)]
    pub position: Option<(i32, i32)>,
}

/// Encounter file: which map to fight on, who shows up and who deploys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterSpec {
    pub map: String,
    pub enemies: Vec<SpawnSpec>,
    /// Squad template ids to deploy; empty deploys the whole roster.
    #[serde(default)]
    pub squad: Vec<String>,
}

/// Everything needed to build an encounter, already validated.
#[derive(Debug, Clone)]
pub struct ContentPack {
    pub config: BattleConfig,
    pub cards: CardTable,
    pub squad: Vec<UnitTemplate>,
    pub enemies: Vec<UnitTemplate>,
    pub grid: Grid,
    pub encounter: EncounterSpec,
    pub inventory: Option<InventoryManifest>,
}

impl ContentPack {
    /// Small built-in skirmish used when no content directory is configured.
    pub fn builtin() -> Self {
        let stats = |max_hp, atk, def, agi| TemplateStats {
            max_hp,
            atk,
            def,
            agi,
            acc: None,
        };
        let squad = vec![
            UnitTemplate::new("vanguard", "Vanguard", "squire", stats(20, 5, 2, 4)).with_deck([
                CardTable::BASIC_ATTACK,
                CardTable::BASIC_ATTACK,
                CardTable::GUARD,
                "class_power_slash",
                CardTable::WAIT,
            ]),
            UnitTemplate::new("warden", "Warden", "medic", stats(16, 3, 1, 5)).with_deck([
                CardTable::BASIC_ATTACK,
                "card_quick_shot",
                CardTable::AID,
                CardTable::AID,
                CardTable::WAIT,
            ]),
        ];
        let enemies = vec![
            UnitTemplate::new("gate_sentry", "Gate Sentry", "melee", stats(15, 4, 2, 3)),
            UnitTemplate::new("corrupted_scout", "Corrupted Scout", "scout", stats(12, 3, 1, 5)),
        ];
        let encounter = EncounterSpec {
            map: "builtin".to_owned(),
            enemies: vec![
                SpawnSpec {
                    template: "gate_sentry".to_owned(),
                    position: None,
                },
                SpawnSpec {
                    template: "corrupted_scout".to_owned(),
                    position: None,
                },
            ],
            squad: Vec::new(),
        };

        Self {
            config: BattleConfig::default(),
            cards: CardTable::starter(),
            squad,
            enemies,
            grid: Grid::new(6, 4),
            encounter,
            inventory: None,
        }
    }

    pub fn load_penalties(&self) -> Option<LoadPenalties> {
        self.inventory
            .as_ref()
            .map(InventoryManifest::load_penalties)
    }

    /// Resolves template ids into an [`EncounterBuilder`].
    pub fn encounter_builder(&self) -> LoadResult<EncounterBuilder> {
        let deployed: Vec<&UnitTemplate> = if self.encounter.squad.is_empty() {
            self.squad.iter().collect()
        } else {
            self.encounter
                .squad
                .iter()
                .map(|id| {
                    self.squad
                        .iter()
                        .find(|template| &template.id == id)
                        .ok_or_else(|| anyhow::anyhow!("Unknown squad template '{}'", id))
                })
                .collect::<LoadResult<_>>()?
        };

        let mut builder = EncounterBuilder::new(self.grid.clone())
            .players(deployed.into_iter().cloned())
            .load_penalties(self.load_penalties());

        for spawn in &self.encounter.enemies {
            let template = self
                .enemies
                .iter()
                .find(|template| template.id == spawn.template)
                .ok_or_else(|| anyhow::anyhow!("Unknown enemy template '{}'", spawn.template))?;
            let position = spawn.position.map(|(x, y)| Position::new(x, y));
            builder = builder.enemy(template.clone(), position);
        }
        Ok(builder)
    }
}

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── cards.ron
/// ├── squad.ron
/// ├── enemies.ron
/// ├── inventory.ron        (optional)
/// ├── encounters/
/// │   └── training.ron
/// └── maps/
///     └── training_yard.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Starter cards plus `cards.ron`.
    pub fn load_cards(&self) -> LoadResult<CardTable> {
        CardLoader::load_table(&self.data_dir.join("cards.ron"))
    }

    pub fn load_squad(&self) -> LoadResult<Vec<UnitTemplate>> {
        UnitLoader::load(&self.data_dir.join("squad.ron"))
    }

    pub fn load_enemies(&self) -> LoadResult<Vec<UnitTemplate>> {
        UnitLoader::load(&self.data_dir.join("enemies.ron"))
    }

    /// Load a grid from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<Grid> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    pub fn load_encounter(&self, name: &str) -> LoadResult<EncounterSpec> {
        let path = self
            .data_dir
            .join("encounters")
            .join(format!("{}.ron", name));
        let content = read_file(&path)?;
        ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))
    }

    /// `inventory.ron` is optional; without it no load penalties apply.
    pub fn load_inventory(&self) -> LoadResult<Option<InventoryManifest>> {
        let path = self.data_dir.join("inventory.ron");
        if !path.exists() {
            return Ok(None);
        }
        InventoryLoader::load(&path).map(Some)
    }

    /// Loads and cross-checks everything the named encounter needs.
    pub fn load_pack(&self, encounter: &str) -> LoadResult<ContentPack> {
        let config = self.load_config()?;
        let cards = self.load_cards()?;
        let squad = self.load_squad()?;
        let enemies = self.load_enemies()?;
        UnitLoader::check_decks(&squad, &cards)?;
        UnitLoader::check_decks(&enemies, &cards)?;

        let encounter = self.load_encounter(encounter)?;
        let grid = self.load_map(&encounter.map)?;
        let inventory = self.load_inventory()?;
        tracing::info!(
            data_dir = %self.data_dir.display(),
            cards = cards.len(),
            squad = squad.len(),
            enemies = encounter.enemies.len(),
            "content pack loaded"
        );

        Ok(ContentPack {
            config,
            cards,
            squad,
            enemies,
            grid,
            encounter,
            inventory,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::PcgRng;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn builtin_pack_builds_a_battle() {
        let pack = ContentPack::builtin();
        let state = pack
            .encounter_builder()
            .unwrap()
            .build(&pack.config, &mut PcgRng::new(5))
            .unwrap();
        assert_eq!(state.units.len(), 4);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn unknown_enemy_template_is_an_error() {
        let mut pack = ContentPack::builtin();
        pack.encounter.enemies.push(SpawnSpec {
            template: "ghost".to_owned(),
            position: None,
        });
        let err = pack.encounter_builder().unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
