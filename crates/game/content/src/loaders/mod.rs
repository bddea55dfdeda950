//! Content loaders for reading battle data from files.
//!
//! RON carries catalogs (cards, unit templates, grid layouts, inventory) and
//! TOML carries tuning (`BattleConfig`).

pub mod cards;
pub mod config;
pub mod factory;
pub mod inventory;
pub mod map;
pub mod units;

pub use cards::CardLoader;
pub use config::ConfigLoader;
pub use factory::{ContentFactory, ContentPack, EncounterSpec, SpawnSpec};
pub use inventory::InventoryLoader;
pub use map::{MapData, MapLoader};
pub use units::UnitLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
