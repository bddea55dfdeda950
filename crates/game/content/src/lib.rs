//! Data-driven battle content and loaders.
//!
//! This crate houses the static content a battle is built from and the
//! loaders for its RON/TOML data files:
//! - Card catalogs (RON)
//! - Squad and enemy unit templates (RON)
//! - Grid layouts and encounters (RON)
//! - Battle tuning (`BattleConfig`, TOML)
//! - Squad inventory and the load-penalty snapshot it produces
//!
//! Content is consumed when an encounter is built and never appears in the
//! battle state itself.

pub mod inventory;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use inventory::{
    Capacity, CapacityTier, InventoryBin, InventoryError, InventoryItem, InventoryManifest, Load,
};

#[cfg(feature = "loaders")]
pub use loaders::{
    CardLoader, ConfigLoader, ContentFactory, ContentPack, EncounterSpec, InventoryLoader,
    MapData, MapLoader, SpawnSpec, UnitLoader,
};
