//! Read-only inputs consumed by the battle engine.
//!
//! Grid geometry, unit templates, the load-penalty snapshot and the random
//! source all live here. [`BattleEnv`] bundles the static oracles an engine
//! entrypoint needs so they can be threaded through without hard coupling to
//! concrete catalog implementations.
mod grid;
mod load;
mod rng;
mod templates;

pub use grid::{Grid, GridDimensions, TerrainKind, Tile};
pub use load::LoadPenalties;
#[cfg(feature = "rand")]
pub use rng::RandSource;
pub use rng::{PcgRng, RngSource, ScriptedRng, shuffle};
pub use templates::{TemplateStats, UnitTemplate};

use crate::cards::CardCatalog;
use crate::config::BattleConfig;

/// Aggregates the read-only oracles required by the action pipeline.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    config: &'a BattleConfig,
    cards: &'a dyn CardCatalog,
}

impl<'a> BattleEnv<'a> {
    pub fn new(config: &'a BattleConfig, cards: &'a dyn CardCatalog) -> Self {
        Self { config, cards }
    }

    pub fn config(&self) -> &'a BattleConfig {
        self.config
    }

    pub fn cards(&self) -> &'a dyn CardCatalog {
        self.cards
    }
}

impl std::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
