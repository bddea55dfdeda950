//! Deterministic tactical battle rules shared by every front end.
//!
//! `tactics-core` defines the canonical rules (grid, units, strain, cards,
//! turn sequencing, combat, enemy AI and rewards) as pure functions over a
//! [`BattleState`] snapshot. All randomness flows through an injected
//! [`RngSource`], so the same seed and commands always replay the same
//! encounter. [`engine::BattleEngine`] is the snapshot-in, snapshot-out entry
//! point; the runtime and content crates depend on the types re-exported here.
pub mod action;
pub mod ai;
pub mod cards;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;
pub mod strain;

pub use action::{
    Action, ActionResult, ActionTransition, AttackAction, AttackError, CardError, CardOutcome,
    CardResolution, MoveAction, MoveError, PlayCardAction,
};
pub use ai::{AutoPlan, AutoStep, AutoTurn, EnemyDecision, EnemyTurn};
pub use cards::{CardCatalog, CardDefinition, CardEffect, CardTable, CardTarget, DrawReport};
pub use combat::AttackOutcome;
pub use config::{BattleConfig, RewardBasis};
pub use engine::{
    AiError, BattleEngine, EncounterBuilder, ExecuteError, ExecutionOutcome, PlacementError,
    PlacementPlan, SetupError, TransitionPhase, TransitionPhaseError, TurnError, TurnReport,
};
#[cfg(feature = "rand")]
pub use env::RandSource;
pub use env::{
    BattleEnv, Grid, GridDimensions, LoadPenalties, PcgRng, RngSource, ScriptedRng,
    TemplateStats, TerrainKind, Tile, UnitTemplate,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    BattleLog, BattlePhase, BattleState, Buff, BuffKind, CardId, CardPiles, CombatStats,
    LogEntry, LogTag, Position, Rewards, Side, StateError, UnitId, UnitState,
};
pub use strain::{StrainChange, StrainCrossing};
