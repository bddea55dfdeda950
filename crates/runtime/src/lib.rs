//! Runtime orchestration for tactical encounters.
//!
//! This crate wraps the pure battle engine in a session that owns the live
//! snapshot, keeps undo history, records commands for replay, and publishes
//! log, turn, and outcome events. Consumers embed [`EncounterSession`] and
//! feed it [`Command`]s directly or through an [`ActionProvider`].
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the encounter driver
//! - [`api`] exposes commands, providers, and errors
//! - [`events`] provides the topic-based event bus
//! - [`config`] reads session settings from the environment
pub mod api;
pub mod config;
pub mod events;
pub mod session;

pub use api::{
    ActionProvider, AutoBattleProvider, Command, ProviderKind, Result, RuntimeError,
    ScriptedProvider,
};
pub use config::RuntimeConfig;
pub use events::{Event, EventBus, LogEvent, OutcomeEvent, Topic, TurnEvent};
pub use session::{CommandReport, EncounterSession};
