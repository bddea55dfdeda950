//! Asynchronous abstraction for sourcing squad intent.
//!
//! Session users plug in [`ActionProvider`] implementations so an encounter
//! can run with human input, scripted fixtures, or the auto-battle policy.
use std::collections::VecDeque;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tactics_core::{Action, BattleState, Position, UnitId};
use tokio::sync::Mutex;

use super::errors::{ProviderKind, Result, RuntimeError};

/// One step of input to an encounter session.
///
/// The recorded command list plus the seed reproduces an encounter exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Command {
    Move {
        unit: UnitId,
        to: Position,
    },
    Attack {
        attacker: UnitId,
        defender: UnitId,
    },
    PlayCard {
        actor: UnitId,
        hand_index: usize,
        #[serde(default)]
        target: Option<UnitId>,
    },
    /// Hand the turn to the next unit.
    EndTurn,
    /// Let the auto-battle policy play the active squad member's turn.
    Auto,
    /// Let the enemy AI play the active enemy's turn.
    EnemyTurn,
}

impl Command {
    /// Engine action for the unit-level commands.
    pub fn to_action(&self) -> Option<Action> {
        match self {
            Command::Move { unit, to } => Some(Action::move_to(unit.clone(), *to)),
            Command::Attack { attacker, defender } => {
                Some(Action::attack(attacker.clone(), defender.clone()))
            }
            Command::PlayCard {
                actor,
                hand_index,
                target,
            } => Some(Action::play_card(actor.clone(), *hand_index, target.clone())),
            Command::EndTurn | Command::Auto | Command::EnemyTurn => None,
        }
    }
}

/// Trait for providing squad commands based on the current battle state.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Scripted/replayed commands
/// - Auto-battle
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide the next command for the active squad member.
    async fn next_command(&self, state: &BattleState) -> Result<Command>;
}

/// Always delegates to the auto-battle policy.
pub struct AutoBattleProvider;

#[async_trait]
impl ActionProvider for AutoBattleProvider {
    async fn next_command(&self, _state: &BattleState) -> Result<Command> {
        Ok(Command::Auto)
    }
}

/// Replays a fixed list of commands in order, for tests and recordings.
pub struct ScriptedProvider {
    commands: Mutex<VecDeque<Command>>,
}

impl ScriptedProvider {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: Mutex::new(commands.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.commands.lock().await.len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn next_command(&self, state: &BattleState) -> Result<Command> {
        self.commands
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| RuntimeError::ProviderExhausted {
                kind: ProviderKind::of_active(state),
            })
    }
}
