//! Event types for different topics.

use serde::{Deserialize, Serialize};
use tactics_core::{BattlePhase, LogEntry, Rewards, UnitId};

/// One battle log line, tagged with the turn it was written in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub turn: u32,
    pub entry: LogEntry,
}

/// Events related to turn management (lightweight)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEvent {
    /// Unit that acts next
    pub active: UnitId,
    pub turn: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub phase: BattlePhase,
    pub rewards: Option<Rewards>,
}
