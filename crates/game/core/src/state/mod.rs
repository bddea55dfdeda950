//! Authoritative battle state representation.
//!
//! [`BattleState`] is a plain value: engine entrypoints borrow it, clone it,
//! and hand back a new snapshot. The input snapshot is never mutated, which is
//! what lets the runtime keep an undo history and replay encounters.
mod common;
mod error;
mod log;
mod rewards;
mod turn;
mod unit;

pub use common::{CardId, Position, Side, UnitId};
pub use error::StateError;
pub use log::{BattleLog, LogEntry, LogTag};
pub use rewards::Rewards;
pub use turn::{BattlePhase, compute_turn_order};
pub use unit::{Buff, BuffKind, CardPiles, CombatStats, UnitState};

use crate::env::{Grid, GridDimensions, LoadPenalties};

/// Canonical snapshot of one encounter.
///
/// # Invariants
///
/// - `turn_order` holds exactly the ids of living units, in initiative order
/// - `phase` never leaves `Victory` or `Defeat` once reached
/// - `rewards` is present only in the `Victory` phase
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub grid: Grid,
    /// Living units in roster order. Roster order is the tie-break order for
    /// every "first unit wins" rule (nearest target, reward enumeration).
    pub units: Vec<UnitState>,
    pub turn_order: Vec<UnitId>,
    pub active: Option<UnitId>,
    /// Full rotations started; 0 before the first activation.
    pub turn: u32,
    pub phase: BattlePhase,
    pub log: BattleLog,
    pub rewards: Option<Rewards>,
    /// Set once at setup; never changes during the encounter.
    pub load_penalties: Option<LoadPenalties>,
    pub enemies_defeated: u32,
}

impl BattleState {
    /// Creates a battle with the initiative order computed but no unit
    /// activated yet.
    pub fn new(grid: Grid, units: Vec<UnitState>) -> Self {
        let turn_order = compute_turn_order(&units);
        Self {
            grid,
            units,
            turn_order,
            active: None,
            turn: 0,
            phase: BattlePhase::Active,
            log: BattleLog::new(),
            rewards: None,
            load_penalties: None,
            enemies_defeated: 0,
        }
    }

    pub fn with_load_penalties(mut self, penalties: Option<LoadPenalties>) -> Self {
        self.load_penalties = penalties;
        self
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.grid.dimensions()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    // ===== unit lookup =====

    pub fn unit(&self, id: &UnitId) -> Option<&UnitState> {
        self.units.iter().find(|unit| &unit.id == id)
    }

    pub fn unit_mut(&mut self, id: &UnitId) -> Option<&mut UnitState> {
        self.units.iter_mut().find(|unit| &unit.id == id)
    }

    pub fn require_unit(&self, id: &UnitId) -> Result<&UnitState, StateError> {
        self.unit(id)
            .ok_or_else(|| StateError::UnitNotFound(id.clone()))
    }

    pub fn active_unit(&self) -> Option<&UnitState> {
        self.active.as_ref().and_then(|id| self.unit(id))
    }

    pub fn units_on(&self, side: Side) -> impl Iterator<Item = &UnitState> {
        self.units.iter().filter(move |unit| unit.side == side)
    }

    pub fn has_units_on(&self, side: Side) -> bool {
        self.units_on(side).next().is_some()
    }

    pub fn unit_at(&self, position: Position) -> Option<&UnitState> {
        self.units
            .iter()
            .find(|unit| unit.position == Some(position))
    }

    /// Index of the active unit in the turn order.
    pub fn active_index(&self) -> Option<usize> {
        let active = self.active.as_ref()?;
        self.turn_order.iter().position(|id| id == active)
    }

    /// Removes a unit from the roster and the turn order.
    pub fn remove_unit(&mut self, id: &UnitId) -> Option<UnitState> {
        let index = self.units.iter().position(|unit| &unit.id == id)?;
        self.turn_order.retain(|entry| entry != id);
        Some(self.units.remove(index))
    }

    // ===== grid queries =====

    pub fn is_inside_bounds(&self, position: Position) -> bool {
        self.grid.contains(position)
    }

    /// In bounds, passable terrain and not occupied by any unit.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.grid.is_passable(position) && self.unit_at(position).is_none()
    }

    /// Straight-line range check: `0 < distance <= agi` and the destination
    /// is walkable. Tiles in between are not inspected.
    pub fn can_unit_move_to(&self, id: &UnitId, destination: Position) -> bool {
        let Some(unit) = self.unit(id) else {
            return false;
        };
        let Some(origin) = unit.position else {
            return false;
        };
        if !self.is_inside_bounds(destination) {
            return false;
        }
        let distance = origin.manhattan(destination);
        distance > 0
            && i64::from(distance) <= i64::from(unit.stats.agi)
            && self.is_walkable(destination)
    }

    /// Both units exist, oppose each other and stand orthogonally adjacent.
    pub fn can_unit_attack_target(&self, attacker: &UnitId, defender: &UnitId) -> bool {
        let (Some(a), Some(d)) = (self.unit(attacker), self.unit(defender)) else {
            return false;
        };
        a.side.opposes(d.side) && a.distance_to(d) == Some(1)
    }
}
